use std::time::{Duration, Instant};

/// View toggles for the avatar viewport
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Enable debug overlay
    pub debug: bool,
    /// Animation paused
    pub paused: bool,
    /// Wireframe mode enabled
    pub wireframe: bool,
    /// Zoom level
    pub zoom: f64,
    /// Light position in world space
    pub light_position: [f64; 3],
}

impl ViewState {
    pub fn new(zoom: f64, light_position: [f64; 3]) -> Self {
        ViewState {
            debug: false,
            paused: false,
            wireframe: false,
            zoom: zoom.clamp(0.1, 10.0),
            light_position,
        }
    }

    pub fn zoom_by(&mut self, factor: f64) {
        self.zoom = (self.zoom * factor).clamp(0.1, 10.0);
    }
}

/// Animation time that stands still while paused
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    elapsed: f64,
}

impl FrameClock {
    pub fn advance(&mut self, dt: Duration, paused: bool) -> f64 {
        if !paused {
            self.elapsed += dt.as_secs_f64();
        }
        self.elapsed
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

/// Frames per second over roughly one-second windows
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        FpsCounter {
            frames_since_last_update: 0,
            last_fps_calculation: now,
            fps: 0.0,
        }
    }

    pub fn record(&mut self, now: Instant) {
        self.frames_since_last_update += 1;
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}
