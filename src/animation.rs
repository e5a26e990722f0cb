//! Procedural avatar animation.
//!
//! Event ports ([`AvatarAnimationLoop::on_pointer_move`],
//! [`AvatarAnimationLoop::on_click`]) only record input. All motion is
//! computed in [`AvatarAnimationLoop::advance_frame`]: idle oscillators are
//! closed-form functions of elapsed time, the pointer-follow rotation is the
//! only accumulated state (exponentially smoothed), and a click adds a
//! decaying pulse on top.

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// A sine oscillator: `sin(frequency * t + phase) * amplitude`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    /// Angular frequency in radians per second
    pub frequency: f64,
    pub amplitude: f64,
    pub phase: f64,
}

impl Oscillator {
    pub const fn new(frequency: f64, amplitude: f64, phase: f64) -> Self {
        Oscillator {
            frequency,
            amplitude,
            phase,
        }
    }

    pub fn sample(&self, t: f64) -> f64 {
        (self.frequency * t + self.phase).sin() * self.amplitude
    }

    pub fn period(&self) -> f64 {
        TAU / self.frequency
    }
}

pub const GROUP_SWAY: Oscillator = Oscillator::new(0.5, 0.1, 0.0);
pub const HEAD_YAW: Oscillator = Oscillator::new(2.0, 0.1, 0.0);
pub const HEAD_PITCH: Oscillator = Oscillator::new(0.7, 0.05, 0.0);
pub const LEFT_ARM: Oscillator = Oscillator::new(3.0, 0.3, 0.0);
pub const RIGHT_ARM: Oscillator = Oscillator::new(3.0, 0.3, PI);
pub const LEFT_LEG: Oscillator = Oscillator::new(2.0, 0.2, 0.0);
pub const RIGHT_LEG: Oscillator = Oscillator::new(2.0, 0.2, PI);
pub const BREATH: Oscillator = Oscillator::new(1.5, 0.03, 0.0);

/// Eye openness while a blink is in progress
pub const BLINK_CLOSED: f64 = 0.1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationTuning {
    /// Fraction of the remaining distance covered per frame
    pub smoothing: f64,
    pub pointer_gain_yaw: f64,
    pub pointer_gain_pitch: f64,
    pub max_yaw: f64,
    pub max_pitch: f64,
    /// How much further the head turns than the body, as a share of the body's rotation
    pub head_follow: f64,
    pub click_decay: f64,
    pub click_bounce: f64,
    pub click_nod: f64,
    pub click_scale: f64,
    /// Angular frequency of the blink carrier
    pub blink_frequency: f64,
    /// Eyes close while the carrier is above this value
    pub blink_threshold: f64,
}

impl Default for AnimationTuning {
    fn default() -> Self {
        AnimationTuning {
            smoothing: 0.1,
            pointer_gain_yaw: 0.8,
            pointer_gain_pitch: 0.5,
            max_yaw: 0.5,
            max_pitch: 0.3,
            head_follow: 0.5,
            click_decay: 0.08,
            click_bounce: 0.35,
            click_nod: 0.3,
            click_scale: 0.12,
            blink_frequency: 1.3,
            blink_threshold: 0.985,
        }
    }
}

/// Cursor position relative to the viewport centre, each axis in [-1, 1];
/// y is positive toward the top
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub normalized_x: f64,
    pub normalized_y: f64,
}

impl PointerState {
    pub fn from_client(client_x: f64, client_y: f64, viewport_width: f64, viewport_height: f64) -> Self {
        if viewport_width <= 0.0 || viewport_height <= 0.0 {
            return PointerState::default();
        }
        PointerState {
            normalized_x: ((client_x / viewport_width) * 2.0 - 1.0).clamp(-1.0, 1.0),
            normalized_y: (1.0 - (client_y / viewport_height) * 2.0).clamp(-1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClickPulse {
    pub active: bool,
    pub remaining_intensity: f64,
}

impl ClickPulse {
    pub fn trigger(&mut self) {
        self.active = true;
        self.remaining_intensity = 1.0;
    }

    /// Steps the pulse down and returns what is left; reaching zero deactivates it
    pub fn decay(&mut self, step: f64) -> f64 {
        if !self.active {
            return 0.0;
        }
        self.remaining_intensity -= step;
        if self.remaining_intensity <= 0.0 {
            self.remaining_intensity = 0.0;
            self.active = false;
        }
        self.remaining_intensity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub yaw: f64,
    pub pitch: f64,
}

/// Per-frame transform offsets for every segment of the figure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvatarPose {
    pub group_yaw: f64,
    pub group_pitch: f64,
    pub head_yaw: f64,
    pub head_pitch: f64,
    pub left_arm_swing: f64,
    pub right_arm_swing: f64,
    pub left_leg_swing: f64,
    pub right_leg_swing: f64,
    /// Vertical offset of the whole figure
    pub bounce: f64,
    pub scale: f64,
    /// 1.0 open, [`BLINK_CLOSED`] mid-blink
    pub eye_openness: f64,
}

impl Default for AvatarPose {
    fn default() -> Self {
        AvatarPose {
            group_yaw: 0.0,
            group_pitch: 0.0,
            head_yaw: 0.0,
            head_pitch: 0.0,
            left_arm_swing: 0.0,
            right_arm_swing: 0.0,
            left_leg_swing: 0.0,
            right_leg_swing: 0.0,
            bounce: 0.0,
            scale: 1.0,
            eye_openness: 1.0,
        }
    }
}

/// Pointer-derived rotation target, clamped to the configured maximum angles
pub fn pointer_target(pointer: &PointerState, tuning: &AnimationTuning) -> Rotation {
    Rotation {
        yaw: (pointer.normalized_x * tuning.pointer_gain_yaw).clamp(-tuning.max_yaw, tuning.max_yaw),
        pitch: (-pointer.normalized_y * tuning.pointer_gain_pitch)
            .clamp(-tuning.max_pitch, tuning.max_pitch),
    }
}

pub fn eye_openness(t: f64, tuning: &AnimationTuning) -> f64 {
    if (t * tuning.blink_frequency).sin() > tuning.blink_threshold {
        BLINK_CLOSED
    } else {
        1.0
    }
}

/// Pose from the idle oscillators alone
pub fn idle_pose(t: f64, tuning: &AnimationTuning) -> AvatarPose {
    AvatarPose {
        group_yaw: GROUP_SWAY.sample(t),
        group_pitch: 0.0,
        head_yaw: HEAD_YAW.sample(t),
        head_pitch: HEAD_PITCH.sample(t),
        left_arm_swing: LEFT_ARM.sample(t),
        right_arm_swing: RIGHT_ARM.sample(t),
        left_leg_swing: LEFT_LEG.sample(t),
        right_leg_swing: RIGHT_LEG.sample(t),
        bounce: BREATH.sample(t),
        scale: 1.0,
        eye_openness: eye_openness(t, tuning),
    }
}

#[derive(Debug, Clone, Default)]
pub struct AvatarAnimationLoop {
    tuning: AnimationTuning,
    pointer: PointerState,
    pulse: ClickPulse,
    rotation: Rotation,
}

impl AvatarAnimationLoop {
    pub fn new(tuning: AnimationTuning) -> Self {
        AvatarAnimationLoop {
            tuning,
            ..Default::default()
        }
    }

    pub fn on_pointer_move(&mut self, client_x: f64, client_y: f64, viewport_width: f64, viewport_height: f64) {
        self.pointer = PointerState::from_client(client_x, client_y, viewport_width, viewport_height);
    }

    pub fn on_click(&mut self) {
        self.pulse.trigger();
    }

    pub fn advance_frame(&mut self, elapsed_seconds: f64) -> AvatarPose {
        let tuning = &self.tuning;

        let target = pointer_target(&self.pointer, tuning);
        self.rotation.yaw += (target.yaw - self.rotation.yaw) * tuning.smoothing;
        self.rotation.pitch += (target.pitch - self.rotation.pitch) * tuning.smoothing;

        let intensity = self.pulse.decay(tuning.click_decay);

        let mut pose = idle_pose(elapsed_seconds, tuning);
        pose.group_yaw += self.rotation.yaw;
        pose.group_pitch += self.rotation.pitch;
        pose.head_yaw += self.rotation.yaw * tuning.head_follow;
        pose.head_pitch += self.rotation.pitch * tuning.head_follow;

        if intensity > 0.0 {
            pose.bounce += tuning.click_bounce * intensity;
            pose.head_pitch += tuning.click_nod * intensity;
            pose.scale += tuning.click_scale * intensity;
        }
        pose
    }

    /// Back to a centred pointer, no pulse, and no accumulated rotation
    pub fn reset(&mut self) {
        self.pointer = PointerState::default();
        self.pulse = ClickPulse::default();
        self.rotation = Rotation::default();
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn pulse(&self) -> ClickPulse {
        self.pulse
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn tuning(&self) -> &AnimationTuning {
        &self.tuning
    }
}
