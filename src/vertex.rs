/// Vertex structure with world position, screen position, and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f64; 3],
    pub screen_position: [f64; 2],
    pub normal: [f64; 3],
}

/// Orthographic camera looking down -Z; screen Y grows downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: [f64; 2],
    pub scale: f64,
    /// World-space point that lands on `center`
    pub target: [f64; 2],
}

impl Camera {
    /// Fits a figure of `extent` world units into a `width` x `height` pixel buffer
    pub fn fit(width: usize, height: usize, extent: f64, zoom: f64, target: [f64; 2]) -> Self {
        let extent = if extent > 0.0 { extent } else { 1.0 };
        Camera {
            center: [width as f64 / 2.0, height as f64 / 2.0],
            scale: (width.min(height) as f64 / extent) * zoom,
            target,
        }
    }

    pub fn project(&self, position: [f64; 3], normal: [f64; 3]) -> Vertex {
        let screen_x = (position[0] - self.target[0]) * self.scale + self.center[0];
        let screen_y = self.center[1] - (position[1] - self.target[1]) * self.scale;
        Vertex {
            position,
            screen_position: [screen_x, screen_y],
            normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_maps_to_center() {
        let camera = Camera::fit(80, 40, 4.0, 1.0, [0.0, 0.5]);
        let v = camera.project([0.0, 0.5, 0.0], [0.0, 0.0, 1.0]);
        assert_eq!(v.screen_position, [40.0, 20.0]);
        let up = camera.project([0.0, 1.5, 0.0], [0.0, 0.0, 1.0]);
        assert!(up.screen_position[1] < 20.0);
    }
}
