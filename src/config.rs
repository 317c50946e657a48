// Viewer tuning knobs

/// How far one key press moves each kind of parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSizes {
    pub translate: f32,
    /// Degrees per press.
    pub rotate_deg: f32,
    pub scale: f32,
    pub shear: f32,
}

impl Default for StepSizes {
    fn default() -> Self {
        Self {
            translate: 0.1,
            rotate_deg: 5.0,
            scale: 0.1,
            shear: 0.1,
        }
    }
}

/// Start-up configuration for the viewer.
///
/// ```
/// use affine_viewer::ViewerConfig;
///
/// let config = ViewerConfig::default()
///     .title("Transform playground")
///     .rotate_step(15.0);
/// assert_eq!(config.steps.rotate_deg, 15.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub title: String,
    pub steps: StepSizes,
    /// Camera travel per key press, in world units.
    pub camera_speed: f32,
    /// Degrees of yaw/pitch per pixel of mouse drag.
    pub mouse_sensitivity: f32,
    pub fov_y_deg: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "3D Transformation".to_string(),
            steps: StepSizes::default(),
            camera_speed: 0.1,
            mouse_sensitivity: 0.1,
            fov_y_deg: 45.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}

impl ViewerConfig {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn translate_step(mut self, step: f32) -> Self {
        self.steps.translate = step;
        self
    }

    pub fn rotate_step(mut self, degrees: f32) -> Self {
        self.steps.rotate_deg = degrees;
        self
    }

    pub fn scale_step(mut self, step: f32) -> Self {
        self.steps.scale = step;
        self
    }

    pub fn shear_step(mut self, step: f32) -> Self {
        self.steps.shear = step;
        self
    }

    pub fn camera_speed(mut self, speed: f32) -> Self {
        self.camera_speed = speed;
        self
    }

    pub fn mouse_sensitivity(mut self, sensitivity: f32) -> Self {
        self.mouse_sensitivity = sensitivity;
        self
    }

    /// Vertical field of view and clip planes of the perspective projection.
    pub fn projection(mut self, fov_y_deg: f32, z_near: f32, z_far: f32) -> Self {
        self.fov_y_deg = fov_y_deg;
        self.z_near = z_near;
        self.z_far = z_far;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_controls() {
        let config = ViewerConfig::default();
        assert_eq!(config.steps.translate, 0.1);
        assert_eq!(config.steps.rotate_deg, 5.0);
        assert_eq!(config.camera_speed, 0.1);
        assert_eq!((config.z_near, config.z_far), (0.1, 100.0));
    }

    #[test]
    fn builder_overrides_single_fields() {
        let config = ViewerConfig::default()
            .title("demo")
            .rotate_step(15.0)
            .projection(60.0, 0.5, 50.0);
        assert_eq!(config.title, "demo");
        assert_eq!(config.steps.rotate_deg, 15.0);
        assert_eq!(config.steps.scale, 0.1);
        assert_eq!(config.fov_y_deg, 60.0);
    }
}
