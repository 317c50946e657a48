// Session state and input dispatch

use log::{debug, info, trace};

use crate::camera::{CameraMove, FirstPersonCamera};
use crate::config::{StepSizes, ViewerConfig};
use crate::geometry::Shape;
use crate::input::{KeyPress, ESCAPE, SPACE};
use crate::math::Matrix4;
use crate::transform::{self, Axis, ShearPlane, TransformMode, TransformState};
use crate::ui::{self, ButtonAction, Viewport};

/// What the host loop should do after an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Nothing changed.
    Ignored,
    /// Visible state changed; request a redraw.
    Redraw,
    /// The user asked to quit.
    Exit,
}

/// Right-button drag tracking for camera look.
#[derive(Debug, Clone, Copy, Default)]
struct DragLook {
    active: bool,
    last: Option<(f32, f32)>,
}

/// Everything the viewer knows about the displayed object and how the user
/// is driving it. Owned by the event loop and passed by reference.
#[derive(Debug, Clone)]
pub struct Session {
    transform: TransformState,
    combined: Matrix4,
    recompositions: u64,
    shape: Shape,
    mode: TransformMode,
    camera_control: bool,
    camera: FirstPersonCamera,
    steps: StepSizes,
    drag: DragLook,
}

impl Session {
    pub fn new(config: &ViewerConfig) -> Self {
        let transform = TransformState::default();
        Self {
            combined: transform::compose(&transform),
            transform,
            recompositions: 0,
            shape: Shape::default(),
            mode: TransformMode::default(),
            camera_control: false,
            camera: FirstPersonCamera::new(config.camera_speed, config.mouse_sensitivity),
            steps: config.steps,
            drag: DragLook::default(),
        }
    }

    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    /// Row-major object matrix, current as of the last mutation.
    pub fn combined(&self) -> &Matrix4 {
        &self.combined
    }

    /// The object matrix in the column-major layout the renderer uploads.
    pub fn render_matrix(&self) -> [f32; 16] {
        transform::render_matrix(&self.combined)
    }

    /// How many times the object matrix has been rebuilt.
    pub fn recompositions(&self) -> u64 {
        self.recompositions
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    pub fn camera_control(&self) -> bool {
        self.camera_control
    }

    pub fn camera(&self) -> &FirstPersonCamera {
        &self.camera
    }

    /// Whether the button bound to `action` shows as selected.
    pub fn is_selected(&self, action: ButtonAction) -> bool {
        match action {
            ButtonAction::ShapeSelector(shape) => shape == self.shape,
            ButtonAction::ModeSelector(mode) => mode == self.mode,
            ButtonAction::CameraToggle => self.camera_control,
        }
    }

    /// Handle one key press.
    pub fn handle_key(&mut self, press: KeyPress) -> Reaction {
        if press.has_command_modifier() {
            return Reaction::Ignored;
        }
        match press.key {
            ESCAPE => return Reaction::Exit,
            'c' => {
                self.toggle_camera_control();
                return Reaction::Redraw;
            }
            _ => {}
        }
        if let Some(reaction) = self.select_by_digit(press.key) {
            return reaction;
        }
        if self.camera_control {
            self.drive_camera(press.key)
        } else {
            self.drive_transform(press.key)
        }
    }

    /// Handle a left click at window coordinates (origin top-left).
    pub fn handle_click(&mut self, x: f32, y: f32, viewport: Viewport) -> Reaction {
        match ui::hit_test(&ui::layout(viewport), x, y) {
            Some(ButtonAction::CameraToggle) => {
                self.toggle_camera_control();
                Reaction::Redraw
            }
            Some(ButtonAction::ShapeSelector(shape)) => self.select_shape(shape),
            Some(ButtonAction::ModeSelector(mode)) => self.select_mode(mode),
            None => Reaction::Ignored,
        }
    }

    /// Press or release of the look button (right mouse button).
    pub fn handle_look_button(&mut self, pressed: bool) {
        self.drag.active = pressed;
        if pressed {
            self.drag.last = None;
        }
    }

    /// Cursor motion. Turns the camera while dragging in camera control.
    pub fn handle_pointer_motion(&mut self, x: f32, y: f32) -> Reaction {
        if !self.drag.active || !self.camera_control {
            return Reaction::Ignored;
        }
        let Some((last_x, last_y)) = self.drag.last.replace((x, y)) else {
            return Reaction::Ignored;
        };
        // Window y grows downwards; pitch grows upwards.
        self.camera.look(x - last_x, last_y - y);
        trace!("camera front {:?}", self.camera.front());
        Reaction::Redraw
    }

    /// One-line summary of the selection and transform values.
    pub fn status_line(&self) -> String {
        let t = &self.transform;
        let on_off = |flag: bool| if flag { "ON" } else { "OFF" };
        format!(
            "{} | {} | camera {} | pos ({:.1}, {:.1}, {:.1}) rot ({:.1}, {:.1}, {:.1}) \
             scale ({:.1}, {:.1}, {:.1}) shear xy {:.1} xz {:.1} yz {:.1} | reflect X {} Y {} Z {}",
            self.mode.label(),
            self.shape.label(),
            on_off(self.camera_control),
            t.position.x,
            t.position.y,
            t.position.z,
            t.rotation_deg.x,
            t.rotation_deg.y,
            t.rotation_deg.z,
            t.scale().x,
            t.scale().y,
            t.scale().z,
            t.shear.x,
            t.shear.y,
            t.shear.z,
            on_off(t.reflect[0]),
            on_off(t.reflect[1]),
            on_off(t.reflect[2]),
        )
    }

    fn toggle_camera_control(&mut self) {
        self.camera_control = !self.camera_control;
        info!(
            "camera control {}",
            if self.camera_control { "on" } else { "off" }
        );
    }

    fn select_shape(&mut self, shape: Shape) -> Reaction {
        if shape != self.shape {
            info!("shape -> {}", shape.label());
        }
        self.shape = shape;
        Reaction::Redraw
    }

    fn select_mode(&mut self, mode: TransformMode) -> Reaction {
        if self.camera_control {
            return Reaction::Ignored;
        }
        if mode != self.mode {
            info!("mode -> {}", mode.label());
        }
        self.mode = mode;
        Reaction::Redraw
    }

    fn select_by_digit(&mut self, key: char) -> Option<Reaction> {
        let digit = key.to_digit(10)? as usize;
        let reaction = match digit {
            1..=5 => self.select_mode(TransformMode::ALL[digit - 1]),
            6..=9 => self.select_shape(Shape::ALL[digit - 6]),
            _ => return None,
        };
        Some(reaction)
    }

    fn drive_camera(&mut self, key: char) -> Reaction {
        match key {
            'w' => self.camera.step(CameraMove::Forward),
            's' => self.camera.step(CameraMove::Backward),
            'a' => self.camera.step(CameraMove::Left),
            'd' => self.camera.step(CameraMove::Right),
            'q' => self.camera.step(CameraMove::Up),
            'e' => self.camera.step(CameraMove::Down),
            SPACE => self.camera.reset(),
            _ => return Reaction::Ignored,
        }
        debug!("camera at {:?}", self.camera.position);
        Reaction::Redraw
    }

    fn drive_transform(&mut self, key: char) -> Reaction {
        let steps = self.steps;
        let t = &mut self.transform;
        match (self.mode, key) {
            (mode, SPACE) => t.reset(mode),

            (TransformMode::Translate, 'w') => t.translate(Axis::Y, steps.translate),
            (TransformMode::Translate, 's') => t.translate(Axis::Y, -steps.translate),
            (TransformMode::Translate, 'a') => t.translate(Axis::X, -steps.translate),
            (TransformMode::Translate, 'd') => t.translate(Axis::X, steps.translate),
            (TransformMode::Translate, 'q') => t.translate(Axis::Z, -steps.translate),
            (TransformMode::Translate, 'e') => t.translate(Axis::Z, steps.translate),

            (TransformMode::Rotate, 'w') => t.rotate(Axis::X, steps.rotate_deg),
            (TransformMode::Rotate, 's') => t.rotate(Axis::X, -steps.rotate_deg),
            (TransformMode::Rotate, 'a') => t.rotate(Axis::Y, -steps.rotate_deg),
            (TransformMode::Rotate, 'd') => t.rotate(Axis::Y, steps.rotate_deg),
            (TransformMode::Rotate, 'q') => t.rotate(Axis::Z, -steps.rotate_deg),
            (TransformMode::Rotate, 'e') => t.rotate(Axis::Z, steps.rotate_deg),

            (TransformMode::Scale, 'w') => t.rescale(Axis::Y, steps.scale),
            (TransformMode::Scale, 's') => t.rescale(Axis::Y, -steps.scale),
            (TransformMode::Scale, 'a') => t.rescale(Axis::X, -steps.scale),
            (TransformMode::Scale, 'd') => t.rescale(Axis::X, steps.scale),
            (TransformMode::Scale, 'q') => t.rescale(Axis::Z, -steps.scale),
            (TransformMode::Scale, 'e') => t.rescale(Axis::Z, steps.scale),

            (TransformMode::Shear, 'w') => t.add_shear(ShearPlane::Xy, steps.shear),
            (TransformMode::Shear, 's') => t.add_shear(ShearPlane::Xy, -steps.shear),
            (TransformMode::Shear, 'a') => t.add_shear(ShearPlane::Xz, steps.shear),
            (TransformMode::Shear, 'd') => t.add_shear(ShearPlane::Xz, -steps.shear),
            (TransformMode::Shear, 'q') => t.add_shear(ShearPlane::Yz, steps.shear),
            (TransformMode::Shear, 'e') => t.add_shear(ShearPlane::Yz, -steps.shear),

            (TransformMode::Reflect, 'x') => t.toggle_reflection(Axis::X),
            (TransformMode::Reflect, 'y') => t.toggle_reflection(Axis::Y),
            (TransformMode::Reflect, 'z') => t.toggle_reflection(Axis::Z),

            _ => return Reaction::Ignored,
        }
        self.recompose();
        Reaction::Redraw
    }

    fn recompose(&mut self) {
        self.combined = transform::compose(&self.transform);
        self.recompositions += 1;
        debug!(
            "{} pos {} rot {} scale {} shear {} reflect {:?}",
            self.mode.label(),
            self.transform.position,
            self.transform.rotation_deg,
            self.transform.scale(),
            self.transform.shear,
            self.transform.reflect
        );
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::Vec3;

    fn press(session: &mut Session, keys: &str) -> Vec<Reaction> {
        keys.chars().map(|k| session.handle_key(KeyPress::new(k))).collect()
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 700.0)
    }

    fn centre_of(action: ButtonAction) -> (f32, f32) {
        let rect = ui::layout(viewport())
            .into_iter()
            .find(|b| b.action == action)
            .map(|b| b.rect)
            .expect("button laid out");
        (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
    }

    #[test]
    fn starts_with_identity_and_defaults() {
        let session = Session::default();
        assert_eq!(*session.combined(), Matrix4::IDENTITY);
        assert_eq!(session.shape(), Shape::Cube);
        assert_eq!(session.mode(), TransformMode::Translate);
        assert!(!session.camera_control());
        assert_eq!(session.recompositions(), 0);
    }

    #[test]
    fn translate_keys_move_along_axes() {
        let mut session = Session::default();
        press(&mut session, "wwdq");
        let p = session.transform().position;
        assert_abs_diff_eq!(p.x, 0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y, 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(p.z, -0.1, epsilon = 1e-6);
        assert_eq!(session.combined().column(3)[1], p.y);
    }

    #[test]
    fn each_mutation_recomposes_exactly_once() {
        let mut session = Session::default();
        let reactions = press(&mut session, "wasd");
        assert!(reactions.iter().all(|r| *r == Reaction::Redraw));
        assert_eq!(session.recompositions(), 4);
        assert_eq!(
            *session.combined(),
            transform::compose(session.transform())
        );
    }

    #[test]
    fn unknown_keys_are_no_ops() {
        let mut session = Session::default();
        let before = *session.transform();
        assert_eq!(press(&mut session, "kx0!"), vec![Reaction::Ignored; 4]);
        assert_eq!(*session.transform(), before);
        assert_eq!(session.recompositions(), 0);
    }

    #[test]
    fn command_modifiers_suppress_controls() {
        let mut session = Session::default();
        assert_eq!(
            session.handle_key(KeyPress::new('w').ctrl()),
            Reaction::Ignored
        );
        assert_eq!(
            session.handle_key(KeyPress::new(ESCAPE).alt()),
            Reaction::Ignored
        );
        assert_eq!(session.transform().position, Vec3::ZERO);
    }

    #[test]
    fn rotate_mode_steps_in_degrees() {
        let mut session = Session::default();
        press(&mut session, "2wwae");
        let r = session.transform().rotation_deg;
        assert_eq!(r, Vec3::new(10.0, -5.0, 5.0));
    }

    #[test]
    fn scale_mode_floors_every_axis() {
        let mut session = Session::default();
        press(&mut session, "3");
        for _ in 0..30 {
            press(&mut session, "saq");
        }
        assert_eq!(session.transform().scale(), Vec3::splat(0.1));
        press(&mut session, "e");
        assert!(session.transform().scale().z > 0.1);
    }

    #[test]
    fn shear_mode_feeds_coupled_entries() {
        let mut session = Session::default();
        press(&mut session, "4wae");
        let m = *session.combined();
        assert_abs_diff_eq!(m[(0, 1)], 0.1, epsilon = 1e-6);
        assert_eq!(m[(0, 1)], m[(1, 0)]);
        assert_eq!(m[(0, 2)], m[(2, 0)]);
        assert_eq!(m[(1, 2)], m[(2, 1)]);
        assert_abs_diff_eq!(m[(1, 2)], -0.1, epsilon = 1e-6);
    }

    #[test]
    fn reflect_mode_toggles_flags() {
        let mut session = Session::default();
        press(&mut session, "5xz");
        assert_eq!(session.transform().reflect, [true, false, true]);
        press(&mut session, "x");
        assert_eq!(session.transform().reflect, [false, false, true]);
        // Movement keys mean nothing in reflect mode.
        assert_eq!(press(&mut session, "w"), vec![Reaction::Ignored]);
    }

    #[test]
    fn reset_only_clears_active_mode_and_is_idempotent() {
        let mut session = Session::default();
        press(&mut session, "dd2ww");
        press(&mut session, " ");
        let once = *session.transform();
        press(&mut session, " ");
        assert_eq!(*session.transform(), once);
        assert_eq!(once.rotation_deg, Vec3::ZERO);
        assert_abs_diff_eq!(once.position.x, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn switching_mode_or_shape_keeps_the_pose() {
        let mut session = Session::default();
        press(&mut session, "w");
        let before = *session.transform();
        let count = session.recompositions();
        press(&mut session, "3578");
        assert_eq!(*session.transform(), before);
        assert_eq!(session.recompositions(), count);
        assert_eq!(session.mode(), TransformMode::Reflect);
        assert_eq!(session.shape(), Shape::Pyramid);
    }

    #[test]
    fn camera_control_redirects_movement() {
        let mut session = Session::default();
        assert_eq!(press(&mut session, "c"), vec![Reaction::Redraw]);
        press(&mut session, "w");
        assert_eq!(session.transform().position, Vec3::ZERO);
        assert_eq!(session.recompositions(), 0);
        assert_abs_diff_eq!(session.camera().position.z, 4.9, epsilon = 1e-6);

        press(&mut session, " ");
        assert_eq!(session.camera().position, Vec3::new(0.0, 0.0, 5.0));

        press(&mut session, "c");
        press(&mut session, "w");
        assert_abs_diff_eq!(session.transform().position.y, 0.1, epsilon = 1e-6);
    }

    #[test]
    fn mode_changes_are_locked_during_camera_control() {
        let mut session = Session::default();
        press(&mut session, "c");
        assert_eq!(press(&mut session, "2"), vec![Reaction::Ignored]);
        assert_eq!(session.mode(), TransformMode::Translate);
        assert_eq!(press(&mut session, "7"), vec![Reaction::Redraw]);
        assert_eq!(session.shape(), Shape::Sphere);
    }

    #[test]
    fn escape_exits() {
        let mut session = Session::default();
        assert_eq!(session.handle_key(ESCAPE.into()), Reaction::Exit);
    }

    #[test]
    fn clicks_dispatch_button_actions() {
        let mut session = Session::default();
        let (x, y) = centre_of(ButtonAction::ShapeSelector(Shape::Cylinder));
        assert_eq!(session.handle_click(x, y, viewport()), Reaction::Redraw);
        assert_eq!(session.shape(), Shape::Cylinder);
        assert!(session.is_selected(ButtonAction::ShapeSelector(Shape::Cylinder)));

        let (x, y) = centre_of(ButtonAction::ModeSelector(TransformMode::Shear));
        session.handle_click(x, y, viewport());
        assert_eq!(session.mode(), TransformMode::Shear);

        let (x, y) = centre_of(ButtonAction::CameraToggle);
        session.handle_click(x, y, viewport());
        assert!(session.is_selected(ButtonAction::CameraToggle));

        let (x, y) = centre_of(ButtonAction::ModeSelector(TransformMode::Rotate));
        assert_eq!(session.handle_click(x, y, viewport()), Reaction::Ignored);
        assert_eq!(session.mode(), TransformMode::Shear);

        assert_eq!(
            session.handle_click(400.0, 350.0, viewport()),
            Reaction::Ignored
        );
    }

    #[test]
    fn drag_turns_camera_only_in_camera_control() {
        let mut session = Session::default();
        session.handle_look_button(true);
        assert_eq!(session.handle_pointer_motion(10.0, 10.0), Reaction::Ignored);

        press(&mut session, "c");
        session.handle_look_button(true);
        // First motion only records the cursor.
        assert_eq!(session.handle_pointer_motion(100.0, 100.0), Reaction::Ignored);
        assert_eq!(session.handle_pointer_motion(100.0, 50.0), Reaction::Redraw);
        assert!(session.camera().front().y > 0.0);

        session.handle_look_button(false);
        let front = session.camera().front();
        assert_eq!(session.handle_pointer_motion(300.0, 300.0), Reaction::Ignored);
        assert_eq!(session.camera().front(), front);
    }

    #[test]
    fn render_matrix_is_column_major() {
        let mut session = Session::default();
        press(&mut session, "ddd");
        let cols = session.render_matrix();
        assert_abs_diff_eq!(cols[12], 0.3, epsilon = 1e-6);
        assert_eq!(Matrix4::from_cols_array(&cols), *session.combined());
    }

    #[test]
    fn status_line_reports_selection() {
        let mut session = Session::default();
        press(&mut session, "5y9");
        let status = session.status_line();
        assert!(status.starts_with("REFLECT | Cylinder | camera OFF"));
        assert!(status.ends_with("reflect X OFF Y ON Z OFF"));
    }
}
