// Transform state and the matrix composition engine

use glam::Vec3;

use crate::math::Matrix4;

/// Smallest allowed scale factor on any axis.
pub const MIN_SCALE: f32 = 0.1;

/// Which group of transform parameters the keyboard currently edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformMode {
    #[default]
    Translate,
    Rotate,
    Scale,
    Shear,
    Reflect,
}

impl TransformMode {
    pub const ALL: [TransformMode; 5] = [
        TransformMode::Translate,
        TransformMode::Rotate,
        TransformMode::Scale,
        TransformMode::Shear,
        TransformMode::Reflect,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TransformMode::Translate => "TRANSLATE",
            TransformMode::Rotate => "ROTATE",
            TransformMode::Scale => "SCALE",
            TransformMode::Shear => "SHEAR",
            TransformMode::Reflect => "REFLECT",
        }
    }
}

/// Coordinate axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Shear coefficient selector. Each one also drives its mirrored entry
/// (`Xy` feeds yx, `Xz` feeds zx, `Yz` feeds zy).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShearPlane {
    Xy,
    Xz,
    Yz,
}

impl ShearPlane {
    fn index(self) -> usize {
        match self {
            ShearPlane::Xy => 0,
            ShearPlane::Xz => 1,
            ShearPlane::Yz => 2,
        }
    }
}

/// The pose of the displayed object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub position: Vec3,
    /// Euler angles in degrees, one per axis.
    pub rotation_deg: Vec3,
    scale: Vec3,
    /// Coefficients in xy, xz, yz order.
    pub shear: Vec3,
    pub reflect: [bool; 3],
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation_deg: Vec3::ZERO,
            scale: Vec3::ONE,
            shear: Vec3::ZERO,
            reflect: [false; 3],
        }
    }
}

impl TransformState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Set the scale, flooring every component at [`MIN_SCALE`].
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale.max(Vec3::splat(MIN_SCALE));
    }

    pub fn translate(&mut self, axis: Axis, delta: f32) {
        self.position[axis.index()] += delta;
    }

    pub fn rotate(&mut self, axis: Axis, delta_deg: f32) {
        self.rotation_deg[axis.index()] += delta_deg;
    }

    pub fn rescale(&mut self, axis: Axis, delta: f32) {
        let i = axis.index();
        self.scale[i] = (self.scale[i] + delta).max(MIN_SCALE);
    }

    pub fn add_shear(&mut self, plane: ShearPlane, delta: f32) {
        self.shear[plane.index()] += delta;
    }

    pub fn toggle_reflection(&mut self, axis: Axis) {
        let flag = &mut self.reflect[axis.index()];
        *flag = !*flag;
    }

    /// Restore the fields edited by `mode` to their defaults, leaving the
    /// other modes untouched.
    pub fn reset(&mut self, mode: TransformMode) {
        let defaults = Self::default();
        match mode {
            TransformMode::Translate => self.position = defaults.position,
            TransformMode::Rotate => self.rotation_deg = defaults.rotation_deg,
            TransformMode::Scale => self.scale = defaults.scale,
            TransformMode::Shear => self.shear = defaults.shear,
            TransformMode::Reflect => self.reflect = defaults.reflect,
        }
    }
}

/// Build the combined object matrix:
///
/// `Scale · Shear · Reflection · RotZ · RotY · RotX · Translation`
///
/// Rebuilt from scratch every call. Shear uses three coefficients with the
/// opposite entries coupled pairwise.
pub fn compose(state: &TransformState) -> Matrix4 {
    let p = state.position;
    let r = state.rotation_deg;
    let s = state.scale;
    let sh = state.shear;
    let [rx, ry, rz] = state.reflect;

    let translation = Matrix4::translation(p.x, p.y, p.z);
    let rotation_x = Matrix4::rotation_x(r.x);
    let rotation_y = Matrix4::rotation_y(r.y);
    let rotation_z = Matrix4::rotation_z(r.z);
    let scale = Matrix4::scale(s.x, s.y, s.z);
    let shear = Matrix4::shear(sh.x, sh.y, sh.x, sh.z, sh.y, sh.z);
    let reflection = Matrix4::reflection(rx, ry, rz);

    Matrix4::identity() * scale * shear * reflection * rotation_z * rotation_y * rotation_x
        * translation
}

/// Convert the row-major combined matrix into the column-major layout the
/// GPU uniform expects. Call once per upload.
pub fn render_matrix(combined: &Matrix4) -> [f32; 16] {
    combined.to_cols_array()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn busy_state() -> TransformState {
        let mut state = TransformState::new();
        state.position = Vec3::new(1.5, -2.0, 7.25);
        state.rotation_deg = Vec3::new(30.0, -415.0, 92.5);
        state.set_scale(Vec3::new(2.0, 0.5, 3.0));
        state.shear = Vec3::new(0.3, -0.7, 1.1);
        state.reflect = [true, false, true];
        state
    }

    #[test]
    fn default_state_composes_to_identity() {
        assert_eq!(compose(&TransformState::default()), Matrix4::IDENTITY);
    }

    #[test]
    fn last_row_stays_affine() {
        let samples = [
            TransformState::default(),
            busy_state(),
            {
                let mut s = TransformState::new();
                s.rotation_deg = Vec3::new(1e4, -3e3, 45.0);
                s.shear = Vec3::new(-5.0, 5.0, 12.0);
                s
            },
        ];
        for state in &samples {
            let m = compose(state);
            assert_eq!(m.row(3), [0.0, 0.0, 0.0, 1.0]);
            assert_eq!(m[(3, 3)], 1.0);
        }
    }

    #[test]
    fn translation_only_fills_last_column() {
        let mut state = TransformState::new();
        state.position = Vec3::new(2.0, 3.0, 4.0);
        let m = compose(&state);
        assert_eq!(m.column(3), [2.0, 3.0, 4.0, 1.0]);
        for i in 0..4 {
            for j in 0..3 {
                assert_eq!(m[(i, j)], Matrix4::IDENTITY[(i, j)]);
            }
        }
    }

    #[test]
    fn shear_coefficients_are_coupled_pairwise() {
        let (a, b, c) = (0.25, -1.5, 3.0);
        let mut state = TransformState::new();
        state.shear = Vec3::new(a, b, c);
        let m = compose(&state);
        assert_eq!(m[(0, 1)], a);
        assert_eq!(m[(0, 2)], b);
        assert_eq!(m[(1, 0)], a);
        assert_eq!(m[(1, 2)], c);
        assert_eq!(m[(2, 0)], b);
        assert_eq!(m[(2, 1)], c);
        for i in 0..3 {
            assert_eq!(m[(i, i)], 1.0);
        }
    }

    #[test]
    fn composition_order_is_fixed() {
        let state = busy_state();
        let p = state.position;
        let r = state.rotation_deg;
        let s = state.scale();
        let sh = state.shear;
        let expected = Matrix4::scale(s.x, s.y, s.z)
            .multiply(&Matrix4::shear(sh.x, sh.y, sh.x, sh.z, sh.y, sh.z))
            .multiply(&Matrix4::reflection(true, false, true))
            .multiply(&Matrix4::rotation_z(r.z))
            .multiply(&Matrix4::rotation_y(r.y))
            .multiply(&Matrix4::rotation_x(r.x))
            .multiply(&Matrix4::translation(p.x, p.y, p.z));
        assert_eq!(compose(&state), expected);
    }

    #[test]
    fn rotation_is_applied_before_translation_column() {
        let mut state = TransformState::new();
        state.position = Vec3::new(1.0, 0.0, 0.0);
        state.rotation_deg = Vec3::new(0.0, 0.0, 90.0);
        let m = compose(&state);
        // The translation column is carried through the rotation block.
        assert_abs_diff_eq!(m[(0, 3)], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(m[(1, 3)], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(m[(2, 3)], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn scale_floors_at_minimum() {
        let mut state = TransformState::new();
        for _ in 0..50 {
            state.rescale(Axis::X, -0.1);
            state.rescale(Axis::Y, -0.3);
            state.rescale(Axis::Z, -10.0);
            assert!(state.scale().min_element() >= MIN_SCALE);
        }
        assert_eq!(state.scale(), Vec3::splat(MIN_SCALE));

        state.set_scale(Vec3::new(-1.0, 0.0, 0.05));
        assert_eq!(state.scale(), Vec3::splat(MIN_SCALE));
    }

    #[test]
    fn adapter_round_trips_through_transpose() {
        for state in [TransformState::default(), busy_state()] {
            let combined = compose(&state);
            let cols = render_matrix(&combined);
            assert_eq!(Matrix4::from_cols_array(&cols), combined);
            for i in 0..4 {
                for j in 0..4 {
                    assert_eq!(cols[i * 4 + j], combined[(j, i)]);
                }
            }
        }
    }

    #[test]
    fn adapter_matches_glam_column_layout() {
        let mut state = TransformState::new();
        state.position = Vec3::new(2.0, 3.0, 4.0);
        let model = glam::Mat4::from_cols_array(&render_matrix(&compose(&state)));
        let moved = model.transform_point3(Vec3::ZERO);
        assert_eq!(moved, Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn reset_touches_only_the_active_mode() {
        let mut state = busy_state();
        state.reset(TransformMode::Rotate);
        assert_eq!(state.rotation_deg, Vec3::ZERO);
        assert_eq!(state.position, busy_state().position);
        assert_eq!(state.scale(), busy_state().scale());

        state.reset(TransformMode::Scale);
        assert_eq!(state.scale(), Vec3::ONE);
        state.reset(TransformMode::Reflect);
        assert_eq!(state.reflect, [false; 3]);
        assert_eq!(state.shear, busy_state().shear);
    }

    #[test]
    fn reset_is_idempotent() {
        for mode in TransformMode::ALL {
            let mut once = busy_state();
            once.reset(mode);
            let mut twice = once;
            twice.reset(mode);
            assert_eq!(once, twice);
            assert_eq!(compose(&once), compose(&twice));
        }
    }

    #[test]
    fn reflection_toggles_back() {
        let mut state = TransformState::new();
        state.toggle_reflection(Axis::Y);
        assert_eq!(state.reflect, [false, true, false]);
        assert_eq!(compose(&state)[(1, 1)], -1.0);
        state.toggle_reflection(Axis::Y);
        assert_eq!(compose(&state), Matrix4::IDENTITY);
    }
}
