// Matrix utilities for the transform engine

use std::ops::{Index, IndexMut, Mul};

/// A 4x4 homogeneous matrix stored row-major: `self[(row, col)]`.
///
/// Points are column vectors, so the last column holds translation and the
/// last row of every affine matrix is `[0, 0, 0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4 {
    rows: [[f32; 4]; 4],
}

impl Matrix4 {
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Create an identity matrix
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[[f32; 4]; 4] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> [f32; 4] {
        self.rows[row]
    }

    pub fn column(&self, col: usize) -> [f32; 4] {
        [
            self.rows[0][col],
            self.rows[1][col],
            self.rows[2][col],
            self.rows[3][col],
        ]
    }

    /// Returns `self · rhs`.
    ///
    /// The product is accumulated into a fresh buffer, so `a.multiply(&a)`
    /// and reassigning the result to either operand are both safe.
    pub fn multiply(&self, rhs: &Matrix4) -> Matrix4 {
        let mut out = [[0.0f32; 4]; 4];
        for (i, out_row) in out.iter_mut().enumerate() {
            for (j, cell) in out_row.iter_mut().enumerate() {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.rows[i][k] * rhs.rows[k][j];
                }
                *cell = sum;
            }
        }
        Matrix4 { rows: out }
    }

    pub fn transpose(&self) -> Matrix4 {
        let mut out = [[0.0f32; 4]; 4];
        for (i, out_row) in out.iter_mut().enumerate() {
            for (j, cell) in out_row.iter_mut().enumerate() {
                *cell = self.rows[j][i];
            }
        }
        Matrix4 { rows: out }
    }

    /// Linearize column by column: `out[i * 4 + j] = self[(j, i)]`.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0f32; 16];
        for i in 0..4 {
            for j in 0..4 {
                out[i * 4 + j] = self.rows[j][i];
            }
        }
        out
    }

    /// Inverse of [`Matrix4::to_cols_array`].
    pub fn from_cols_array(cols: &[f32; 16]) -> Matrix4 {
        let mut rows = [[0.0f32; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                rows[j][i] = cols[i * 4 + j];
            }
        }
        Matrix4 { rows }
    }

    /// Translation by `(x, y, z)` in the last column.
    pub fn translation(x: f32, y: f32, z: f32) -> Matrix4 {
        let mut m = Self::IDENTITY;
        m[(0, 3)] = x;
        m[(1, 3)] = y;
        m[(2, 3)] = z;
        m
    }

    /// Right-handed rotation about +X, angle in degrees.
    pub fn rotation_x(angle_deg: f32) -> Matrix4 {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        let mut m = Self::IDENTITY;
        m[(1, 1)] = cos;
        m[(1, 2)] = -sin;
        m[(2, 1)] = sin;
        m[(2, 2)] = cos;
        m
    }

    /// Right-handed rotation about +Y, angle in degrees.
    pub fn rotation_y(angle_deg: f32) -> Matrix4 {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        let mut m = Self::IDENTITY;
        m[(0, 0)] = cos;
        m[(0, 2)] = sin;
        m[(2, 0)] = -sin;
        m[(2, 2)] = cos;
        m
    }

    /// Right-handed rotation about +Z, angle in degrees.
    pub fn rotation_z(angle_deg: f32) -> Matrix4 {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        let mut m = Self::IDENTITY;
        m[(0, 0)] = cos;
        m[(0, 1)] = -sin;
        m[(1, 0)] = sin;
        m[(1, 1)] = cos;
        m
    }

    pub fn scale(sx: f32, sy: f32, sz: f32) -> Matrix4 {
        let mut m = Self::IDENTITY;
        m[(0, 0)] = sx;
        m[(1, 1)] = sy;
        m[(2, 2)] = sz;
        m
    }

    /// Shear with all six off-diagonal coefficients set independently.
    /// The diagonal stays at 1.
    pub fn shear(xy: f32, xz: f32, yx: f32, yz: f32, zx: f32, zy: f32) -> Matrix4 {
        let mut m = Self::IDENTITY;
        m[(0, 1)] = xy;
        m[(0, 2)] = xz;
        m[(1, 0)] = yx;
        m[(1, 2)] = yz;
        m[(2, 0)] = zx;
        m[(2, 1)] = zy;
        m
    }

    /// Mirror across the plane whose normal is each flagged axis.
    pub fn reflection(x: bool, y: bool, z: bool) -> Matrix4 {
        let sign = |flag: bool| if flag { -1.0 } else { 1.0 };
        let mut m = Self::IDENTITY;
        m[(0, 0)] = sign(x);
        m[(1, 1)] = sign(y);
        m[(2, 2)] = sign(z);
        m[(3, 3)] = 1.0;
        m
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Index<(usize, usize)> for Matrix4 {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        &self.rows[row][col]
    }
}

impl IndexMut<(usize, usize)> for Matrix4 {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        &mut self.rows[row][col]
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        self.multiply(&rhs)
    }
}
