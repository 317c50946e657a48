// Primitive shapes as vertex streams

use std::f32::consts::PI;

use glam::Vec3;

/// Vertex layout shared by every pipeline.
///
/// A zero normal marks unlit geometry (grid lines, overlay quads).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }

    pub const fn unlit(position: [f32; 3], color: [f32; 3]) -> Self {
        Self::new(position, [0.0; 3], color)
    }
}

const RED: [f32; 3] = [1.0, 0.0, 0.0];
const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const BLUE: [f32; 3] = [0.0, 0.0, 1.0];
const YELLOW: [f32; 3] = [1.0, 1.0, 0.0];
const MAGENTA: [f32; 3] = [1.0, 0.0, 1.0];
const CYAN: [f32; 3] = [0.0, 1.0, 1.0];

const SPHERE_STACKS: u32 = 20;
const SPHERE_SLICES: u32 = 20;
const CYLINDER_SEGMENTS: u32 = 30;
const RADIUS: f32 = 0.5;

/// The primitive currently on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    #[default]
    Cube,
    Sphere,
    Pyramid,
    Cylinder,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Cube, Shape::Sphere, Shape::Pyramid, Shape::Cylinder];

    pub fn label(self) -> &'static str {
        match self {
            Shape::Cube => "Cube",
            Shape::Sphere => "Sphere",
            Shape::Pyramid => "Pyramid",
            Shape::Cylinder => "Cylinder",
        }
    }

    /// Position of this shape in [`Shape::ALL`].
    pub fn index(self) -> usize {
        match self {
            Shape::Cube => 0,
            Shape::Sphere => 1,
            Shape::Pyramid => 2,
            Shape::Cylinder => 3,
        }
    }

    /// Triangle-list vertices for this shape in object space, roughly filling
    /// the cube [-0.5, 0.5]^3.
    ///
    /// Every call returns a fresh iterator over the same finite sequence.
    pub fn vertices(self) -> Box<dyn Iterator<Item = Vertex>> {
        match self {
            Shape::Cube => Box::new(cube()),
            Shape::Sphere => Box::new(sphere()),
            Shape::Pyramid => Box::new(pyramid()),
            Shape::Cylinder => Box::new(cylinder()),
        }
    }
}

/// Split a quad `a b c d` (counter-clockwise) into two triangles.
fn quad(corners: [[f32; 3]; 4], normal: [f32; 3], color: [f32; 3]) -> [Vertex; 6] {
    let [a, b, c, d] = corners.map(|p| Vertex::new(p, normal, color));
    [a, b, c, c, d, a]
}

fn cube() -> impl Iterator<Item = Vertex> + Clone {
    const H: f32 = 0.5;
    #[rustfmt::skip]
    let faces: [([[f32; 3]; 4], [f32; 3], [f32; 3]); 6] = [
        // front
        ([[-H, -H,  H], [ H, -H,  H], [ H,  H,  H], [-H,  H,  H]], [0.0, 0.0, 1.0], RED),
        // back
        ([[-H, -H, -H], [-H,  H, -H], [ H,  H, -H], [ H, -H, -H]], [0.0, 0.0, -1.0], GREEN),
        // top
        ([[-H,  H, -H], [-H,  H,  H], [ H,  H,  H], [ H,  H, -H]], [0.0, 1.0, 0.0], BLUE),
        // bottom
        ([[-H, -H, -H], [ H, -H, -H], [ H, -H,  H], [-H, -H,  H]], [0.0, -1.0, 0.0], YELLOW),
        // right
        ([[ H, -H, -H], [ H,  H, -H], [ H,  H,  H], [ H, -H,  H]], [1.0, 0.0, 0.0], MAGENTA),
        // left
        ([[-H, -H, -H], [-H, -H,  H], [-H,  H,  H], [-H,  H, -H]], [-1.0, 0.0, 0.0], CYAN),
    ];
    faces
        .into_iter()
        .flat_map(|(corners, normal, color)| quad(corners, normal, color))
}

fn sphere_point(stack: u32, slice: u32) -> Vertex {
    let phi = PI * stack as f32 / SPHERE_STACKS as f32;
    let theta = 2.0 * PI * slice as f32 / SPHERE_SLICES as f32;
    let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
    Vertex::new((normal * RADIUS).to_array(), normal.to_array(), RED)
}

fn sphere() -> impl Iterator<Item = Vertex> + Clone {
    (0..SPHERE_STACKS).flat_map(|stack| {
        (0..SPHERE_SLICES).flat_map(move |slice| {
            let a = sphere_point(stack, slice);
            let b = sphere_point(stack + 1, slice);
            let c = sphere_point(stack + 1, slice + 1);
            let d = sphere_point(stack, slice + 1);
            [a, b, c, c, d, a]
        })
    })
}

fn pyramid() -> impl Iterator<Item = Vertex> + Clone {
    const H: f32 = 0.5;
    let apex = [0.0, H, 0.0];
    let sides: [([f32; 3], [f32; 3], [f32; 3], [f32; 3]); 4] = [
        ([-H, -H, H], [H, -H, H], [0.0, 0.5, 0.5], RED),
        ([H, -H, H], [H, -H, -H], [0.5, 0.5, 0.0], GREEN),
        ([H, -H, -H], [-H, -H, -H], [0.0, 0.5, -0.5], BLUE),
        ([-H, -H, -H], [-H, -H, H], [-0.5, 0.5, 0.0], YELLOW),
    ];
    let base = quad(
        [[-H, -H, H], [-H, -H, -H], [H, -H, -H], [H, -H, H]],
        [0.0, -1.0, 0.0],
        MAGENTA,
    );
    sides
        .into_iter()
        .flat_map(move |(left, right, normal, color)| {
            let n = Vec3::from(normal).normalize_or_zero().to_array();
            [
                Vertex::new(apex, n, color),
                Vertex::new(left, n, color),
                Vertex::new(right, n, color),
            ]
        })
        .chain(base)
}

/// Unit direction of a rim vertex in the XZ plane.
fn rim_point(segment: u32) -> Vec3 {
    let theta = 2.0 * PI * segment as f32 / CYLINDER_SEGMENTS as f32;
    Vec3::new(theta.cos(), 0.0, theta.sin())
}

fn cylinder() -> impl Iterator<Item = Vertex> + Clone {
    const HALF_HEIGHT: f32 = 0.5;
    let side = (0..CYLINDER_SEGMENTS).flat_map(|i| {
        let edge = |dir: Vec3, y: f32| {
            let position = dir * RADIUS + Vec3::Y * y;
            Vertex::new(position.to_array(), dir.to_array(), BLUE)
        };
        let (d0, d1) = (rim_point(i), rim_point(i + 1));
        let top0 = edge(d0, HALF_HEIGHT);
        let bottom0 = edge(d0, -HALF_HEIGHT);
        let top1 = edge(d1, HALF_HEIGHT);
        let bottom1 = edge(d1, -HALF_HEIGHT);
        [top0, bottom0, bottom1, bottom1, top1, top0]
    });
    let caps = [HALF_HEIGHT, -HALF_HEIGHT].into_iter().flat_map(|y| {
        let centre = Vec3::Y * y;
        let normal = (Vec3::Y * y.signum()).to_array();
        (0..CYLINDER_SEGMENTS).flat_map(move |i| {
            let rim = |dir: Vec3| (centre + dir * RADIUS).to_array();
            [
                Vertex::new(centre.to_array(), normal, GREEN),
                Vertex::new(rim(rim_point(i)), normal, GREEN),
                Vertex::new(rim(rim_point(i + 1)), normal, GREEN),
            ]
        })
    });
    side.chain(caps)
}

/// Ground grid on the XZ plane plus the three coordinate axes, as a line list.
pub fn grid_lines(half_extent: i32, axis_length: f32) -> Vec<Vertex> {
    const GREY: [f32; 3] = [0.3, 0.3, 0.3];
    let e = half_extent as f32;
    let mut lines = Vec::with_capacity((half_extent as usize * 2 + 1) * 4 + 6);
    for i in -half_extent..=half_extent {
        let i = i as f32;
        lines.push(Vertex::unlit([i, 0.0, -e], GREY));
        lines.push(Vertex::unlit([i, 0.0, e], GREY));
        lines.push(Vertex::unlit([-e, 0.0, i], GREY));
        lines.push(Vertex::unlit([e, 0.0, i], GREY));
    }
    for (tip, color) in [
        ([axis_length, 0.0, 0.0], RED),
        ([0.0, axis_length, 0.0], GREEN),
        ([0.0, 0.0, axis_length], BLUE),
    ] {
        lines.push(Vertex::unlit([0.0; 3], color));
        lines.push(Vertex::unlit(tip, color));
    }
    lines
}
