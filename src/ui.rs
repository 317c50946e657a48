// Screen-space selector buttons

use crate::geometry::{Shape, Vertex};
use crate::transform::TransformMode;

const BUTTON_SIZE: f32 = 30.0;
const PADDING: f32 = 10.0;
const MARGIN: f32 = 10.0;

const SELECTED_COLOR: [f32; 3] = [0.5, 0.5, 0.8];
const IDLE_COLOR: [f32; 3] = [0.3, 0.3, 0.3];

/// Window size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// A rectangle in window pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Edges are inclusive.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// What a button does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    ShapeSelector(Shape),
    ModeSelector(TransformMode),
    CameraToggle,
}

impl ButtonAction {
    pub fn label(self) -> &'static str {
        match self {
            ButtonAction::ShapeSelector(shape) => shape.label(),
            ButtonAction::ModeSelector(mode) => mode.label(),
            ButtonAction::CameraToggle => "Camera Control",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Button {
    pub rect: Rect,
    pub action: ButtonAction,
}

/// Lay out every button for the given window size.
///
/// Shape selectors stack down the right edge, mode selectors down the left
/// edge, and the camera toggle sits above the mode selectors.
pub fn layout(viewport: Viewport) -> Vec<Button> {
    let stride = BUTTON_SIZE + PADDING;
    let right_x = (viewport.width - MARGIN - BUTTON_SIZE).max(0.0);

    let camera = Button {
        rect: Rect::new(MARGIN, MARGIN, BUTTON_SIZE, BUTTON_SIZE),
        action: ButtonAction::CameraToggle,
    };
    let modes = TransformMode::ALL.iter().enumerate().map(|(i, &mode)| Button {
        rect: Rect::new(
            MARGIN,
            MARGIN + stride * (i + 1) as f32,
            BUTTON_SIZE,
            BUTTON_SIZE,
        ),
        action: ButtonAction::ModeSelector(mode),
    });
    let shapes = Shape::ALL.iter().enumerate().map(|(i, &shape)| Button {
        rect: Rect::new(right_x, MARGIN + stride * i as f32, BUTTON_SIZE, BUTTON_SIZE),
        action: ButtonAction::ShapeSelector(shape),
    });

    std::iter::once(camera).chain(modes).chain(shapes).collect()
}

/// First button under the cursor, if any.
pub fn hit_test(buttons: &[Button], x: f32, y: f32) -> Option<ButtonAction> {
    buttons
        .iter()
        .find(|button| button.rect.contains(x, y))
        .map(|button| button.action)
}

/// Two triangles per button, coloured by whether `is_selected` says the
/// button reflects the current selection.
pub fn overlay_vertices(
    buttons: &[Button],
    is_selected: impl Fn(ButtonAction) -> bool,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(buttons.len() * 6);
    for button in buttons {
        let color = if is_selected(button.action) {
            SELECTED_COLOR
        } else {
            IDLE_COLOR
        };
        let Rect {
            x,
            y,
            width,
            height,
        } = button.rect;
        let (x1, y1) = (x + width, y + height);
        let corner = |px: f32, py: f32| Vertex::unlit([px, py, 0.0], color);
        vertices.extend([
            corner(x, y),
            corner(x1, y),
            corner(x, y1),
            corner(x1, y),
            corner(x1, y1),
            corner(x, y1),
        ]);
    }
    vertices
}
