//! Interactive viewer for composed 3D affine transforms.
//!
//! [`transform::compose`] folds the user-controlled [`transform::TransformState`]
//! into one [`math::Matrix4`]; [`session::Session`] maps key presses and
//! clicks onto that state, and [`renderer::Renderer`] draws the result.

pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod math;
pub mod renderer;
pub mod session;
pub mod transform;
pub mod ui;

pub use config::ViewerConfig;
pub use error::{ViewerError, ViewerResult};
pub use math::Matrix4;
pub use session::{Reaction, Session};
pub use transform::{compose, render_matrix, TransformMode, TransformState};
