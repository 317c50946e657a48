// affine-viewer: interactive 3D transformation viewer

use affine_viewer::{renderer::Renderer, ViewerConfig, ViewerError};
use log::info;
use winit::event_loop::EventLoop;

#[tokio::main]
async fn main() -> Result<(), ViewerError> {
    // Initialize logging
    env_logger::init();

    // Create event loop
    let event_loop = EventLoop::new()?;

    let config = ViewerConfig::default();
    info!("Starting {}", config.title);

    // Create renderer
    let renderer = Renderer::new(&event_loop, config).await?;

    // Run the renderer
    renderer.run(event_loop)
}
