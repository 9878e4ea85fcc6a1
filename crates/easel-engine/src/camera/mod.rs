//! World-to-screen camera.

#[allow(clippy::module_inception)]
mod camera;

pub use camera::Camera;
