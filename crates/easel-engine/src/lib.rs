//! Easel engine crate.
//!
//! A 2D immediate-mode drawing surface with an affine camera and a frame loop,
//! plus the platform pieces (window, GPU presenter) to put it on screen.

pub mod coords;
pub mod paint;
pub mod transform;

pub mod camera;
pub mod raster;
pub mod surface;
pub mod text;
pub mod time;

pub mod debug;
pub mod logging;

pub mod device;
pub mod window;
