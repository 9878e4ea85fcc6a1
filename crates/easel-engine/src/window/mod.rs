//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the GPU presenter
//! and a [`WindowRenderer`].

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, WindowRenderer};
