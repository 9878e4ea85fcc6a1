//! Debug overlays drawn on top of a frame.

mod fps;

pub use fps::{draw_fps_graph, FpsMeter, FPS_SAMPLES};
