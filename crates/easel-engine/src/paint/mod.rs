//! Paint model shared between the renderer and raster backends.
//!
//! Only solid colors exist; every primitive carries an optional fill and/or
//! stroke `Color`.

pub mod color;

pub use color::Color;
