//! Fonts for the `text` primitive.
//!
//! Fonts are supplied as bytes by the caller and registered under a family
//! name. Text styles refer to fonts through a CSS-like [`FontSpec`]
//! (`"16px monospace"`).

mod font_spec;
mod font_system;

pub use font_spec::FontSpec;
pub use font_system::{FontId, FontLoadError, FontSystem};
