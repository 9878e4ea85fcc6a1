use std::fmt;

/// Error returned by [`AffineTransform::invert`](super::AffineTransform::invert).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TransformError {
    /// The determinant `a*d - b*c` is exactly zero.
    NotInvertible { determinant: f32 },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::NotInvertible { determinant } => {
                write!(f, "transform is not invertible (determinant {determinant})")
            }
        }
    }
}

impl std::error::Error for TransformError {}
