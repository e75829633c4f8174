use thiserror::Error;

/// Reasons an animation description is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    #[error("cubic timing control point x{index} = {value} must lie within [0, 1]")]
    ControlPointOutOfRange { index: u8, value: f32 },
    #[error("timing control points must be finite")]
    NonFiniteControlPoint,
    #[error("animation duration {0} must be finite and positive")]
    InvalidDuration(f64),
    #[error("animation repeat count {0} must be positive")]
    InvalidRepeatCount(f32),
}

/// Errors raised by shape layer queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayerError {
    #[error("shape layer has no path; draw a path before asking for its bounds")]
    MissingPath,
}
