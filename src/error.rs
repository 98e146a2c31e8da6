//! Error types.
//!
//! Two layers, mirroring the propagation policy:
//!
//! - [`EstimateError`] — a single well failed to produce an estimate. Always
//!   caught at the batch boundary and turned into a null result row; never
//!   aborts the run.
//! - [`AppError`] — a process-level failure (bad flags, unreadable input,
//!   export IO) carrying a stable exit code.

/// Why a single well produced no growth estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EstimateError {
    /// Fewer usable points survived filtering than the spline degree requires.
    InsufficientData { have: usize, need: usize },
    /// The fitted trajectory never shows an exponential phase (specific-rate
    /// mode detected a monotonically non-increasing α, or the derivative
    /// never attains a positive value).
    NoExponentialPhase,
    /// The series cannot be interpreted: shape mismatch against the time
    /// axis, disordered time, or a numerically unusable system.
    MalformedSeries(String),
}

impl std::fmt::Display for EstimateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimateError::InsufficientData { have, need } => {
                write!(f, "insufficient data: {have} eligible points, need {need}")
            }
            EstimateError::NoExponentialPhase => write!(f, "no exponential phase"),
            EstimateError::MalformedSeries(msg) => write!(f, "malformed series: {msg}"),
        }
    }
}

impl std::error::Error for EstimateError {}

/// Process-level error with a stable exit code.
///
/// Exit codes: 2 = usage/input, 3 = no usable data, 4 = internal numeric.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
