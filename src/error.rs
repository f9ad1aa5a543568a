use thiserror::Error;

/// Why a correspondence cannot determine a unique rigid transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegenerateReason {
    Empty,
    LengthMismatch { source_len: usize, target_len: usize },
    TooFewPoints { required: usize, provided: usize },
    /// Source points are collinear or coincident, rotation about that axis is free.
    Collinear,
}

impl std::fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegenerateReason::Empty => write!(f, "point sets are empty"),
            DegenerateReason::LengthMismatch {
                source_len,
                target_len,
            } => write!(
                f,
                "point sets must have equal length: {} vs {}",
                source_len, target_len
            ),
            DegenerateReason::TooFewPoints { required, provided } => write!(
                f,
                "at least {} point pairs required, got {}",
                required, provided
            ),
            DegenerateReason::Collinear => {
                write!(f, "source points are collinear or coincident")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum AlignError {
    #[error("degenerate input: {0}")]
    DegenerateInput(DegenerateReason),

    #[error("numerical instability: {0}")]
    NumericalInstability(String),
}

impl AlignError {
    pub fn is_degenerate(&self) -> bool {
        matches!(self, AlignError::DegenerateInput(_))
    }
}

pub type AlignResult<T> = Result<T, AlignError>;
