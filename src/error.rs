/// Errors surfaced by the fitting pipeline.
///
/// Configuration-class errors (`Configuration`, `DimensionMismatch`) mean the
/// caller asked for something the data cannot support. `LinearAlgebra` means a
/// matrix that had to be inverted was singular or produced non-finite values.
/// Neither is retried.
#[derive(Clone, PartialEq)]
pub enum FitError {
    Configuration(String),
    DimensionMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    LinearAlgebra(String),
}

impl FitError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn linalg(message: impl Into<String>) -> Self {
        Self::LinearAlgebra(message.into())
    }

    pub fn mismatch(what: &'static str, got: usize, expected: usize) -> Self {
        Self::DimensionMismatch {
            what,
            got,
            expected,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::DimensionMismatch { .. }
        )
    }

    pub fn is_linear_algebra(&self) -> bool {
        matches!(self, Self::LinearAlgebra(_))
    }
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "configuration error: {msg}"),
            Self::DimensionMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "dimension mismatch for {what}: got {got}, expected {expected}"
            ),
            Self::LinearAlgebra(msg) => write!(f, "linear algebra error: {msg}"),
        }
    }
}

impl std::fmt::Debug for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(msg) => f.debug_tuple("Configuration").field(msg).finish(),
            Self::DimensionMismatch {
                what,
                got,
                expected,
            } => f
                .debug_struct("DimensionMismatch")
                .field("what", what)
                .field("got", got)
                .field("expected", expected)
                .finish(),
            Self::LinearAlgebra(msg) => f.debug_tuple("LinearAlgebra").field(msg).finish(),
        }
    }
}

impl std::error::Error for FitError {}
