use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Two operands of a vector/matrix operation have incompatible shapes.
    #[error("dimension mismatch in {op}: expected {expected}, found {found}")]
    DimensionMismatch {
        op: &'static str,
        expected: usize,
        found: usize,
    },
    /// A hyperparameter or layer size failed validation at build time.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// A dataset helper was handed no samples.
    #[error("dataset must not be empty")]
    EmptyDataset,
    /// A class label is not below the number of output classes.
    #[error("label {label} is out of range for {num_classes} classes")]
    InvalidLabel { label: usize, num_classes: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    #[inline]
    pub(crate) fn mismatch(op: &'static str, expected: usize, found: usize) -> Self {
        Error::DimensionMismatch {
            op,
            expected,
            found,
        }
    }
}
