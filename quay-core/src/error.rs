use std::fmt::{self, Display};

/// Raised synchronously when a clause, table or statement is built from a malformed argument shape.
///
/// It travels inside [`crate::Error`], use `error.downcast_ref::<InvalidArgumentError>()` to tell it
/// apart from execution errors reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidArgumentError {
    pub message: String,
}

impl InvalidArgumentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid argument: {}", self.message)
    }
}

impl std::error::Error for InvalidArgumentError {}

/// Shorthand to return early with an [`InvalidArgumentError`].
#[macro_export]
macro_rules! invalid_argument {
    ($($arg:tt)+) => {
        return Err($crate::Error::new($crate::InvalidArgumentError::new(format!($($arg)+))))
    };
}
