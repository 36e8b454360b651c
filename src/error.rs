use crate::MethodKind;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised when a generated method, or the inner method behind it, is
/// invoked.
///
/// Registration never fails: every variant surfaces at call time.
#[derive(Debug, Error)]
pub enum Error {
    /// Neither the generated type nor the inner object knows this name.
    #[error("no method named `{0}`")]
    NoSuchMethod(String),

    /// The name exists but was generated for another calling convention.
    #[error("`{method}` is a {actual} method, not a {expected} method")]
    WrongKind {
        method: String,
        expected: MethodKind,
        actual: MethodKind,
    },

    #[error("`{method}` takes at most {max} argument(s), got {actual}")]
    Arity {
        method: String,
        max: usize,
        actual: usize,
    },

    #[error("argument {index} of `{method}` cannot be decoded: {source}")]
    Argument {
        method: String,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("return value of `{method}` cannot be encoded: {source}")]
    Conversion {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    /// Raised by the inner object, such as the `Err` of a marked method
    /// returning a `Result`.
    #[error(transparent)]
    Inner(#[from] Box<dyn std::error::Error + Send + Sync>),
}
