use thiserror::Error;

/// Broad classification of [`XPathError`], for hosts that only care about
/// the category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Arity,
    Type,
    Cast,
    DivisionByZero,
    UndefinedVariable,
    UndefinedFunction,
    Overflow,
    MissingContext,
    Limit,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum XPathError {
    #[error("Function '{function}' expects {min}..={max} arguments, got {actual}")]
    Arity {
        function: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Type error: {0}")]
    Type(String),

    #[error("Value does not match required type {expected}")]
    TreatMismatch { expected: String },

    #[error("Cannot cast '{value}' from {from} to {to}")]
    Cast {
        value: String,
        from: String,
        to: String,
    },

    #[error("Cannot cast a sequence of {actual} items to {to}")]
    CastCardinality { to: String, actual: usize },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Variable '${name}' is not bound")]
    UndefinedVariable { name: String },

    #[error("No function '{name}' with {arity} arguments")]
    UndefinedFunction { name: String, arity: usize },

    #[error("Numeric overflow in {operation}")]
    Overflow { operation: String },

    #[error("Context item is required but not set")]
    MissingContext,

    #[error("Expression nesting exceeds the limit of {limit}")]
    DepthLimit { limit: usize },

    #[error("Range of {len} items exceeds the limit of {limit}")]
    RangeLimit { len: u64, limit: usize },
}

impl XPathError {
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type(message.into())
    }

    pub fn arity(function: impl Into<String>, min: usize, max: usize, actual: usize) -> Self {
        Self::Arity {
            function: function.into(),
            min,
            max,
            actual,
        }
    }

    pub fn cast(value: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Cast {
            value: value.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn overflow(operation: impl Into<String>) -> Self {
        Self::Overflow {
            operation: operation.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            XPathError::Arity { .. } => ErrorKind::Arity,
            XPathError::Type(_) | XPathError::TreatMismatch { .. } => ErrorKind::Type,
            XPathError::Cast { .. } | XPathError::CastCardinality { .. } => ErrorKind::Cast,
            XPathError::DivisionByZero => ErrorKind::DivisionByZero,
            XPathError::UndefinedVariable { .. } => ErrorKind::UndefinedVariable,
            XPathError::UndefinedFunction { .. } => ErrorKind::UndefinedFunction,
            XPathError::Overflow { .. } => ErrorKind::Overflow,
            XPathError::MissingContext => ErrorKind::MissingContext,
            XPathError::DepthLimit { .. } | XPathError::RangeLimit { .. } => ErrorKind::Limit,
        }
    }

    /// The W3C error code, where one exists.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            XPathError::Arity { .. } | XPathError::UndefinedFunction { .. } => Some("XPST0017"),
            XPathError::Type(_) => Some("XPTY0004"),
            XPathError::TreatMismatch { .. } => Some("XPDY0050"),
            XPathError::Cast { .. } | XPathError::CastCardinality { .. } => Some("FORG0001"),
            XPathError::DivisionByZero => Some("FOAR0001"),
            XPathError::UndefinedVariable { .. } => Some("XPST0008"),
            XPathError::Overflow { .. } => Some("FOAR0002"),
            XPathError::MissingContext => Some("XPDY0002"),
            XPathError::DepthLimit { .. } | XPathError::RangeLimit { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, XPathError>;
