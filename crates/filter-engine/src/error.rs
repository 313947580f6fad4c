use thiserror::Error;

/// Errors raised while building the filter schema. Any of these aborts schema
/// construction; a server must not start with an invalid filter graph.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    /// More than one registered handler claims the same field.
    #[error("Handlers {handlers:?} all claim field '{field}' of '{type_name}'")]
    RegistrationConflict {
        type_name: String,
        field: String,
        handlers: Vec<String>,
    },

    /// No registered handler claims a declared field.
    #[error("No handler supports field '{field}' of '{type_name}'")]
    UnsupportedOperation { type_name: String, field: String },

    /// The type was already sealed and can no longer be extended.
    #[error("Filter input type '{0}' is sealed")]
    SchemaFrozen(String),

    #[error("Field '{field}' is declared twice on '{type_name}'")]
    DuplicateField { type_name: String, field: String },

    #[error("Filter input type '{0}' is declared twice")]
    DuplicateType(String),

    #[error("Unknown filter input type: {0}")]
    UnknownType(String),

    #[error("Invalid compiler settings: {0}")]
    InvalidSettings(String),
}

/// Errors raised while compiling one filter argument. They abort that
/// compilation only and never yield a partial predicate.
#[derive(Debug, Error, PartialEq)]
pub enum CompileError {
    #[error("Operand for '{field}' has the wrong type: expected {expected}, got {found}")]
    OperandTypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    #[error("Unknown field '{field}' on '{type_name}'")]
    UnknownField { type_name: String, field: String },

    #[error("Invalid argument for '{field}': {message}")]
    InvalidArgument { field: String, message: String },

    #[error("Filter nesting exceeds the maximum depth of {0}")]
    MaxDepthExceeded(usize),

    #[error("Unknown filter input type: {0}")]
    UnknownType(String),
}

/// Errors raised while lowering a compiled predicate into a backend query.
#[derive(Debug, Error, PartialEq)]
pub enum LowerError {
    #[error("Predicate cannot be lowered: {0}")]
    Unsupported(String),
}

pub type SchemaResult<T> = std::result::Result<T, SchemaError>;

pub type CompileResult<T> = std::result::Result<T, CompileError>;
