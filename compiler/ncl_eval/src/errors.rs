//! Evaluation errors.
//!
//! `EvalErrorKind` is the structured category; factory functions below are
//! the single place error values are built, so messages stay consistent.
//! Errors are `Clone + PartialEq`: a failed thunk caches its error and hands
//! out identical copies on every later force.

use thiserror::Error;

/// Result of evaluation.
pub type EvalResult = Result<crate::Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalErrorKind {
    // Access
    #[error("unbound identifier `{name}`")]
    UnboundIdentifier { name: String },
    #[error("record has no field `{field}`")]
    MissingField { field: String },
    #[error("duplicate field `{field}` in record literal")]
    DuplicateField { field: String },

    // Application
    #[error("{type_name} is not a function")]
    NotCallable { type_name: &'static str },
    #[error("`{builtin}` takes {expected} argument(s), got {got}")]
    ArityMismatch {
        builtin: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("native function `{name}` failed: {message}")]
    NativeFailure { name: String, message: String },

    // Operand types
    #[error("{context} expects a record, found {found}")]
    NotARecord {
        context: &'static str,
        found: &'static str,
    },
    #[error("{context} expects a list, found {found}")]
    NotAList {
        context: &'static str,
        found: &'static str,
    },
    #[error("expected {expected} in {context}, found {found}")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
        context: &'static str,
    },
    #[error("operator `{op}` cannot be applied to {left} and {right}")]
    OperandMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    // Arithmetic and domains
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow in `{op}`")]
    IntegerOverflow { op: &'static str },
    #[error("{builtin}: {message}")]
    DomainError {
        builtin: &'static str,
        message: String,
    },
    #[error("index {index} out of bounds for list of length {length}")]
    IndexOutOfBounds { index: i64, length: usize },
    #[error("{builtin} applied to an empty list")]
    EmptyList { builtin: &'static str },

    // Annotations
    #[error("type mismatch at `{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        expected: String,
        found: String,
        path: String,
    },
    #[error("annotation was not resolved before evaluation")]
    UnresolvedAnnotation,

    // Resources
    #[error("infinite recursion: a value depends on itself")]
    InfiniteRecursion,
    #[error("maximum evaluation depth exceeded (limit: {limit})")]
    StackOverflow { limit: usize },
    #[error("evaluation of this value panicked")]
    Interrupted,
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Secondary context, innermost first.
    pub notes: Vec<String>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        Self {
            kind,
            notes: Vec::new(),
        }
    }

    /// Attach a context note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        Self::new(kind)
    }
}

// Access Errors

pub fn unbound_identifier(name: &str) -> EvalError {
    EvalErrorKind::UnboundIdentifier {
        name: name.to_owned(),
    }
    .into()
}

pub fn missing_field(field: &str) -> EvalError {
    EvalErrorKind::MissingField {
        field: field.to_owned(),
    }
    .into()
}

pub fn duplicate_field(field: &str) -> EvalError {
    EvalErrorKind::DuplicateField {
        field: field.to_owned(),
    }
    .into()
}

// Application Errors

pub fn not_callable(type_name: &'static str) -> EvalError {
    EvalErrorKind::NotCallable { type_name }.into()
}

pub fn arity_mismatch(builtin: &'static str, expected: usize, got: usize) -> EvalError {
    EvalErrorKind::ArityMismatch {
        builtin,
        expected,
        got,
    }
    .into()
}

pub fn native_failure(name: &str, message: String) -> EvalError {
    EvalErrorKind::NativeFailure {
        name: name.to_owned(),
        message,
    }
    .into()
}

// Operand Errors

pub fn not_a_record(context: &'static str, found: &'static str) -> EvalError {
    EvalErrorKind::NotARecord { context, found }.into()
}

pub fn not_a_list(context: &'static str, found: &'static str) -> EvalError {
    EvalErrorKind::NotAList { context, found }.into()
}

pub fn unexpected_type(
    expected: &'static str,
    found: &'static str,
    context: &'static str,
) -> EvalError {
    EvalErrorKind::UnexpectedType {
        expected,
        found,
        context,
    }
    .into()
}

pub fn operand_mismatch(op: &'static str, left: &'static str, right: &'static str) -> EvalError {
    EvalErrorKind::OperandMismatch { op, left, right }.into()
}

// Arithmetic and Domain Errors

pub fn division_by_zero() -> EvalError {
    EvalErrorKind::DivisionByZero.into()
}

pub fn integer_overflow(op: &'static str) -> EvalError {
    EvalErrorKind::IntegerOverflow { op }.into()
}

pub fn domain_error(builtin: &'static str, message: String) -> EvalError {
    EvalErrorKind::DomainError { builtin, message }.into()
}

pub fn index_out_of_bounds(index: i64, length: usize) -> EvalError {
    EvalErrorKind::IndexOutOfBounds { index, length }.into()
}

pub fn empty_list(builtin: &'static str) -> EvalError {
    EvalErrorKind::EmptyList { builtin }.into()
}

// Annotation Errors

pub fn type_mismatch(expected: String, found: impl Into<String>, path: String) -> EvalError {
    EvalErrorKind::TypeMismatch {
        expected,
        found: found.into(),
        path,
    }
    .into()
}

pub fn unresolved_annotation() -> EvalError {
    EvalErrorKind::UnresolvedAnnotation.into()
}

// Resource Errors

pub fn infinite_recursion() -> EvalError {
    EvalErrorKind::InfiniteRecursion.into()
}

pub fn stack_overflow(limit: usize) -> EvalError {
    EvalErrorKind::StackOverflow { limit }.into()
}

pub fn interrupted() -> EvalError {
    EvalErrorKind::Interrupted.into()
}
