#[derive(Debug)]
/// Represents all errors that can occur during evaluation.
///
/// Irreducible expressions are not errors: the evaluator returns them
/// symbolically. These variants cover genuinely ill-typed or ill-formed
/// requests, such as joining a number into a string or taking zero
/// characters.
pub enum EvalError {
    /// A built-in received an operand of the wrong type.
    TypeError {
        /// Details about the mismatch.
        details: String,
    },
    /// A built-in or user function received the wrong number of arguments.
    ArityError {
        /// Name of the function.
        head:  String,
        /// Number of arguments received.
        found: usize,
    },
    /// An operation is defined for the operand types but not these values.
    DomainError {
        /// Details about the violation.
        details: String,
    },
    /// Assignment to a reserved name such as `Pi`.
    ReservedSymbol {
        /// The protected name.
        name: String,
    },
}

impl EvalError {
    /// Shorthand for a `TypeError` with the given message.
    pub fn type_error(details: impl Into<String>) -> Self {
        Self::TypeError { details: details.into(), }
    }

    /// Shorthand for a `DomainError` with the given message.
    pub fn domain_error(details: impl Into<String>) -> Self {
        Self::DomainError { details: details.into(), }
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeError { details } => write!(f, "{details}"),
            Self::ArityError { head, found } => {
                write!(f, "{head} called with {found} argument(s).")
            },
            Self::DomainError { details } => write!(f, "{details}"),
            Self::ReservedSymbol { name } => {
                write!(f, "Symbol '{name}' is protected and cannot be assigned.")
            },
        }
    }
}

impl std::error::Error for EvalError {}
