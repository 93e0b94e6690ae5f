//! Script expression errors

/// Error produced while compiling a mapping script.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    #[error("unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unexpected '{found}' at {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("unexpected end of script")]
    UnexpectedEnd,

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("expression nests deeper than {0} levels")]
    TooDeep(usize),

    #[error("{function} expects {expected} arguments, got {found}")]
    Arity {
        function: &'static str,
        expected: usize,
        found: usize,
    },
}
