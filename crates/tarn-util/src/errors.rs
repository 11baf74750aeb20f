use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all Tarn operations.
#[derive(Debug, Error, Diagnostic)]
pub enum TarnError {
    /// A resolution sweep could not visit every element set because the
    /// dependency edges form one or more cycles.
    #[error("Cyclic dependency system: {}", format_cycles(.cycles))]
    #[diagnostic(
        code(tarn::cyclic),
        help("Break one of the cycles with `remove_from_cycle` and resolve again")
    )]
    Cyclic { cycles: Vec<Vec<String>> },

    /// The element counter or the epoch counter ran out of values.
    #[error("Identifier space exhausted: {what}")]
    #[diagnostic(code(tarn::exhausted))]
    IdSpaceExhausted { what: String },

    /// An element failed validation at construction time.
    #[error("Invalid element: {message}")]
    #[diagnostic(code(tarn::invalid_element))]
    InvalidElement { message: String },

    /// A dependency failed validation at construction time.
    #[error("Invalid dependency: {message}")]
    #[diagnostic(code(tarn::invalid_dependency))]
    InvalidDependency { message: String },

    /// Resolver configuration could not be parsed.
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(tarn::config),
        help("Check the resolver configuration for unknown keys or values")
    )]
    Config(#[from] toml::de::Error),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TarnError {
    /// The cycle groups carried by a [`TarnError::Cyclic`] error.
    pub fn cycles(&self) -> Option<&[Vec<String>]> {
        match self {
            TarnError::Cyclic { cycles } => Some(cycles),
            _ => None,
        }
    }
}

fn format_cycles(cycles: &[Vec<String>]) -> String {
    cycles
        .iter()
        .map(|group| format!("[{}]", group.join(", ")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience alias for results carrying a [`TarnError`].
pub type TarnResult<T> = Result<T, TarnError>;
