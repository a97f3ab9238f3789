use thiserror::Error;

#[derive(Debug, Error)]
pub enum TwoportError {
    /// Malformed network description: section structure or field grammar.
    #[error("Grammar error: {0}")]
    Grammar(String),

    /// Component connections that break the nearest-neighbour ladder.
    #[error("Topology error: {0}")]
    Topology(String),

    /// A termination or sweep parameter needed by the solver is absent.
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Unknown output parameter: {0}")]
    UnknownOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TwoportError>;
