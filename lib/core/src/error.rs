use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Corpus is empty: no documents could be loaded")]
    EmptyCorpus,

    #[error("Vocabulary is empty: {0}")]
    EmptyVocabulary(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Unknown scoring mode: {0}")]
    UnknownMode(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than the engine
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidQuery(_) | Error::UnknownMode(_))
    }
}
