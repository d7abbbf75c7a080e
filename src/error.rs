use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeyClimbError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Invalid Layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid Permutation: {0}")]
    InvalidPermutation(String),

    /// The corpus uses a symbol the layout cannot type.
    #[error("Unknown symbol '{symbol}' in n-gram '{ngram}' (corpus and alphabet disagree)")]
    UnknownSymbol { symbol: char, ngram: String },

    #[error("Exhausted retries after {attempts} attempts: {reason}")]
    ExhaustedRetries { attempts: usize, reason: String },

    #[error("Missing {0}-gram table in frequency store")]
    MissingTable(usize),

    #[error(transparent)]
    Ctrlc(#[from] ctrlc::Error),
}

pub type KcResult<T> = Result<T, KeyClimbError>;
