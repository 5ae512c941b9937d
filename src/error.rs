use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZdfError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Linear solve failed: {0}")]
    LinearSolve(String),

    #[error("Filter design failed: {0}")]
    FilterDesign(String),

    #[error("Seed shortage: need {needed} samples, have {available}")]
    SeedShortage { needed: usize, available: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ZdfError>;
