use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{name} failed to start after {attempts} attempts")]
    ServiceUnavailable { name: String, attempts: u32 },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("API error: {message}")]
    Api { message: String },
}

pub type Result<T> = std::result::Result<T, SeedError>;
