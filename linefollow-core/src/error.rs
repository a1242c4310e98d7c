use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("line lost for {ticks} ticks without reacquiring it")]
    LineLostTimeout { ticks: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read configuration: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
