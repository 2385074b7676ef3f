pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Did you make a typo? If not, then the blockchain '{input}' is not supported. Please use one of the supported chains: {supported}")]
    UnsupportedChain { input: String, supported: String },

    #[error("Invalid timestamp '{0}'. Expected a date as dd/mm/yyyy or yyyy-mm-dd and a time as HH:MM:SS or HH:MM (UTC)")]
    InvalidTimestamp(String),

    #[error("Invalid request. (Error: {0})")]
    InvalidRequest(String),

    #[error("Missing required setting {0}")]
    MissingSetting(&'static str),

    #[error("Invalid value '{value}' for setting {name}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("Chain table is invalid. (Error: {0})")]
    ChainTable(String),

    #[error("Request to remote API failed. (Error: {0})")]
    Http(#[from] reqwest::Error),

    #[error("Remote API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode {context} response. (Error: {source})")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Balance '{0}' is not a base-10 unsigned integer")]
    InvalidBalance(String),

    #[error("CSV error. (Error: {0})")]
    Csv(#[from] csv::Error),

    #[error("IO error. (Error: {0})")]
    Io(#[from] std::io::Error),
}
