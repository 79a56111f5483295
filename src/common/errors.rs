//! Error types for the application

use thiserror::Error;

/// Result type alias using our BotError
pub type Result<T> = std::result::Result<T, BotError>;

/// Main error type for bot operations
#[derive(Error, Debug)]
pub enum BotError {
    /// WebSocket connection errors
    #[error("WebSocket connection error: {0}")]
    WebSocketConnection(String),

    /// WebSocket send/receive errors
    #[error("WebSocket communication error: {0}")]
    WebSocketCommunication(String),

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Error response from the ledger RPC endpoint
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Invalid RPC response payload
    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    /// Malformed feed event; the event is dropped, never fatal
    #[error("Event decode error: {0}")]
    Decode(String),

    /// Pool metadata could not be resolved at startup; fatal
    #[error("Pool metadata unavailable: {0}")]
    MetadataUnavailable(String),

    /// Sequence-number or fee fetch failed; the decision cycle is aborted
    #[error("Transaction build failed: {0}")]
    BuildFailed(String),

    /// Signing failed
    #[error("Signing error: {0}")]
    Signing(String),

    /// The endpoint rejected the raw transaction. Distinct from an
    /// on-chain revert, which is reported as a
    /// [`TradeOutcome`](crate::common::types::TradeOutcome) variant.
    #[error("Submission rejected: {0}")]
    SubmitRejected(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for BotError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        BotError::WebSocketCommunication(err.to_string())
    }
}
