use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("classification service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("classification response carried no message content")]
    EmptyResponse,
}
