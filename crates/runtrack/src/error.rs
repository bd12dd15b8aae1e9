use thiserror::Error;

/// Errors raised while reporting to a tracking backend.
///
/// Nothing is retried or swallowed anywhere in this crate: every error
/// propagates to the runner so a broken reporting path never goes unnoticed.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// IO error while talking to the backend.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error while encoding a record.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image encoding error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The runner exposed an empty learning rate collection.
    #[error("The runner exposed no learning rate")]
    EmptyLearningRate,

    /// The runner exposed an empty momentum collection.
    #[error("The runner exposed no momentum")]
    EmptyMomentum,

    /// A visualization was requested before the model saw any input batch.
    #[error("No input batch available for visualization")]
    MissingBatch,

    /// Any other backend-specific error.
    #[error("Other error: {0}")]
    Other(String),
}
