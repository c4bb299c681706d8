use thiserror::Error;

/// Failure taxonomy shared by both pipelines.
///
/// Parse and validation faults are always converted into this taxonomy before
/// they reach a caller; collaborator faults (OCR engine, transport) propagate
/// as fatal request failures.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The request carried no usable input. User-correctable.
    #[error("{0}")]
    InputMissing(&'static str),

    /// Non-200 from the completion service. The upstream status and body are
    /// surfaced unmodified; there is no retry.
    #[error("completion service returned status {status}")]
    Upstream { status: u16, body: String },

    /// The model's reply failed the structural parse or schema validation.
    /// `detail` is for logs only and must never appear in a response payload.
    #[error("Response format error")]
    ResponseFormat { detail: String },

    /// OCR engine fault. Fatal to the request.
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// Transport-level failure talking to a collaborator.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The uploaded image could not be staged on disk.
    #[error("failed to store uploaded image: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub(crate) fn response_format(detail: impl Into<String>) -> Self {
        PipelineError::ResponseFormat {
            detail: detail.into(),
        }
    }
}

/// Uniform envelope returned by both pipelines.
pub type PipelineResult<T> = Result<T, PipelineError>;
