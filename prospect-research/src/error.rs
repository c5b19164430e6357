use thiserror::Error;

/// Errors produced by the research workflow.
///
/// Every variant is terminal for the submission that raised it, and none of
/// them poisons the controller: the next `submit` starts a fresh cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResearchError {
    /// The submitted website failed validation. No request was issued.
    #[error("{0}")]
    InvalidInput(String),

    /// A submission arrived while another one was still outstanding.
    #[error("a research request is already in progress")]
    RequestInFlight,

    /// Network failure or a non-2xx answer from the research service. The
    /// message is the server's `detail` field when present, otherwise the
    /// status line.
    #[error("{0}")]
    Transport(String),

    /// The service answered 2xx but the payload did not match the research
    /// result schema.
    #[error("malformed research response: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, ResearchError>;
