use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("{0}")]
    Rejected(String),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("no eligible drivers")]
    NoEligibleDrivers,

    #[error("a multi-driver optimization is already in flight")]
    OptimizeInFlight,

    #[error("invalid sequence operation: {0}")]
    Sequence(String),

    #[error("optimizer returned an inconsistent result: {0}")]
    InconsistentResult(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DispatchError {
    /// True for failures raised before any request left the process.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            DispatchError::NoEligibleDrivers
                | DispatchError::OptimizeInFlight
                | DispatchError::Sequence(_)
                | DispatchError::Config(_)
        )
    }
}
