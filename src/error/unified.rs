//! Error classification and recovery.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Server,
    Api,
    Configuration,
    Serialization,
    Io,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Run the browser authorization again.
    Reauthenticate,
    /// Skip the item now and retry it in a later run.
    RetryLater,
    CheckConfiguration,
    /// The server rejected or mangled the payload; fix the input row.
    CheckPayload,
    ContactSupport,
}
