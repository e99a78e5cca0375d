/// Failures surfaced by the discovery facade and the reconciler.
///
/// Every variant is per-call and recoverable: retry `refresh` later with a
/// fresh resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// A value could not be constructed from the given input.
    InvalidArgument(String),
    /// The registry could not produce an instance list. No events were
    /// emitted and the view is unchanged.
    ResolutionFailure { application: String, reason: String },
    /// The event handler failed. Events delivered before it, and their view
    /// mutations, stand.
    Listener { event: String, reason: String },
    /// `refresh` was called before `listen` installed a handler.
    NotListening { application: String },
}

impl std::fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::ResolutionFailure {
                application,
                reason,
            } => write!(
                f,
                "failed to resolve endpoints for application '{application}': {reason}"
            ),
            Self::Listener { event, reason } => {
                write!(f, "event handler failed on {event}: {reason}")
            }
            Self::NotListening { application } => write!(
                f,
                "no event handler installed for application '{application}'; call listen first"
            ),
        }
    }
}

impl std::error::Error for DiscoveryError {}

/// Failure reported by a [`crate::RegistryClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry could not be reached or answered with an error.
    Unavailable(String),
    /// The registry answered but the payload could not be decoded.
    Malformed(String),
    /// The client has been shut down.
    Shutdown,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "registry unavailable: {msg}"),
            Self::Malformed(msg) => write!(f, "registry payload malformed: {msg}"),
            Self::Shutdown => write!(f, "registry client is shut down"),
        }
    }
}

impl std::error::Error for RegistryError {}
