//! The closed error taxonomy shared by every layer of the runtime.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type ConductorResult<T> = Result<T, ConductorError>;

/// All the ways a registry lookup, plan, or step execution can fail.
///
/// Each variant carries a human-readable message; [`ConductorError::kind`]
/// projects it down to the closed [`ErrorKind`] tag used in user-visible
/// responses and in log fields.
#[derive(Debug, Error, Clone)]
pub enum ConductorError {
    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("dependency unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("tool failure: {0}")]
    ToolFailure(String),

    #[error("deadline exceeded: {0}")]
    DeadlineExceeded(String),

    #[error("cancelled: {0}")]
    Cancelled(String),

    #[error("plan invalid: {0}")]
    PlanInvalid(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("duplicate agent: {0}")]
    DuplicateAgent(String),
}

/// Closed tag set mirrored in `ConductorError`'s variants, used where callers
/// need the kind without the message (logging fields, JSON `kind` property).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ErrorKind {
    UnknownAgent,
    UnknownTool,
    InvalidArgument,
    DependencyUnavailable,
    ToolFailure,
    DeadlineExceeded,
    Cancelled,
    PlanInvalid,
    ConfigError,
    DuplicateAgent,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl ConductorError {
    pub fn unknown_agent(msg: impl Into<String>) -> Self {
        Self::UnknownAgent(msg.into())
    }

    pub fn unknown_tool(msg: impl Into<String>) -> Self {
        Self::UnknownTool(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn dependency_unavailable(msg: impl Into<String>) -> Self {
        Self::DependencyUnavailable(msg.into())
    }

    pub fn tool_failure(msg: impl Into<String>) -> Self {
        Self::ToolFailure(msg.into())
    }

    pub fn deadline_exceeded(msg: impl Into<String>) -> Self {
        Self::DeadlineExceeded(msg.into())
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    pub fn plan_invalid(msg: impl Into<String>) -> Self {
        Self::PlanInvalid(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn duplicate_agent(msg: impl Into<String>) -> Self {
        Self::DuplicateAgent(msg.into())
    }

    /// Project this error down to its closed tag, for logging and for the
    /// `kind` field of the user-visible JSON error shape.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownAgent(_) => ErrorKind::UnknownAgent,
            Self::UnknownTool(_) => ErrorKind::UnknownTool,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::DependencyUnavailable(_) => ErrorKind::DependencyUnavailable,
            Self::ToolFailure(_) => ErrorKind::ToolFailure,
            Self::DeadlineExceeded(_) => ErrorKind::DeadlineExceeded,
            Self::Cancelled(_) => ErrorKind::Cancelled,
            Self::PlanInvalid(_) => ErrorKind::PlanInvalid,
            Self::Config(_) => ErrorKind::ConfigError,
            Self::DuplicateAgent(_) => ErrorKind::DuplicateAgent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_projection_matches_variant() {
        assert_eq!(ConductorError::unknown_agent("x").kind(), ErrorKind::UnknownAgent);
        assert_eq!(ConductorError::tool_failure("x").kind(), ErrorKind::ToolFailure);
        assert_eq!(ConductorError::duplicate_agent("x").kind(), ErrorKind::DuplicateAgent);
    }

    #[test]
    fn display_carries_message() {
        let err = ConductorError::config("missing api key");
        assert_eq!(err.to_string(), "config error: missing api key");
    }
}
