/// Convenience result type used across quadview.
pub type QuadviewResult<T> = Result<T, QuadviewError>;

/// Top-level error taxonomy used by compositor, session and relay APIs.
#[derive(thiserror::Error, Debug)]
pub enum QuadviewError {
    /// A caller-supplied value is outside its contract (quadrant index, viewport, options).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A fixed asset (logo image, text font) could not be loaded or decoded.
    #[error("asset load failure: {0}")]
    AssetLoad(String),

    /// The host drawing surface rejected a draw/clear/runtime call.
    #[error("host call failed: {0}")]
    HostCall(String),

    /// The caller is not allowed to perform the operation in the current context.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A relay message violated the sync protocol.
    #[error("protocol error [{code}]: {message}")]
    Protocol {
        /// Numeric error code, as carried on the wire.
        code: u16,
        /// Human readable reason.
        message: String,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QuadviewError {
    /// Build a [`QuadviewError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`QuadviewError::AssetLoad`] value.
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`QuadviewError::HostCall`] value.
    pub fn host_call(msg: impl Into<String>) -> Self {
        Self::HostCall(msg.into())
    }

    /// Build a [`QuadviewError::PermissionDenied`] value.
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Build a [`QuadviewError::Protocol`] value.
    pub fn protocol(code: u16, msg: impl Into<String>) -> Self {
        Self::Protocol {
            code,
            message: msg.into(),
        }
    }

    /// Build a [`QuadviewError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for QuadviewError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
