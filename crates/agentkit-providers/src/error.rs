//! Error types for the provider adapters.
//!
//! Adapters report exactly two kinds of failure: a configuration problem at
//! construction time, or a vendor call that failed. The vendor failure is
//! kept as the error's `source` so callers can still inspect the root cause.

use thiserror::Error;

use crate::client::VendorError;

#[derive(Debug, Error)]
pub enum Error {
    /// Required credentials could not be resolved, or were unusable.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The vendor call failed (network, auth, bad response, worker panic).
    #[error("{provider} - error {action}: {source}")]
    Provider {
        provider: &'static str,
        action: &'static str,
        #[source]
        source: VendorError,
    },
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// The underlying vendor error, for `Provider` errors.
    pub fn vendor_error(&self) -> Option<&VendorError> {
        match self {
            Error::Provider { source, .. } => Some(source),
            Error::Configuration { .. } => None,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
