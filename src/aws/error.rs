//! Error types for the AWS backend.

use thiserror::Error;

use crate::aws::api::Ec2ApiError;
use crate::config::ConfigError;
use crate::provisioner::RequestError;

/// Errors raised by the AWS backend.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum AwsProvisionerError {
    /// Raised when the high-level configuration is incomplete.
    #[error("configuration error: {0}")]
    Config(String),
    /// Raised when a request is missing a required field.
    #[error("invalid host request: {0}")]
    Validation(String),
    /// Raised when no image matches the requested name.
    #[error("image '{name}' (arch {architecture}) not found")]
    ImageNotFound {
        /// Image name passed by the caller.
        name: String,
        /// Architecture used for the lookup.
        architecture: String,
    },
    /// Raised when the backend reports no instance for an identifier.
    #[error("instance {instance_id} not found")]
    InstanceNotFound {
        /// Provider instance identifier.
        instance_id: String,
    },
    /// Raised when an image's creation timestamp cannot be parsed and no
    /// other candidate remains.
    #[error("image {image_id} has malformed creation date '{value}'")]
    MalformedCreationDate {
        /// Image whose timestamp was rejected.
        image_id: String,
        /// Raw timestamp value returned by the backend.
        value: String,
    },
    /// Wrapper for transport and API level failures.
    #[error("provider error: {message}")]
    Provider {
        /// Message returned by the backend or transport.
        message: String,
    },
}

impl From<Ec2ApiError> for AwsProvisionerError {
    fn from(value: Ec2ApiError) -> Self {
        Self::Provider {
            message: value.to_string(),
        }
    }
}

impl From<RequestError> for AwsProvisionerError {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::Validation(field) => Self::Validation(field),
        }
    }
}

impl From<ConfigError> for AwsProvisionerError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}
