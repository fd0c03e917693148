//! Configuration loading via `ortho-config`.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::provisioner::HostRequestBuilder;

/// AWS specific configuration derived from environment variables and
/// configuration files.
///
/// Credential acquisition is out of scope for this crate; `session_token`
/// is an opaque, already-authenticated token forwarded verbatim to the
/// backend endpoint.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "AWS")]
pub struct AwsConfig {
    /// Pre-authenticated session token presented on every API call.
    pub session_token: String,
    /// Target region. Defaults to `eu-west-1`.
    #[ortho_config(default = "eu-west-1".to_owned())]
    pub region: String,
    /// Optional endpoint override for EC2-compatible gateways or local
    /// test stacks. When unset the regional endpoint is derived from
    /// `region`.
    pub endpoint: Option<String>,
    /// Plan for new instances. Defaults to `t3.micro` to minimise cost.
    #[ortho_config(default = "t3.micro".to_owned())]
    pub default_plan: String,
    /// Exact image name used to resolve the boot image.
    #[ortho_config(
        default = "ubuntu/images/hvm-ssd/ubuntu-jammy-22.04-amd64-server-*".to_owned()
    )]
    pub default_image: String,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
    section: &'static str,
}

impl FieldMetadata {
    const fn new(
        description: &'static str,
        env_var: &'static str,
        toml_key: &'static str,
        section: &'static str,
    ) -> Self {
        Self {
            description,
            env_var,
            toml_key,
            section,
        }
    }
}

impl AwsConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: set {} or add {} to [{}] in exitnode.toml",
                metadata.description, metadata.env_var, metadata.toml_key, metadata.section
            )));
        }
        Ok(())
    }

    /// Loads configuration using the `ortho-config` derive. Values merge
    /// defaults, configuration files, and environment variables in that
    /// order of precedence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the loader fails to merge sources.
    pub fn load_from_sources() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("exitnode")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Returns the endpoint URL API calls are issued against, honouring the
    /// override when one is configured.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://ec2.{}.amazonaws.com", self.region))
    }

    /// Starts a [`HostRequestBuilder`] pre-populated with the configured
    /// image and plan defaults. The caller still supplies the host name,
    /// user data, and tunnel port.
    #[must_use]
    pub fn request_template(&self) -> HostRequestBuilder {
        HostRequestBuilder::new()
            .os(&self.default_image)
            .plan(&self.default_plan)
    }

    /// Performs semantic validation on required fields. Error messages
    /// include guidance on how to provide missing values via environment
    /// variables or configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(
            &self.session_token,
            &FieldMetadata::new(
                "AWS session token",
                "AWS_SESSION_TOKEN",
                "session_token",
                "aws",
            ),
        )?;
        Self::require_field(
            &self.region,
            &FieldMetadata::new("AWS region", "AWS_REGION", "region", "aws"),
        )?;
        Self::require_field(
            &self.default_plan,
            &FieldMetadata::new("instance plan", "AWS_DEFAULT_PLAN", "default_plan", "aws"),
        )?;
        Self::require_field(
            &self.default_image,
            &FieldMetadata::new("VM image", "AWS_DEFAULT_IMAGE", "default_image", "aws"),
        )?;
        Ok(())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
