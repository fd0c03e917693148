//! Provider-agnostic contract for provisioning tunnel exit nodes.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::status::HostStatus;

/// Parameters required to provision a new exit node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HostRequest {
    /// Display name for the host, also used to derive per-host resource
    /// names such as the ingress security group.
    pub name: String,
    /// Exact image name the backend resolves to a provider specific
    /// image identifier.
    pub os: String,
    /// Plan or instance size to request (for example `t3.micro`).
    pub plan: String,
    /// Boot-time script handed to the instance as user data. Stored raw;
    /// backends encode it as required by their API.
    pub user_data: Vec<u8>,
    /// TCP port the tunnel data plane listens on. Required by
    /// [`Provisioner::provision`]; the ingress boundary opens it alongside
    /// 80 and 443.
    pub tunnel_port: Option<u16>,
}

impl HostRequest {
    /// Starts a builder for a [`HostRequest`].
    #[must_use]
    pub fn builder() -> HostRequestBuilder {
        HostRequestBuilder::new()
    }

    /// Validates the request, returning a descriptive error when a required
    /// field is missing or out of range.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Validation`] when any string field is empty
    /// or the tunnel port is zero.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.name.is_empty() {
            return Err(RequestError::Validation("name".to_owned()));
        }
        if self.os.is_empty() {
            return Err(RequestError::Validation("os".to_owned()));
        }
        if self.plan.is_empty() {
            return Err(RequestError::Validation("plan".to_owned()));
        }
        if self.tunnel_port == Some(0) {
            return Err(RequestError::Validation("tunnel_port".to_owned()));
        }
        Ok(())
    }
}

/// Builder for [`HostRequest`] that defers trimming and validation to
/// construction.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HostRequestBuilder {
    name: String,
    os: String,
    plan: String,
    user_data: Vec<u8>,
    tunnel_port: Option<u16>,
}

impl HostRequestBuilder {
    /// Creates an empty builder; fields must be populated before build.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host display name.
    #[must_use]
    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = value.into();
        self
    }

    /// Sets the image name selector.
    #[must_use]
    pub fn os(mut self, value: impl Into<String>) -> Self {
        self.os = value.into();
        self
    }

    /// Sets the plan or instance size.
    #[must_use]
    pub fn plan(mut self, value: impl Into<String>) -> Self {
        self.plan = value.into();
        self
    }

    /// Sets the boot-time user data payload.
    #[must_use]
    pub fn user_data(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.user_data = value.into();
        self
    }

    /// Sets the tunnel data-plane port.
    #[must_use]
    pub const fn tunnel_port(mut self, value: u16) -> Self {
        self.tunnel_port = Some(value);
        self
    }

    /// Builds and validates the [`HostRequest`], trimming string inputs.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Validation`] when a required field is empty
    /// or the tunnel port is zero.
    pub fn build(self) -> Result<HostRequest, RequestError> {
        let request = HostRequest {
            name: self.name.trim().to_owned(),
            os: self.os.trim().to_owned(),
            plan: self.plan.trim().to_owned(),
            user_data: self.user_data,
            tunnel_port: self.tunnel_port,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Result of a successful provision or status call. Once returned, the
/// provisioner holds no reference to it; state is always re-read from the
/// backend, never cached.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProvisionedHost {
    /// Provider specific identifier for the instance.
    pub id: String,
    /// Public address assigned by the provider; `None` until assigned.
    pub address: Option<String>,
    /// Canonical lifecycle status.
    pub status: HostStatus,
}

/// Errors raised while constructing or validating a [`HostRequest`].
#[derive(Debug, Error, Eq, PartialEq)]
pub enum RequestError {
    /// Raised when a request field is missing, empty, or out of range.
    #[error("missing or invalid field: {0}")]
    Validation(String),
}

/// Future returned by provisioner operations.
pub type ProvisionFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Minimal interface implemented by cloud provisioners. Callers depend on
/// this contract only, never on a concrete backend type.
pub trait Provisioner {
    /// Provider specific error type returned by the backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Provisions a new exit node and returns its normalized description.
    fn provision<'a>(
        &'a self,
        request: &'a HostRequest,
    ) -> ProvisionFuture<'a, ProvisionedHost, Self::Error>;

    /// Fetches the current state of an instance by identifier.
    fn status<'a>(&'a self, id: &'a str) -> ProvisionFuture<'a, ProvisionedHost, Self::Error>;

    /// Requests termination of an instance by identifier.
    fn delete<'a>(&'a self, id: &'a str) -> ProvisionFuture<'a, (), Self::Error>;
}
