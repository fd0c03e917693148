//! AWS backend implementation of the exit-node lifecycle.

mod api;
mod client;
mod error;
mod lifecycle;
mod types;

use crate::config::AwsConfig;
use crate::provisioner::{HostRequest, ProvisionFuture, ProvisionedHost, Provisioner};

pub use api::{
    ApiFuture, AuthorizeIngressRequest, BlockDeviceMapping, CreateSecurityGroupRequest,
    CreateSecurityGroupResponse, EbsBlockDevice, Ec2Api, Ec2ApiError, Image, ImageFilters,
    Instance, InstanceState, IpPermission, IpRange, Reservation, RunInstancesRequest, Tag,
    TagSpecification, Vpc,
};
pub use client::Ec2HttpClient;
pub use error::AwsProvisionerError;

/// Backend that provisions exit nodes through an EC2-compatible API.
///
/// Generic over the client handle so tests and alternative gateways can
/// substitute the transport; production callers use [`Ec2HttpClient`].
#[derive(Clone, Debug)]
pub struct AwsProvisioner<C = Ec2HttpClient> {
    client: C,
}

impl<C: Ec2Api> AwsProvisioner<C> {
    /// Constructs a provisioner from an already-authenticated client
    /// handle scoped to one backend region.
    #[must_use]
    pub const fn new(client: C) -> Self {
        Self { client }
    }
}

impl AwsProvisioner<Ec2HttpClient> {
    /// Constructs a provisioner from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AwsProvisionerError::Config`] when the provided
    /// configuration fails validation.
    pub fn from_config(config: &AwsConfig) -> Result<Self, AwsProvisionerError> {
        config.validate()?;
        Ok(Self::new(Ec2HttpClient::new(
            config.endpoint_url(),
            &config.session_token,
        )))
    }
}

impl<C: Ec2Api> Provisioner for AwsProvisioner<C> {
    type Error = AwsProvisionerError;

    fn provision<'a>(
        &'a self,
        request: &'a HostRequest,
    ) -> ProvisionFuture<'a, ProvisionedHost, Self::Error> {
        Box::pin(async move {
            request.validate()?;
            let tunnel_port = request
                .tunnel_port
                .ok_or_else(|| AwsProvisionerError::Validation("tunnel_port".to_owned()))?;

            let image_id = self.find_ami(&request.os).await?;
            let vpc_id = self.ensure_default_vpc().await?;
            let group_id = self
                .create_security_group(&vpc_id, &request.name, tunnel_port)
                .await?;

            let launch = lifecycle::run_request(request, &image_id, &group_id);
            let reservation = self.client.run_instances(&launch).await?;
            lifecycle::created_host(&reservation)
        })
    }

    fn status<'a>(&'a self, id: &'a str) -> ProvisionFuture<'a, ProvisionedHost, Self::Error> {
        Box::pin(async move { self.fetch_host(id).await })
    }

    fn delete<'a>(&'a self, id: &'a str) -> ProvisionFuture<'a, (), Self::Error> {
        Box::pin(async move {
            self.client
                .terminate_instances(id)
                .await
                .map_err(AwsProvisionerError::from)
        })
    }
}
