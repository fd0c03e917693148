//! Reservation normalization helpers for the AWS backend.

use crate::aws::api::{Ec2Api, Instance, Reservation};
use crate::aws::{AwsProvisioner, AwsProvisionerError};
use crate::provisioner::ProvisionedHost;
use crate::status::HostStatus;

/// Normalizes one backend instance into the caller-facing model.
pub(in crate::aws) fn instance_to_host(instance: &Instance) -> ProvisionedHost {
    ProvisionedHost {
        id: instance.instance_id.clone(),
        address: instance.public_ip_address.clone(),
        status: HostStatus::from_provider(&instance.state.name),
    }
}

/// Extracts the single instance a create call is expected to return.
///
/// An empty reservation from a nominally successful create is a provider
/// inconsistency, not a lookup miss.
pub(in crate::aws) fn created_host(
    reservation: &Reservation,
) -> Result<ProvisionedHost, AwsProvisionerError> {
    reservation
        .instances
        .first()
        .map(instance_to_host)
        .ok_or_else(|| AwsProvisionerError::Provider {
            message: String::from("create returned an empty reservation"),
        })
}

impl<C: Ec2Api> AwsProvisioner<C> {
    /// Re-reads instance state from the backend and normalizes it. State is
    /// never cached locally.
    pub(in crate::aws) async fn fetch_host(
        &self,
        instance_id: &str,
    ) -> Result<ProvisionedHost, AwsProvisionerError> {
        let reservations = self.client.describe_instances(instance_id).await?;
        reservations
            .first()
            .and_then(|reservation| reservation.instances.first())
            .map(instance_to_host)
            .ok_or_else(|| AwsProvisionerError::InstanceNotFound {
                instance_id: instance_id.to_owned(),
            })
    }
}
