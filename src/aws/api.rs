//! Capability interface and wire types for the EC2-compatible backend API.
//!
//! The provisioner talks to the backend exclusively through [`Ec2Api`], so
//! tests and alternative gateways can substitute the transport. The shipped
//! implementation is [`crate::aws::Ec2HttpClient`].

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A bootable machine image as reported by the backend.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Image {
    /// Provider identifier (for example `ami-0abc`).
    pub image_id: String,
    /// Human readable image name; matched exactly during resolution.
    pub name: String,
    /// Lifecycle state (`available`, `pending`, ...).
    pub state: String,
    /// Whether the image is publicly visible.
    pub public: bool,
    /// CPU architecture (`x86_64`, `arm64`, ...).
    pub architecture: String,
    /// RFC 3339 creation timestamp, as a raw string from the wire.
    pub creation_date: String,
}

/// Server-side filters applied to an image listing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageFilters {
    /// Exact image name to match.
    pub name: String,
    /// Required CPU architecture.
    pub architecture: String,
    /// Required lifecycle state.
    pub state: String,
    /// Restrict to publicly visible images.
    pub public: bool,
}

/// A provider-level network container.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Vpc {
    /// Provider identifier (for example `vpc-0abc`).
    pub vpc_id: String,
    /// Whether this network is the account's default; at most one is.
    pub is_default: bool,
}

/// Request body for creating a security group.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateSecurityGroupRequest {
    /// Unique group name within the network.
    pub group_name: String,
    /// Free-form description.
    pub description: String,
    /// Network the group is scoped to.
    pub vpc_id: String,
}

/// Response body for a created security group.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateSecurityGroupResponse {
    /// Identifier of the new group.
    pub group_id: String,
}

/// A source address range for an ingress rule.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpRange {
    /// CIDR notation source (for example `0.0.0.0/0`).
    pub cidr_ip: String,
}

/// One inbound allow rule.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpPermission {
    /// Transport protocol (`tcp`, `udp`, ...).
    pub ip_protocol: String,
    /// First port of the allowed range.
    pub from_port: u16,
    /// Last port of the allowed range.
    pub to_port: u16,
    /// Source ranges the rule admits.
    pub ip_ranges: Vec<IpRange>,
}

/// Request body for authorizing ingress rules on a security group.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthorizeIngressRequest {
    /// Group the rules attach to.
    pub group_id: String,
    /// Rules to authorize.
    pub ip_permissions: Vec<IpPermission>,
}

/// Block-storage parameters for an attached volume.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EbsBlockDevice {
    /// Volume size in GiB.
    pub volume_size: u32,
}

/// Mapping of a block device onto an instance.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlockDeviceMapping {
    /// Device node the volume appears as (for example `/dev/sdh`).
    pub device_name: String,
    /// Volume parameters.
    pub ebs: EbsBlockDevice,
}

/// A key/value tag.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

/// Tags applied to a resource type at creation.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagSpecification {
    /// Resource type the tags apply to (for example `instance`).
    pub resource_type: String,
    /// Tags to apply.
    pub tags: Vec<Tag>,
}

/// Request body for launching instances.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunInstancesRequest {
    /// Resolved image identifier to boot from.
    pub image_id: String,
    /// Instance plan or size.
    pub instance_type: String,
    /// Minimum number of instances to launch.
    pub min_count: u32,
    /// Maximum number of instances to launch.
    pub max_count: u32,
    /// Base64-encoded boot script.
    pub user_data: String,
    /// Security groups attached to the instance.
    pub security_group_ids: Vec<String>,
    /// Additional block devices to attach.
    pub block_device_mappings: Vec<BlockDeviceMapping>,
    /// Tags applied at creation.
    pub tag_specifications: Vec<TagSpecification>,
}

/// Lifecycle state of an instance as reported by the backend.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceState {
    /// Provider state name (`pending`, `running`, `terminated`, ...).
    pub name: String,
}

/// A compute instance as reported by the backend.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
    /// Provider identifier (for example `i-0abc`).
    pub instance_id: String,
    /// Public address; absent until assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_ip_address: Option<String>,
    /// Current lifecycle state.
    pub state: InstanceState,
}

/// A response wrapper grouping the instances returned by a create or
/// describe call.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reservation {
    /// Instances in the reservation.
    pub instances: Vec<Instance>,
}

/// Errors raised by the transport layer.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Ec2ApiError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The backend answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the backend.
        message: String,
    },
    /// The response body did not match the expected shape.
    #[error("malformed API response: {0}")]
    Decode(String),
}

/// Future returned by [`Ec2Api`] operations.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, Ec2ApiError>> + Send + 'a>>;

/// Operations the provisioner requires from an EC2-compatible backend.
///
/// Implementations must be safe for concurrent use by multiple in-flight
/// calls; the provisioner holds one handle for its whole lifetime.
pub trait Ec2Api: Send + Sync {
    /// Lists images matching the given filters.
    fn describe_images<'a>(&'a self, filters: &'a ImageFilters) -> ApiFuture<'a, Vec<Image>>;

    /// Lists all networks visible to the account.
    fn describe_vpcs(&self) -> ApiFuture<'_, Vec<Vpc>>;

    /// Creates the account's default network.
    fn create_default_vpc(&self) -> ApiFuture<'_, Vpc>;

    /// Creates a security group scoped to a network.
    fn create_security_group<'a>(
        &'a self,
        request: &'a CreateSecurityGroupRequest,
    ) -> ApiFuture<'a, CreateSecurityGroupResponse>;

    /// Authorizes inbound rules on a security group.
    fn authorize_ingress<'a>(&'a self, request: &'a AuthorizeIngressRequest) -> ApiFuture<'a, ()>;

    /// Launches instances and returns the resulting reservation.
    fn run_instances<'a>(&'a self, request: &'a RunInstancesRequest)
    -> ApiFuture<'a, Reservation>;

    /// Describes an instance by identifier. An unknown identifier yields an
    /// empty reservation list, not an error.
    fn describe_instances<'a>(&'a self, instance_id: &'a str) -> ApiFuture<'a, Vec<Reservation>>;

    /// Requests termination of an instance by identifier.
    fn terminate_instances<'a>(&'a self, instance_id: &'a str) -> ApiFuture<'a, ()>;
}
