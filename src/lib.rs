//! Provisioning engine for short-lived tunnel exit nodes.
//!
//! The crate exposes a provider-agnostic contract for provisioning,
//! querying, and destroying single compute instances, plus an AWS backend
//! that resolves boot images by freshness, bootstraps the default network
//! and a per-host ingress security group, and normalizes provider instance
//! state into a canonical status vocabulary.

pub mod aws;
pub mod config;
pub mod provisioner;
pub mod status;

pub use aws::{AwsProvisioner, AwsProvisionerError, Ec2Api, Ec2HttpClient};
pub use config::{AwsConfig, ConfigError};
pub use provisioner::{
    HostRequest, HostRequestBuilder, ProvisionFuture, ProvisionedHost, Provisioner, RequestError,
};
pub use status::HostStatus;
