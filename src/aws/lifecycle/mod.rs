//! Instance lifecycle helpers for the AWS backend.

use chrono::{DateTime, FixedOffset};

mod create;
mod host;
mod image;
mod network;

use crate::aws::types::ImageId;

pub(in crate::aws) const ARCHITECTURE: &str = "x86_64";
pub(in crate::aws) const IMAGE_STATE_AVAILABLE: &str = "available";
pub(in crate::aws) const VOLUME_SIZE_GIB: u32 = 20;
pub(in crate::aws) const VOLUME_DEVICE: &str = "/dev/sdh";
pub(in crate::aws) const SECURITY_GROUP_PREFIX: &str = "exitnode-sg-";
pub(in crate::aws) const SECURITY_GROUP_DESCRIPTION: &str = "Exit node ingress";
pub(in crate::aws) const HTTP_PORT: u16 = 80;
pub(in crate::aws) const HTTPS_PORT: u16 = 443;
pub(in crate::aws) const ANY_IPV4: &str = "0.0.0.0/0";

pub(in crate::aws) use create::run_request;
pub(in crate::aws) use host::{created_host, instance_to_host};

/// Transient record used only during image resolution.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(in crate::aws) struct ImageCandidate {
    pub(in crate::aws) id: ImageId,
    pub(in crate::aws) created_at: DateTime<FixedOffset>,
}

#[cfg(test)]
mod tests;
