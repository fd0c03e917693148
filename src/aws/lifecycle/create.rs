//! Instance creation request assembly for the AWS backend.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::aws::api::{
    BlockDeviceMapping, EbsBlockDevice, RunInstancesRequest, Tag, TagSpecification,
};
use crate::aws::types::{ImageId, SecurityGroupId};
use crate::provisioner::HostRequest;

use super::{VOLUME_DEVICE, VOLUME_SIZE_GIB};

/// Assembles the single-instance launch request: exactly one instance, the
/// boot script base64-encoded as user data, one fixed-size block volume,
/// and a `name` tag matching the request.
pub(in crate::aws) fn run_request(
    request: &HostRequest,
    image: &ImageId,
    group: &SecurityGroupId,
) -> RunInstancesRequest {
    RunInstancesRequest {
        image_id: image.as_str().to_owned(),
        instance_type: request.plan.clone(),
        min_count: 1,
        max_count: 1,
        user_data: STANDARD.encode(&request.user_data),
        security_group_ids: vec![group.as_str().to_owned()],
        block_device_mappings: vec![BlockDeviceMapping {
            device_name: VOLUME_DEVICE.to_owned(),
            ebs: EbsBlockDevice {
                volume_size: VOLUME_SIZE_GIB,
            },
        }],
        tag_specifications: vec![TagSpecification {
            resource_type: String::from("instance"),
            tags: vec![Tag {
                key: String::from("name"),
                value: request.name.clone(),
            }],
        }],
    }
}
