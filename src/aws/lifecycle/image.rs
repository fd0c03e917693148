//! Image resolution helpers for the AWS backend.

use chrono::DateTime;

use crate::aws::api::{Ec2Api, Image, ImageFilters};
use crate::aws::types::ImageId;
use crate::aws::{AwsProvisioner, AwsProvisionerError};

use super::{ARCHITECTURE, IMAGE_STATE_AVAILABLE, ImageCandidate};

impl<C: Ec2Api> AwsProvisioner<C> {
    /// Resolves an exact image name to the identifier of the most recently
    /// created matching image.
    pub(in crate::aws) async fn find_ami(
        &self,
        selector: &str,
    ) -> Result<ImageId, AwsProvisionerError> {
        let filters = ImageFilters {
            name: selector.to_owned(),
            architecture: ARCHITECTURE.to_owned(),
            state: IMAGE_STATE_AVAILABLE.to_owned(),
            public: true,
        };
        let images = self.client.describe_images(&filters).await?;
        let matching = Self::filter_images(images);
        Self::select_latest(matching, selector)
    }

    /// Re-applies the listing filters locally so a permissive backend
    /// cannot widen the candidate set.
    pub(in crate::aws) fn filter_images(images: Vec<Image>) -> Vec<Image> {
        images
            .into_iter()
            .filter(|image| image.architecture == ARCHITECTURE)
            .filter(|image| image.state == IMAGE_STATE_AVAILABLE)
            .filter(|image| image.public)
            .collect()
    }

    /// Picks the candidate with the greatest creation timestamp.
    ///
    /// Candidates whose timestamp fails to parse are skipped rather than
    /// aborting resolution of the remainder. When nothing matched at all the
    /// failure is [`AwsProvisionerError::ImageNotFound`]; when candidates
    /// existed but none carried a parseable timestamp, the last offending
    /// value is reported as
    /// [`AwsProvisionerError::MalformedCreationDate`].
    pub(in crate::aws) fn select_latest(
        images: Vec<Image>,
        selector: &str,
    ) -> Result<ImageId, AwsProvisionerError> {
        let mut malformed: Option<(String, String)> = None;
        let mut candidates: Vec<ImageCandidate> = Vec::with_capacity(images.len());
        for image in images {
            match DateTime::parse_from_rfc3339(&image.creation_date) {
                Ok(created_at) => candidates.push(ImageCandidate {
                    id: ImageId::from(image.image_id),
                    created_at,
                }),
                Err(_) => malformed = Some((image.image_id, image.creation_date)),
            }
        }

        if let Some(best) = candidates.into_iter().max_by_key(|c| c.created_at) {
            return Ok(best.id);
        }

        if let Some((image_id, value)) = malformed {
            return Err(AwsProvisionerError::MalformedCreationDate { image_id, value });
        }

        Err(AwsProvisionerError::ImageNotFound {
            name: selector.to_owned(),
            architecture: ARCHITECTURE.to_owned(),
        })
    }
}
