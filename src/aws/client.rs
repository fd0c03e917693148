//! HTTP implementation of [`Ec2Api`] for EC2-compatible JSON endpoints.

use std::sync::LazyLock;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::aws::api::{
    ApiFuture, AuthorizeIngressRequest, CreateSecurityGroupRequest, CreateSecurityGroupResponse,
    Ec2Api, Ec2ApiError, Image, ImageFilters, Reservation, RunInstancesRequest, Vpc,
};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const TARGET_PREFIX: &str = "AmazonEC2";

static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeImagesBody<'a> {
    filters: &'a ImageFilters,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeImagesResponse {
    images: Vec<Image>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeVpcsResponse {
    vpcs: Vec<Vpc>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateDefaultVpcResponse {
    vpc: Vpc,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct InstanceIdsBody<'a> {
    instance_ids: [&'a str; 1],
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeInstancesResponse {
    reservations: Vec<Reservation>,
}

/// Client handle for one backend region.
///
/// The handle is pre-authenticated: the session token supplied at
/// construction is forwarded on every call, and acquiring or refreshing it
/// is the caller's concern. Cloning is cheap and clones share nothing but
/// immutable data, so one handle may serve any number of in-flight calls.
#[derive(Clone, Debug)]
pub struct Ec2HttpClient {
    endpoint: String,
    session_token: String,
}

impl Ec2HttpClient {
    /// Constructs a client against the given endpoint URL.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, session_token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            session_token: session_token.into(),
        }
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        action: &str,
        body: &B,
    ) -> Result<T, Ec2ApiError> {
        let bytes = self.post_raw(action, body).await?;
        serde_json::from_slice(&bytes).map_err(|err| Ec2ApiError::Decode(err.to_string()))
    }

    async fn post_unit<B: Serialize + Sync>(
        &self,
        action: &str,
        body: &B,
    ) -> Result<(), Ec2ApiError> {
        self.post_raw(action, body).await.map(|_| ())
    }

    async fn post_raw<B: Serialize + Sync>(
        &self,
        action: &str,
        body: &B,
    ) -> Result<Vec<u8>, Ec2ApiError> {
        let response = HTTP_CLIENT
            .post(&self.endpoint)
            .header("X-Amz-Target", format!("{TARGET_PREFIX}.{action}"))
            .header("X-Amz-Security-Token", &self.session_token)
            .json(body)
            .send()
            .await
            .map_err(|err| Ec2ApiError::Transport(err.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| Ec2ApiError::Transport(err.to_string()))?;

        if status.is_success() {
            return Ok(bytes.to_vec());
        }

        Err(Ec2ApiError::Api {
            status: status.as_u16(),
            message: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

impl Ec2Api for Ec2HttpClient {
    fn describe_images<'a>(&'a self, filters: &'a ImageFilters) -> ApiFuture<'a, Vec<Image>> {
        Box::pin(async move {
            let body = DescribeImagesBody { filters };
            let response: DescribeImagesResponse = self.post("DescribeImages", &body).await?;
            Ok(response.images)
        })
    }

    fn describe_vpcs(&self) -> ApiFuture<'_, Vec<Vpc>> {
        Box::pin(async move {
            let response: DescribeVpcsResponse =
                self.post("DescribeVpcs", &serde_json::json!({})).await?;
            Ok(response.vpcs)
        })
    }

    fn create_default_vpc(&self) -> ApiFuture<'_, Vpc> {
        Box::pin(async move {
            let response: CreateDefaultVpcResponse = self
                .post("CreateDefaultVpc", &serde_json::json!({}))
                .await?;
            Ok(response.vpc)
        })
    }

    fn create_security_group<'a>(
        &'a self,
        request: &'a CreateSecurityGroupRequest,
    ) -> ApiFuture<'a, CreateSecurityGroupResponse> {
        Box::pin(async move { self.post("CreateSecurityGroup", request).await })
    }

    fn authorize_ingress<'a>(&'a self, request: &'a AuthorizeIngressRequest) -> ApiFuture<'a, ()> {
        Box::pin(async move { self.post_unit("AuthorizeSecurityGroupIngress", request).await })
    }

    fn run_instances<'a>(
        &'a self,
        request: &'a RunInstancesRequest,
    ) -> ApiFuture<'a, Reservation> {
        Box::pin(async move { self.post("RunInstances", request).await })
    }

    fn describe_instances<'a>(&'a self, instance_id: &'a str) -> ApiFuture<'a, Vec<Reservation>> {
        Box::pin(async move {
            let body = InstanceIdsBody {
                instance_ids: [instance_id],
            };
            let response: DescribeInstancesResponse =
                self.post("DescribeInstances", &body).await?;
            Ok(response.reservations)
        })
    }

    fn terminate_instances<'a>(&'a self, instance_id: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let body = InstanceIdsBody {
                instance_ids: [instance_id],
            };
            self.post_unit("TerminateInstances", &body).await
        })
    }
}
