//! Network bootstrap helpers for the AWS backend.

use crate::aws::api::{
    AuthorizeIngressRequest, CreateSecurityGroupRequest, Ec2Api, IpPermission, IpRange,
};
use crate::aws::types::{SecurityGroupId, VpcId};
use crate::aws::{AwsProvisioner, AwsProvisionerError};

use super::{ANY_IPV4, HTTP_PORT, HTTPS_PORT, SECURITY_GROUP_DESCRIPTION, SECURITY_GROUP_PREFIX};

fn tcp_rule(port: u16) -> IpPermission {
    IpPermission {
        ip_protocol: String::from("tcp"),
        from_port: port,
        to_port: port,
        ip_ranges: vec![IpRange {
            cidr_ip: ANY_IPV4.to_owned(),
        }],
    }
}

impl<C: Ec2Api> AwsProvisioner<C> {
    /// Returns the identifier of the account's default network, creating it
    /// when none exists.
    ///
    /// Safe to invoke repeatedly once a default exists: the lookup returns
    /// the same identifier without a creation call. Two concurrent callers
    /// that both observe no default may both attempt creation; whether that
    /// yields a duplicate or a provider-enforced unique network is
    /// backend-defined.
    pub(in crate::aws) async fn ensure_default_vpc(&self) -> Result<VpcId, AwsProvisionerError> {
        let vpcs = self.client.describe_vpcs().await?;
        if let Some(vpc) = vpcs.into_iter().find(|vpc| vpc.is_default) {
            return Ok(VpcId::from(vpc.vpc_id));
        }

        let created = self.client.create_default_vpc().await?;
        Ok(VpcId::from(created.vpc_id))
    }

    /// Creates a fresh per-host security group and authorizes its three
    /// ingress rules: TCP 80, 443, and the tunnel port, each from any
    /// source.
    ///
    /// A group that was created but whose rules failed to authorize is left
    /// behind; the caller treats the whole provisioning attempt as failed
    /// and is responsible for cleanup.
    pub(in crate::aws) async fn create_security_group(
        &self,
        vpc: &VpcId,
        host_name: &str,
        tunnel_port: u16,
    ) -> Result<SecurityGroupId, AwsProvisionerError> {
        if tunnel_port == 0 {
            return Err(AwsProvisionerError::Validation("tunnel_port".to_owned()));
        }

        let request = CreateSecurityGroupRequest {
            group_name: format!("{SECURITY_GROUP_PREFIX}{host_name}"),
            description: SECURITY_GROUP_DESCRIPTION.to_owned(),
            vpc_id: vpc.as_str().to_owned(),
        };
        let created = self.client.create_security_group(&request).await?;

        let authorize = AuthorizeIngressRequest {
            group_id: created.group_id.clone(),
            ip_permissions: Self::ingress_rules(tunnel_port),
        };
        self.client.authorize_ingress(&authorize).await?;

        Ok(SecurityGroupId::from(created.group_id))
    }

    /// Builds the allow rules opened on every exit node.
    pub(in crate::aws) fn ingress_rules(tunnel_port: u16) -> Vec<IpPermission> {
        vec![tcp_rule(HTTP_PORT), tcp_rule(HTTPS_PORT), tcp_rule(tunnel_port)]
    }
}
