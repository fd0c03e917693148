//! Tests for default-network bootstrap and security group creation.

use std::sync::Mutex;
use std::sync::atomic::Ordering;

use crate::aws::api::Vpc;
use crate::aws::types::VpcId;
use crate::aws::{AwsProvisioner, AwsProvisionerError};

use super::{FakeEc2, provisioner};

type Bootstrapper = AwsProvisioner<&'static FakeEc2>;

fn vpc(id: &str, is_default: bool) -> Vpc {
    Vpc {
        vpc_id: id.to_owned(),
        is_default,
    }
}

#[tokio::test]
async fn ensure_default_vpc_returns_existing_default_without_creating() {
    let fake = FakeEc2 {
        vpcs: Mutex::new(vec![vpc("vpc-other", false), vpc("vpc-default", true)]),
        ..FakeEc2::default()
    };

    let id = provisioner(&fake)
        .ensure_default_vpc()
        .await
        .expect("default should be found");
    assert_eq!(id.as_str(), "vpc-default");
    assert_eq!(fake.create_default_vpc_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn ensure_default_vpc_creates_when_absent_then_stays_idempotent() {
    let fake = FakeEc2::default();
    let engine = provisioner(&fake);

    let first = engine
        .ensure_default_vpc()
        .await
        .expect("creation should succeed");
    let second = engine
        .ensure_default_vpc()
        .await
        .expect("lookup should succeed");

    assert_eq!(first, second);
    assert_eq!(fake.create_default_vpc_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fake.describe_vpcs_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn create_security_group_authorizes_exactly_three_rules() {
    let fake = FakeEc2 {
        vpcs: Mutex::new(vec![vpc("vpc-default", true)]),
        ..FakeEc2::default()
    };

    let group = provisioner(&fake)
        .create_security_group(&VpcId::from("vpc-default"), "edge-1", 8080)
        .await
        .expect("group creation should succeed");
    assert_eq!(group.as_str(), "sg-123");

    let created = fake.created_groups.lock().expect("lock");
    assert_eq!(created.len(), 1);
    assert_eq!(created.first().map(|c| c.group_name.as_str()), Some("exitnode-sg-edge-1"));
    assert_eq!(created.first().map(|c| c.vpc_id.as_str()), Some("vpc-default"));

    let authorized = fake.authorized.lock().expect("lock");
    let rules = authorized.first().expect("one authorize call");
    assert_eq!(rules.group_id, "sg-123");
    let ports: Vec<(u16, u16)> = rules
        .ip_permissions
        .iter()
        .map(|rule| (rule.from_port, rule.to_port))
        .collect();
    assert_eq!(ports, vec![(80, 80), (443, 443), (8080, 8080)]);
    for rule in &rules.ip_permissions {
        assert_eq!(rule.ip_protocol, "tcp");
        assert_eq!(
            rule.ip_ranges.iter().map(|r| r.cidr_ip.as_str()).collect::<Vec<_>>(),
            vec!["0.0.0.0/0"]
        );
    }
}

#[tokio::test]
async fn create_security_group_rejects_port_zero_before_any_call() {
    let fake = FakeEc2::default();
    let err = provisioner(&fake)
        .create_security_group(&VpcId::from("vpc-default"), "edge-1", 0)
        .await
        .expect_err("port zero should fail");
    assert!(matches!(err, AwsProvisionerError::Validation(field) if field == "tunnel_port"));
    assert!(fake.created_groups.lock().expect("lock").is_empty());
}

#[test]
fn ingress_rules_cover_http_https_and_tunnel_port() {
    let rules = Bootstrapper::ingress_rules(12345);
    let ports: Vec<u16> = rules.iter().map(|rule| rule.from_port).collect();
    assert_eq!(ports, vec![80, 443, 12345]);
}
