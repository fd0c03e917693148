//! Unit tests for AWS lifecycle helpers.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::aws::AwsProvisioner;
use crate::aws::api::{
    ApiFuture, AuthorizeIngressRequest, CreateSecurityGroupRequest, CreateSecurityGroupResponse,
    Ec2Api, Ec2ApiError, Image, ImageFilters, Instance, InstanceState, Reservation,
    RunInstancesRequest, Vpc,
};

#[derive(Copy, Clone)]
struct ImageSpec {
    id: &'static str,
    arch: &'static str,
    state: &'static str,
    public: bool,
    creation_date: &'static str,
}

fn image(spec: ImageSpec) -> Image {
    Image {
        image_id: spec.id.to_owned(),
        name: String::from("ubuntu-jammy"),
        state: spec.state.to_owned(),
        public: spec.public,
        architecture: spec.arch.to_owned(),
        creation_date: spec.creation_date.to_owned(),
    }
}

fn available(id: &'static str, creation_date: &'static str) -> Image {
    image(ImageSpec {
        id,
        arch: "x86_64",
        state: "available",
        public: true,
        creation_date,
    })
}

fn instance(id: &str, state: &str, public_ip: Option<&str>) -> Instance {
    Instance {
        instance_id: id.to_owned(),
        public_ip_address: public_ip.map(str::to_owned),
        state: InstanceState {
            name: state.to_owned(),
        },
    }
}

/// Scripted in-memory backend double.
#[derive(Default)]
struct FakeEc2 {
    images: Vec<Image>,
    vpcs: Mutex<Vec<Vpc>>,
    reservations: Vec<Reservation>,
    run_reservation: Option<Reservation>,
    describe_vpcs_calls: AtomicUsize,
    create_default_vpc_calls: AtomicUsize,
    created_groups: Mutex<Vec<CreateSecurityGroupRequest>>,
    authorized: Mutex<Vec<AuthorizeIngressRequest>>,
}

impl Ec2Api for &FakeEc2 {
    fn describe_images<'a>(&'a self, _filters: &'a ImageFilters) -> ApiFuture<'a, Vec<Image>> {
        let images = self.images.clone();
        Box::pin(async move { Ok(images) })
    }

    fn describe_vpcs(&self) -> ApiFuture<'_, Vec<Vpc>> {
        self.describe_vpcs_calls.fetch_add(1, Ordering::SeqCst);
        let vpcs = self.vpcs.lock().map(|guard| guard.clone()).unwrap_or_default();
        Box::pin(async move { Ok(vpcs) })
    }

    fn create_default_vpc(&self) -> ApiFuture<'_, Vpc> {
        self.create_default_vpc_calls.fetch_add(1, Ordering::SeqCst);
        let vpc = Vpc {
            vpc_id: String::from("vpc-created"),
            is_default: true,
        };
        if let Ok(mut guard) = self.vpcs.lock() {
            guard.push(vpc.clone());
        }
        Box::pin(async move { Ok(vpc) })
    }

    fn create_security_group<'a>(
        &'a self,
        request: &'a CreateSecurityGroupRequest,
    ) -> ApiFuture<'a, CreateSecurityGroupResponse> {
        if let Ok(mut guard) = self.created_groups.lock() {
            guard.push(request.clone());
        }
        Box::pin(async move {
            Ok(CreateSecurityGroupResponse {
                group_id: String::from("sg-123"),
            })
        })
    }

    fn authorize_ingress<'a>(&'a self, request: &'a AuthorizeIngressRequest) -> ApiFuture<'a, ()> {
        if let Ok(mut guard) = self.authorized.lock() {
            guard.push(request.clone());
        }
        Box::pin(async move { Ok(()) })
    }

    fn run_instances<'a>(
        &'a self,
        _request: &'a RunInstancesRequest,
    ) -> ApiFuture<'a, Reservation> {
        let reservation = self.run_reservation.clone();
        Box::pin(async move {
            reservation.ok_or_else(|| Ec2ApiError::Transport(String::from("unscripted")))
        })
    }

    fn describe_instances<'a>(&'a self, _instance_id: &'a str) -> ApiFuture<'a, Vec<Reservation>> {
        let reservations = self.reservations.clone();
        Box::pin(async move { Ok(reservations) })
    }

    fn terminate_instances<'a>(&'a self, _instance_id: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move { Ok(()) })
    }
}

fn provisioner(fake: &FakeEc2) -> AwsProvisioner<&FakeEc2> {
    AwsProvisioner::new(fake)
}

mod network;
