//! Mock Keystone and Nova shared by the integration tests.
//!
//! `POST /v3/auth/tokens` issues a token whose catalog points compute at
//! `{mock}/compute/v2.1`.

#![allow(dead_code)]

use cto_openstack::{CloudsConfig, NovaClient, Scope};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "gAAAAABtest-token";
pub const SERVER_ID: &str = "9168b536-cd40-4630-b43f-b259807c6e87";
pub const PORT_ID: &str = "ce531f90-199f-48c0-816c-13e38010b442";

pub fn token_body(base: &str, services: &[&str]) -> Value {
    let catalog: Vec<Value> = services
        .iter()
        .map(|service| {
            json!({
                "type": service,
                "name": "nova",
                "endpoints": [{
                    "interface": "public",
                    "region_id": "RegionOne",
                    "region": "RegionOne",
                    "url": format!("{base}/compute/v2.1")
                }]
            })
        })
        .collect();

    json!({
        "token": {
            "expires_at": "2099-01-01T00:00:00.000000Z",
            "project": {"id": "p-1", "name": "capo"},
            "catalog": catalog
        }
    })
}

pub async fn mount_keystone(server: &MockServer, services: &[&str]) {
    Mock::given(method("POST"))
        .and(path("/v3/auth/tokens"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Subject-Token", TOKEN)
                .set_body_json(token_body(&server.uri(), services)),
        )
        .mount(server)
        .await;
}

pub fn clouds_yaml(auth_url: &str) -> String {
    format!(
        r"
clouds:
  capo:
    auth_type: password
    region_name: RegionOne
    auth:
      auth_url: {auth_url}/v3
      username: admin
      password: secret
      project_name: capo
      domain_name: Default
"
    )
}

pub async fn scope(server: &MockServer) -> Scope {
    let clouds = CloudsConfig::from_yaml(&clouds_yaml(&server.uri())).unwrap();
    Scope::from_cloud(clouds.cloud("capo").unwrap(), "capo")
        .await
        .unwrap()
}

pub async fn compute(server: &MockServer) -> NovaClient {
    mount_keystone(server, &["compute"]).await;
    scope(server).await.compute_client().await.unwrap()
}

pub fn server_json(id: &str, name: &str, zone: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": "ACTIVE",
        "tenant_id": "p-1",
        "user_id": "u-1",
        "hostId": "b3f7",
        "image": "",
        "flavor": {"original_name": "m1.medium", "vcpus": 2, "ram": 4096, "disk": 40},
        "addresses": {
            "private": [{
                "addr": "10.0.0.12",
                "version": 4,
                "OS-EXT-IPS:type": "fixed",
                "OS-EXT-IPS-MAC:mac_addr": "fa:16:3e:00:00:01"
            }]
        },
        "tags": ["capo"],
        "OS-EXT-AZ:availability_zone": zone
    })
}
