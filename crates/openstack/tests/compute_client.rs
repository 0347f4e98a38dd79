//! Integration tests for the Nova compute client.

mod common;

use common::{
    clouds_yaml, compute, mount_keystone, scope, server_json, token_body, PORT_ID, SERVER_ID,
    TOKEN,
};
use cto_openstack::compute::{
    ComputeClient, CreateServerOpts, ListServersOpts, NetworkAttachment, ServerStatus,
};
use cto_openstack::{CloudsConfig, OpenStackError, Scope};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Authentication and client construction
// =============================================================================

#[tokio::test]
async fn test_authenticates_with_password_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/auth/tokens"))
        .and(body_partial_json(json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {"name": "admin", "domain": {"name": "Default"}, "password": "secret"}
                    }
                },
                "scope": {"project": {"name": "capo", "domain": {"name": "Default"}}}
            }
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Subject-Token", TOKEN)
                .set_body_json(token_body(&server.uri(), &["compute"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let scope = scope(&server).await;
    let project = scope.provider.project().await.unwrap();
    assert_eq!(project.name, "capo");

    let client = scope.compute_client().await.unwrap();
    assert_eq!(client.endpoint(), format!("{}/compute/v2.1", server.uri()));
}

#[tokio::test]
async fn test_rejected_credentials_are_auth_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/auth/tokens"))
        .respond_with(ResponseTemplate::new(401).set_body_string("The request you have made requires authentication."))
        .mount(&server)
        .await;

    let clouds = CloudsConfig::from_yaml(&clouds_yaml(&server.uri())).unwrap();
    let err = Scope::from_cloud(clouds.cloud("capo").unwrap(), "capo")
        .await
        .unwrap_err();
    assert!(matches!(err, OpenStackError::Auth(_)));
}

#[tokio::test]
async fn test_missing_compute_endpoint() {
    let server = MockServer::start().await;
    mount_keystone(&server, &["network"]).await;
    let scope = scope(&server).await;

    let err = scope.compute_client().await.unwrap_err();
    assert!(matches!(err, OpenStackError::Config(_)));
    assert!(err
        .to_string()
        .contains("failed to create compute service client"));

    // The fallback client reports the construction failure on every call.
    let client = scope.compute_client_or_error().await;
    let err = client.get_server(SERVER_ID).await.unwrap_err();
    assert!(matches!(err, OpenStackError::ClientUnavailable(_)));
    assert!(err.to_string().contains("no public endpoint for compute"));
}

// =============================================================================
// Servers
// =============================================================================

#[tokio::test]
async fn test_get_server_sends_token_and_microversion() {
    let server = MockServer::start().await;
    let client = compute(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/compute/v2.1/servers/{SERVER_ID}")))
        .and(header("X-Auth-Token", TOKEN))
        .and(header("X-OpenStack-Nova-API-Version", "2.53"))
        .and(header("OpenStack-API-Version", "compute 2.53"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"server": server_json(SERVER_ID, "node-0", "az-1")})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let found = client.get_server(SERVER_ID).await.unwrap();
    assert_eq!(found.server.id, SERVER_ID);
    assert_eq!(found.server.status, ServerStatus::Active);
    assert_eq!(found.availability_zone(), "az-1");
    assert!(found.server.image.is_none());
    assert_eq!(found.server.addresses["private"][0].addr, "10.0.0.12");
}

#[tokio::test]
async fn test_get_missing_server_is_not_found() {
    let server = MockServer::start().await;
    let client = compute(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/compute/v2.1/servers/{SERVER_ID}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "itemNotFound": {"code": 404, "message": "Instance could not be found."}
        })))
        .mount(&server)
        .await;

    let err = client.get_server(SERVER_ID).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_conflict());
}

#[tokio::test]
async fn test_reauthenticates_once_on_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/auth/tokens"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Subject-Token", TOKEN)
                .set_body_json(token_body(&server.uri(), &["compute"])),
        )
        .expect(2)
        .mount(&server)
        .await;
    let client = scope(&server).await.compute_client().await.unwrap();

    Mock::given(method("GET"))
        .and(path(format!("/compute/v2.1/servers/{SERVER_ID}")))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/compute/v2.1/servers/{SERVER_ID}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"server": server_json(SERVER_ID, "node-0", "az-1")})),
        )
        .mount(&server)
        .await;

    let found = client.get_server(SERVER_ID).await.unwrap();
    assert_eq!(found.server.name, "node-0");
}

#[tokio::test]
async fn test_concurrent_callers_share_one_refresh() {
    let server = MockServer::start().await;
    let mut expiring = token_body(&server.uri(), &["compute"]);
    expiring["token"]["expires_at"] =
        json!((chrono::Utc::now() + chrono::Duration::seconds(30)).to_rfc3339());

    Mock::given(method("POST"))
        .and(path("/v3/auth/tokens"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Subject-Token", "gAAAAABexpiring")
                .set_body_json(expiring),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v3/auth/tokens"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Subject-Token", TOKEN)
                .set_body_json(token_body(&server.uri(), &["compute"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = scope(&server).await.provider;
    let (a, b, c, d) = tokio::join!(
        provider.token(),
        provider.token(),
        provider.token(),
        provider.token()
    );

    for token in [a, b, c, d] {
        assert_eq!(token.unwrap(), TOKEN);
    }
}

#[tokio::test]
async fn test_list_servers_follows_next_links() {
    let server = MockServer::start().await;
    let client = compute(&server).await;
    let next = format!(
        "{}/compute/v2.1/servers/detail?limit=2&marker=b",
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/detail"))
        .and(query_param("marker", "b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "servers": [server_json("c", "node-2", "az-2")]
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/detail"))
        .and(query_param("tags", "capo,worker"))
        .and(query_param("status", "ACTIVE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "servers": [
                server_json("a", "node-0", "az-1"),
                server_json("b", "node-1", "az-1")
            ],
            "servers_links": [{"rel": "next", "href": next}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let opts = ListServersOpts {
        status: Some(ServerStatus::Active),
        tags: vec!["capo".to_string(), "worker".to_string()],
        ..ListServersOpts::default()
    };
    let servers = client.list_servers(&opts).await.unwrap();

    let ids: Vec<&str> = servers.iter().map(|s| s.server.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(servers[2].availability_zone(), "az-2");
}

#[tokio::test]
async fn test_list_servers_stops_on_empty_page() {
    let server = MockServer::start().await;
    let client = compute(&server).await;
    let next = format!("{}/compute/v2.1/servers/detail?marker=z", server.uri());

    Mock::given(method("GET"))
        .and(path("/compute/v2.1/servers/detail"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "servers": [],
            "servers_links": [{"rel": "next", "href": next}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let servers = client
        .list_servers(&ListServersOpts::default())
        .await
        .unwrap();
    assert!(servers.is_empty());
}

#[tokio::test]
async fn test_create_server_body() {
    let server = MockServer::start().await;
    let client = compute(&server).await;

    Mock::given(method("POST"))
        .and(path("/compute/v2.1/servers"))
        .and(body_partial_json(json!({
            "server": {
                "name": "node-0",
                "flavorRef": "f-2",
                "imageRef": "img-1",
                "availability_zone": "az-1",
                "networks": [{"port": PORT_ID}],
                "tags": ["capo"],
                "user_data": "I2Nsb3VkLWNvbmZpZw=="
            }
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "server": {
                "id": SERVER_ID,
                "adminPass": "s3cr3t",
                "OS-DCF:diskConfig": "MANUAL",
                "security_groups": [{"name": "default"}],
                "links": []
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let opts = CreateServerOpts::new("node-0", "f-2")
        .with_image("img-1")
        .with_availability_zone("az-1")
        .with_network(NetworkAttachment::port(PORT_ID))
        .with_tag("capo")
        .with_user_data(b"#cloud-config".to_vec());
    let created = client.create_server(opts).await.unwrap();

    assert_eq!(created.server.id, SERVER_ID);
    assert_eq!(created.server.admin_pass.as_deref(), Some("s3cr3t"));
    assert_eq!(created.server.status, ServerStatus::Unknown);
}

#[tokio::test]
async fn test_create_server_rejects_invalid_opts_before_sending() {
    let server = MockServer::start().await;
    let client = compute(&server).await;

    Mock::given(method("POST"))
        .and(path("/compute/v2.1/servers"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    let err = client
        .create_server(CreateServerOpts::new("node-0", "f-2"))
        .await
        .unwrap_err();
    assert!(matches!(err, OpenStackError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_delete_server() {
    let server = MockServer::start().await;
    let client = compute(&server).await;

    Mock::given(method("DELETE"))
        .and(path(format!("/compute/v2.1/servers/{SERVER_ID}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_server(SERVER_ID).await.unwrap();
}

#[tokio::test]
async fn test_delete_missing_server_is_not_found() {
    let server = MockServer::start().await;
    let client = compute(&server).await;

    Mock::given(method("DELETE"))
        .and(path(format!("/compute/v2.1/servers/{SERVER_ID}")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.delete_server(SERVER_ID).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_server_errors_keep_status_and_message() {
    let server = MockServer::start().await;
    let client = compute(&server).await;

    Mock::given(method("DELETE"))
        .and(path(format!("/compute/v2.1/servers/{SERVER_ID}")))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.delete_server(SERVER_ID).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("boom"));
}

// =============================================================================
// Flavors and availability zones
// =============================================================================

async fn mount_flavors(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/flavors/detail"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flavors": [
                {"id": "f-1", "name": "m1.small", "vcpus": 1, "ram": 2048, "disk": 20},
                {"id": "f-2", "name": "m1.medium", "vcpus": 2, "ram": 4096, "disk": 40},
                {"id": "f-3", "name": "gpu.large", "vcpus": 8, "ram": 65536, "disk": 100},
                {"id": "f-4", "name": "gpu.large", "vcpus": 8, "ram": 65536, "disk": 200}
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_flavor_id_from_name() {
    let server = MockServer::start().await;
    let client = compute(&server).await;
    mount_flavors(&server).await;

    assert_eq!(
        client.get_flavor_id_from_name("m1.medium").await.unwrap(),
        "f-2"
    );

    let err = client.get_flavor_id_from_name("m1.huge").await.unwrap_err();
    assert!(err.is_not_found());

    let err = client.get_flavor_id_from_name("gpu.large").await.unwrap_err();
    assert!(matches!(
        err,
        OpenStackError::MultipleResults { count: 2, .. }
    ));
}

#[tokio::test]
async fn test_flavor_lookup_reads_every_page() {
    let server = MockServer::start().await;
    let client = compute(&server).await;
    let next = format!("{}/compute/v2.1/flavors/detail?marker=f-2", server.uri());

    Mock::given(method("GET"))
        .and(path("/compute/v2.1/flavors/detail"))
        .and(query_param("marker", "f-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flavors": [
                {"id": "f-3", "name": "m1.large", "vcpus": 4, "ram": 8192, "disk": 80},
                {"id": "f-4", "name": "gpu.large", "vcpus": 8, "ram": 65536, "disk": 200}
            ]
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/compute/v2.1/flavors/detail"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flavors": [
                {"id": "f-1", "name": "m1.small", "vcpus": 1, "ram": 2048, "disk": 20},
                {"id": "f-2", "name": "gpu.large", "vcpus": 8, "ram": 65536, "disk": 100}
            ],
            "flavors_links": [{"rel": "next", "href": next}]
        })))
        .mount(&server)
        .await;

    assert_eq!(
        client.get_flavor_id_from_name("m1.large").await.unwrap(),
        "f-3"
    );

    let err = client.get_flavor_id_from_name("gpu.large").await.unwrap_err();
    assert!(matches!(
        err,
        OpenStackError::MultipleResults { count: 2, .. }
    ));
}

#[tokio::test]
async fn test_list_availability_zones() {
    let server = MockServer::start().await;
    let client = compute(&server).await;

    Mock::given(method("GET"))
        .and(path("/compute/v2.1/os-availability-zone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "availabilityZoneInfo": [
                {"zoneName": "az-1", "zoneState": {"available": true}, "hosts": null},
                {"zoneName": "az-2", "zoneState": {"available": false}, "hosts": null}
            ]
        })))
        .mount(&server)
        .await;

    let zones = client.list_availability_zones().await.unwrap();
    assert_eq!(zones.len(), 2);
    assert_eq!(zones[0].zone_name, "az-1");
    assert!(zones[0].zone_state.available);
    assert!(!zones[1].zone_state.available);
}

// =============================================================================
// Attached interfaces
// =============================================================================

#[tokio::test]
async fn test_list_attached_interfaces() {
    let server = MockServer::start().await;
    let client = compute(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/compute/v2.1/servers/{SERVER_ID}/os-interface")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "interfaceAttachments": [{
                "port_id": PORT_ID,
                "net_id": "3cb9bc59-5699-4588-a4b1-b87f96708bc6",
                "mac_addr": "fa:16:3e:4c:2c:30",
                "port_state": "ACTIVE",
                "fixed_ips": [{
                    "subnet_id": "f8a6e8f8-c2ec-497c-9f23-da9616de54ef",
                    "ip_address": "192.168.1.3"
                }]
            }]
        })))
        .mount(&server)
        .await;

    let interfaces = client.list_attached_interfaces(SERVER_ID).await.unwrap();
    assert_eq!(interfaces.len(), 1);
    assert_eq!(interfaces[0].port_id, PORT_ID);
    assert_eq!(interfaces[0].fixed_ips[0].ip_address, "192.168.1.3");
}

#[tokio::test]
async fn test_delete_attached_interface_conflict() {
    let server = MockServer::start().await;
    let client = compute(&server).await;

    Mock::given(method("DELETE"))
        .and(path(format!(
            "/compute/v2.1/servers/{SERVER_ID}/os-interface/{PORT_ID}"
        )))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "conflictingRequest": {
                "code": 409,
                "message": "Cannot 'detach_interface' instance while it is in task_state deleting"
            }
        })))
        .mount(&server)
        .await;

    let err = client
        .delete_attached_interface(SERVER_ID, PORT_ID)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_delete_attached_interface() {
    let server = MockServer::start().await;
    let client = compute(&server).await;

    Mock::given(method("DELETE"))
        .and(path(format!(
            "/compute/v2.1/servers/{SERVER_ID}/os-interface/{PORT_ID}"
        )))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    client
        .delete_attached_interface(SERVER_ID, PORT_ID)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_ids_cannot_escape_the_path() {
    let server = MockServer::start().await;
    let client = compute(&server).await;

    // No request may reach Nova for a rejected ID.
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    for port in ["../../servers", "..", ".", "%2e%2e"] {
        let err = client
            .delete_attached_interface(SERVER_ID, port)
            .await
            .unwrap_err();
        assert!(matches!(err, OpenStackError::InvalidRequest(_)), "{port}");
    }
    for id in ["..", "."] {
        let err = client.delete_server(id).await.unwrap_err();
        assert!(matches!(err, OpenStackError::InvalidRequest(_)), "{id}");
    }
}
