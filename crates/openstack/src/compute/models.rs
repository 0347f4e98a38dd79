//! Nova (compute v2.1) request and response models.
//!
//! Shapes follow microversion 2.53: server tags are present and the
//! embedded flavor carries `original_name` instead of an ID.

use std::collections::{BTreeMap, HashMap};

use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{OpenStackError, Result};

/// Nova limit on tags per server.
const MAX_SERVER_TAGS: usize = 50;

/// Nova limit on tag length.
const MAX_TAG_LEN: usize = 60;

// ============================================================================
// Common types
// ============================================================================

/// Hypermedia link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
}

/// URL of the `next` link, if any.
fn next_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel == "next")
        .map(|l| l.href.clone())
}

/// A paginated list response.
pub(crate) trait Page: serde::de::DeserializeOwned + Send {
    type Item: Send;

    /// Split the page into its items and the next page URL.
    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

// ============================================================================
// Server types
// ============================================================================

/// Nova server status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerStatus {
    Active,
    Build,
    Deleted,
    Error,
    HardReboot,
    Migrating,
    Password,
    Paused,
    Reboot,
    Rebuild,
    Rescue,
    Resize,
    RevertResize,
    Shelved,
    ShelvedOffloaded,
    Shutoff,
    SoftDeleted,
    Suspended,
    VerifyResize,
    /// Unknown status.
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Build => "BUILD",
            Self::Deleted => "DELETED",
            Self::Error => "ERROR",
            Self::HardReboot => "HARD_REBOOT",
            Self::Migrating => "MIGRATING",
            Self::Password => "PASSWORD",
            Self::Paused => "PAUSED",
            Self::Reboot => "REBOOT",
            Self::Rebuild => "REBUILD",
            Self::Rescue => "RESCUE",
            Self::Resize => "RESIZE",
            Self::RevertResize => "REVERT_RESIZE",
            Self::Shelved => "SHELVED",
            Self::ShelvedOffloaded => "SHELVED_OFFLOADED",
            Self::Shutoff => "SHUTOFF",
            Self::SoftDeleted => "SOFT_DELETED",
            Self::Suspended => "SUSPENDED",
            Self::VerifyResize => "VERIFY_RESIZE",
            Self::Unknown => "UNKNOWN",
        };
        f.pad(s)
    }
}

/// Image a server was booted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Flavor embedded in a server (microversion 2.47+).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerFlavor {
    /// Flavor ID (only before 2.47).
    pub id: Option<String>,
    /// Name of the flavor the server was created with.
    pub original_name: Option<String>,
    pub vcpus: Option<u32>,
    /// RAM in MiB.
    pub ram: Option<u64>,
    /// Root disk in GiB.
    pub disk: Option<u64>,
    pub ephemeral: Option<u64>,
    pub swap: Option<u64>,
    pub extra_specs: BTreeMap<String, String>,
}

/// One address of a server on a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAddress {
    pub addr: String,
    pub version: u8,
    /// "fixed" or "floating".
    #[serde(rename = "OS-EXT-IPS:type", default)]
    pub ip_type: Option<String>,
    #[serde(rename = "OS-EXT-IPS-MAC:mac_addr", default)]
    pub mac_addr: Option<String>,
}

/// Security group reference on a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupRef {
    pub name: String,
}

/// Volume attached to a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedVolume {
    pub id: String,
    #[serde(default)]
    pub delete_on_termination: bool,
}

/// Fault recorded on a server in ERROR state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerFault {
    pub code: u16,
    pub message: String,
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub details: Option<String>,
}

/// Base Nova server representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    pub id: String,
    pub name: String,
    pub status: ServerStatus,
    pub tenant_id: String,
    pub user_id: String,
    #[serde(rename = "hostId")]
    pub host_id: String,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    #[serde(rename = "accessIPv4")]
    pub access_ipv4: String,
    #[serde(rename = "accessIPv6")]
    pub access_ipv6: String,
    /// Addresses keyed by network name.
    pub addresses: BTreeMap<String, Vec<ServerAddress>>,
    /// `None` when the server boots from a volume.
    #[serde(deserialize_with = "image_or_empty")]
    pub image: Option<ImageRef>,
    pub flavor: ServerFlavor,
    pub metadata: BTreeMap<String, String>,
    pub key_name: Option<String>,
    pub security_groups: Vec<SecurityGroupRef>,
    #[serde(rename = "os-extended-volumes:volumes_attached")]
    pub attached_volumes: Vec<AttachedVolume>,
    pub tags: Vec<String>,
    pub fault: Option<ServerFault>,
    pub links: Vec<Link>,
    /// Only present in the create response.
    #[serde(rename = "adminPass", skip_serializing_if = "Option::is_none")]
    pub admin_pass: Option<String>,
}

/// Nova returns `"image": ""` for boot-from-volume servers.
fn image_or_empty<'de, D>(deserializer: D) -> std::result::Result<Option<ImageRef>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(image @ serde_json::Value::Object(_)) => serde_json::from_value(image)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Availability-zone extension of a server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAvailabilityZoneExt {
    #[serde(rename = "OS-EXT-AZ:availability_zone", default)]
    pub availability_zone: String,
}

/// Server together with its availability zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerExt {
    #[serde(flatten)]
    pub server: Server,
    #[serde(flatten)]
    pub az: ServerAvailabilityZoneExt,
}

impl ServerExt {
    /// Availability zone the server landed in; empty until scheduled.
    #[must_use]
    pub fn availability_zone(&self) -> &str {
        &self.az.availability_zone
    }
}

/// `GET /servers/{id}` and `POST /servers` response.
#[derive(Debug, Deserialize)]
pub struct ServerResponse {
    pub server: ServerExt,
}

/// `GET /servers/detail` response page.
#[derive(Debug, Deserialize)]
pub struct ServerListResponse {
    #[serde(default)]
    pub servers: Vec<ServerExt>,
    #[serde(default)]
    pub servers_links: Vec<Link>,
}

impl Page for ServerListResponse {
    type Item = ServerExt;

    fn into_parts(self) -> (Vec<ServerExt>, Option<String>) {
        let next = next_link(&self.servers_links);
        (self.servers, next)
    }
}

// ============================================================================
// Create server
// ============================================================================

/// A network to attach at boot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkAttachment {
    /// Network ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Pre-created port ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    /// Fixed IP to request on the network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_ip: Option<String>,
    /// Device tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl NetworkAttachment {
    /// Attach a pre-created port.
    #[must_use]
    pub fn port(port_id: impl Into<String>) -> Self {
        Self {
            port: Some(port_id.into()),
            ..Self::default()
        }
    }

    /// Attach to a network by ID.
    #[must_use]
    pub fn network(network_id: impl Into<String>) -> Self {
        Self {
            uuid: Some(network_id.into()),
            ..Self::default()
        }
    }
}

/// Networks for a new server. Required since microversion 2.37.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Networks {
    /// Let Nova allocate a network for the project.
    #[default]
    Auto,
    /// No networking.
    None,
    /// Explicit attachments.
    List(Vec<NetworkAttachment>),
}

impl Serialize for Networks {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Auto => serializer.serialize_str("auto"),
            Self::None => serializer.serialize_str("none"),
            Self::List(list) => list.serialize(serializer),
        }
    }
}

/// Block device source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Blank,
    Image,
    Snapshot,
    Volume,
}

/// Block device destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationType {
    Local,
    Volume,
}

/// Block device mapping (`block_device_mapping_v2`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockDevice {
    pub source_type: SourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_type: Option<DestinationType>,
    /// Source ID (image, volume or snapshot).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Boot order; 0 is the root disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot_index: Option<i32>,
    /// Size in GiB for new volumes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_type: Option<String>,
    pub delete_on_termination: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl BlockDevice {
    /// Root volume created from an image.
    #[must_use]
    pub fn root_volume_from_image(image_id: impl Into<String>, size_gib: u32) -> Self {
        Self {
            source_type: SourceType::Image,
            destination_type: Some(DestinationType::Volume),
            uuid: Some(image_id.into()),
            boot_index: Some(0),
            volume_size: Some(size_gib),
            volume_type: None,
            delete_on_termination: true,
            tag: None,
        }
    }
}

/// Scheduler hints (`os:scheduler_hints`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchedulerHints {
    /// Server group ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub different_host: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub same_host: Vec<String>,
    /// Hints not modelled above.
    #[serde(flatten)]
    pub additional: BTreeMap<String, serde_json::Value>,
}

/// Options for creating a server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateServerOpts {
    pub name: String,
    pub flavor_ref: String,
    /// Image ID; omit when booting from a volume.
    pub image_ref: Option<String>,
    pub availability_zone: Option<String>,
    pub networks: Networks,
    pub metadata: BTreeMap<String, String>,
    /// Raw user data; base64-encoded on the wire.
    pub user_data: Option<Vec<u8>>,
    pub key_name: Option<String>,
    pub security_groups: Vec<String>,
    pub config_drive: Option<bool>,
    pub tags: Vec<String>,
    pub block_devices: Vec<BlockDevice>,
    pub scheduler_hints: Option<SchedulerHints>,
}

impl CreateServerOpts {
    /// Options for a server with the given name and flavor ID.
    #[must_use]
    pub fn new(name: impl Into<String>, flavor_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flavor_ref: flavor_ref.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    #[must_use]
    pub fn with_availability_zone(mut self, zone: impl Into<String>) -> Self {
        self.availability_zone = Some(zone.into());
        self
    }

    #[must_use]
    pub fn with_networks(mut self, networks: Networks) -> Self {
        self.networks = networks;
        self
    }

    /// Append an explicit network attachment.
    #[must_use]
    pub fn with_network(mut self, attachment: NetworkAttachment) -> Self {
        match &mut self.networks {
            Networks::List(list) => list.push(attachment),
            other => *other = Networks::List(vec![attachment]),
        }
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_user_data(mut self, user_data: impl Into<Vec<u8>>) -> Self {
        self.user_data = Some(user_data.into());
        self
    }

    #[must_use]
    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = Some(key_name.into());
        self
    }

    #[must_use]
    pub fn with_security_group(mut self, name: impl Into<String>) -> Self {
        self.security_groups.push(name.into());
        self
    }

    #[must_use]
    pub fn with_config_drive(mut self, enabled: bool) -> Self {
        self.config_drive = Some(enabled);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn with_block_device(mut self, device: BlockDevice) -> Self {
        self.block_devices.push(device);
        self
    }

    #[must_use]
    pub fn with_scheduler_hints(mut self, hints: SchedulerHints) -> Self {
        self.scheduler_hints = Some(hints);
        self
    }

    /// Check the options against Nova's constraints.
    ///
    /// # Errors
    /// Returns [`OpenStackError::InvalidRequest`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(OpenStackError::InvalidRequest(
                "server name is required".to_string(),
            ));
        }
        if self.flavor_ref.trim().is_empty() {
            return Err(OpenStackError::InvalidRequest(
                "flavor is required".to_string(),
            ));
        }

        let boots_from_volume = self.block_devices.iter().any(|d| d.boot_index == Some(0));
        if self.image_ref.as_deref().is_none_or(str::is_empty) && !boots_from_volume {
            return Err(OpenStackError::InvalidRequest(
                "image is required unless a block device has boot_index 0".to_string(),
            ));
        }

        if self.tags.len() > MAX_SERVER_TAGS {
            return Err(OpenStackError::InvalidRequest(format!(
                "{} tags exceed the limit of {MAX_SERVER_TAGS}",
                self.tags.len()
            )));
        }
        if let Some(tag) = self
            .tags
            .iter()
            .find(|t| t.is_empty() || t.len() > MAX_TAG_LEN || t.contains(['/', ',']))
        {
            return Err(OpenStackError::InvalidRequest(format!(
                "invalid tag {tag:?}: must be 1-{MAX_TAG_LEN} characters without '/' or ','"
            )));
        }

        Ok(())
    }

    /// Validate and build the wire body.
    pub(crate) fn to_request(&self) -> Result<CreateServerRequest> {
        self.validate()?;

        let user_data = self
            .user_data
            .as_ref()
            .map(|data| base64::engine::general_purpose::STANDARD.encode(data));

        Ok(CreateServerRequest {
            server: ServerDefinition {
                name: self.name.clone(),
                flavor_ref: self.flavor_ref.clone(),
                image_ref: self.image_ref.clone().filter(|i| !i.is_empty()),
                availability_zone: self.availability_zone.clone(),
                networks: self.networks.clone(),
                metadata: self.metadata.clone(),
                user_data,
                key_name: self.key_name.clone(),
                security_groups: self
                    .security_groups
                    .iter()
                    .map(|name| SecurityGroupRef { name: name.clone() })
                    .collect(),
                config_drive: self.config_drive,
                tags: self.tags.clone(),
                block_device_mapping_v2: self.block_devices.clone(),
            },
            scheduler_hints: self.scheduler_hints.clone(),
        })
    }
}

/// `POST /servers` body.
#[derive(Debug, Serialize)]
pub struct CreateServerRequest {
    pub server: ServerDefinition,
    #[serde(rename = "os:scheduler_hints", skip_serializing_if = "Option::is_none")]
    pub scheduler_hints: Option<SchedulerHints>,
}

/// Server definition for creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDefinition {
    pub name: String,
    pub flavor_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(rename = "availability_zone", skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    pub networks: Networks,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    #[serde(rename = "user_data", skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    #[serde(rename = "key_name", skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    #[serde(rename = "security_groups", skip_serializing_if = "Vec::is_empty")]
    pub security_groups: Vec<SecurityGroupRef>,
    #[serde(rename = "config_drive", skip_serializing_if = "Option::is_none")]
    pub config_drive: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "block_device_mapping_v2", skip_serializing_if = "Vec::is_empty")]
    pub block_device_mapping_v2: Vec<BlockDevice>,
}

// ============================================================================
// List servers
// ============================================================================

/// Comma-join a tag list for the query string.
fn join_tags<S: Serializer>(tags: &[String], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&tags.join(","))
}

/// Query filters for `GET /servers/detail`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListServersOpts {
    /// Regular expression matched against server names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ServerStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(rename = "changes-since", skip_serializing_if = "Option::is_none")]
    pub changes_since: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub all_tenants: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Servers carrying all of these tags.
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "join_tags")]
    pub tags: Vec<String>,
    /// Servers carrying any of these tags.
    #[serde(
        rename = "tags-any",
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "join_tags"
    )]
    pub tags_any: Vec<String>,
    /// Servers missing at least one of these tags.
    #[serde(
        rename = "not-tags",
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "join_tags"
    )]
    pub not_tags: Vec<String>,
    /// Servers carrying none of these tags.
    #[serde(
        rename = "not-tags-any",
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "join_tags"
    )]
    pub not_tags_any: Vec<String>,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Start after this server ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

// ============================================================================
// Availability zones
// ============================================================================

/// Availability zone state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneState {
    pub available: bool,
}

/// State of a compute service on a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceState {
    pub available: bool,
    pub active: bool,
    pub updated_at: Option<String>,
}

/// A compute availability zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityZone {
    pub zone_name: String,
    pub zone_state: ZoneState,
    /// Host → service → state; only returned to admins.
    #[serde(default)]
    pub hosts: Option<HashMap<String, HashMap<String, ServiceState>>>,
}

/// `GET /os-availability-zone` response.
#[derive(Debug, Deserialize)]
pub struct AvailabilityZoneListResponse {
    #[serde(rename = "availabilityZoneInfo", default)]
    pub availability_zone_info: Vec<AvailabilityZone>,
}

// ============================================================================
// Flavors
// ============================================================================

/// A flavor as listed by `GET /flavors/detail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flavor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub vcpus: u32,
    /// RAM in MiB.
    #[serde(default)]
    pub ram: u64,
    /// Root disk in GiB.
    #[serde(default)]
    pub disk: u64,
    #[serde(rename = "os-flavor-access:is_public", default)]
    pub is_public: Option<bool>,
}

/// `GET /flavors/detail` response page.
#[derive(Debug, Deserialize)]
pub struct FlavorListResponse {
    #[serde(default)]
    pub flavors: Vec<Flavor>,
    #[serde(default)]
    pub flavors_links: Vec<Link>,
}

impl Page for FlavorListResponse {
    type Item = Flavor;

    fn into_parts(self) -> (Vec<Flavor>, Option<String>) {
        let next = next_link(&self.flavors_links);
        (self.flavors, next)
    }
}

// ============================================================================
// Attached interfaces
// ============================================================================

/// Fixed IP on an attached interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedIp {
    pub subnet_id: String,
    pub ip_address: String,
}

/// A network interface attached to a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedInterface {
    pub port_id: String,
    pub net_id: String,
    pub mac_addr: String,
    pub port_state: String,
    #[serde(default)]
    pub fixed_ips: Vec<FixedIp>,
}

/// `GET /servers/{id}/os-interface` response.
#[derive(Debug, Deserialize)]
pub struct InterfaceListResponse {
    #[serde(rename = "interfaceAttachments", default)]
    pub interface_attachments: Vec<AttachedInterface>,
}
