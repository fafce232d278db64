//! Resource model
//!
//! Typed representations of the Compute Engine resource kinds the client
//! manages, each convertible to and from the provider's JSON form.
//!
//! # Architecture
//!
//! - [`ResourceKind`] - kind/scope lookup table driving request routing
//! - [`GceResource`] - the shared resource surface (JSON mapping, defaulting)
//! - `instance` - VM instances (zonal, composed of zone/image/machine type)
//! - `firewall` - firewall rules
//! - `image` - disk images
//! - `named` - machine types, zones, and networks (name-only, URL-referenced)
//!
//! Resources never hold a back-reference to the owning project; operations
//! that need project context (URLs, defaults) take it as an explicit argument.

mod firewall;
mod image;
mod instance;
mod named;

pub use firewall::Firewall;
pub use image::Image;
pub use instance::Instance;
pub use named::{MachineType, Network, Zone};

use crate::gce::project::GceProject;
use serde_json::Value;

/// Project owning the shared public images.
pub const GOOGLE_PROJECT: &str = "google";

/// Whether a resource kind is addressed within a zone or at project level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Addressed as `projects/{project}/zones/{zone}/...`.
    Zonal,
    /// Addressed at the project level.
    Global,
}

/// The resource kinds this client can manage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Instance,
    Firewall,
    Image,
    MachineType,
    Zone,
    Network,
}

impl ResourceKind {
    /// The provider collection name, as it appears in resource URLs.
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Instance => "instances",
            Self::Firewall => "firewalls",
            Self::Image => "images",
            Self::MachineType => "machineTypes",
            Self::Zone => "zones",
            Self::Network => "networks",
        }
    }

    /// Whether the kind is zonal or global.
    pub const fn scope(self) -> Scope {
        match self {
            Self::Instance => Scope::Zonal,
            Self::Firewall
            | Self::Image
            | Self::MachineType
            | Self::Zone
            | Self::Network => Scope::Global,
        }
    }

    /// Collection route under `projects/{project}`.
    ///
    /// Zonal kinds embed the zone; the `zones` collection itself sits at the
    /// project root rather than under `global/`.
    pub fn route(self, zone_name: &str) -> String {
        match self {
            Self::Instance => format!("zones/{}/{}", zone_name, self.collection()),
            Self::Zone => self.collection().to_string(),
            Self::Firewall | Self::Image | Self::MachineType | Self::Network => {
                format!("global/{}", self.collection())
            }
        }
    }
}

/// A Compute Engine resource belonging to a project.
///
/// `from_json` is tolerant of missing optional keys; the JSON round trip is
/// lossy by design (only fields present in the provider response populate).
/// `set_defaults` fills required-but-unset fields from the project settings
/// and must run before a resource is serialized for insert or delete.
pub trait GceResource {
    /// The kind of this resource.
    const KIND: ResourceKind;

    /// Resource name, if set.
    fn name(&self) -> Option<&str>;

    /// Provider-reported status, for kinds that carry one.
    fn status(&self) -> Option<&str> {
        None
    }

    /// Zone the resource lives in; `None` for global kinds.
    fn zone_name(&self) -> Option<&str> {
        None
    }

    /// Produce the wire-format body, omitting unset optional fields.
    fn to_json(&self, project: &GceProject) -> Value;

    /// Populate fields from a decoded provider response.
    fn from_json(resource: &Value) -> Self
    where
        Self: Sized;

    /// Fill unset fields from the project settings.
    fn set_defaults(&mut self, project: &GceProject);
}

/// Extract the short name from a resource URL.
/// e.g. ".../projects/p/zones/us-central1-a" -> "us-central1-a"
pub(crate) fn short_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Read a string field from a JSON object, if present.
pub(crate) fn str_field(resource: &Value, key: &str) -> Option<String> {
    resource.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Read an array field from a JSON object, if present and non-empty.
pub(crate) fn array_field(resource: &Value, key: &str) -> Option<Vec<Value>> {
    resource
        .get(key)
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .cloned()
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::error::GceError;
    use crate::gce::auth::{GceCredentials, TokenSource};
    use crate::gce::project::GceProject;
    use crate::settings::Settings;
    use futures::future::BoxFuture;
    use std::sync::Arc;

    pub struct FixedTokenSource;

    impl TokenSource for FixedTokenSource {
        fn fetch_token(&self) -> BoxFuture<'_, Result<String, GceError>> {
            Box::pin(async { Ok("test-token".to_string()) })
        }
    }

    pub fn test_settings() -> Settings {
        Settings::parse(
            r#"{
                "project": "test-project",
                "compute": {
                    "api_version": "v1beta14",
                    "zone": "us-central1-a",
                    "network": "default",
                    "machine_type": "n1-standard-1",
                    "image": "debian-7-wheezy-v20130926",
                    "firewall": {
                        "sourceRanges": ["10.0.0.0/8"],
                        "allowed": [{"IPProtocol": "tcp", "ports": ["80"]}]
                    },
                    "access_configs": [{"name": "External NAT", "type": "ONE_TO_ONE_NAT"}]
                }
            }"#,
        )
        .expect("test settings should parse")
    }

    pub fn test_project() -> GceProject {
        GceProject::with_settings(
            GceCredentials::from_source(Arc::new(FixedTokenSource)),
            test_settings(),
            None,
            None,
        )
        .expect("test project should build")
    }
}
