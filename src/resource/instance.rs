//! VM instance resources.

use super::{array_field, short_name, str_field};
use super::{GceResource, Image, MachineType, Network, ResourceKind, Zone};
use crate::gce::project::GceProject;
use serde_json::{json, Value};

/// A VM instance.
///
/// Composite resource: the zone, image, and machine type are nested resource
/// objects whose URLs are resolved against the project context during
/// serialization and defaulting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Instance {
    /// Instance name.
    pub name: Option<String>,
    /// Zone the instance runs in.
    pub zone: Zone,
    /// Description of the instance.
    pub description: Option<String>,
    /// Instance tags.
    pub tags: Option<Vec<String>>,
    /// Boot image.
    pub image: Image,
    /// Machine type.
    pub machine_type: MachineType,
    /// Network interfaces.
    pub network_interfaces: Option<Vec<Value>>,
    /// Attached disks.
    pub disks: Option<Vec<Value>>,
    /// Metadata key/value items.
    pub metadata: Option<Vec<Value>>,
    /// Service accounts available to the instance.
    pub service_accounts: Option<Vec<Value>>,
    /// Kernel URL, as reported by the provider.
    pub kernel: Option<String>,
    /// Provider-reported status, e.g. `RUNNING`.
    pub status: Option<String>,
    /// Provider-reported status detail.
    pub status_message: Option<String>,
}

impl Instance {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

impl GceResource for Instance {
    const KIND: ResourceKind = ResourceKind::Instance;

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn zone_name(&self) -> Option<&str> {
        self.zone.name.as_deref()
    }

    fn to_json(&self, project: &GceProject) -> Value {
        let mut instance = serde_json::Map::new();
        instance.insert("name".to_string(), json!(self.name));
        instance.insert("image".to_string(), json!(self.image.url(project)));
        instance.insert(
            "machineType".to_string(),
            json!(self.machine_type.url(project)),
        );
        instance.insert(
            "networkInterfaces".to_string(),
            json!(self.network_interfaces),
        );
        if let Some(description) = &self.description {
            instance.insert("description".to_string(), json!(description));
        }
        if let Some(tags) = &self.tags {
            instance.insert("tags".to_string(), json!({ "items": tags }));
        }
        if let Some(disks) = &self.disks {
            instance.insert("disks".to_string(), json!(disks));
        }
        if let Some(metadata) = &self.metadata {
            instance.insert("metadata".to_string(), json!({ "items": metadata }));
        }
        if let Some(service_accounts) = &self.service_accounts {
            instance.insert("serviceAccounts".to_string(), json!(service_accounts));
        }
        Value::Object(instance)
    }

    fn from_json(resource: &Value) -> Self {
        let mut instance = Self {
            name: str_field(resource, "name"),
            ..Self::default()
        };

        // Zone, image, and machine type arrive as fully-qualified URLs but
        // are re-read as bare names.
        if let Some(zone) = str_field(resource, "zone") {
            instance.zone = Zone::new(short_name(&zone));
        }
        if let Some(image) = str_field(resource, "image") {
            instance.image = Image::new(short_name(&image));
        }
        if let Some(machine_type) = str_field(resource, "machineType") {
            instance.machine_type = MachineType::new(short_name(&machine_type));
        }

        instance.network_interfaces = array_field(resource, "networkInterfaces");
        instance.description = str_field(resource, "description");
        instance.tags = resource
            .get("tags")
            .and_then(|tags| tags.get("items"))
            .and_then(Value::as_array)
            .filter(|items| !items.is_empty())
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            });
        instance.kernel = str_field(resource, "kernel");
        instance.status = str_field(resource, "status");
        instance.status_message = str_field(resource, "statusMessage");
        instance.disks = array_field(resource, "disks");
        instance.metadata = resource
            .get("metadata")
            .and_then(|metadata| metadata.get("items"))
            .and_then(Value::as_array)
            .filter(|items| !items.is_empty())
            .cloned();
        instance.service_accounts = array_field(resource, "serviceAccounts");

        instance
    }

    fn set_defaults(&mut self, project: &GceProject) {
        self.zone.set_defaults(project);
        self.image.set_defaults(project);
        self.machine_type.set_defaults(project);

        if self.network_interfaces.is_none() {
            let mut network = Network::default();
            network.set_defaults(project);
            self.network_interfaces = Some(vec![json!({
                "network": network.url(project),
                "accessConfigs": project.settings.compute.access_configs,
            })]);
        }
    }
}
