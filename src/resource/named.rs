//! Name-only resource kinds: machine types, zones, and networks.
//!
//! These kinds are mostly referenced by URL inside other resources' payloads
//! (an instance's `machineType`, a firewall's `network`), so they carry a name
//! and know how to compute their fully-qualified URL within a project.

use super::{short_name, str_field, GceResource, ResourceKind};
use crate::gce::project::GceProject;
use serde_json::{json, Value};

/// A machine type resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineType {
    /// Machine type name, e.g. `n1-standard-1`.
    pub name: Option<String>,
}

impl MachineType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Fully-qualified machine type URL within the project.
    pub fn url(&self, project: &GceProject) -> String {
        format!(
            "{}/projects/{}/global/machineTypes/{}",
            project.gce_url(),
            project.project_id,
            self.name.as_deref().unwrap_or_default()
        )
    }
}

impl GceResource for MachineType {
    const KIND: ResourceKind = ResourceKind::MachineType;

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn to_json(&self, _project: &GceProject) -> Value {
        json!({ "name": self.name })
    }

    fn from_json(resource: &Value) -> Self {
        Self {
            name: str_field(resource, "name"),
        }
    }

    fn set_defaults(&mut self, project: &GceProject) {
        if self.name.is_none() {
            self.name = Some(project.settings.compute.machine_type.clone());
        }
    }
}

/// A zone resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Zone {
    /// Zone name, e.g. `us-central1-a`.
    pub name: Option<String>,
}

impl Zone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Build a zone from a name or fully-qualified URL.
    pub fn from_reference(reference: &str) -> Self {
        Self::new(short_name(reference))
    }

    /// Fully-qualified zone URL within the project.
    pub fn url(&self, project: &GceProject) -> String {
        format!(
            "{}/projects/{}/global/zones/{}",
            project.gce_url(),
            project.project_id,
            self.name.as_deref().unwrap_or_default()
        )
    }
}

impl GceResource for Zone {
    const KIND: ResourceKind = ResourceKind::Zone;

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn to_json(&self, _project: &GceProject) -> Value {
        json!({ "name": self.name })
    }

    fn from_json(resource: &Value) -> Self {
        Self {
            name: str_field(resource, "name"),
        }
    }

    fn set_defaults(&mut self, project: &GceProject) {
        if self.name.is_none() {
            self.name = Some(project.settings.compute.zone.clone());
        }
    }
}

/// A network resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Network {
    /// Network name, e.g. `default`.
    pub name: Option<String>,
}

impl Network {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Fully-qualified network URL within the project.
    pub fn url(&self, project: &GceProject) -> String {
        format!(
            "{}/projects/{}/global/networks/{}",
            project.gce_url(),
            project.project_id,
            self.name.as_deref().unwrap_or_default()
        )
    }
}

impl GceResource for Network {
    const KIND: ResourceKind = ResourceKind::Network;

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn to_json(&self, _project: &GceProject) -> Value {
        json!({ "name": self.name })
    }

    fn from_json(resource: &Value) -> Self {
        Self {
            name: str_field(resource, "name"),
        }
    }

    fn set_defaults(&mut self, project: &GceProject) {
        if self.name.is_none() {
            self.name = Some(project.settings.compute.network.clone());
        }
    }
}
