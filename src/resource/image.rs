//! Disk image resources.

use super::{str_field, GceResource, ResourceKind, GOOGLE_PROJECT};
use crate::gce::project::GceProject;
use serde_json::{json, Value};

/// A disk image, owned by a project.
///
/// Images commonly live in the shared public project rather than the caller's
/// own, so the owning project is part of the resource and defaults to
/// [`GOOGLE_PROJECT`].
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Image name.
    pub name: Option<String>,
    /// Project owning the image.
    pub project: String,
    /// Description of the image.
    pub description: Option<String>,
    /// Source of the image, e.g. `RAW`.
    pub source_type: Option<String>,
    /// URL of the kernel to boot with.
    pub preferred_kernel: Option<String>,
    /// Raw disk specification.
    pub raw_disk: Option<Value>,
}

impl Default for Image {
    fn default() -> Self {
        Self {
            name: None,
            project: GOOGLE_PROJECT.to_string(),
            description: None,
            source_type: None,
            preferred_kernel: None,
            raw_disk: None,
        }
    }
}

impl Image {
    /// An image in the shared public project.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// An image owned by a specific project.
    pub fn in_project(name: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            project: project.into(),
            ..Self::default()
        }
    }

    /// Fully-qualified image URL, using the image's owning project.
    pub fn url(&self, project: &GceProject) -> String {
        format!(
            "{}/projects/{}/global/images/{}",
            project.gce_url(),
            self.project,
            self.name.as_deref().unwrap_or_default()
        )
    }
}

impl GceResource for Image {
    const KIND: ResourceKind = ResourceKind::Image;

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn to_json(&self, _project: &GceProject) -> Value {
        let mut image = serde_json::Map::new();
        image.insert("name".to_string(), json!(self.name));
        if let Some(description) = &self.description {
            image.insert("description".to_string(), json!(description));
        }
        if let Some(source_type) = &self.source_type {
            image.insert("sourceType".to_string(), json!(source_type));
        }
        if let Some(preferred_kernel) = &self.preferred_kernel {
            image.insert("preferredKernel".to_string(), json!(preferred_kernel));
        }
        if let Some(raw_disk) = &self.raw_disk {
            image.insert("rawDisk".to_string(), raw_disk.clone());
        }
        Value::Object(image)
    }

    fn from_json(resource: &Value) -> Self {
        Self {
            name: str_field(resource, "name"),
            project: GOOGLE_PROJECT.to_string(),
            description: str_field(resource, "description"),
            source_type: str_field(resource, "sourceType"),
            preferred_kernel: str_field(resource, "preferredKernel"),
            raw_disk: resource.get("rawDisk").cloned(),
        }
    }

    fn set_defaults(&mut self, project: &GceProject) {
        if self.name.is_none() {
            self.name = Some(project.settings.compute.image.clone());
        }
    }
}
