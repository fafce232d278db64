//! Firewall rule resources.

use super::{array_field, str_field, GceResource, Network, ResourceKind};
use crate::gce::project::GceProject;
use serde_json::{json, Value};

/// A firewall rule attached to a network.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Firewall {
    /// Firewall name.
    pub name: Option<String>,
    /// Description of the rule.
    pub description: Option<String>,
    /// Network the rule applies to.
    pub network: Network,
    /// IP ranges traffic is accepted from.
    pub source_ranges: Option<Vec<String>>,
    /// Instance tag names traffic is accepted from.
    pub source_tags: Option<Vec<String>>,
    /// Tags selecting the instances the rule applies to.
    pub target_tags: Option<Vec<String>>,
    /// Allowed IP protocols and open ports.
    pub allowed: Option<Vec<Value>>,
}

impl Firewall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

impl GceResource for Firewall {
    const KIND: ResourceKind = ResourceKind::Firewall;

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn to_json(&self, project: &GceProject) -> Value {
        let mut firewall = serde_json::Map::new();
        firewall.insert("name".to_string(), json!(self.name));
        firewall.insert("network".to_string(), json!(self.network.url(project)));
        firewall.insert("allowed".to_string(), json!(self.allowed));
        if let Some(source_ranges) = &self.source_ranges {
            firewall.insert("sourceRanges".to_string(), json!(source_ranges));
        }
        if let Some(source_tags) = &self.source_tags {
            firewall.insert("sourceTags".to_string(), json!(source_tags));
        }
        if let Some(target_tags) = &self.target_tags {
            firewall.insert("targetTags".to_string(), json!(target_tags));
        }
        Value::Object(firewall)
    }

    fn from_json(resource: &Value) -> Self {
        let network = str_field(resource, "network")
            .map(|reference| Network::new(super::short_name(&reference)))
            .unwrap_or_default();

        Self {
            name: str_field(resource, "name"),
            description: str_field(resource, "description"),
            network,
            source_ranges: string_array(resource, "sourceRanges"),
            source_tags: string_array(resource, "sourceTags"),
            target_tags: string_array(resource, "targetTags"),
            allowed: array_field(resource, "allowed"),
        }
    }

    fn set_defaults(&mut self, project: &GceProject) {
        self.network.set_defaults(project);

        // Only default the ranges when neither source restriction was given.
        if self.source_ranges.is_none() && self.source_tags.is_none() {
            self.source_ranges = Some(project.settings.compute.firewall.source_ranges.clone());
        }

        if self.allowed.is_none() {
            self.allowed = Some(project.settings.compute.firewall.allowed.clone());
        }
    }
}

fn string_array(resource: &Value, key: &str) -> Option<Vec<String>> {
    array_field(resource, key).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::testutil::test_project;

    #[test]
    fn test_to_json_omits_unset_optionals() {
        let project = test_project();
        let mut firewall = Firewall::new("allow-http");
        firewall.network = Network::new("default");
        firewall.allowed = Some(vec![json!({"IPProtocol": "tcp", "ports": ["80"]})]);

        let body = firewall.to_json(&project);
        assert_eq!(body["name"], json!("allow-http"));
        assert!(body["network"]
            .as_str()
            .unwrap()
            .ends_with("/projects/test-project/global/networks/default"));
        assert!(body.get("sourceRanges").is_none());
        assert!(body.get("targetTags").is_none());
    }

    #[test]
    fn test_round_trip_keeps_target_tags() {
        let project = test_project();
        let mut firewall = Firewall::new("allow-http");
        firewall.network = Network::new("default");
        firewall.source_tags = Some(vec!["frontend".to_string()]);
        firewall.target_tags = Some(vec!["backend".to_string()]);
        firewall.allowed = Some(vec![json!({"IPProtocol": "tcp", "ports": ["80"]})]);

        let restored = Firewall::from_json(&firewall.to_json(&project));
        assert_eq!(restored.name, firewall.name);
        assert_eq!(restored.network.name.as_deref(), Some("default"));
        assert_eq!(restored.source_tags, firewall.source_tags);
        assert_eq!(restored.target_tags, firewall.target_tags);
        assert_eq!(restored.allowed, firewall.allowed);
    }

    #[test]
    fn test_set_defaults_fills_rule_set() {
        let project = test_project();
        let mut firewall = Firewall::new("allow-http");

        firewall.set_defaults(&project);
        assert_eq!(firewall.network.name.as_deref(), Some("default"));
        assert_eq!(
            firewall.source_ranges,
            Some(vec!["10.0.0.0/8".to_string()])
        );
        assert_eq!(firewall.allowed.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_set_defaults_respects_source_tags() {
        let project = test_project();
        let mut firewall = Firewall::new("allow-internal");
        firewall.source_tags = Some(vec!["frontend".to_string()]);

        firewall.set_defaults(&project);
        // A caller-chosen source restriction suppresses the default ranges.
        assert_eq!(firewall.source_ranges, None);
    }
}
