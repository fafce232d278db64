//! Project client
//!
//! [`GceProject`] owns the credentials, the loaded settings, and the resolved
//! project/zone context, and translates resource-object operations into
//! Compute Engine API calls: paginated lists, single inserts and deletes, and
//! batched bulk variants.

use crate::error::GceError;
use crate::gce::auth::GceCredentials;
use crate::gce::batch::{self, BatchOutcome, BatchPart};
use crate::gce::http::GceHttpClient;
use crate::resource::{
    Firewall, GceResource, Image, Instance, MachineType, Network, ResourceKind, Scope, Zone,
};
use crate::settings::Settings;
use reqwest::Method;
use serde_json::Value;
use url::Url;

/// Optional parameters for list calls.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    /// Provider filter expression, e.g. `name eq ^demo.*`.
    pub filter: Option<String>,
    /// Page size cap per request.
    pub max_results: Option<u32>,
}

impl ListParams {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(filter) = &self.filter {
            query.push(("filter".to_string(), filter.clone()));
        }
        if let Some(max_results) = self.max_results {
            query.push(("maxResults".to_string(), max_results.to_string()));
        }
        query
    }
}

/// Client for one Compute Engine project.
///
/// Immutable after construction; resource objects are passed to each
/// operation rather than attached to the client.
#[derive(Clone)]
pub struct GceProject {
    /// Credentials used to authorize every request.
    pub credentials: GceCredentials,
    /// Loaded settings document.
    pub settings: Settings,
    /// Project id resolved from arguments or settings.
    pub project_id: String,
    /// Default zone for zonal resources.
    pub zone_name: String,
    http: GceHttpClient,
    gce_url: String,
}

impl GceProject {
    /// Create a client, loading settings from the default location.
    ///
    /// `project_id` and `zone_name` fall back to the settings values when not
    /// supplied.
    pub fn new(
        credentials: GceCredentials,
        project_id: Option<String>,
        zone_name: Option<String>,
    ) -> Result<Self, GceError> {
        let settings = Settings::load_default()?;
        Self::with_settings(credentials, settings, project_id, zone_name)
    }

    /// Create a client from an already-loaded settings document.
    pub fn with_settings(
        credentials: GceCredentials,
        settings: Settings,
        project_id: Option<String>,
        zone_name: Option<String>,
    ) -> Result<Self, GceError> {
        let gce_url = format!(
            "{}/{}",
            settings.api_base.trim_end_matches('/'),
            settings.compute.api_version
        );
        let project_id = project_id.unwrap_or_else(|| settings.project.clone());
        let zone_name = zone_name.unwrap_or_else(|| settings.compute.zone.clone());
        let http = GceHttpClient::new()?;

        Ok(Self {
            credentials,
            settings,
            project_id,
            zone_name,
            http,
            gce_url,
        })
    }

    /// Base URL of the versioned API endpoint.
    pub fn gce_url(&self) -> &str {
        &self.gce_url
    }

    /// List all resources of kind `R`, following pagination to exhaustion.
    ///
    /// For zonal kinds the zone defaults to the client's configured zone when
    /// not supplied.
    pub async fn list<R: GceResource>(
        &self,
        zone_name: Option<&str>,
        params: ListParams,
    ) -> Result<Vec<R>, GceError> {
        let url = self.collection_url(R::KIND, zone_name);
        let mut resources = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = params.to_query();
            if let Some(token) = &page_token {
                query.push(("pageToken".to_string(), token.clone()));
            }

            let token = self.credentials.access_token().await?;
            let results = self.http.get(&url, &query, &token).await?;

            if let Some(items) = results.get("items").and_then(Value::as_array) {
                for item in items {
                    resources.push(R::from_json(item));
                }
            }

            match results.get("nextPageToken").and_then(Value::as_str) {
                Some(next) => page_token = Some(next.to_string()),
                None => break,
            }
        }

        Ok(resources)
    }

    /// List instances, optionally in a specific zone.
    pub async fn list_instances(
        &self,
        zone_name: Option<&str>,
        params: ListParams,
    ) -> Result<Vec<Instance>, GceError> {
        self.list(zone_name, params).await
    }

    /// List firewalls.
    pub async fn list_firewalls(&self, params: ListParams) -> Result<Vec<Firewall>, GceError> {
        self.list(None, params).await
    }

    /// List images.
    pub async fn list_images(&self, params: ListParams) -> Result<Vec<Image>, GceError> {
        self.list(None, params).await
    }

    /// List machine types.
    pub async fn list_machine_types(
        &self,
        params: ListParams,
    ) -> Result<Vec<MachineType>, GceError> {
        self.list(None, params).await
    }

    /// List zones.
    pub async fn list_zones(&self, params: ListParams) -> Result<Vec<Zone>, GceError> {
        self.list(None, params).await
    }

    /// List networks.
    pub async fn list_networks(&self, params: ListParams) -> Result<Vec<Network>, GceError> {
        self.list(None, params).await
    }

    /// Insert a resource, defaulting unset fields first.
    ///
    /// Returns the provider operation.
    pub async fn insert<R: GceResource>(&self, resource: &mut R) -> Result<Value, GceError> {
        resource.set_defaults(self);
        let url = self.collection_url(R::KIND, resource.zone_name());
        let body = resource.to_json(self);
        let token = self.credentials.access_token().await?;
        self.http.post(&url, &token, Some(&body)).await
    }

    /// Delete a resource by name, defaulting unset fields first.
    pub async fn delete<R: GceResource>(&self, resource: &mut R) -> Result<Value, GceError> {
        resource.set_defaults(self);
        let url = self.resource_url(resource)?;
        let token = self.credentials.access_token().await?;
        self.http.delete(&url, &token).await
    }

    /// Insert multiple resources with one batched request.
    ///
    /// Per-item failures are logged and reported in the outcome sequence, not
    /// raised; only a failure of the batch call itself is an error.
    pub async fn bulk_insert<R: GceResource>(
        &self,
        resources: &mut [R],
    ) -> Result<Vec<BatchOutcome>, GceError> {
        let mut parts = Vec::with_capacity(resources.len());
        for (index, resource) in resources.iter_mut().enumerate() {
            resource.set_defaults(self);
            parts.push(BatchPart {
                id: format!("item{}", index + 1),
                method: Method::POST,
                url: self.collection_url(R::KIND, resource.zone_name()),
                body: Some(resource.to_json(self)),
            });
        }
        self.run_batch(parts).await
    }

    /// Delete multiple resources with one batched request.
    ///
    /// Same failure semantics as [`GceProject::bulk_insert`].
    pub async fn bulk_delete<R: GceResource>(
        &self,
        resources: &mut [R],
    ) -> Result<Vec<BatchOutcome>, GceError> {
        let mut parts = Vec::with_capacity(resources.len());
        for (index, resource) in resources.iter_mut().enumerate() {
            resource.set_defaults(self);
            parts.push(BatchPart {
                id: format!("item{}", index + 1),
                method: Method::DELETE,
                url: self.resource_url(resource)?,
                body: None,
            });
        }
        self.run_batch(parts).await
    }

    /// Collection URL for a kind, embedding the zone for zonal kinds.
    fn collection_url(&self, kind: ResourceKind, zone_name: Option<&str>) -> String {
        let zone = match kind.scope() {
            Scope::Zonal => zone_name.unwrap_or(&self.zone_name),
            Scope::Global => "",
        };
        format!(
            "{}/projects/{}/{}",
            self.gce_url,
            self.project_id,
            kind.route(zone)
        )
    }

    /// URL of one named resource, used for deletes.
    fn resource_url<R: GceResource>(&self, resource: &R) -> Result<String, GceError> {
        let name = resource.name().ok_or_else(|| GceError::Api {
            message: format!(
                "cannot address an unnamed {} resource",
                R::KIND.collection()
            ),
        })?;
        Ok(format!(
            "{}/{}",
            self.collection_url(R::KIND, resource.zone_name()),
            name
        ))
    }

    /// Batch endpoint derived from the API base.
    fn batch_url(&self) -> Result<String, GceError> {
        let mut url = Url::parse(&self.gce_url).map_err(|e| GceError::Api {
            message: format!("invalid API base URL {}: {}", self.gce_url, e),
        })?;
        url.set_path("/batch");
        url.set_query(None);
        Ok(url.to_string())
    }

    async fn run_batch(&self, parts: Vec<BatchPart>) -> Result<Vec<BatchOutcome>, GceError> {
        let payload = batch::encode(&parts)?;
        let url = self.batch_url()?;
        let token = self.credentials.access_token().await?;

        let (content_type, body) = self
            .http
            .send_batch(&url, &token, &batch::content_type(), payload)
            .await?;
        let outcomes = batch::decode(&content_type, &body)?;

        for outcome in &outcomes {
            if let Err(e) = &outcome.result {
                tracing::error!("batch item {} failed: {}", outcome.request_id, e);
            }
        }

        Ok(outcomes)
    }
}
