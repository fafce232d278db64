//! Demo integration helper
//!
//! Convenience layer over [`GceProject`] for demo applications: list resources
//! whose names match a demo prefix, or bulk-delete them, surfacing results as
//! an HTTP-response-shaped value. This is the only layer that terminates error
//! propagation, converting the two domain error kinds into status codes.

use crate::error::GceError;
use crate::gce::project::{GceProject, ListParams};
use crate::resource::GceResource;
use serde_json::{json, Value};
use std::future::Future;

/// Page size cap applied to demo list requests.
pub const MAX_RESULTS: u32 = 100;

/// Framework-neutral HTTP response surface.
///
/// The demo helper writes status, content type, and body here; embedding code
/// copies them onto whatever response type its web framework uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoResponse {
    /// HTTP status code.
    pub status: u16,
    /// Optional status message accompanying an error code.
    pub status_message: Option<String>,
    /// Content type of the body, when one was written.
    pub content_type: Option<String>,
    /// Response body.
    pub body: String,
}

impl Default for DemoResponse {
    fn default() -> Self {
        Self {
            status: 200,
            status_message: None,
            content_type: None,
            body: String::new(),
        }
    }
}

impl DemoResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an error status and message.
    pub fn set_status(&mut self, status: u16, message: impl Into<String>) {
        self.status = status;
        self.status_message = Some(message.into());
    }

    /// Write a JSON body.
    pub fn set_json(&mut self, body: &Value) {
        self.content_type = Some("application/json".to_string());
        self.body = body.to_string();
    }

    /// Write a plain-text body.
    pub fn set_text(&mut self, body: impl Into<String>) {
        self.content_type = Some("text/plain".to_string());
        self.body = body.into();
    }
}

/// List resources whose names start with the demo name.
///
/// Writes a JSON object mapping resource name to status as the response body.
/// `lister` receives the prepared [`ListParams`] and runs the actual project
/// call, so any resource kind's list method can back it.
pub async fn list_demo_resources<R, F, Fut>(
    response: &mut DemoResponse,
    demo_name: &str,
    lister: F,
) where
    R: GceResource,
    F: FnOnce(ListParams) -> Fut,
    Fut: Future<Output = Result<Vec<R>, GceError>>,
{
    let params = ListParams::default()
        .with_filter(format!("name eq ^{}.*", demo_name))
        .with_max_results(MAX_RESULTS);

    let Some(resources) =
        run_gce_request(response, "Error listing resources: ", lister(params)).await
    else {
        return;
    };

    let mut by_name = serde_json::Map::new();
    for resource in &resources {
        if let Some(name) = resource.name() {
            by_name.insert(name.to_string(), json!({ "status": resource.status() }));
        }
    }

    response.set_json(&json!({ "resources": by_name }));
}

/// Delete all resources whose names start with `<demo_name>-`.
///
/// Lists the matching resources first; when any match, issues one bulk delete
/// and writes a plain-text confirmation. Zero matches perform no delete call
/// and produce no output.
pub async fn delete_demo_resources<R, F, Fut>(
    response: &mut DemoResponse,
    project: &GceProject,
    demo_name: &str,
    lister: F,
) where
    R: GceResource,
    F: FnOnce(ListParams) -> Fut,
    Fut: Future<Output = Result<Vec<R>, GceError>>,
{
    let params = ListParams::default()
        .with_filter(format!("name eq ^{}-.*", demo_name))
        .with_max_results(MAX_RESULTS);

    let Some(mut resources) =
        run_gce_request(response, "Error listing resources: ", lister(params)).await
    else {
        return;
    };

    if resources.is_empty() {
        return;
    }

    let deleted = run_gce_request(
        response,
        "Error deleting resources: ",
        project.bulk_delete(&mut resources),
    )
    .await;

    if deleted.is_some() {
        response.set_text("deleting resources");
    }
}

/// Run a project operation, converting domain errors into HTTP statuses.
///
/// A provider-call failure becomes status 500 with `error_message` prepended;
/// a token failure becomes status 401 with a fixed `Unauthorized.` message.
/// Returns the operation result, or `None` when an error was written.
pub async fn run_gce_request<T>(
    response: &mut DemoResponse,
    error_message: &str,
    operation: impl Future<Output = Result<T, GceError>>,
) -> Option<T> {
    match operation.await {
        Ok(result) => Some(result),
        Err(GceError::Token) => {
            response.set_status(401, "Unauthorized.");
            None
        }
        Err(e) => {
            tracing::error!("{}{}", error_message, e);
            response.set_status(500, format!("{}{}", error_message, e));
            None
        }
    }
}
