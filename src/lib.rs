//! Client helpers for Google Compute Engine.
//!
//! This crate wraps the Compute Engine REST API with typed resource models
//! and a project client: construct a [`GceProject`] with credentials and
//! optional project/zone overrides, build or receive resource objects, and
//! dispatch list/insert/delete calls (single or batched). Responses
//! deserialize into resource objects; failures surface as one of two domain
//! error kinds.
//!
//! ```ignore
//! use gce_client::{GceCredentials, GceProject, Instance, ListParams};
//!
//! async fn example() -> Result<(), gce_client::GceError> {
//!     let credentials = GceCredentials::application_default().await?;
//!     let project = GceProject::new(credentials, None, None)?;
//!
//!     let mut instance = Instance::new("demo-1");
//!     project.insert(&mut instance).await?;
//!
//!     let running = project.list_instances(None, ListParams::default()).await?;
//!     println!("{} instances", running.len());
//!     Ok(())
//! }
//! ```

pub mod demo;
pub mod error;
pub mod gce;
pub mod resource;
pub mod settings;

pub use error::GceError;
pub use gce::auth::{GceCredentials, TokenSource};
pub use gce::batch::BatchOutcome;
pub use gce::project::{GceProject, ListParams};
pub use resource::{
    Firewall, GceResource, Image, Instance, MachineType, Network, ResourceKind, Scope, Zone,
};
pub use settings::Settings;
