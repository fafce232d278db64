//! Shared fixtures for integration tests.

use futures::future::BoxFuture;
use gce_client::{GceCredentials, GceError, GceProject, Settings, TokenSource};
use std::sync::Arc;

/// Token source returning a fixed token.
pub struct FixedTokenSource;

impl TokenSource for FixedTokenSource {
    fn fetch_token(&self) -> BoxFuture<'_, Result<String, GceError>> {
        Box::pin(async { Ok("test-token".to_string()) })
    }
}

/// Token source that always fails to refresh.
pub struct FailingTokenSource;

impl TokenSource for FailingTokenSource {
    fn fetch_token(&self) -> BoxFuture<'_, Result<String, GceError>> {
        Box::pin(async { Err(GceError::Token) })
    }
}

/// Settings pointing `api_base` at a mock server.
pub fn test_settings(api_base: &str) -> Settings {
    Settings::parse(&format!(
        r#"{{
            "project": "test-project",
            "api_base": "{}",
            "compute": {{
                "api_version": "v1beta14",
                "zone": "us-central1-a",
                "network": "default",
                "machine_type": "n1-standard-1",
                "image": "debian-7-wheezy-v20130926",
                "firewall": {{
                    "sourceRanges": ["0.0.0.0/0"],
                    "allowed": [{{"IPProtocol": "tcp", "ports": ["80"]}}]
                }},
                "access_configs": [{{"name": "External NAT", "type": "ONE_TO_ONE_NAT"}}]
            }}
        }}"#,
        api_base
    ))
    .expect("test settings should parse")
}

/// Project client backed by a mock server and a fixed token.
pub fn test_project(api_base: &str) -> GceProject {
    GceProject::with_settings(
        GceCredentials::from_source(Arc::new(FixedTokenSource)),
        test_settings(api_base),
        None,
        None,
    )
    .expect("test project should build")
}

/// Project client whose credentials always fail to refresh.
pub fn unauthorized_project(api_base: &str) -> GceProject {
    GceProject::with_settings(
        GceCredentials::from_source(Arc::new(FailingTokenSource)),
        test_settings(api_base),
        None,
        None,
    )
    .expect("test project should build")
}
