//! Multipart encoding and decoding for batched requests
//!
//! A batch bundles multiple independent sub-requests into one transport call
//! against the API's batch endpoint. Each sub-request is an `application/http`
//! part carrying its own request line and optional JSON body; the response
//! mirrors that shape, one embedded HTTP response per part. Per-item outcomes
//! are collected rather than raised, so one failed item never aborts the rest.

use crate::error::GceError;
use reqwest::Method;
use serde_json::Value;
use url::Url;

/// Multipart boundary used for outgoing batch payloads.
pub const BOUNDARY: &str = "batch_gce_client";

/// One sub-request inside a batch.
#[derive(Debug, Clone)]
pub struct BatchPart {
    /// Content-ID of the part, echoed back in the response.
    pub id: String,
    /// HTTP method of the sub-request.
    pub method: Method,
    /// Fully-qualified URL; only its path and query go on the request line.
    pub url: String,
    /// Optional JSON body (inserts carry one, deletes do not).
    pub body: Option<Value>,
}

/// Outcome of one sub-request inside a batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Content-ID the outcome belongs to, with any `response-` prefix stripped.
    pub request_id: String,
    /// Parsed response body, or the per-item failure.
    pub result: Result<Value, GceError>,
}

/// Content-Type header value for an outgoing batch payload.
pub fn content_type() -> String {
    format!("multipart/mixed; boundary={}", BOUNDARY)
}

/// Serialize sub-requests into a multipart/mixed payload.
pub fn encode(parts: &[BatchPart]) -> Result<String, GceError> {
    let mut payload = String::new();

    for part in parts {
        let url = Url::parse(&part.url).map_err(|e| GceError::Api {
            message: format!("invalid batch request URL {}: {}", part.url, e),
        })?;
        let mut target = url.path().to_string();
        if let Some(query) = url.query() {
            target.push('?');
            target.push_str(query);
        }

        payload.push_str(&format!("--{}\r\n", BOUNDARY));
        payload.push_str("Content-Type: application/http\r\n");
        payload.push_str(&format!("Content-ID: <{}>\r\n\r\n", part.id));
        payload.push_str(&format!("{} {} HTTP/1.1\r\n", part.method, target));

        if let Some(body) = &part.body {
            let body = serde_json::to_string(body).map_err(|e| GceError::Api {
                message: format!("failed to serialize batch request body: {}", e),
            })?;
            payload.push_str("Content-Type: application/json\r\n");
            payload.push_str(&format!("Content-Length: {}\r\n\r\n", body.len()));
            payload.push_str(&body);
            payload.push_str("\r\n");
        } else {
            payload.push_str("\r\n");
        }
    }

    payload.push_str(&format!("--{}--\r\n", BOUNDARY));
    Ok(payload)
}

/// Parse a multipart/mixed batch response into per-item outcomes.
///
/// The boundary comes from the response Content-Type header. Parts arrive in
/// a provider-determined order; the Content-ID ties each one back to its
/// sub-request.
pub fn decode(response_content_type: &str, body: &str) -> Result<Vec<BatchOutcome>, GceError> {
    let boundary = response_content_type
        .split(';')
        .find_map(|param| param.trim().strip_prefix("boundary="))
        .map(|b| b.trim_matches('"'))
        .ok_or_else(|| GceError::Api {
            message: format!(
                "batch response missing multipart boundary (Content-Type: {})",
                response_content_type
            ),
        })?;

    let delimiter = format!("--{}", boundary);
    let mut outcomes = Vec::new();

    for raw_part in body.split(delimiter.as_str()) {
        let part = raw_part.trim_matches(|c| c == '\r' || c == '\n');
        if part.is_empty() || part == "--" {
            continue;
        }
        let index = outcomes.len();
        outcomes.push(decode_part(part, index));
    }

    Ok(outcomes)
}

fn decode_part(part: &str, index: usize) -> BatchOutcome {
    // Part headers (Content-Type/Content-ID) end at the first blank line;
    // the embedded HTTP response follows.
    let (part_headers, message) = split_once_blank(part);

    let request_id = part_headers
        .lines()
        .find_map(|line| {
            line.trim()
                .strip_prefix("Content-ID:")
                .map(|v| v.trim().trim_matches(|c| c == '<' || c == '>'))
        })
        .map(|id| id.strip_prefix("response-").unwrap_or(id).to_string())
        .unwrap_or_else(|| format!("item{}", index + 1));

    BatchOutcome {
        request_id,
        result: decode_embedded_response(message),
    }
}

/// Parse one embedded HTTP response: status line, headers, JSON body.
fn decode_embedded_response(message: &str) -> Result<Value, GceError> {
    let status_line = message.lines().next().unwrap_or_default().trim();
    let mut words = status_line.split_whitespace();
    let _protocol = words.next();
    let status: u16 = words
        .next()
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| GceError::Api {
            message: format!("malformed batch response part: {}", status_line),
        })?;
    let reason = words.collect::<Vec<_>>().join(" ");

    let after_status = match message.split_once('\n') {
        Some((_, rest)) => rest,
        None => "",
    };
    let (_headers, body) = split_once_blank(after_status);
    let body = body.trim();

    if !(200..300).contains(&status) {
        return Err(GceError::Api {
            message: format!("HttpError: {} {}", status, reason),
        });
    }

    if body.is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(body).map_err(|e| GceError::Api {
        message: format!("Failed to parse batch item JSON: {}", e),
    })
}

/// Split a message at its first blank line, tolerating bare-LF input.
fn split_once_blank(text: &str) -> (&str, &str) {
    if let Some(i) = text.find("\r\n\r\n") {
        (&text[..i], &text[i + 4..])
    } else if let Some(i) = text.find("\n\n") {
        (&text[..i], &text[i + 2..])
    } else {
        (text, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_uses_path_from_url() {
        let parts = vec![BatchPart {
            id: "item1".to_string(),
            method: Method::DELETE,
            url: "http://localhost:9000/v1beta14/projects/p/zones/z/instances/vm-1".to_string(),
            body: None,
        }];

        let payload = encode(&parts).unwrap();
        assert!(payload.contains("DELETE /v1beta14/projects/p/zones/z/instances/vm-1 HTTP/1.1"));
        assert!(payload.contains("Content-ID: <item1>"));
        assert!(payload.ends_with(&format!("--{}--\r\n", BOUNDARY)));
    }

    #[test]
    fn test_encode_includes_json_body_for_inserts() {
        let parts = vec![BatchPart {
            id: "item1".to_string(),
            method: Method::POST,
            url: "http://localhost:9000/v1beta14/projects/p/global/firewalls".to_string(),
            body: Some(json!({"name": "fw-1"})),
        }];

        let payload = encode(&parts).unwrap();
        assert!(payload.contains("Content-Type: application/json"));
        assert!(payload.contains(r#"{"name":"fw-1"}"#));
    }

    #[test]
    fn test_decode_mixed_outcomes() {
        let body = concat!(
            "--boundary_abc\r\n",
            "Content-Type: application/http\r\n",
            "Content-ID: <response-item1>\r\n",
            "\r\n",
            "HTTP/1.1 200 OK\r\n",
            "Content-Type: application/json\r\n",
            "\r\n",
            "{\"status\": \"PENDING\"}\r\n",
            "--boundary_abc\r\n",
            "Content-Type: application/http\r\n",
            "Content-ID: <response-item2>\r\n",
            "\r\n",
            "HTTP/1.1 404 Not Found\r\n",
            "Content-Type: application/json\r\n",
            "\r\n",
            "{\"error\": {\"code\": 404}}\r\n",
            "--boundary_abc--\r\n",
        );

        let outcomes = decode("multipart/mixed; boundary=boundary_abc", body).unwrap();
        assert_eq!(outcomes.len(), 2);

        assert_eq!(outcomes[0].request_id, "item1");
        assert_eq!(
            outcomes[0].result.as_ref().unwrap()["status"],
            json!("PENDING")
        );

        assert_eq!(outcomes[1].request_id, "item2");
        assert_eq!(
            outcomes[1].result,
            Err(GceError::Api {
                message: "HttpError: 404 Not Found".to_string()
            })
        );
    }

    #[test]
    fn test_decode_without_boundary_fails() {
        let err = decode("application/json", "{}").unwrap_err();
        assert!(matches!(err, GceError::Api { .. }));
    }

    #[test]
    fn test_decode_tolerates_bare_lf() {
        let body = concat!(
            "--b\n",
            "Content-Type: application/http\n",
            "Content-ID: <response-item1>\n",
            "\n",
            "HTTP/1.1 204 No Content\n",
            "\n",
            "--b--\n",
        );

        let outcomes = decode("multipart/mixed; boundary=b", body).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].result, Ok(Value::Null));
    }
}
