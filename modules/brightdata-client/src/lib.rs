pub mod error;
pub mod types;

pub use error::{BrightDataError, Result};
pub use types::BrightDataProfile;

const BASE_URL: &str = "https://api.brightdata.com/datasets/v3";
const DEFAULT_DATASET_ID: &str = "gd_l1vikfch901nx3by4";

pub struct BrightDataClient {
    client: reqwest::Client,
    api_key: String,
    dataset_id: String,
}

impl BrightDataClient {
    pub fn new(api_key: String, dataset_id: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            dataset_id: dataset_id.unwrap_or_else(|| DEFAULT_DATASET_ID.to_string()),
        }
    }

    /// Scrape one Instagram profile by handle via the synchronous dataset
    /// endpoint. Returns `Ok(None)` for an unknown handle (upstream 404) or
    /// when the upstream answers with an error-shaped payload instead of
    /// profile data; 429 surfaces as `RateLimited`.
    pub async fn scrape_profile(&self, username: &str) -> Result<Option<BrightDataProfile>> {
        let url = format!(
            "{BASE_URL}/scrape?dataset_id={}&notify=false&include_errors=true&type=discover_new&discover_by=user_name",
            self.dataset_id
        );
        let body = serde_json::json!({
            "input": [{ "user_name": username }],
        });

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        // The body can only be read once; grab it before branching so error
        // payloads are available for diagnostics.
        let text = resp.text().await?;

        if !status.is_success() {
            if status.as_u16() == 404 {
                tracing::warn!(username, "Profile not found");
                return Ok(None);
            }
            if status.as_u16() == 429 {
                return Err(BrightDataError::RateLimited);
            }
            let message = extract_error_message(&text)
                .unwrap_or_else(|| format!("status {status}"));
            return Err(BrightDataError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|_| BrightDataError::Parse(format!("invalid JSON: {text}")))?;

        parse_profile_payload(value, username)
    }
}

/// Resolve the dataset response shape: either a JSON array (first element
/// wins) or a single object. An object carrying only error fields
/// (`error`/`message`) without an identity field (`id`/`account`) is treated
/// as absence, not as profile data.
pub fn parse_profile_payload(
    value: serde_json::Value,
    username: &str,
) -> Result<Option<BrightDataProfile>> {
    let candidate = match value {
        serde_json::Value::Array(items) => {
            let Some(first) = items.into_iter().next() else {
                tracing::warn!(username, "Empty dataset response");
                return Ok(None);
            };
            first
        }
        serde_json::Value::Object(_) => value,
        other => {
            return Err(BrightDataError::Parse(format!(
                "unexpected response shape: {other}"
            )));
        }
    };

    let has_identity = candidate.get("id").is_some() || candidate.get("account").is_some();
    let has_error = candidate.get("error").is_some() || candidate.get("message").is_some();
    if has_error && !has_identity {
        tracing::warn!(username, payload = %candidate, "Error-shaped dataset payload");
        return Ok(None);
    }
    if !has_identity {
        tracing::warn!(username, "Dataset payload without identity fields");
        return Ok(None);
    }

    let profile: BrightDataProfile = serde_json::from_value(candidate)
        .map_err(|e| BrightDataError::Parse(e.to_string()))?;
    Ok(Some(profile))
}

fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    for key in ["message", "error", "detail"] {
        if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
            return Some(msg.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_response_takes_first_element() {
        let value = json!([
            { "id": "1", "account": "coach_a", "followers": 5000 },
            { "id": "2", "account": "coach_b", "followers": 100 }
        ]);
        let profile = parse_profile_payload(value, "coach_a").unwrap().unwrap();
        assert_eq!(profile.id.as_deref(), Some("1"));
        assert_eq!(profile.followers, Some(5000));
    }

    #[test]
    fn single_object_response_is_used_directly() {
        let value = json!({ "id": "9", "account": "solo", "is_private": true });
        let profile = parse_profile_payload(value, "solo").unwrap().unwrap();
        assert_eq!(profile.id.as_deref(), Some("9"));
        assert!(profile.is_private);
    }

    #[test]
    fn error_shaped_payload_is_absence() {
        let value = json!({ "error": "dataset failure", "message": "try later" });
        assert!(parse_profile_payload(value, "x").unwrap().is_none());
    }

    #[test]
    fn error_fields_with_identity_still_parse() {
        // include_errors=true can attach warnings to otherwise valid rows
        let value = json!({ "id": "3", "account": "warned", "message": "partial" });
        let profile = parse_profile_payload(value, "warned").unwrap().unwrap();
        assert_eq!(profile.account.as_deref(), Some("warned"));
    }

    #[test]
    fn empty_array_is_absence() {
        assert!(parse_profile_payload(json!([]), "x").unwrap().is_none());
    }

    #[test]
    fn scalar_response_is_parse_error() {
        assert!(matches!(
            parse_profile_payload(json!("nope"), "x"),
            Err(BrightDataError::Parse(_))
        ));
    }

    #[test]
    fn extracts_upstream_error_message() {
        assert_eq!(
            extract_error_message(r#"{"message": "quota exhausted"}"#).as_deref(),
            Some("quota exhausted")
        );
        assert_eq!(extract_error_message("not json"), None);
    }
}
