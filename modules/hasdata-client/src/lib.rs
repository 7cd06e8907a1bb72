pub mod error;
pub mod types;

pub use error::{HasDataError, Result};
pub use types::HasDataProfile;

const BASE_URL: &str = "https://api.hasdata.com";

pub struct HasDataClient {
    client: reqwest::Client,
    api_key: String,
}

impl HasDataClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    /// Fetch one Instagram profile. Returns `Ok(None)` for an unknown handle
    /// (upstream 404); 429 surfaces as `RateLimited` so callers can back off.
    pub async fn profile(&self, username: &str) -> Result<Option<HasDataProfile>> {
        let url = format!("{BASE_URL}/scrape/instagram/profile");
        let resp = self
            .client
            .get(&url)
            .query(&[("handle", username)])
            .header("x-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() == 404 {
            tracing::warn!(username, "Profile not found");
            return Ok(None);
        }
        if status.as_u16() == 429 {
            return Err(HasDataError::RateLimited);
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(HasDataError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        let profile: HasDataProfile = serde_json::from_str(&body)?;
        Ok(Some(profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_profile_response() {
        let body = r#"{
            "id": "173560",
            "username": "coach_anna",
            "fullName": "Anna Schmidt",
            "biography": "Fitness Coach aus Berlin",
            "followersCount": 12400,
            "followsCount": 310,
            "postsCount": 512,
            "isBusinessAccount": true,
            "isProfessionalAccount": false,
            "profilePicUrl": "https://cdn.example.com/anna.jpg",
            "profilePicUrlHD": "https://cdn.example.com/anna_hd.jpg"
        }"#;

        let profile: HasDataProfile = serde_json::from_str(body).unwrap();
        assert_eq!(profile.id.as_deref(), Some("173560"));
        assert_eq!(profile.username, "coach_anna");
        assert_eq!(profile.followers_count, Some(12400));
        assert!(profile.is_business_account);
        assert_eq!(
            profile.profile_pic_url_hd.as_deref(),
            Some("https://cdn.example.com/anna_hd.jpg")
        );
    }

    #[test]
    fn tolerates_missing_optional_fields() {
        let profile: HasDataProfile =
            serde_json::from_str(r#"{"username": "sparse_account"}"#).unwrap();
        assert_eq!(profile.username, "sparse_account");
        assert_eq!(profile.id, None);
        assert_eq!(profile.followers_count, None);
        assert!(!profile.is_business_account);
    }
}
