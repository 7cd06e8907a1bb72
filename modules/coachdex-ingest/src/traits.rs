// The provider seam. Every scraping API integration implements
// ProfileSource; callers hold a Box<dyn ProfileSource> picked by the
// factory and never know which vendor is behind it.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use coachdex_common::Profile;

use crate::error::Result;

#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Provider tag for logs and factory tests.
    fn name(&self) -> &'static str;

    /// Fixed pause between successive requests in a batch. Upstream rate
    /// limits are respected through this delay, not through parallelism
    /// control, so batch fetching must stay sequential.
    fn batch_delay(&self) -> Duration;

    /// Fetch one profile. `Ok(None)` means absence: unknown handle,
    /// private account, or an account the locale gate rejected.
    async fn fetch_profile(&self, username: &str) -> Result<Option<Profile>>;

    /// Fetch a batch, strictly sequentially, pausing `batch_delay()`
    /// between requests. One username's failure is logged and skipped;
    /// the batch never aborts. Output order follows input order, with
    /// absent profiles simply missing.
    async fn fetch_profiles(&self, usernames: &[String]) -> Vec<Profile> {
        let mut profiles = Vec::new();

        for (i, username) in usernames.iter().enumerate() {
            match self.fetch_profile(username).await {
                Ok(Some(profile)) => profiles.push(profile),
                Ok(None) => {}
                Err(e) => {
                    warn!(provider = self.name(), username = %username, error = %e, "Skipping failed fetch");
                }
            }
            if i + 1 < usernames.len() {
                tokio::time::sleep(self.batch_delay()).await;
            }
        }

        profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use chrono::Utc;
    use coachdex_common::Niche;

    struct ScriptedSource;

    fn profile(username: &str) -> Profile {
        Profile {
            id: username.to_string(),
            username: username.to_string(),
            full_name: None,
            biography: None,
            profile_picture: String::new(),
            external_url: None,
            followers_count: 0,
            follows_count: 0,
            posts_count: 0,
            niche: Niche::Lifestyle,
            is_business_account: false,
            is_professional_account: false,
            verified: false,
            last_fetched: Utc::now(),
        }
    }

    #[async_trait]
    impl ProfileSource for ScriptedSource {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn batch_delay(&self) -> Duration {
            Duration::ZERO
        }

        async fn fetch_profile(&self, username: &str) -> Result<Option<Profile>> {
            match username {
                "missingOne" => Ok(None),
                "boom" => Err(IngestError::Upstream {
                    status: Some(500),
                    message: "server exploded".into(),
                }),
                other => Ok(Some(profile(other))),
            }
        }
    }

    #[tokio::test]
    async fn batch_skips_absent_usernames_without_placeholders() {
        let source = ScriptedSource;
        let usernames: Vec<String> = ["a", "missingOne", "b"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let profiles = source.fetch_profiles(&usernames).await;
        let got: Vec<&str> = profiles.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(got, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn batch_survives_per_item_errors() {
        let source = ScriptedSource;
        let usernames: Vec<String> = ["a", "boom", "c"].iter().map(|s| s.to_string()).collect();

        let profiles = source.fetch_profiles(&usernames).await;
        let got: Vec<&str> = profiles.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(got, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn empty_batch_is_empty() {
        assert!(ScriptedSource.fetch_profiles(&[]).await.is_empty());
    }
}
