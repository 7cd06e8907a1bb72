// Ingestion orchestration: freshness check, upstream fetch, image
// re-hosting, persistence. The HTTP layer and the migration binary both
// drive this; neither talks to a provider directly.

use chrono::{Duration as ChronoDuration, Utc};
use tracing::warn;

use coachdex_common::Profile;
use coachdex_store::ProfileStore;
use supabase_storage::StorageClient;

use crate::error::Result;
use crate::rehost::rehost_profile_picture;
use crate::traits::ProfileSource;

/// Records younger than this are served from the database without an
/// upstream fetch.
const FRESHNESS_TTL_HOURS: i64 = 24;

pub struct Ingestor {
    provider: Box<dyn ProfileSource>,
    profiles: ProfileStore,
    storage: StorageClient,
    http: reqwest::Client,
}

impl Ingestor {
    pub fn new(
        provider: Box<dyn ProfileSource>,
        profiles: ProfileStore,
        storage: StorageClient,
    ) -> Self {
        Self {
            provider,
            profiles,
            storage,
            http: reqwest::Client::new(),
        }
    }

    pub fn provider(&self) -> &dyn ProfileSource {
        self.provider.as_ref()
    }

    /// Fetch one profile, preferring a fresh cached record. `Ok(None)`
    /// means absence: unknown, private, or rejected by the locale gate.
    pub async fn ingest_profile(&self, username: &str) -> Result<Option<Profile>> {
        if let Some(cached) = self.profiles.find_by_username(username).await? {
            let age = Utc::now() - cached.last_fetched;
            if age < ChronoDuration::hours(FRESHNESS_TTL_HOURS) {
                tracing::debug!(username, "Serving cached profile within freshness TTL");
                return Ok(Some(cached));
            }
        }

        let Some(mut profile) = self.provider.fetch_profile(username).await? else {
            return Ok(None);
        };

        self.rehost_picture(&mut profile).await;
        self.profiles.upsert(&profile).await?;

        Ok(Some(profile))
    }

    /// Batch ingestion. The provider handles the sequential fetch and
    /// inter-request delay; each fetched profile is then re-hosted and
    /// persisted. A failed persist is logged and does not abort the batch.
    pub async fn ingest_profiles(&self, usernames: &[String]) -> Vec<Profile> {
        let fetched = self.provider.fetch_profiles(usernames).await;

        let mut out = Vec::with_capacity(fetched.len());
        for mut profile in fetched {
            self.rehost_picture(&mut profile).await;
            if let Err(e) = self.profiles.upsert(&profile).await {
                warn!(username = %profile.username, error = %e, "Failed to persist profile");
            }
            out.push(profile);
        }
        out
    }

    /// Replace an upstream picture URL with a re-hosted one. Already
    /// re-hosted URLs and rehost failures leave the profile unchanged.
    async fn rehost_picture(&self, profile: &mut Profile) {
        if profile.profile_picture.is_empty() || self.storage.hosts(&profile.profile_picture) {
            return;
        }
        if let Some(url) = rehost_profile_picture(
            &self.http,
            &self.storage,
            &profile.profile_picture,
            &profile.username,
        )
        .await
        {
            profile.profile_picture = url;
        }
    }
}
