use std::time::Duration;

use async_trait::async_trait;

use brightdata_client::BrightDataClient;
use coachdex_common::Profile;

use crate::error::Result;
use crate::normalize;
use crate::traits::ProfileSource;

/// Bright Data-backed profile source. The client resolves the upstream's
/// array-or-object response shape before it reaches the normalizer.
pub struct BrightDataSource {
    client: BrightDataClient,
}

impl BrightDataSource {
    pub fn new(api_key: String, dataset_id: Option<String>) -> Self {
        Self {
            client: BrightDataClient::new(api_key, dataset_id),
        }
    }
}

#[async_trait]
impl ProfileSource for BrightDataSource {
    fn name(&self) -> &'static str {
        "brightdata"
    }

    fn batch_delay(&self) -> Duration {
        Duration::from_millis(1000)
    }

    async fn fetch_profile(&self, username: &str) -> Result<Option<Profile>> {
        let Some(raw) = self.client.scrape_profile(username).await? else {
            return Ok(None);
        };
        Ok(normalize::from_brightdata(&raw, username, None))
    }
}
