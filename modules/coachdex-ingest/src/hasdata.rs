use std::time::Duration;

use async_trait::async_trait;

use coachdex_common::Profile;
use hasdata_client::HasDataClient;

use crate::error::Result;
use crate::normalize;
use crate::traits::ProfileSource;

/// HasData-backed profile source. One JSON object per request.
pub struct HasDataSource {
    client: HasDataClient,
}

impl HasDataSource {
    pub fn new(api_key: String) -> Self {
        Self {
            client: HasDataClient::new(api_key),
        }
    }
}

#[async_trait]
impl ProfileSource for HasDataSource {
    fn name(&self) -> &'static str {
        "hasdata"
    }

    fn batch_delay(&self) -> Duration {
        Duration::from_millis(500)
    }

    async fn fetch_profile(&self, username: &str) -> Result<Option<Profile>> {
        let Some(raw) = self.client.profile(username).await? else {
            return Ok(None);
        };
        Ok(normalize::from_hasdata(&raw, None))
    }
}
