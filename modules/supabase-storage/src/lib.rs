pub mod error;

pub use error::{Result, StorageError};

/// One-year browser cache for re-hosted profile pictures.
const CACHE_CONTROL_SECS: &str = "31536000";

pub struct StorageClient {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl StorageClient {
    pub fn new(base_url: &str, service_key: String, bucket: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            bucket,
        }
    }

    /// Upload an object, overwriting any existing one at the same path.
    /// Returns the stable public URL of the uploaded object.
    pub async fn upload(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<String> {
        let url = format!("{}/storage/v1/object/{}/{path}", self.base_url, self.bucket);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.service_key)
            .header("Content-Type", content_type)
            .header("cache-control", CACHE_CONTROL_SECS)
            .header("x-upsert", "true")
            .body(data)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(self.public_url(path))
    }

    /// Remove an object. Missing objects are not an error upstream.
    pub async fn remove(&self, path: &str) -> Result<()> {
        let url = format!("{}/storage/v1/object/{}/{path}", self.base_url, self.bucket);
        let resp = self
            .client
            .delete(&url)
            .bearer_auth(&self.service_key)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    /// Public URL for an object in the bucket. Valid whether or not the
    /// object exists yet.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{path}",
            self.base_url, self.bucket
        )
    }

    /// Whether a URL already points into this storage deployment. Used to
    /// skip profiles whose pictures were re-hosted in an earlier run.
    pub fn hosts(&self, url: &str) -> bool {
        url.starts_with(&self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> StorageClient {
        StorageClient::new(
            "https://abc.supabase.co/",
            "service-key".into(),
            "profile-pictures".into(),
        )
    }

    #[test]
    fn public_url_shape() {
        assert_eq!(
            client().public_url("coach_anna.jpg"),
            "https://abc.supabase.co/storage/v1/object/public/profile-pictures/coach_anna.jpg"
        );
    }

    #[test]
    fn hosts_recognizes_own_urls() {
        let c = client();
        assert!(c.hosts("https://abc.supabase.co/storage/v1/object/public/profile-pictures/x.jpg"));
        assert!(!c.hosts("https://cdn.instagram.com/x.jpg"));
    }
}
