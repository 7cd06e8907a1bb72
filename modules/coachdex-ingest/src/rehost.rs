// Image re-hosting: signed upstream CDN URLs expire, so profile pictures
// are copied into our own storage bucket at ingestion time.

use supabase_storage::StorageClient;
use tracing::warn;

/// Download an image and re-upload it to the storage bucket as
/// `{username_lowercase}.{ext}`. Returns the stable public URL, or `None`
/// on any failure; re-hosting never fails an ingestion.
pub async fn rehost_profile_picture(
    http: &reqwest::Client,
    storage: &StorageClient,
    image_url: &str,
    username: &str,
) -> Option<String> {
    if !image_url.starts_with("http") {
        warn!(username, image_url, "Invalid image URL, skipping rehost");
        return None;
    }

    let resp = match http.get(image_url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            warn!(username, error = %e, "Failed to download profile picture");
            return None;
        }
    };
    if !resp.status().is_success() {
        warn!(username, status = %resp.status(), "Failed to download profile picture");
        return None;
    }

    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("image/jpeg")
        .to_string();
    let bytes = match resp.bytes().await {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => {
            warn!(username, error = %e, "Failed to read image body");
            return None;
        }
    };

    let path = format!("{}.{}", username.to_lowercase(), extension_for(&content_type));

    match storage.upload(&path, bytes, &content_type).await {
        Ok(public_url) => {
            tracing::info!(username, url = %public_url, "Re-hosted profile picture");
            Some(public_url)
        }
        Err(e) => {
            warn!(username, error = %e, "Failed to upload profile picture");
            None
        }
    }
}

fn extension_for(content_type: &str) -> &str {
    content_type
        .split('/')
        .nth(1)
        .filter(|ext| !ext.is_empty())
        .unwrap_or("jpg")
}
