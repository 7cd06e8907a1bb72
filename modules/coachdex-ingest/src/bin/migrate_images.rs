// Re-fetch profiles whose picture URL still points at an expiring upstream
// CDN, and move the images into our own storage bucket. Safe to re-run:
// already-migrated profiles are skipped.

use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use coachdex_common::Config;
use coachdex_ingest::{BrightDataSource, Ingestor};
use coachdex_store::ProfileStore;
use supabase_storage::StorageClient;

const BATCH_SIZE: usize = 10;
const DELAY_BETWEEN_BATCHES: Duration = Duration::from_secs(5);
const DELAY_BETWEEN_PROFILES: Duration = Duration::from_secs(1);
const RETRY_DELAY: Duration = Duration::from_secs(2);
const MAX_ATTEMPTS: u32 = 3;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("coachdex=info".parse()?))
        .init();

    let config = Config::migration_from_env();

    let pool = coachdex_store::connect(&config.database_url).await?;
    let profiles = ProfileStore::new(pool.clone());

    let candidates = profiles.rehost_candidates(&config.supabase_url).await?;
    info!(count = candidates.len(), "Profiles needing image migration");
    if candidates.is_empty() {
        info!("All profile images are already re-hosted");
        return Ok(());
    }

    let provider = Box::new(BrightDataSource::new(
        config.brightdata_api_key.clone(),
        config.brightdata_dataset_id.clone(),
    ));
    let ingestor = Ingestor::new(
        provider,
        ProfileStore::new(pool),
        StorageClient::new(
            &config.supabase_url,
            config.supabase_service_key.clone(),
            config.storage_bucket.clone(),
        ),
    );

    let mut migrated = 0usize;
    let mut failed = 0usize;
    let total_batches = candidates.len().div_ceil(BATCH_SIZE);

    for (batch_index, batch) in candidates.chunks(BATCH_SIZE).enumerate() {
        info!(
            batch = batch_index + 1,
            total_batches,
            size = batch.len(),
            "Processing migration batch"
        );

        for candidate in batch {
            // Reset the staleness marker so the ingestor bypasses its
            // freshness TTL and hits the upstream API.
            if let Err(e) = profiles.mark_stale(&candidate.username).await {
                warn!(username = %candidate.username, error = %e, "Failed to mark profile stale");
                failed += 1;
                continue;
            }

            let mut fresh = None;
            for attempt in 1..=MAX_ATTEMPTS {
                match ingestor.ingest_profile(&candidate.username).await {
                    Ok(result) => {
                        fresh = result;
                        break;
                    }
                    Err(e) => {
                        warn!(
                            username = %candidate.username,
                            attempt,
                            error = %e,
                            "Re-fetch attempt failed"
                        );
                        if attempt < MAX_ATTEMPTS {
                            tokio::time::sleep(RETRY_DELAY).await;
                        }
                    }
                }
            }

            match fresh {
                Some(profile) => {
                    info!(username = %profile.username, "Migrated profile image");
                    migrated += 1;
                }
                None => {
                    warn!(
                        username = %candidate.username,
                        "Profile not found or filtered after retries"
                    );
                    failed += 1;
                }
            }

            tokio::time::sleep(DELAY_BETWEEN_PROFILES).await;
        }

        if (batch_index + 1) * BATCH_SIZE < candidates.len() {
            info!(pause_secs = DELAY_BETWEEN_BATCHES.as_secs(), "Pausing between batches");
            tokio::time::sleep(DELAY_BETWEEN_BATCHES).await;
        }
    }

    info!(migrated, failed, total = migrated + failed, "Image migration finished");
    Ok(())
}
