// Provider selection. Static configuration picks exactly one adapter;
// there is no runtime fallback between vendors.

use coachdex_common::Config;

use crate::brightdata::BrightDataSource;
use crate::error::{IngestError, Result};
use crate::hasdata::HasDataSource;
use crate::traits::ProfileSource;

/// Build the configured profile source. Fails at construction time when
/// the selected provider's credential is missing, never at call time.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn ProfileSource>> {
    if config.profile_api_provider == "brightdata" {
        if config.brightdata_api_key.is_empty() {
            return Err(IngestError::Config(
                "BRIGHT_DATA_API_KEY is required when using the Bright Data provider".into(),
            ));
        }
        return Ok(Box::new(BrightDataSource::new(
            config.brightdata_api_key.clone(),
            config.brightdata_dataset_id.clone(),
        )));
    }

    // Anything else defaults to HasData.
    if config.hasdata_api_key.is_empty() {
        return Err(IngestError::Config(
            "HASDATA_API_KEY is required when using the HasData provider".into(),
        ));
    }
    Ok(Box::new(HasDataSource::new(config.hasdata_api_key.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            database_url: "postgres://localhost/test".into(),
            profile_api_provider: "hasdata".into(),
            hasdata_api_key: String::new(),
            brightdata_api_key: String::new(),
            brightdata_dataset_id: None,
            supabase_url: "https://abc.supabase.co".into(),
            supabase_service_key: "key".into(),
            storage_bucket: "profile-pictures".into(),
            mail_api_url: String::new(),
            mail_api_key: String::new(),
            mail_from: String::new(),
            web_host: "0.0.0.0".into(),
            web_port: 3000,
            session_secret: "secret".into(),
        }
    }

    #[test]
    fn hasdata_requires_its_key() {
        let config = base_config();
        assert!(matches!(
            provider_from_config(&config),
            Err(IngestError::Config(_))
        ));
    }

    #[test]
    fn hasdata_is_the_default_provider() {
        let mut config = base_config();
        config.profile_api_provider = "something-unknown".into();
        config.hasdata_api_key = "hd-key".into();
        let provider = provider_from_config(&config).unwrap();
        assert_eq!(provider.name(), "hasdata");
    }

    #[test]
    fn brightdata_requires_its_key() {
        let mut config = base_config();
        config.profile_api_provider = "brightdata".into();
        config.hasdata_api_key = "hd-key".into();
        assert!(matches!(
            provider_from_config(&config),
            Err(IngestError::Config(_))
        ));
    }

    #[test]
    fn brightdata_is_selectable() {
        let mut config = base_config();
        config.profile_api_provider = "brightdata".into();
        config.brightdata_api_key = "bd-key".into();
        let provider = provider_from_config(&config).unwrap();
        assert_eq!(provider.name(), "brightdata");
    }
}
