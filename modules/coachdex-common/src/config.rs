use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres
    pub database_url: String,

    // Profile scraping providers. Keys stay optional here; the provider
    // factory rejects a selection whose key is missing.
    pub profile_api_provider: String,
    pub hasdata_api_key: String,
    pub brightdata_api_key: String,
    pub brightdata_dataset_id: Option<String>,

    // Object storage
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub storage_bucket: String,

    // Transactional mail
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_from: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Session signing
    pub session_secret: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            profile_api_provider: env::var("PROFILE_API_PROVIDER")
                .unwrap_or_else(|_| "hasdata".to_string()),
            hasdata_api_key: env::var("HASDATA_API_KEY").unwrap_or_default(),
            brightdata_api_key: env::var("BRIGHT_DATA_API_KEY").unwrap_or_default(),
            brightdata_dataset_id: env::var("BRIGHT_DATA_DATASET_ID").ok(),
            supabase_url: required_env("SUPABASE_URL"),
            supabase_service_key: required_env("SUPABASE_SERVICE_ROLE_KEY"),
            storage_bucket: env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "profile-pictures".to_string()),
            mail_api_url: required_env("MAIL_API_URL"),
            mail_api_key: required_env("MAIL_API_KEY"),
            mail_from: required_env("MAIL_FROM"),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
            session_secret: required_env("SESSION_SECRET"),
        }
    }

    /// Minimal config for the image-migration utility: database, Bright
    /// Data, and storage only. No mail or session material needed.
    pub fn migration_from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            profile_api_provider: "brightdata".to_string(),
            hasdata_api_key: String::new(),
            brightdata_api_key: required_env("BRIGHT_DATA_API_KEY"),
            brightdata_dataset_id: env::var("BRIGHT_DATA_DATASET_ID").ok(),
            supabase_url: required_env("SUPABASE_URL"),
            supabase_service_key: required_env("SUPABASE_SERVICE_ROLE_KEY"),
            storage_bucket: env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "profile-pictures".to_string()),
            mail_api_url: String::new(),
            mail_api_key: String::new(),
            mail_from: String::new(),
            web_host: String::new(),
            web_port: 0,
            session_secret: String::new(),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
