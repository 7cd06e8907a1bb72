use serde::Deserialize;

/// An Instagram profile row from the Bright Data Instagram dataset.
/// The `account` and `profile_image_link` fields may arrive obfuscated
/// with `*` masking characters; callers strip them.
#[derive(Debug, Clone, Deserialize)]
pub struct BrightDataProfile {
    #[serde(default)]
    pub id: Option<String>,
    pub account: Option<String>,
    #[serde(default)]
    pub followers: Option<i64>,
    #[serde(default)]
    pub following: Option<i64>,
    #[serde(default)]
    pub posts_count: Option<i64>,
    #[serde(default)]
    pub is_business_account: bool,
    #[serde(default)]
    pub is_professional_account: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_private: bool,
    pub biography: Option<String>,
    pub full_name: Option<String>,
    pub profile_image_link: Option<String>,
    pub profile_url: Option<String>,
    #[serde(default)]
    pub external_url: Vec<String>,
    pub business_category_name: Option<String>,
}
