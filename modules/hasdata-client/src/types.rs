use serde::Deserialize;

/// An Instagram profile as returned by the HasData profile endpoint.
/// One JSON object per request; most fields are optional upstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasDataProfile {
    #[serde(default)]
    pub id: Option<String>,
    pub username: String,
    pub full_name: Option<String>,
    pub biography: Option<String>,
    pub business_category: Option<String>,
    pub external_urls: Option<String>,
    #[serde(default)]
    pub followers_count: Option<i64>,
    #[serde(default)]
    pub follows_count: Option<i64>,
    #[serde(default)]
    pub posts_count: Option<i64>,
    #[serde(default)]
    pub is_business_account: bool,
    #[serde(default)]
    pub is_professional_account: bool,
    pub profile_pic_url: Option<String>,
    #[serde(rename = "profilePicUrlHD")]
    pub profile_pic_url_hd: Option<String>,
}
