use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content-focus category of a coach profile. Closed set; anything the
/// classifier can't place lands in `Lifestyle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Niche {
    Fitness,
    Business,
    Marketing,
    Finance,
    #[serde(rename = "Personal Development")]
    PersonalDevelopment,
    Nutrition,
    Mindfulness,
    #[serde(rename = "Health & Wellness")]
    HealthWellness,
    Entrepreneurship,
    Lifestyle,
}

impl Niche {
    /// Human-readable label, also the persisted representation.
    pub fn as_label(&self) -> &'static str {
        match self {
            Niche::Fitness => "Fitness",
            Niche::Business => "Business",
            Niche::Marketing => "Marketing",
            Niche::Finance => "Finance",
            Niche::PersonalDevelopment => "Personal Development",
            Niche::Nutrition => "Nutrition",
            Niche::Mindfulness => "Mindfulness",
            Niche::HealthWellness => "Health & Wellness",
            Niche::Entrepreneurship => "Entrepreneurship",
            Niche::Lifestyle => "Lifestyle",
        }
    }

    pub fn from_label(label: &str) -> Option<Niche> {
        match label {
            "Fitness" => Some(Niche::Fitness),
            "Business" => Some(Niche::Business),
            "Marketing" => Some(Niche::Marketing),
            "Finance" => Some(Niche::Finance),
            "Personal Development" => Some(Niche::PersonalDevelopment),
            "Nutrition" => Some(Niche::Nutrition),
            "Mindfulness" => Some(Niche::Mindfulness),
            "Health & Wellness" => Some(Niche::HealthWellness),
            "Entrepreneurship" => Some(Niche::Entrepreneurship),
            "Lifestyle" => Some(Niche::Lifestyle),
            _ => None,
        }
    }
}

impl Default for Niche {
    fn default() -> Self {
        Niche::Lifestyle
    }
}

impl std::fmt::Display for Niche {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Canonical record for one coach account after normalization. Only
/// German-speaking accounts ever reach this type's persisted form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Upstream identifier; falls back to the username, never empty.
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub biography: Option<String>,
    /// Canonical image reference. Re-pointed to the re-hosted storage URL
    /// after migration; empty string when unknown.
    pub profile_picture: String,
    pub external_url: Option<String>,
    pub followers_count: i64,
    pub follows_count: i64,
    pub posts_count: i64,
    pub niche: Niche,
    pub is_business_account: bool,
    pub is_professional_account: bool,
    pub verified: bool,
    /// Staleness marker: records older than the freshness TTL are
    /// re-fetched on the next ingestion request.
    pub last_fetched: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn niche_labels_round_trip() {
        let all = [
            Niche::Fitness,
            Niche::Business,
            Niche::Marketing,
            Niche::Finance,
            Niche::PersonalDevelopment,
            Niche::Nutrition,
            Niche::Mindfulness,
            Niche::HealthWellness,
            Niche::Entrepreneurship,
            Niche::Lifestyle,
        ];
        for niche in all {
            assert_eq!(Niche::from_label(niche.as_label()), Some(niche));
        }
        assert_eq!(Niche::from_label("Gardening"), None);
    }

    #[test]
    fn niche_serializes_to_label() {
        let json = serde_json::to_string(&Niche::HealthWellness).unwrap();
        assert_eq!(json, r#""Health & Wellness""#);
        let back: Niche = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Niche::HealthWellness);
    }
}
