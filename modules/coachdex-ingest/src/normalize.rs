//! Conversion of provider wire responses into the canonical [`Profile`].
//! The German locale gate lives here: a rejected account yields `None` and
//! is never persisted.

use chrono::Utc;

use brightdata_client::BrightDataProfile;
use coachdex_common::{detect_niche, is_german_account, Niche, Profile};
use hasdata_client::HasDataProfile;

/// Normalize a HasData profile response. `None` when the locale gate
/// rejects the account.
pub fn from_hasdata(raw: &HasDataProfile, niche: Option<Niche>) -> Option<Profile> {
    if !is_german_account(raw.biography.as_deref(), raw.full_name.as_deref()) {
        return None;
    }

    let niche =
        niche.unwrap_or_else(|| detect_niche(raw.biography.as_deref(), raw.full_name.as_deref()));

    // Prefer the standard-resolution URL, fall back to HD.
    let profile_picture = raw
        .profile_pic_url
        .clone()
        .or_else(|| raw.profile_pic_url_hd.clone())
        .unwrap_or_default();

    Some(Profile {
        id: raw
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| raw.username.clone()),
        username: raw.username.clone(),
        full_name: raw.full_name.clone(),
        biography: raw.biography.clone(),
        profile_picture,
        external_url: raw.external_urls.clone(),
        followers_count: raw.followers_count.unwrap_or(0).max(0),
        follows_count: raw.follows_count.unwrap_or(0).max(0),
        posts_count: raw.posts_count.unwrap_or(0).max(0),
        niche,
        is_business_account: raw.is_business_account,
        is_professional_account: raw.is_professional_account,
        // HasData has no explicit verified flag; business or professional
        // stands in for it.
        verified: raw.is_business_account || raw.is_professional_account,
        last_fetched: Utc::now(),
    })
}

/// Normalize a Bright Data dataset row. `None` for private accounts or
/// locale-gate rejections. `requested_username` backstops the obfuscated
/// account field.
pub fn from_brightdata(
    raw: &BrightDataProfile,
    requested_username: &str,
    niche: Option<Niche>,
) -> Option<Profile> {
    if raw.is_private {
        return None;
    }
    if !is_german_account(raw.biography.as_deref(), raw.full_name.as_deref()) {
        return None;
    }

    let niche =
        niche.unwrap_or_else(|| detect_niche(raw.biography.as_deref(), raw.full_name.as_deref()));

    // Bright Data obfuscates some string fields with asterisks. Strip the
    // masking; an image URL that no longer looks like a URL is dropped.
    let profile_picture = raw
        .profile_image_link
        .as_deref()
        .map(strip_mask)
        .filter(|url| url.starts_with("http"))
        .unwrap_or_default();

    let username = raw
        .account
        .as_deref()
        .map(strip_mask)
        .filter(|account| !account.is_empty())
        .unwrap_or_else(|| requested_username.to_string());

    Some(Profile {
        id: raw
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| username.clone()),
        username,
        full_name: raw.full_name.clone(),
        biography: raw.biography.clone(),
        profile_picture,
        external_url: raw.external_url.first().cloned(),
        followers_count: raw.followers.unwrap_or(0).max(0),
        follows_count: raw.following.unwrap_or(0).max(0),
        posts_count: raw.posts_count.unwrap_or(0).max(0),
        niche,
        is_business_account: raw.is_business_account,
        is_professional_account: raw.is_professional_account,
        // Explicit flag from this provider takes precedence over any
        // business/professional derivation.
        verified: raw.is_verified,
        last_fetched: Utc::now(),
    })
}

/// Remove `*` masking characters from an obfuscated field.
pub fn strip_mask(s: &str) -> String {
    s.chars().filter(|c| *c != '*').collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hasdata(value: serde_json::Value) -> HasDataProfile {
        serde_json::from_value(value).unwrap()
    }

    fn brightdata(value: serde_json::Value) -> BrightDataProfile {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn hasdata_german_account_normalizes() {
        let raw = hasdata(json!({
            "id": "42",
            "username": "coach_anna",
            "fullName": "Anna Schmidt",
            "biography": "Fitness Coach aus Berlin",
            "followersCount": 1200,
            "isBusinessAccount": true,
            "profilePicUrl": "https://cdn.example.com/std.jpg",
            "profilePicUrlHD": "https://cdn.example.com/hd.jpg"
        }));

        let profile = from_hasdata(&raw, None).unwrap();
        assert_eq!(profile.id, "42");
        assert_eq!(profile.niche, coachdex_common::Niche::Fitness);
        assert_eq!(profile.profile_picture, "https://cdn.example.com/std.jpg");
        assert!(profile.verified);
    }

    #[test]
    fn hasdata_non_german_account_is_rejected() {
        let raw = hasdata(json!({
            "username": "nyc_guru",
            "biography": "NYC #1 mindset guru"
        }));
        assert!(from_hasdata(&raw, None).is_none());
    }

    #[test]
    fn hasdata_missing_metrics_default_to_zero() {
        let raw = hasdata(json!({
            "username": "sparse",
            "biography": "Coach in München"
        }));
        let profile = from_hasdata(&raw, None).unwrap();
        assert_eq!(profile.followers_count, 0);
        assert_eq!(profile.follows_count, 0);
        assert_eq!(profile.posts_count, 0);
    }

    #[test]
    fn hasdata_id_falls_back_to_username() {
        let raw = hasdata(json!({
            "username": "no_id_here",
            "biography": "Berlin based"
        }));
        assert_eq!(from_hasdata(&raw, None).unwrap().id, "no_id_here");
    }

    #[test]
    fn hasdata_hd_image_is_fallback_only() {
        let raw = hasdata(json!({
            "username": "hd_only",
            "biography": "Hamburg",
            "profilePicUrlHD": "https://cdn.example.com/hd.jpg"
        }));
        assert_eq!(
            from_hasdata(&raw, None).unwrap().profile_picture,
            "https://cdn.example.com/hd.jpg"
        );
    }

    #[test]
    fn hasdata_explicit_niche_wins_over_detection() {
        let raw = hasdata(json!({
            "username": "x",
            "biography": "Fitness Trainer aus Köln"
        }));
        let profile = from_hasdata(&raw, Some(coachdex_common::Niche::Finance)).unwrap();
        assert_eq!(profile.niche, coachdex_common::Niche::Finance);
    }

    #[test]
    fn brightdata_private_account_yields_none() {
        let raw = brightdata(json!({
            "id": "1",
            "account": "x",
            "is_private": true,
            "biography": "Berlin"
        }));
        assert!(from_brightdata(&raw, "x", None).is_none());
    }

    #[test]
    fn brightdata_strips_masking_deterministically() {
        assert_eq!(strip_mask("j**n_doe"), "jn_doe");
        assert_eq!(strip_mask("j**n_doe"), "jn_doe");
        assert_eq!(strip_mask("clean"), "clean");
        assert_eq!(strip_mask("***"), "");
    }

    #[test]
    fn brightdata_masked_account_and_image() {
        let raw = brightdata(json!({
            "id": "77",
            "account": "co**h_m*x",
            "biography": "Mindset Coach, Wien",
            "profile_image_link": "https://cdn.exa**le.com/pic.jpg",
            "followers": 800,
            "is_verified": true
        }));

        let profile = from_brightdata(&raw, "coach_max", None).unwrap();
        assert_eq!(profile.username, "coh_mx");
        assert_eq!(profile.profile_picture, "https://cdn.exale.com/pic.jpg");
        assert!(profile.verified);
    }

    #[test]
    fn brightdata_fully_masked_image_is_dropped() {
        let raw = brightdata(json!({
            "id": "9",
            "account": "a",
            "biography": "Zürich",
            "profile_image_link": "**********"
        }));
        assert_eq!(from_brightdata(&raw, "a", None).unwrap().profile_picture, "");
    }

    #[test]
    fn brightdata_empty_account_uses_requested_handle() {
        let raw = brightdata(json!({
            "id": "5",
            "account": "***",
            "biography": "Deutschland"
        }));
        assert_eq!(
            from_brightdata(&raw, "requested_name", None).unwrap().username,
            "requested_name"
        );
    }

    #[test]
    fn brightdata_verified_flag_is_explicit_not_derived() {
        let raw = brightdata(json!({
            "id": "5",
            "account": "biz",
            "biography": "Deutschland",
            "is_business_account": true,
            "is_verified": false
        }));
        let profile = from_brightdata(&raw, "biz", None).unwrap();
        assert!(profile.is_business_account);
        assert!(!profile.verified);
    }

    #[test]
    fn brightdata_takes_first_external_url() {
        let raw = brightdata(json!({
            "id": "5",
            "account": "links",
            "biography": "Deutschland",
            "external_url": ["https://a.example", "https://b.example"]
        }));
        assert_eq!(
            from_brightdata(&raw, "links", None).unwrap().external_url.as_deref(),
            Some("https://a.example")
        );
    }
}
