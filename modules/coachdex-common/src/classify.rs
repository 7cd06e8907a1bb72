//! Pure text heuristics over bio and display-name strings: the
//! German-speaking locale gate and the niche keyword classifier. No I/O,
//! deterministic, total.

use crate::types::Niche;

/// Tokens that mark a German-speaking account: country/language markers,
/// major German cities, and Austria/Switzerland markers.
const GERMAN_INDICATORS: &[&str] = &[
    "deutschland",
    "germany",
    "deutsch",
    "berlin",
    "münchen",
    "hamburg",
    "köln",
    "frankfurt",
    "stuttgart",
    "düsseldorf",
    "de",
    "🇩🇪",
    "german",
    "deutsche",
    "deutscher",
    "deutschsprachig",
    "wien",
    "zürich",
    "schweiz",
    "österreich",
];

/// Ordered niche keyword table. Declaration order is the tie-break: when a
/// bio matches several categories, the first listed here wins.
const NICHE_KEYWORDS: &[(Niche, &[&str])] = &[
    (
        Niche::Fitness,
        &[
            "fitness",
            "trainer",
            "workout",
            "gym",
            "sport",
            "athlet",
            "training",
            "fit",
            "bodybuilding",
            "yoga",
            "pilates",
        ],
    ),
    (
        Niche::Business,
        &[
            "business",
            "entrepreneur",
            "startup",
            "founder",
            "ceo",
            "coach",
            "consultant",
            "business coach",
        ],
    ),
    (
        Niche::Marketing,
        &[
            "marketing",
            "social media",
            "content creator",
            "influencer",
            "brand",
            "advertising",
            "digital marketing",
        ],
    ),
    (
        Niche::Finance,
        &[
            "finance", "invest", "money", "wealth", "financial", "trading", "crypto", "stock",
            "finanz",
        ],
    ),
    (
        Niche::PersonalDevelopment,
        &[
            "personal development",
            "self improvement",
            "mindset",
            "motivation",
            "growth",
            "success",
            "life coach",
        ],
    ),
    (
        Niche::Nutrition,
        &[
            "nutrition",
            "food",
            "diet",
            "healthy eating",
            "meal",
            "recipe",
            "ernährung",
            "ernährungsberater",
        ],
    ),
    (
        Niche::Mindfulness,
        &[
            "mindfulness",
            "meditation",
            "yoga",
            "zen",
            "mental health",
            "wellness",
            "mindful",
            "achtsamkeit",
        ],
    ),
    (
        Niche::HealthWellness,
        &[
            "wellness",
            "health",
            "healthy",
            "wellbeing",
            "gesundheit",
            "wohlbefinden",
        ],
    ),
    (
        Niche::Entrepreneurship,
        &[
            "entrepreneur",
            "startup",
            "founder",
            "business owner",
            "startup coach",
        ],
    ),
];

fn combined(bio: Option<&str>, full_name: Option<&str>) -> String {
    format!("{} {}", bio.unwrap_or(""), full_name.unwrap_or("")).to_lowercase()
}

/// Whether an account is likely German-speaking, judged from bio and
/// display-name text. Matching is plain substring containment; short
/// tokens like "de" can fire inside unrelated words. That looseness is a
/// known property of the heuristic and is covered by a pinning test.
pub fn is_german_account(bio: Option<&str>, full_name: Option<&str>) -> bool {
    if bio.is_none() && full_name.is_none() {
        return false;
    }
    let text = combined(bio, full_name);
    GERMAN_INDICATORS
        .iter()
        .any(|indicator| text.contains(indicator))
}

/// Classify a profile's content niche from bio and display-name text.
/// First category in the table with any keyword hit wins; no hit at all
/// falls back to `Lifestyle`.
pub fn detect_niche(bio: Option<&str>, full_name: Option<&str>) -> Niche {
    if bio.is_none() && full_name.is_none() {
        return Niche::Lifestyle;
    }
    let text = combined(bio, full_name);
    for (niche, keywords) in NICHE_KEYWORDS {
        if keywords.iter().any(|keyword| text.contains(keyword)) {
            return *niche;
        }
    }
    Niche::Lifestyle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn german_city_in_bio() {
        assert!(is_german_account(Some("Coach aus Berlin 💪"), None));
    }

    #[test]
    fn german_flag_emoji() {
        assert!(is_german_account(None, Some("Max 🇩🇪")));
    }

    #[test]
    fn austria_and_switzerland_count_as_german_speaking() {
        assert!(is_german_account(Some("Mentaltraining in Wien"), None));
        assert!(is_german_account(Some("Coaching, Zürich & online"), None));
    }

    #[test]
    fn absent_inputs_are_not_german() {
        assert!(!is_german_account(None, None));
    }

    #[test]
    fn unrelated_text_is_not_german() {
        assert!(!is_german_account(Some("NYC fitness guru"), Some("Joe")));
    }

    // Pins the accepted substring limitation: "de" fires inside words.
    #[test]
    fn short_token_substring_false_positive() {
        assert!(is_german_account(Some("confidence coach"), None));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(is_german_account(Some("DEUTSCHLAND"), None));
    }

    #[test]
    fn meditation_is_mindfulness() {
        assert_eq!(
            detect_niche(Some("meditation und achtsamkeit"), None),
            Niche::Mindfulness
        );
    }

    #[test]
    fn table_order_breaks_ties() {
        // "yoga" is listed under both Fitness and Mindfulness; Fitness is
        // declared first and wins.
        assert_eq!(detect_niche(Some("yoga every morning"), None), Niche::Fitness);
        // "entrepreneur" is under Business and Entrepreneurship; Business wins.
        assert_eq!(
            detect_niche(Some("entrepreneur at heart"), None),
            Niche::Business
        );
    }

    #[test]
    fn finance_keywords() {
        assert_eq!(detect_niche(Some("crypto & invest tips"), None), Niche::Finance);
    }

    #[test]
    fn german_nutrition_keyword() {
        assert_eq!(
            detect_niche(Some("Ernährungsberater aus Hamburg"), None),
            Niche::Nutrition
        );
    }

    #[test]
    fn unmatched_text_defaults_to_lifestyle() {
        assert_eq!(detect_niche(Some("just vibes"), None), Niche::Lifestyle);
    }

    #[test]
    fn absent_inputs_default_to_lifestyle() {
        assert_eq!(detect_niche(None, None), Niche::Lifestyle);
    }

    #[test]
    fn full_name_alone_can_classify() {
        assert_eq!(
            detect_niche(None, Some("Lisa | Fitness Trainer")),
            Niche::Fitness
        );
    }
}
