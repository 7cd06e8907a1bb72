use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::warn;

use coachdex_common::Niche;
use coachdex_store::DirectoryFilter;

use crate::AppState;

const DEFAULT_PAGE_SIZE: i64 = 100;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryQuery {
    search: Option<String>,
    /// Comma-separated niche labels, e.g. `Fitness,Health & Wellness`.
    niche: Option<String>,
    min_followers: Option<i64>,
    max_followers: Option<i64>,
    page: Option<i64>,
    limit: Option<i64>,
}

fn parse_niches(raw: &str) -> Vec<Niche> {
    raw.split(',')
        .filter_map(|label| Niche::from_label(label.trim()))
        .collect()
}

/// GET /api/coaches — one page of the directory with filter counts.
pub async fn api_coaches(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DirectoryQuery>,
) -> impl IntoResponse {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 200);

    let filter = DirectoryFilter {
        search: params.search.filter(|s| !s.is_empty()),
        niches: params.niche.as_deref().map(parse_niches).unwrap_or_default(),
        min_followers: params.min_followers.unwrap_or(0),
        max_followers: params.max_followers.unwrap_or(0),
        page,
        limit,
    };

    match state.profiles.directory(&filter).await {
        Ok(result) => {
            let total_pages = result.total.div_ceil(limit);
            Json(serde_json::json!({
                "profiles": result.profiles,
                "pagination": {
                    "page": page,
                    "limit": limit,
                    "total": result.total,
                    "globalTotal": result.global_total,
                    "totalPages": total_pages,
                }
            }))
            .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Failed to load directory page");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to fetch coaches" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_niches() {
        assert_eq!(
            parse_niches("Fitness,Health & Wellness"),
            vec![Niche::Fitness, Niche::HealthWellness]
        );
    }

    #[test]
    fn unknown_labels_are_dropped() {
        assert_eq!(parse_niches("Fitness,Astrology"), vec![Niche::Fitness]);
        assert!(parse_niches("Astrology").is_empty());
    }

    #[test]
    fn labels_are_trimmed() {
        assert_eq!(
            parse_niches(" Business , Finance "),
            vec![Niche::Business, Niche::Finance]
        );
    }

    #[test]
    fn page_arithmetic() {
        // 120 matches at 50 per page → 3 pages.
        assert_eq!(120i64.div_ceil(50), 3);
        // Exact multiple.
        assert_eq!(100i64.div_ceil(50), 2);
        // No matches still reports zero pages.
        assert_eq!(0i64.div_ceil(50), 0);
    }
}
