// Postgres persistence for coach profiles.

use chrono::{DateTime, TimeZone, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::warn;

use coachdex_common::{Niche, Profile};

use crate::error::Result;

pub struct ProfileStore {
    pool: PgPool,
}

/// A row from the profiles table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ProfileRow {
    username: String,
    upstream_id: String,
    full_name: Option<String>,
    biography: Option<String>,
    profile_picture: String,
    external_url: Option<String>,
    followers_count: i64,
    follows_count: i64,
    posts_count: i64,
    niche: String,
    is_business_account: bool,
    is_professional_account: bool,
    verified: bool,
    last_fetched: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        let niche = Niche::from_label(&row.niche).unwrap_or_else(|| {
            warn!(username = %row.username, niche = %row.niche, "Unknown niche label in database");
            Niche::Lifestyle
        });
        Profile {
            id: row.upstream_id,
            username: row.username,
            full_name: row.full_name,
            biography: row.biography,
            profile_picture: row.profile_picture,
            external_url: row.external_url,
            followers_count: row.followers_count,
            follows_count: row.follows_count,
            posts_count: row.posts_count,
            niche,
            is_business_account: row.is_business_account,
            is_professional_account: row.is_professional_account,
            verified: row.verified,
            last_fetched: row.last_fetched,
        }
    }
}

/// Directory filter state as it arrives from the UI. Zero follower bounds
/// mean "unset"; both bounds are inclusive when present.
#[derive(Debug, Clone, Default)]
pub struct DirectoryFilter {
    pub search: Option<String>,
    pub niches: Vec<Niche>,
    pub min_followers: i64,
    pub max_followers: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone)]
pub struct DirectoryPage {
    pub profiles: Vec<Profile>,
    /// Count of profiles matching the filter, across all pages.
    pub total: i64,
    /// Count of all profiles, ignoring the filter.
    pub global_total: i64,
}

/// Minimal projection for the image-migration pass.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RehostCandidate {
    pub username: String,
    pub profile_picture: String,
}

impl ProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or update a profile. The key is the lowercased username, so
    /// a re-scrape under different casing updates the existing row instead
    /// of tripping the case-insensitive unique index. Always refreshes
    /// `last_fetched`.
    pub async fn upsert(&self, profile: &Profile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles
                (username, upstream_id, full_name, biography, profile_picture,
                 external_url, followers_count, follows_count, posts_count,
                 niche, is_business_account, is_professional_account, verified,
                 last_fetched)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, now())
            ON CONFLICT (username) DO UPDATE SET
                upstream_id = EXCLUDED.upstream_id,
                full_name = EXCLUDED.full_name,
                biography = EXCLUDED.biography,
                profile_picture = EXCLUDED.profile_picture,
                external_url = EXCLUDED.external_url,
                followers_count = EXCLUDED.followers_count,
                follows_count = EXCLUDED.follows_count,
                posts_count = EXCLUDED.posts_count,
                niche = EXCLUDED.niche,
                is_business_account = EXCLUDED.is_business_account,
                is_professional_account = EXCLUDED.is_professional_account,
                verified = EXCLUDED.verified,
                last_fetched = now()
            "#,
        )
        .bind(canonical_username(&profile.username))
        .bind(&profile.id)
        .bind(&profile.full_name)
        .bind(&profile.biography)
        .bind(&profile.profile_picture)
        .bind(&profile.external_url)
        .bind(profile.followers_count)
        .bind(profile.follows_count)
        .bind(profile.posts_count)
        .bind(profile.niche.as_label())
        .bind(profile.is_business_account)
        .bind(profile.is_professional_account)
        .bind(profile.verified)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Case-insensitive lookup by username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT * FROM profiles
            WHERE lower(username) = lower($1)
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Profile::from))
    }

    /// One page of the directory, ordered by descending follower count,
    /// plus the filtered count and the unfiltered global count.
    pub async fn directory(&self, filter: &DirectoryFilter) -> Result<DirectoryPage> {
        let page = filter.page.max(1);
        let limit = filter.limit.max(1);
        let offset = (page - 1) * limit;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM profiles WHERE TRUE");
        push_filters(&mut select, filter);
        select
            .push(" ORDER BY followers_count DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows: Vec<ProfileRow> = select
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM profiles WHERE TRUE");
        push_filters(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let global_total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await?;

        Ok(DirectoryPage {
            profiles: rows.into_iter().map(Profile::from).collect(),
            total,
            global_total,
        })
    }

    /// Profiles whose picture is missing or not yet on the storage host.
    pub async fn rehost_candidates(&self, storage_base_url: &str) -> Result<Vec<RehostCandidate>> {
        let pattern = format!("{storage_base_url}%");
        let rows = sqlx::query_as::<_, RehostCandidate>(
            r#"
            SELECT username, profile_picture FROM profiles
            WHERE profile_picture = '' OR profile_picture NOT LIKE $1
            ORDER BY username ASC
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Force a profile past the freshness TTL by resetting its staleness
    /// marker to the Unix epoch.
    pub async fn mark_stale(&self, username: &str) -> Result<()> {
        let epoch = Utc.timestamp_opt(0, 0).single().unwrap_or_else(Utc::now);
        sqlx::query(
            r#"
            UPDATE profiles SET last_fetched = $2
            WHERE lower(username) = lower($1)
            "#,
        )
        .bind(username)
        .bind(epoch)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Canonical form of a username as stored in the profiles table. Handles
/// are case-insensitive upstream, and admins type them by hand.
fn canonical_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Append the directory WHERE clauses shared by the page and count queries.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &DirectoryFilter) {
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        qb.push(" AND (username ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR full_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if !filter.niches.is_empty() {
        let labels: Vec<String> = filter
            .niches
            .iter()
            .map(|n| n.as_label().to_string())
            .collect();
        qb.push(" AND niche = ANY(").push_bind(labels).push(")");
    }
    if filter.min_followers > 0 {
        qb.push(" AND followers_count >= ").push_bind(filter.min_followers);
    }
    if filter.max_followers > 0 {
        qb.push(" AND followers_count <= ").push_bind(filter.max_followers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_for(filter: &DirectoryFilter) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM profiles WHERE TRUE");
        push_filters(&mut qb, filter);
        qb.sql().to_string()
    }

    #[test]
    fn empty_filter_adds_no_clauses() {
        let sql = sql_for(&DirectoryFilter::default());
        assert_eq!(sql, "SELECT * FROM profiles WHERE TRUE");
    }

    #[test]
    fn search_matches_username_or_full_name() {
        let filter = DirectoryFilter {
            search: Some("anna".into()),
            ..Default::default()
        };
        let sql = sql_for(&filter);
        assert!(sql.contains("username ILIKE"));
        assert!(sql.contains("OR full_name ILIKE"));
    }

    #[test]
    fn blank_search_is_ignored() {
        let filter = DirectoryFilter {
            search: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(sql_for(&filter), "SELECT * FROM profiles WHERE TRUE");
    }

    #[test]
    fn follower_bounds_are_inclusive() {
        let filter = DirectoryFilter {
            min_followers: 1000,
            max_followers: 5000,
            ..Default::default()
        };
        let sql = sql_for(&filter);
        assert!(sql.contains("followers_count >="));
        assert!(sql.contains("followers_count <="));
    }

    #[test]
    fn zero_bounds_are_unset() {
        let sql = sql_for(&DirectoryFilter::default());
        assert!(!sql.contains("followers_count"));
    }

    #[test]
    fn niche_filter_uses_set_membership() {
        let filter = DirectoryFilter {
            niches: vec![Niche::Fitness, Niche::Business],
            ..Default::default()
        };
        assert!(sql_for(&filter).contains("niche = ANY("));
    }

    #[test]
    fn usernames_are_stored_lowercase() {
        // "Anna" and "anna" must land on the same row, or the second
        // write collides with the case-insensitive unique index.
        assert_eq!(canonical_username("Anna"), "anna");
        assert_eq!(canonical_username("anna"), "anna");
        assert_eq!(canonical_username(" Coach_B "), "coach_b");
    }

    #[test]
    fn unknown_niche_label_falls_back_to_lifestyle() {
        let row = ProfileRow {
            username: "x".into(),
            upstream_id: "1".into(),
            full_name: None,
            biography: None,
            profile_picture: String::new(),
            external_url: None,
            followers_count: 0,
            follows_count: 0,
            posts_count: 0,
            niche: "Astrology".into(),
            is_business_account: false,
            is_professional_account: false,
            verified: false,
            last_fetched: Utc::now(),
        };
        assert_eq!(Profile::from(row).niche, Niche::Lifestyle);
    }
}
