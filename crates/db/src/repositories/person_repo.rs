//! Repository for the `people` table.

use cheers_core::types::DbId;
use sqlx::PgPool;

use crate::models::person::{AnniversaryPerson, Person, UpsertPerson};

/// Column list for `people` queries.
const COLUMNS: &str = "\
    id, workspace_id, slack_user_id, slack_handle, display_name, avatar_url, \
    birthday_day, birthday_month, birthday_year, hire_date, \
    public_celebration_opt_in, reminders_mode, created_at, updated_at";

/// Provides data access for tracked workspace members.
pub struct PersonRepo;

impl PersonRepo {
    /// All people in a workspace ordered by display name.
    pub async fn list_by_workspace(
        pool: &PgPool,
        workspace_id: DbId,
    ) -> Result<Vec<Person>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM people \
             WHERE workspace_id = $1 \
             ORDER BY display_name, slack_user_id"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(workspace_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_workspace_and_user(
        pool: &PgPool,
        workspace_id: DbId,
        slack_user_id: &str,
    ) -> Result<Option<Person>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM people \
             WHERE workspace_id = $1 AND slack_user_id = $2"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(workspace_id)
            .bind(slack_user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or fully replace a person keyed by (workspace, Slack user id).
    ///
    /// Callers that want to keep existing values must merge them first.
    pub async fn upsert(
        pool: &PgPool,
        workspace_id: DbId,
        input: &UpsertPerson,
    ) -> Result<Person, sqlx::Error> {
        let query = format!(
            "INSERT INTO people \
                 (workspace_id, slack_user_id, slack_handle, display_name, avatar_url, \
                  birthday_day, birthday_month, birthday_year, hire_date, \
                  public_celebration_opt_in, reminders_mode) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (workspace_id, slack_user_id) DO UPDATE SET \
                 slack_handle = EXCLUDED.slack_handle, \
                 display_name = EXCLUDED.display_name, \
                 avatar_url = EXCLUDED.avatar_url, \
                 birthday_day = EXCLUDED.birthday_day, \
                 birthday_month = EXCLUDED.birthday_month, \
                 birthday_year = EXCLUDED.birthday_year, \
                 hire_date = EXCLUDED.hire_date, \
                 public_celebration_opt_in = EXCLUDED.public_celebration_opt_in, \
                 reminders_mode = EXCLUDED.reminders_mode, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(workspace_id)
            .bind(&input.slack_user_id)
            .bind(&input.slack_handle)
            .bind(&input.display_name)
            .bind(&input.avatar_url)
            .bind(input.birthday_day)
            .bind(input.birthday_month)
            .bind(input.birthday_year)
            .bind(input.hire_date)
            .bind(input.public_celebration_opt_in)
            .bind(input.reminders_mode.as_str())
            .fetch_one(pool)
            .await
    }

    /// Opted-in people whose birthday falls on (month, day). Year is ignored.
    pub async fn find_birthdays(
        pool: &PgPool,
        workspace_id: DbId,
        month: u32,
        day: u32,
    ) -> Result<Vec<Person>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM people \
             WHERE workspace_id = $1 \
               AND public_celebration_opt_in = TRUE \
               AND birthday_month = $2 \
               AND birthday_day = $3 \
             ORDER BY display_name, slack_user_id"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(workspace_id)
            .bind(month as i16)
            .bind(day as i16)
            .fetch_all(pool)
            .await
    }

    /// Opted-in people hired on (month, day), with years elapsed at `year`.
    pub async fn find_anniversaries(
        pool: &PgPool,
        workspace_id: DbId,
        month: u32,
        day: u32,
        year: i32,
    ) -> Result<Vec<AnniversaryPerson>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, ($4 - EXTRACT(YEAR FROM hire_date)::int) AS years \
             FROM people \
             WHERE workspace_id = $1 \
               AND public_celebration_opt_in = TRUE \
               AND hire_date IS NOT NULL \
               AND EXTRACT(MONTH FROM hire_date)::int = $2 \
               AND EXTRACT(DAY FROM hire_date)::int = $3 \
             ORDER BY display_name, slack_user_id"
        );
        sqlx::query_as::<_, AnniversaryPerson>(&query)
            .bind(workspace_id)
            .bind(month as i32)
            .bind(day as i32)
            .bind(year)
            .fetch_all(pool)
            .await
    }
}
