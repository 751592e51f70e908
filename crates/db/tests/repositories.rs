use chrono::NaiveDate;
use cheers_core::person::RemindersMode;
use cheers_core::render::{DEFAULT_ANNIVERSARY_TEMPLATE, DEFAULT_BIRTHDAY_TEMPLATE};
use cheers_db::models::channel::{UpdateChannelSettings, UpdateChannelTemplates};
use cheers_db::models::person::UpsertPerson;
use cheers_db::models::workspace::{SaveInstallation, UpsertWorkspace};
use cheers_db::repositories::{ChannelRepo, OnboardingRepo, PersonRepo, WorkspaceRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_workspace(pool: &PgPool, team: &str) -> i64 {
    WorkspaceRepo::upsert(
        pool,
        &UpsertWorkspace {
            slack_team_id: team.to_string(),
            name: "Acme".to_string(),
            timezone: "UTC".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn person(user: &str, name: &str) -> UpsertPerson {
    UpsertPerson {
        display_name: name.to_string(),
        slack_handle: name.to_lowercase(),
        ..UpsertPerson::new(user)
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_passes(pool: PgPool) {
    cheers_db::health_check(&pool).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn birthday_pair_check_rejects_half_set(pool: PgPool) {
    let ws = seed_workspace(&pool, "T1").await;
    let result = sqlx::query(
        "INSERT INTO people (workspace_id, slack_user_id, birthday_day) VALUES ($1, 'U1', 3)",
    )
    .bind(ws)
    .execute(&pool)
    .await;
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Workspaces
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn workspace_upsert_is_keyed_by_team(pool: PgPool) {
    let first = seed_workspace(&pool, "T1").await;
    let again = WorkspaceRepo::upsert(
        &pool,
        &UpsertWorkspace {
            slack_team_id: "T1".to_string(),
            name: "Renamed".to_string(),
            timezone: "Europe/Berlin".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(again.id, first);
    assert_eq!(again.name, "Renamed");
    assert_eq!(again.timezone, "Europe/Berlin");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bot_token_is_read_back_after_install(pool: PgPool) {
    let ws = seed_workspace(&pool, "T1").await;
    assert_eq!(WorkspaceRepo::bot_token(&pool, ws).await.unwrap(), None);

    WorkspaceRepo::save_installation(
        &pool,
        &SaveInstallation {
            slack_team_id: "T1".to_string(),
            name: "Acme".to_string(),
            bot_token: "xoxb-1".to_string(),
            bot_user_id: "UBOT".to_string(),
            installed_by_user_id: None,
            scopes: Some("chat:write".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(
        WorkspaceRepo::bot_token(&pool, ws).await.unwrap().as_deref(),
        Some("xoxb-1")
    );
    let found = WorkspaceRepo::find_by_team_id(&pool, "T1").await.unwrap().unwrap();
    assert_eq!(found.slack_bot_user_id.as_deref(), Some("UBOT"));
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn channel_defaults_and_lookup(pool: PgPool) {
    let ws = seed_workspace(&pool, "T1").await;
    let channel = ChannelRepo::upsert_default(&pool, ws, "C1", "general", "UTC", "09:30")
        .await
        .unwrap();

    assert_eq!(channel.posting_time, "09:30");
    assert!(channel.birthdays_enabled);
    assert!(channel.anniversaries_enabled);
    assert_eq!(channel.birthday_template, DEFAULT_BIRTHDAY_TEMPLATE);
    assert_eq!(channel.anniversary_template, DEFAULT_ANNIVERSARY_TEMPLATE);

    let by_slack_id = ChannelRepo::find_for_workspace(&pool, ws, "C1").await.unwrap();
    let by_id = ChannelRepo::find_for_workspace(&pool, ws, &channel.id.to_string())
        .await
        .unwrap();
    assert_eq!(by_slack_id.unwrap().id, channel.id);
    assert_eq!(by_id.unwrap().id, channel.id);

    let other = seed_workspace(&pool, "T2").await;
    assert!(ChannelRepo::find_for_workspace(&pool, other, "C1")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn channel_settings_and_templates_update(pool: PgPool) {
    let ws = seed_workspace(&pool, "T1").await;
    let channel = ChannelRepo::upsert_default(&pool, ws, "C1", "general", "UTC", "09:00")
        .await
        .unwrap();

    let updated = ChannelRepo::update_settings(
        &pool,
        channel.id,
        &UpdateChannelSettings {
            posting_time: "17:45".to_string(),
            timezone: "Asia/Tokyo".to_string(),
            birthdays_enabled: false,
            anniversaries_enabled: true,
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.posting_time, "17:45");
    assert_eq!(updated.timezone, "Asia/Tokyo");
    assert!(!updated.birthdays_enabled);

    let updated = ChannelRepo::update_templates(
        &pool,
        channel.id,
        &UpdateChannelTemplates {
            birthday_template: "HB {users}".to_string(),
            anniversary_template: "HA {users} {years}".to_string(),
            branding_emoji: Some("  ".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.birthday_template, "HB {users}");
    assert_eq!(updated.branding_emoji, None);

    let refreshed = ChannelRepo::upsert_default(&pool, ws, "C1", "renamed", "UTC", "08:00")
        .await
        .unwrap();
    assert_eq!(refreshed.slack_channel_name, "renamed");
    assert_eq!(refreshed.birthday_template, "HB {users}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_dispatched_is_idempotent(pool: PgPool) {
    let ws = seed_workspace(&pool, "T1").await;
    let channel = ChannelRepo::upsert_default(&pool, ws, "C1", "general", "UTC", "09:00")
        .await
        .unwrap();
    let today = date(2024, 6, 10);

    assert!(!ChannelRepo::is_dispatched(&pool, channel.id, today).await.unwrap());

    let first = ChannelRepo::mark_dispatched(&pool, channel.id, today).await.unwrap();
    let second = ChannelRepo::mark_dispatched(&pool, channel.id, today).await.unwrap();
    assert!(first.is_some());
    assert!(second.is_none());

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM celebration_dispatch_log WHERE workspace_channel_id = $1",
    )
    .bind(channel.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(rows, 1);
    assert!(ChannelRepo::is_dispatched(&pool, channel.id, today).await.unwrap());
    assert!(!ChannelRepo::is_dispatched(&pool, channel.id, date(2024, 6, 11))
        .await
        .unwrap());
}

// ---------------------------------------------------------------------------
// People
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn birthdays_match_month_and_day_and_respect_opt_in(pool: PgPool) {
    let ws = seed_workspace(&pool, "T1").await;

    let mut ada = person("U1", "Ada");
    ada.birthday_day = Some(25);
    ada.birthday_month = Some(3);
    ada.birthday_year = Some(1990);
    PersonRepo::upsert(&pool, ws, &ada).await.unwrap();

    let mut bob = person("U2", "Bob");
    bob.birthday_day = Some(25);
    bob.birthday_month = Some(3);
    bob.public_celebration_opt_in = false;
    PersonRepo::upsert(&pool, ws, &bob).await.unwrap();

    let found = PersonRepo::find_birthdays(&pool, ws, 3, 25).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].slack_user_id, "U1");

    assert!(PersonRepo::find_birthdays(&pool, ws, 3, 26).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn leap_day_birthday_only_matches_feb_29(pool: PgPool) {
    let ws = seed_workspace(&pool, "T1").await;
    let mut leap = person("U1", "Leap");
    leap.birthday_day = Some(29);
    leap.birthday_month = Some(2);
    PersonRepo::upsert(&pool, ws, &leap).await.unwrap();

    assert_eq!(PersonRepo::find_birthdays(&pool, ws, 2, 29).await.unwrap().len(), 1);
    assert!(PersonRepo::find_birthdays(&pool, ws, 2, 28).await.unwrap().is_empty());
    assert!(PersonRepo::find_birthdays(&pool, ws, 3, 1).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn anniversaries_carry_years_elapsed(pool: PgPool) {
    let ws = seed_workspace(&pool, "T1").await;

    let mut ada = person("U1", "Ada");
    ada.hire_date = Some(date(2019, 6, 10));
    PersonRepo::upsert(&pool, ws, &ada).await.unwrap();

    let mut bob = person("U2", "Bob");
    bob.hire_date = Some(date(2021, 6, 10));
    PersonRepo::upsert(&pool, ws, &bob).await.unwrap();

    let found = PersonRepo::find_anniversaries(&pool, ws, 6, 10, 2024).await.unwrap();
    let pairs: Vec<(&str, i32)> = found
        .iter()
        .map(|a| (a.person.slack_user_id.as_str(), a.years))
        .collect();
    assert_eq!(pairs, vec![("U1", 5), ("U2", 3)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upsert_replaces_every_column(pool: PgPool) {
    let ws = seed_workspace(&pool, "T1").await;
    let mut ada = person("U1", "Ada");
    ada.hire_date = Some(date(2020, 1, 1));
    let created = PersonRepo::upsert(&pool, ws, &ada).await.unwrap();

    let mut changed = UpsertPerson::from_person(&created);
    changed.hire_date = None;
    changed.reminders_mode = RemindersMode::DayBefore;
    let updated = PersonRepo::upsert(&pool, ws, &changed).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.hire_date, None);
    assert_eq!(updated.reminders_mode(), RemindersMode::DayBefore);
    assert_eq!(updated.slack_handle, "ada");
}

// ---------------------------------------------------------------------------
// Onboarding log
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn onboarding_log_tracks_sent_users(pool: PgPool) {
    let ws = seed_workspace(&pool, "T1").await;
    OnboardingRepo::mark_sent(&pool, ws, "U1").await.unwrap();
    OnboardingRepo::mark_sent(&pool, ws, "U1").await.unwrap();
    OnboardingRepo::mark_sent(&pool, ws, "U2").await.unwrap();

    let sent = OnboardingRepo::sent_user_ids(&pool, ws).await.unwrap();
    assert_eq!(sent.len(), 2);
    assert!(sent.contains("U1"));
}
