//! Celebration message rendering.
//!
//! Templates are plain strings with two placeholders: `{users}` becomes a
//! comma-joined list of Slack mentions and `{years}` becomes a parallel
//! comma-joined list of anniversary years (empty for birthdays).

/// Upper bound on avatar images attached to one post.
pub const MAX_AVATAR_BLOCKS: usize = 8;

pub const USERS_PLACEHOLDER: &str = "{users}";
pub const YEARS_PLACEHOLDER: &str = "{years}";

pub const DEFAULT_BIRTHDAY_TEMPLATE: &str = "Happy birthday {users}! :birthday:";
pub const DEFAULT_ANNIVERSARY_TEMPLATE: &str =
    "Happy work anniversary {users}! Celebrating {years} year(s) with the team :tada:";

/// `<@U1>, <@U2>` in input order.
pub fn mention_list<'a, I>(slack_user_ids: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    slack_user_ids
        .into_iter()
        .map(|id| format!("<@{id}>"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Birthday post text: `{years}` is blanked.
pub fn render_birthday(template: &str, mentions: &str, branding: Option<&str>) -> String {
    let text = template
        .replace(USERS_PLACEHOLDER, mentions)
        .replace(YEARS_PLACEHOLDER, "");
    with_branding(text.trim(), branding)
}

/// Anniversary post text. `years` is parallel to the mention list.
pub fn render_anniversary(
    template: &str,
    mentions: &str,
    years: &[i32],
    branding: Option<&str>,
) -> String {
    let years = years
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let text = template
        .replace(USERS_PLACEHOLDER, mentions)
        .replace(YEARS_PLACEHOLDER, &years);
    with_branding(text.trim(), branding)
}

/// Append ` <emoji>` when a non-blank branding suffix is configured.
pub fn with_branding(text: &str, branding: Option<&str>) -> String {
    match branding.map(str::trim).filter(|b| !b.is_empty()) {
        Some(suffix) => format!("{text} {suffix}"),
        None => text.to_string(),
    }
}

/// Non-blank avatar URLs, capped at [`MAX_AVATAR_BLOCKS`].
pub fn avatar_refs<'a, I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    urls.into_iter()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .take(MAX_AVATAR_BLOCKS)
        .map(str::to_string)
        .collect()
}
