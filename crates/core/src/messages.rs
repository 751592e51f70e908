//! Direct-message texts sent back to workspace members.

use crate::profile_input::ParsedProfileInput;

const FORMAT_HELP: &str = "Reply with one or both lines in this format:\n```text\nmarch 25\njanuary 23, 2024\n```\nUse `month day` for birthday and `month day, year` for hire date (year is required).";

/// Help reply for a message that could not be parsed. `reason` is embedded
/// when non-blank.
pub fn profile_input_help(reason: &str) -> String {
    let reason = reason.trim();
    if reason.is_empty() {
        FORMAT_HELP.to_string()
    } else {
        format!("I couldn't save that yet ({reason}). {FORMAT_HELP}")
    }
}

/// Acknowledgement after a successful profile update.
pub fn save_acknowledgement(parsed: &ParsedProfileInput) -> &'static str {
    match (parsed.has_birthday(), parsed.has_hire_date()) {
        (true, true) => "Saved your birthday and hire date! Thank you for sharing with SlackCheers :yellow_heart::tada: We can't wait to celebrate you on your special day :birthday::partying_face: and your work anniversary!",
        (true, false) => "Saved your birthday! Thank you for sharing with SlackCheers :yellow_heart::tada: We can't wait to celebrate you on your special day :birthday::partying_face:",
        (false, true) => "Saved your hire date! Thank you for sharing with SlackCheers :yellow_heart::tada: We can't wait to celebrate your work anniversary!",
        (false, false) => "Saved your profile updates.",
    }
}

/// First-contact DM asking a member for their dates.
pub fn onboarding_message(name: &str) -> String {
    let name = name.trim().trim_end_matches(['.', '!', '?', ',']);
    let name = if name.is_empty() { "there" } else { name };

    format!(
        "Hi {name}!\n\nSlackCheers is now active in your workspace to celebrate great moments.\n\nTell us your birthday: `month day` and hire date: `month day, year`\n\nYou can send only birthday or only hire date, and update later anytime."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile_input::parse;

    #[test]
    fn help_embeds_reason() {
        let text = profile_input_help("multiple birthday lines provided");
        assert!(text.starts_with("I couldn't save that yet (multiple birthday lines provided). Reply"));
    }

    #[test]
    fn help_without_reason_is_just_the_format() {
        assert!(profile_input_help("  ").starts_with("Reply with one or both lines"));
    }

    #[test]
    fn acknowledgement_varies_by_content() {
        let both = parse("march 25\njanuary 23, 2024").unwrap();
        assert!(save_acknowledgement(&both).starts_with("Saved your birthday and hire date!"));

        let birthday = parse("march 25").unwrap();
        assert!(save_acknowledgement(&birthday).starts_with("Saved your birthday!"));

        let hire = parse("january 23, 2024").unwrap();
        assert!(save_acknowledgement(&hire).starts_with("Saved your hire date!"));

        assert_eq!(
            save_acknowledgement(&ParsedProfileInput::default()),
            "Saved your profile updates."
        );
    }

    #[test]
    fn onboarding_greets_by_cleaned_name() {
        assert!(onboarding_message("  Ada!! ").starts_with("Hi Ada!\n\n"));
        assert!(onboarding_message("?").starts_with("Hi there!\n\n"));
    }
}
