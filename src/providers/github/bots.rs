/// Logins that identify the Copilot coding agent.
const BOT_AUTHOR_PATTERNS: &[&str] = &["copilot", "github-copilot", "copilot-swe-agent"];

/// Returns whether `login` belongs to an automated Copilot contributor.
///
/// A login matches a pattern exactly, with the `[bot]` suffix GitHub Apps
/// carry, or as a `pattern-` prefix. Comparison is case-insensitive.
pub fn is_bot_author(login: &str) -> bool {
    let login = login.to_lowercase();

    BOT_AUTHOR_PATTERNS.iter().any(|pattern| {
        login == *pattern
            || login
                .strip_suffix("[bot]")
                .is_some_and(|name| name == *pattern)
            || login
                .strip_prefix(pattern)
                .is_some_and(|rest| rest.starts_with('-'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_exact_login() {
        assert!(is_bot_author("copilot"));
        assert!(is_bot_author("github-copilot"));
    }

    #[test]
    fn matches_app_suffix() {
        assert!(is_bot_author("copilot[bot]"));
        assert!(is_bot_author("copilot-swe-agent[bot]"));
    }

    #[test]
    fn matches_dash_prefix() {
        assert!(is_bot_author("copilot-agent"));
    }

    #[test]
    fn ignores_case() {
        assert!(is_bot_author("Copilot"));
        assert!(is_bot_author("GitHub-Copilot"));
    }

    #[test]
    fn rejects_other_bots_and_users() {
        assert!(!is_bot_author("dependabot"));
        assert!(!is_bot_author("dependabot[bot]"));
        assert!(!is_bot_author("regularuser"));
        assert!(!is_bot_author(""));
    }

    #[test]
    fn rejects_partial_matches() {
        assert!(!is_bot_author("copilotfan"));
        assert!(!is_bot_author("notcopilot"));
        assert!(!is_bot_author("copilot[bot]x"));
    }
}
