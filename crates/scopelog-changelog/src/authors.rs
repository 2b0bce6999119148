//! Original authors of Copilot commits
//!
//! Commits created by the GitHub Copilot agent are authored by Copilot and
//! carry the requesting human as a `Co-authored-by:` trailer. The human's
//! GitHub login is recovered from that trailer.

use std::sync::LazyLock;

use regex::Regex;

/// `Co-authored-by: Name <email>` trailer lines
static CO_AUTHOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*co-authored-by:[ \t]*(?P<name>[^<\n]*?)[ \t]*<(?P<email>[^>\n]*)>[ \t]*$")
        .expect("Invalid regex")
});

const NOREPLY_DOMAIN: &str = "@users.noreply.github.com";
const COPILOT: &str = "copilot";

#[derive(Debug)]
struct CoAuthor<'a> {
    name: &'a str,
    email: &'a str,
}

impl CoAuthor<'_> {
    /// Login part of a GitHub noreply address (`12345+login@users.noreply.github.com`)
    fn noreply_login(&self) -> Option<&str> {
        let email = self.email.trim();
        if email.len() <= NOREPLY_DOMAIN.len()
            || !email.to_ascii_lowercase().ends_with(NOREPLY_DOMAIN)
        {
            return None;
        }
        let local = &email[..email.len() - NOREPLY_DOMAIN.len()];
        local.split('+').nth(1)
    }

    fn is_copilot(&self) -> bool {
        self.name.eq_ignore_ascii_case(COPILOT)
            || self
                .noreply_login()
                .is_some_and(|login| login.eq_ignore_ascii_case(COPILOT))
    }

    fn login(&self) -> Option<String> {
        let candidate = self.noreply_login().unwrap_or(self.name);
        is_github_login(candidate).then(|| candidate.to_string())
    }
}

/// GitHub login rules: 1-39 ASCII alphanumerics or single inner hyphens
fn is_github_login(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.len() <= 39
        && !candidate.starts_with('-')
        && !candidate.ends_with('-')
        && !candidate.contains("--")
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Resolve the GitHub login of the human behind a Copilot-authored commit.
///
/// Only messages with a Copilot co-author trailer qualify. The first
/// non-Copilot co-author is used: its noreply address when it has one,
/// otherwise its display name. Returns `None` if that yields no valid login.
pub fn copilot_original_author(message: &str) -> Option<String> {
    let co_authors: Vec<CoAuthor<'_>> = CO_AUTHOR_REGEX
        .captures_iter(message)
        .filter_map(|caps| {
            Some(CoAuthor {
                name: caps.name("name")?.as_str().trim(),
                email: caps.name("email")?.as_str(),
            })
        })
        .collect();

    if !co_authors.iter().any(CoAuthor::is_copilot) {
        return None;
    }

    co_authors
        .iter()
        .find(|author| !author.is_copilot())
        .and_then(CoAuthor::login)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(trailers: &str) -> String {
        format!(
            "A commit message\n\nsome description\n\nCo-authored-by: Copilot <Copilot@users.noreply.github.com>\n{}\n",
            trailers
        )
    }

    #[test]
    fn test_login_from_noreply_email() {
        let msg = message(
            "Co-authored-by: Some One <12345+expected-github-login@users.noreply.github.com>",
        );
        assert_eq!(
            copilot_original_author(&msg).as_deref(),
            Some("expected-github-login")
        );
    }

    #[test]
    fn test_unparsable_name_yields_none() {
        let msg = message("Co-authored-by: Somé Onežý <custom.email@example.com>");
        assert_eq!(copilot_original_author(&msg), None);
    }

    #[test]
    fn test_login_from_author_name() {
        let msg = message("Co-authored-by: expected-github-login <a-random-email@example.com>");
        assert_eq!(
            copilot_original_author(&msg).as_deref(),
            Some("expected-github-login")
        );
    }

    #[test]
    fn test_first_non_copilot_co_author_wins() {
        let msg = message(
            "Co-authored-by: first-author <12345+first-author@users.noreply.github.com>\n\
             Co-authored-by: second-author <67890+second-author@users.noreply.github.com>",
        );
        assert_eq!(copilot_original_author(&msg).as_deref(), Some("first-author"));
    }

    #[test]
    fn test_email_with_several_plus_signs() {
        let msg = message("Co-authored-by: Some User <12345+user+extra@users.noreply.github.com>");
        assert_eq!(copilot_original_author(&msg).as_deref(), Some("user"));
    }

    #[test]
    fn test_noreply_without_id_prefix_falls_back_to_name() {
        let msg = message("Co-authored-by: Jane Doe <janedoe@users.noreply.github.com>");
        assert_eq!(copilot_original_author(&msg), None);

        let msg = message("Co-authored-by: jane-doe <janedoe@users.noreply.github.com>");
        assert_eq!(copilot_original_author(&msg).as_deref(), Some("jane-doe"));
    }

    #[test]
    fn test_author_name_is_trimmed() {
        let msg = message("Co-authored-by:  trimmed-username  <email@example.com>");
        assert_eq!(
            copilot_original_author(&msg).as_deref(),
            Some("trimmed-username")
        );
    }

    #[test]
    fn test_underscore_login_is_rejected() {
        let msg = message("Co-authored-by: Some User <12345+user_name@users.noreply.github.com>");
        assert_eq!(copilot_original_author(&msg), None);
    }

    #[test]
    fn test_commit_without_copilot_is_ignored() {
        let msg = "fix: thing\n\nCo-authored-by: someone <1+someone@users.noreply.github.com>\n";
        assert_eq!(copilot_original_author(msg), None);
    }

    #[test]
    fn test_github_login_rules() {
        assert!(is_github_login("a"));
        assert!(is_github_login("octo-cat9"));
        assert!(!is_github_login("-octo"));
        assert!(!is_github_login("octo--cat"));
        assert!(!is_github_login(&"a".repeat(40)));
    }
}
