//! Bracketed flags and pull request references

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// `[token]`, non-greedy, no nesting
static FLAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("Invalid regex"));

/// `(#123)` references, the form squash merges append to subjects
static PAREN_PR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#\d+\)").expect("Invalid regex"));

/// Any `#123` reference, parenthesized or bare
static PR_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d+)\b").expect("Invalid regex"));

/// Remove every `[flag]` from `subject` and return the flags.
///
/// The subject is trimmed after each removal; flags keep their case.
pub fn extract_flags(subject: &mut String) -> BTreeSet<String> {
    let tokens: Vec<String> = FLAG_REGEX
        .find_iter(subject)
        .map(|m| m.as_str().to_string())
        .collect();

    let mut flags = BTreeSet::new();
    for token in tokens {
        *subject = subject.replacen(&token, "", 1).trim().to_string();
        flags.insert(token[1..token.len() - 1].trim().to_string());
    }
    flags
}

/// Remove `(#123)` references from a display subject
pub fn strip_pr_references(subject: &str) -> String {
    PAREN_PR_REGEX.replace_all(subject, "").trim().to_string()
}

/// Collect positive PR numbers referenced anywhere in a message
pub fn extract_pr_numbers(message: &str) -> BTreeSet<u64> {
    PR_NUMBER_REGEX
        .captures_iter(message)
        .filter_map(|caps| caps[1].parse::<u64>().ok())
        .filter(|n| *n > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_flag() {
        let mut subject = "some admin change [admin]".to_string();
        let flags = extract_flags(&mut subject);
        assert_eq!(subject, "some admin change");
        assert!(flags.contains("admin"));
    }

    #[test]
    fn test_extract_adjacent_flags() {
        let mut subject = "Change to ignore [ignore][admin]".to_string();
        let flags = extract_flags(&mut subject);
        assert_eq!(subject, "Change to ignore");
        assert_eq!(flags.len(), 2);
        assert!(flags.contains("ignore"));
        assert!(flags.contains("admin"));
    }

    #[test]
    fn test_flag_text_is_trimmed_but_keeps_case() {
        let mut subject = "[ skip ci ] bump [Internal]".to_string();
        let flags = extract_flags(&mut subject);
        assert_eq!(subject, "bump");
        assert!(flags.contains("skip ci"));
        assert!(flags.contains("Internal"));
        assert!(!flags.contains("internal"));
    }

    #[test]
    fn test_subject_of_only_flags_becomes_empty() {
        let mut subject = "[internal]".to_string();
        extract_flags(&mut subject);
        assert!(subject.is_empty());
    }

    #[test]
    fn test_unknown_flags_are_still_stripped() {
        let mut subject = "tidy up [wip]".to_string();
        let flags = extract_flags(&mut subject);
        assert_eq!(subject, "tidy up");
        assert!(flags.contains("wip"));
    }

    #[test]
    fn test_strip_paren_references_only() {
        assert_eq!(strip_pr_references("Change sign-up text (#46)"), "Change sign-up text");
        assert_eq!(strip_pr_references("x #15"), "x #15");
        assert_eq!(strip_pr_references("a (#1) b (#2)"), "a  b");
    }

    #[test]
    fn test_extract_both_reference_forms() {
        assert_eq!(
            extract_pr_numbers("feat: first feature (#10)"),
            BTreeSet::from([10])
        );
        assert_eq!(extract_pr_numbers("chore: x #15"), BTreeSet::from([15]));
        assert!(extract_pr_numbers("feat: no reference").is_empty());
    }

    #[test]
    fn test_references_in_body_are_found_and_deduplicated() {
        let message = "fix: thing (#7)\n\nFollow-up to #7 and #8";
        assert_eq!(extract_pr_numbers(message), BTreeSet::from([7, 8]));
    }

    #[test]
    fn test_zero_and_glued_references_are_ignored() {
        assert!(extract_pr_numbers("fix: #0 and #12abc").is_empty());
    }
}
