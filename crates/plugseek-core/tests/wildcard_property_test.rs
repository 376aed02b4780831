//! Property-based tests for wildcard matching
//!
//! Uses proptest to check the matcher's laws over generated names and
//! patterns, and against a straightforward recursive matcher.

use plugseek_core::wildcard::{match_wildcard, match_wildcards};
use proptest::prelude::*;

/// Exhaustive recursive matcher; exponential, fine for short inputs.
fn reference_match(text: &[char], pattern: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some((&'*', rest)) => (0..=text.len()).any(|skip| reference_match(&text[skip..], rest)),
        Some((&p, rest)) => match text.split_first() {
            Some((&t, text_rest)) => (p == '?' || p == t) && reference_match(text_rest, rest),
            None => false,
        },
    }
}

fn collapse_stars(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if !(c == '*' && out.ends_with('*')) {
            out.push(c);
        }
    }
    out
}

/// Property: a pattern without wildcards matches exactly itself
proptest! {
    #[test]
    fn prop_literal_pattern_is_equality(text in "[ab.]{0,6}", pattern in "[ab.]{0,6}") {
        prop_assert_eq!(match_wildcard(&text, &pattern), text == pattern);
    }
}

/// Property: `*` and any run of stars match every string
proptest! {
    #[test]
    fn prop_star_matches_everything(text in "\\PC{0,16}", stars in 1usize..5) {
        prop_assert!(match_wildcard(&text, &"*".repeat(stars)));
    }
}

/// Property: empty text matches only all-star patterns
proptest! {
    #[test]
    fn prop_empty_text_needs_only_stars(pattern in "[a*?]{0,6}") {
        prop_assert_eq!(match_wildcard("", &pattern), pattern.chars().all(|c| c == '*'));
    }
}

/// Property: adjacent stars behave as a single star
proptest! {
    #[test]
    fn prop_repeated_stars_collapse(text in "[ab]{0,8}", pattern in "[ab*?]{0,8}") {
        prop_assert_eq!(
            match_wildcard(&text, &pattern),
            match_wildcard(&text, &collapse_stars(&pattern))
        );
    }
}

/// Property: the backtracking matcher agrees with the recursive one
proptest! {
    #[test]
    fn prop_agrees_with_recursive_matcher(text in "[ab*]{0,8}", pattern in "[ab*?]{0,6}") {
        let t: Vec<char> = text.chars().collect();
        let p: Vec<char> = pattern.chars().collect();
        prop_assert_eq!(match_wildcard(&text, &pattern), reference_match(&t, &p));
    }
}

/// Property: the first matching pattern in the list is the one returned
proptest! {
    #[test]
    fn prop_first_match_wins(text in "[ab]{0,6}", patterns in prop::collection::vec("[ab*?]{0,4}", 0..5)) {
        let expected = patterns.iter().find(|p| match_wildcard(&text, p)).map(String::as_str);
        prop_assert_eq!(match_wildcards(&text, &patterns), expected);
    }
}
