//! Wildcard pattern matching.
//!
//! Patterns are plain strings where `?` matches exactly one character and `*`
//! matches any run of characters, including an empty one. A pattern must
//! cover the whole text: `"a?"` does not match `"abc"`.
//!
//! Matching is case-sensitive. Callers that need case-insensitive matching
//! fold both sides before calling in.
//!
//! ```
//! use plugseek_core::wildcard::{match_wildcard, match_wildcards};
//!
//! assert!(match_wildcard("carb.tasking.plugin", "carb.*.plugin"));
//! assert!(!match_wildcard("abc", "a?"));
//!
//! let patterns = ["*.so", "*.dll"];
//! assert_eq!(match_wildcards("anything.dll", &patterns), Some("*.dll"));
//! ```

/// Matches any run of characters, including none.
pub const ANY_RUN: char = '*';

/// Matches exactly one character.
pub const ANY_ONE: char = '?';

/// Check whether `text` matches the wildcard `pattern` in full.
///
/// Runs greedily and backtracks only to the most recent `*`, so the cost is
/// linear in the common case and never exponential.
pub fn match_wildcard(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let mut t = 0;
    let mut p = 0;
    // Pattern index just past the last `*` and the text index it resumed at.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some(&ANY_RUN) => {
                p += 1;
                backtrack = Some((p, t));
            }
            Some(&c) if c == ANY_ONE || c == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star_p, star_t)) => {
                    // Let the last `*` swallow one more character and retry.
                    p = star_p;
                    t = star_t + 1;
                    backtrack = Some((star_p, t));
                }
                None => return false,
            },
        }
    }

    while pattern.get(p) == Some(&ANY_RUN) {
        p += 1;
    }

    p == pattern.len()
}

/// Match `text` against each pattern in order and return the first one that
/// matches, or `None`.
pub fn match_wildcards<'p, S>(text: &str, patterns: &'p [S]) -> Option<&'p str>
where
    S: AsRef<str>,
{
    patterns
        .iter()
        .map(AsRef::as_ref)
        .find(|pattern| match_wildcard(text, pattern))
}

/// Check whether any of `texts` matches any of `patterns`.
///
/// Used where several spellings of the same name are acceptable, such as a
/// library stem with and without its platform prefix.
pub fn match_any_form<T, S>(texts: &[T], patterns: &[S]) -> bool
where
    T: AsRef<str>,
    S: AsRef<str>,
{
    texts
        .iter()
        .any(|text| match_wildcards(text.as_ref(), patterns).is_some())
}

/// Check whether `pattern` contains any wildcard characters.
pub fn is_wildcard_pattern(pattern: &str) -> bool {
    pattern.contains([ANY_RUN, ANY_ONE])
}
