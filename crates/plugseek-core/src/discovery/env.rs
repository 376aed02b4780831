//! `${NAME}` environment variable expansion for search paths.

use std::collections::HashMap;

/// Source of environment variable values.
pub trait EnvLookup {
    fn var(&self, name: &str) -> Option<String>;
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

const TOKEN_OPEN: &str = "${";
const TOKEN_CLOSE: char = '}';

/// Replace every `${NAME}` in `input` with the value of `NAME`.
///
/// Unresolved references, empty names and an unterminated `${` are kept
/// verbatim.
pub fn expand_env_vars(input: &str, env: &dyn EnvLookup) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find(TOKEN_OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + TOKEN_OPEN.len()..];

        let Some(end) = after_open.find(TOKEN_CLOSE) else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after_open[..end];
        let token = &rest[start..start + TOKEN_OPEN.len() + end + 1];
        match env.var(name).filter(|_| !name.is_empty()) {
            Some(value) => out.push_str(&value),
            None => {
                tracing::debug!(variable = %name, "Unresolved environment variable in search path");
                out.push_str(token);
            }
        }

        rest = &after_open[end + 1..];
    }

    out.push_str(rest);
    out
}
