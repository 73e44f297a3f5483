//! Passthrough build options
//!
//! `--docker-options` is a single quoted string forwarded to the container
//! build tool. The build command injects `-t` and `-f` itself, so any token
//! that would override either flag is rejected before the tool runs.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::OptionError;

/// Flags the build command owns and users may not pass through
pub const DISALLOWED_FLAGS: &[&str] = &["-t", "--tag", "-f", "--file"];

/// Matches a disallowed flag with an optional `=value` suffix
const DISALLOWED_PATTERN: &str = r"^(-t|--tag|-f|--file)(=.*)?$";

fn disallowed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DISALLOWED_PATTERN).expect("disallowed flag pattern is valid"))
}

/// Split a raw options string into tokens
///
/// Exactly one leading and one trailing space are trimmed, then the string is
/// split on single spaces. Repeated spaces therefore yield empty tokens, which
/// are kept and forwarded as empty arguments.
///
/// An empty string yields no tokens.
pub fn split_options(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    let trimmed = raw.strip_prefix(' ').unwrap_or(raw);
    let trimmed = trimmed.strip_suffix(' ').unwrap_or(trimmed);

    trimmed.split(' ').map(str::to_string).collect()
}

/// Check whether a single token overrides a flag the build command sets
pub fn is_disallowed(token: &str) -> bool {
    disallowed().is_match(token)
}

/// Validate passthrough tokens, reporting the first disallowed one
pub fn validate_options<S: AsRef<str>>(tokens: &[S]) -> Result<(), OptionError> {
    match tokens.iter().map(|t| t.as_ref()).find(|t| is_disallowed(t)) {
        Some(option) => Err(OptionError::NotAllowed {
            option: option.to_string(),
        }),
        None => Ok(()),
    }
}

/// Split and validate a raw options string in one step
pub fn parse_options(raw: &str) -> Result<Vec<String>, OptionError> {
    let tokens = split_options(raw);
    validate_options(&tokens)?;
    tracing::debug!("passthrough options: {tokens:?}");
    Ok(tokens)
}
