//! Label and relationship type tokens
//!
//! Graph stores only accept identifier-safe category names. Raw values from a
//! document are trimmed, spaces, `/` and `-` become `_`, and the result must
//! match `^[A-Za-z_][A-Za-z0-9_]*$`. Consumers querying by category apply the
//! same function to get the same token.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static TOKEN_GRAMMAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("token grammar is valid"));

/// Characters rewritten to `_` before the grammar check
const REPLACED: [char; 3] = [' ', '/', '-'];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    #[error("token is empty")]
    Empty,

    #[error("token {raw:?} sanitizes to {sanitized:?}, which is not a valid identifier")]
    InvalidIdentifier { raw: String, sanitized: String },
}

/// Sanitize a raw category string into a store-safe token.
pub fn sanitize_token(raw: &str) -> Result<String, TokenError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TokenError::Empty);
    }

    let sanitized: String = trimmed
        .chars()
        .map(|c| if REPLACED.contains(&c) { '_' } else { c })
        .collect();

    if TOKEN_GRAMMAR.is_match(&sanitized) {
        Ok(sanitized)
    } else {
        Err(TokenError::InvalidIdentifier {
            raw: raw.to_string(),
            sanitized,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_and_slashes() {
        assert_eq!(sanitize_token("Tech Provider/Vendor").unwrap(), "Tech_Provider_Vendor");
        assert_eq!(sanitize_token("Owns Stake").unwrap(), "Owns_Stake");
    }

    #[test]
    fn test_deterministic() {
        let first = sanitize_token("Joint Venture/Partner").unwrap();
        let second = sanitize_token("Joint Venture/Partner").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_hyphen_and_trim() {
        assert_eq!(sanitize_token("  Co-Founder ").unwrap(), "Co_Founder");
    }

    #[test]
    fn test_already_valid() {
        assert_eq!(sanitize_token("Company").unwrap(), "Company");
        assert_eq!(sanitize_token("_internal2").unwrap(), "_internal2");
    }

    #[test]
    fn test_rejects_out_of_grammar() {
        assert_eq!(sanitize_token("   "), Err(TokenError::Empty));
        assert!(matches!(
            sanitize_token("2nd Tier"),
            Err(TokenError::InvalidIdentifier { .. })
        ));
        assert!(sanitize_token("Company`) DETACH DELETE (n").is_err());
        assert!(sanitize_token("R&D").is_err());
        assert!(sanitize_token("Société").is_err());
    }

    #[test]
    fn test_error_reports_sanitized_form() {
        match sanitize_token("A.B C") {
            Err(TokenError::InvalidIdentifier { raw, sanitized }) => {
                assert_eq!(raw, "A.B C");
                assert_eq!(sanitized, "A.B_C");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
