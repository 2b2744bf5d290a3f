//! Download token generation and display helpers.

use rand::RngCore;

/// Number of random bytes behind every token (128 bits).
const TOKEN_BYTES: usize = 16;

/// Number of token characters kept when a token is shown in logs or stats.
pub const TOKEN_PREFIX_LEN: usize = 8;

/// Generate an unguessable download token: 128 bits from the thread-local CSPRNG, hex-encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Truncated form of a token, safe to display. Never returns the full token.
pub fn token_prefix(token: &str) -> String {
    let prefix: String = token.chars().take(TOKEN_PREFIX_LEN).collect();
    format!("{}...", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_token_is_unique() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_token_prefix_truncates() {
        let token = generate_token();
        let prefix = token_prefix(&token);
        assert_eq!(prefix.len(), TOKEN_PREFIX_LEN + 3);
        assert!(prefix.ends_with("..."));
        assert!(token.starts_with(prefix.trim_end_matches("...")));
        assert_ne!(prefix, token);
    }
}
