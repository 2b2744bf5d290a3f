//! Short, user-facing summaries for raw fetcher diagnostics.
//!
//! Rules are checked in order against the lowercased message; the first match wins.

const RULES: &[(&[&str], &str)] = &[
    (
        &["not a bot", "bot detection", "captcha", "http error 429"],
        "The video site blocked the request as automated traffic, try again later",
    ),
    (
        &[
            "private video",
            "video unavailable",
            "is not available",
            "has been removed",
            "members-only",
        ],
        "This video is private or unavailable",
    ),
    (
        &["login required", "sign in", "log in", "use --cookies"],
        "This video requires signing in",
    ),
    (
        &["binary not found", "not installed"],
        "The video downloader is not available on the server",
    ),
    (
        &["timed out", "timeout"],
        "The video site took too long to respond",
    ),
    (&["unsupported url"], "This URL is not supported"),
];

/// Friendly summary for a raw fetcher message, if a known pattern matches.
pub fn friendly_summary(raw: &str) -> Option<&'static str> {
    let lowered = raw.to_lowercase();
    RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| lowered.contains(needle)))
        .map(|(_, summary)| *summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_messages_map_to_summaries() {
        let cases = [
            (
                "ERROR: [youtube] x: Sign in to confirm you're not a bot",
                "The video site blocked the request as automated traffic, try again later",
            ),
            (
                "ERROR: [youtube] x: Video unavailable",
                "This video is private or unavailable",
            ),
            (
                "ERROR: [instagram] x: login required to view this post",
                "This video requires signing in",
            ),
            (
                "yt-dlp binary not found at 'yt-dlp'",
                "The video downloader is not available on the server",
            ),
            (
                "yt-dlp timed out after 600 seconds",
                "The video site took too long to respond",
            ),
            (
                "ERROR: Unsupported URL: https://example.com",
                "This URL is not supported",
            ),
        ];

        for (raw, expected) in cases {
            assert_eq!(friendly_summary(raw), Some(expected), "{raw}");
        }
    }

    #[test]
    fn test_unknown_message_has_no_summary() {
        assert_eq!(friendly_summary("ERROR: something new"), None);
    }
}
