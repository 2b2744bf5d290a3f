//! Command-line helpers for talking to a running Clipdrop server.

pub mod api_client;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Truncate a label to `max_len` characters for table output.
pub fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() <= max_len {
        label.to_string()
    } else {
        let kept: String = label.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Turn a server-supplied label into a safe local file name.
pub fn local_file_name(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "video".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_label_short() {
        assert_eq!(truncate_label("youtube-abc.mp4", 20), "youtube-abc.mp4");
        assert_eq!(truncate_label("", 5), "");
    }

    #[test]
    fn truncate_label_long() {
        assert_eq!(truncate_label("youtube-dQw4w9WgXcQ.mp4", 10), "youtube...");
    }

    #[test]
    fn truncate_label_counts_chars_not_bytes() {
        assert_eq!(truncate_label("vidéo-vidéo.mp4", 8), "vidéo...");
    }

    #[test]
    fn local_file_name_strips_separators() {
        assert_eq!(local_file_name("youtube-abc.mp4"), "youtube-abc.mp4");
        assert_eq!(local_file_name("../etc/passwd"), "_etc_passwd");
        assert_eq!(local_file_name("a\\b:c"), "a_b_c");
    }

    #[test]
    fn local_file_name_falls_back_when_empty() {
        assert_eq!(local_file_name(""), "video");
        assert_eq!(local_file_name("..."), "video");
    }
}
