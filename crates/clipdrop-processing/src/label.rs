//! Display filename for stored videos.

use crate::fetcher::VideoInfo;

const FALLBACK_EXTRACTOR: &str = "video";
const FALLBACK_ID: &str = "unknown";

/// Build `{extractor}-{id}.{ext}` from fetcher metadata.
///
/// The extractor is lowercased and reduced to `[a-z0-9]`; when that leaves
/// nothing, `video` is used. The id falls back to the display id, then `unknown`.
pub fn build_label(info: &VideoInfo, extension: &str) -> String {
    let extractor: String = info
        .extractor
        .as_deref()
        .unwrap_or_default()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();
    let extractor = if extractor.is_empty() {
        FALLBACK_EXTRACTOR
    } else {
        extractor.as_str()
    };

    let id = info
        .id
        .as_deref()
        .or(info.display_id.as_deref())
        .filter(|id| !id.is_empty())
        .unwrap_or(FALLBACK_ID);

    format!("{}-{}.{}", extractor, id, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(extractor: Option<&str>, id: Option<&str>, display_id: Option<&str>) -> VideoInfo {
        VideoInfo {
            extractor: extractor.map(String::from),
            id: id.map(String::from),
            display_id: display_id.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_label_normalizes_extractor() {
        let label = build_label(&info(Some("Youtube:Tab"), Some("dQw4w9WgXcQ"), None), "mp4");
        assert_eq!(label, "youtubetab-dQw4w9WgXcQ.mp4");
    }

    #[test]
    fn test_label_falls_back_to_display_id() {
        let label = build_label(&info(Some("vimeo"), None, Some("12345")), "mp4");
        assert_eq!(label, "vimeo-12345.mp4");
    }

    #[test]
    fn test_label_defaults_when_metadata_missing() {
        assert_eq!(build_label(&info(None, None, None), "mp4"), "video-unknown.mp4");
        assert_eq!(
            build_label(&info(Some("::"), Some("x"), None), "mp4"),
            "video-x.mp4"
        );
    }
}
