use chrono::{SecondsFormat, Utc};
use url::Url;

/// Extension used when neither the URL nor the content type suggests one.
pub const FALLBACK_EXTENSION: &str = "jpg";

/// Name of an image inside the archive folder.
///
/// Last path segment of the URL, or `image_<index + 1>` when that segment is
/// empty. Names without a dot get an extension from the content-type subtype,
/// or `fallback_extension` if there is none. Collisions are not checked.
pub fn derive_entry_name(
    url: &str,
    index: usize,
    content_type: Option<&str>,
    fallback_extension: &str,
) -> String {
    let mut name = last_path_segment(url)
        .filter(|segment| !segment.is_empty())
        .unwrap_or_else(|| format!("image_{}", index + 1));

    if !name.contains('.') {
        let extension = content_type
            .and_then(content_subtype)
            .unwrap_or_else(|| fallback_extension.to_string());
        name.push('.');
        name.push_str(&extension);
    }
    name
}

/// `<host with dots as underscores>_images_<timestamp with ':' and '.' as '-'>.zip`
pub fn archive_filename(host: Option<&str>, timestamp: &str) -> String {
    let host: String = host
        .unwrap_or_default()
        .chars()
        .map(|c| if c == '.' || is_forbidden(c) { '_' } else { c })
        .collect();
    let stamp = timestamp.replace([':', '.'], "-");
    format!("{host}_images_{stamp}.zip")
}

/// Current UTC time in RFC 3339 with millisecond precision, e.g. `2024-05-01T10:20:30.123Z`.
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn last_path_segment(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    Some(segment.to_string())
}

fn content_subtype(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next().unwrap_or(content_type).trim();
    let (_, subtype) = essence.split_once('/')?;
    let subtype = subtype.trim().to_ascii_lowercase();
    if subtype.is_empty() {
        None
    } else {
        Some(subtype)
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_names_that_already_have_an_extension() {
        let name = derive_entry_name(
            "https://cdn.example.com/a/b/cat.webp?size=2",
            0,
            Some("image/png"),
            FALLBACK_EXTENSION,
        );
        assert_eq!(name, "cat.webp");
    }

    #[test]
    fn extension_comes_from_content_type() {
        let name = derive_entry_name(
            "https://example.com/img/photo",
            0,
            Some("image/png"),
            FALLBACK_EXTENSION,
        );
        assert_eq!(name, "photo.png");
    }

    #[test]
    fn content_type_parameters_are_dropped() {
        let name = derive_entry_name(
            "https://example.com/logo",
            0,
            Some("Image/SVG+XML; charset=utf-8"),
            FALLBACK_EXTENSION,
        );
        assert_eq!(name, "logo.svg+xml");
    }

    #[test]
    fn empty_segment_synthesizes_ordinal_name() {
        let name = derive_entry_name("https://example.com/gallery/", 3, None, FALLBACK_EXTENSION);
        assert_eq!(name, "image_4.jpg");
    }

    #[test]
    fn subtype_less_content_type_uses_fallback() {
        let name = derive_entry_name("https://example.com/", 0, Some("image"), "bin");
        assert_eq!(name, "image_1.bin");
    }

    #[test]
    fn segment_stays_percent_encoded() {
        let name = derive_entry_name(
            "https://example.com/my%20pic.gif",
            0,
            None,
            FALLBACK_EXTENSION,
        );
        assert_eq!(name, "my%20pic.gif");
    }

    #[test]
    fn archive_filename_sanitizes_host_and_timestamp() {
        let name = archive_filename(Some("www.example.com"), "2024-05-01T10:20:30.123Z");
        assert_eq!(name, "www_example_com_images_2024-05-01T10-20-30-123Z.zip");
    }

    #[test]
    fn archive_filename_without_host() {
        let name = archive_filename(None, "2024-05-01T10:20:30.123Z");
        assert_eq!(name, "_images_2024-05-01T10-20-30-123Z.zip");
    }

    #[test]
    fn timestamp_has_millisecond_precision() {
        let stamp = utc_timestamp();
        assert!(stamp.ends_with('Z'));
        assert_eq!(stamp.len(), "2024-05-01T10:20:30.123Z".len());
    }
}
