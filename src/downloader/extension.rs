use url::Url;

/// Extension used when the link does not name a known image type
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Infers the saved file extension from a link's trailing path segment
///
/// Only `jpg`/`jpeg`, `gif` and `png` are recognized (case-insensitive);
/// everything else, including links without an extension, maps to `jpg`.
pub fn extension_from_link(link: &str) -> &'static str {
    let segment = last_path_segment(link);

    let ext = match segment.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return DEFAULT_EXTENSION,
    };

    match ext.as_str() {
        "jpg" | "jpeg" => "jpg",
        "gif" => "gif",
        "png" => "png",
        _ => DEFAULT_EXTENSION,
    }
}

fn last_path_segment(link: &str) -> String {
    match Url::parse(link) {
        Ok(url) => url
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string))
            .unwrap_or_default(),
        // Not an absolute URL: drop any query/fragment and take the tail
        Err(_) => {
            let path = link.split(&['?', '#'][..]).next().unwrap_or(link);
            path.rsplit('/').next().unwrap_or(path).to_string()
        }
    }
}
