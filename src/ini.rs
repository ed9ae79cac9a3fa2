use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Ini key pointing at the collection's home page thumbnail.
pub const THUMBNAIL_KEY: &str = "imageCarouselOffImageHomepage";

/// Parse `key = value` lines. Sections are flattened, later keys win.
pub fn parse_ini(content: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        values.insert(key.to_string(), clean_value(value.trim()).to_string());
    }

    values
}

// Quoted values are kept verbatim; unquoted ones lose a trailing `; comment`.
fn clean_value(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(rest) = value.strip_prefix(quote) {
            if let Some(end) = rest.find(quote) {
                return &rest[..end];
            }
        }
    }
    match value.split_once(';') {
        Some((before, _)) => before.trim_end(),
        None => value,
    }
}

/// Thumbnail path from a collection ini file, or an empty string.
pub fn read_thumbnail_path(path: &Path) -> String {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Ini file {} can't be read: {}", path.display(), e);
            return String::new();
        }
    };

    match parse_ini(&content).remove(THUMBNAIL_KEY) {
        Some(value) => value,
        None => {
            tracing::debug!("No {} in {}", THUMBNAIL_KEY, path.display());
            String::new()
        }
    }
}
