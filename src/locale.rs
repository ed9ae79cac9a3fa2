use roxmltree::{Document, Node, ParsingOptions};
use std::fs;
use std::path::Path;

use crate::error::ExportError;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Translation unit holding the collection title.
pub const TITLE_TUID: &str = "SITE_CONFIG_title";

/// Translation unit holding the landing page text used as description.
pub const DESCRIPTION_TUID: &str = "SITE_CONFIG_landingPageHtml";

/// Title and description pulled from a collection's locale file.
/// Absent values are empty strings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LocaleText {
    pub title: String,
    pub description: String,
}

/// Read title and description for `locale`, warning about anything missing.
pub fn read_locale_text(path: &Path, locale: &str) -> LocaleText {
    let xml = match fs::read_to_string(path) {
        Ok(xml) => xml,
        Err(e) => {
            tracing::warn!("Locale file {} can't be read: {}", path.display(), e);
            return LocaleText::default();
        }
    };

    let (title, description) = match parse_locale_segments(&xml, locale) {
        Ok(found) => found,
        Err(source) => {
            let err = ExportError::Xml {
                path: path.to_path_buf(),
                source,
            };
            tracing::warn!("{}", err);
            return LocaleText::default();
        }
    };

    if title.is_none() {
        tracing::warn!(
            "No {} title for locale {} in {}",
            TITLE_TUID,
            locale,
            path.display()
        );
    }
    if description.is_none() {
        tracing::warn!(
            "No {} description for locale {} in {}",
            DESCRIPTION_TUID,
            locale,
            path.display()
        );
    }

    LocaleText {
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
    }
}

/// Find the title and description segments in a locale document.
pub fn parse_locale_segments(
    xml: &str,
    locale: &str,
) -> Result<(Option<String>, Option<String>), roxmltree::Error> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options)?;

    Ok((
        find_segment(&doc, TITLE_TUID, locale),
        find_segment(&doc, DESCRIPTION_TUID, locale),
    ))
}

/// Text of the first `body/tu[@tuid]/tuv[@xml:lang]/seg` match.
fn find_segment(doc: &Document, tuid: &str, locale: &str) -> Option<String> {
    doc.descendants()
        .filter(|n| n.has_tag_name("body"))
        .flat_map(|body| body.children())
        .filter(|tu| tu.has_tag_name("tu") && tu.attribute("tuid") == Some(tuid))
        .flat_map(|tu| tu.children())
        .filter(|tuv| tuv.has_tag_name("tuv") && lang_of(tuv) == Some(locale))
        .find_map(|tuv| tuv.children().find(|n| n.has_tag_name("seg")))
        .map(|seg| segment_text(&seg))
}

fn lang_of<'a>(tuv: &Node<'a, '_>) -> Option<&'a str> {
    tuv.attribute((XML_NAMESPACE, "lang"))
        .or_else(|| tuv.attribute("lang"))
}

// Only the segment's own text and CDATA; nested markup is not flattened.
fn segment_text(seg: &Node) -> String {
    seg.children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .flat_map(|t| t.chars())
        .filter(|c| *c != '\n' && *c != '\r')
        .collect()
}
