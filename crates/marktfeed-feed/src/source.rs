//! Source feed reader: upstream XML into [`SourceItem`]s.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::FeedError;

/// One `<item>` from the upstream feed, fields already resolved through the
/// qualified/unqualified fallback chain and trimmed. A value that is absent
/// or empty after trimming is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceItem {
    pub id: Option<String>,
    pub gtin: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_raw: Option<String>,
    pub link: Option<String>,
    pub image_url: Option<String>,
    pub additional_image_urls: Vec<String>,
}

/// Parse the upstream feed body into an ordered list of [`SourceItem`]s.
///
/// `<item>` elements are picked up at any nesting depth, so flat item lists
/// and `<channel>`-nested documents produce identical results. Field values
/// are trimmed; no HTML cleaning or entity decoding happens here — cleaning
/// rules differ per target field and belong to the transcoder.
///
/// # Errors
///
/// Returns [`FeedError::Xml`] if the body is not well-formed XML.
pub fn parse_source_feed(xml: &str) -> Result<Vec<SourceItem>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut fields: Vec<(String, String)> = Vec::new();
    let mut in_item = false;
    // Element depth below <item>; text is committed under the depth-1 field
    // name so markup nested inside a field accumulates into that field.
    let mut depth = 0usize;
    let mut current_field = String::new();
    let mut buf = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if in_item {
                    depth += 1;
                    if depth == 1 {
                        current_field = name;
                        buf.clear();
                    }
                } else if name == "item" {
                    in_item = true;
                    depth = 0;
                    fields.clear();
                }
            }
            Ok(Event::End(e)) => {
                let raw = e.name();
                let name = String::from_utf8_lossy(raw.as_ref());
                if in_item {
                    if depth == 0 && name == "item" {
                        in_item = false;
                        items.push(item_from_fields(&fields));
                    } else if depth > 0 {
                        depth -= 1;
                        if depth == 0 {
                            fields.push((
                                std::mem::take(&mut current_field),
                                buf.trim().to_string(),
                            ));
                        }
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if in_item && depth > 0 {
                    let text = e.unescape().unwrap_or_default();
                    if !buf.is_empty() && !text.is_empty() {
                        buf.push(' ');
                    }
                    buf.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if in_item && depth > 0 {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    if !buf.is_empty() && !text.is_empty() {
                        buf.push(' ');
                    }
                    buf.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Xml(e)),
            _ => {}
        }
    }

    Ok(items)
}

/// Resolve the first non-empty value among `candidates`, in order.
///
/// This is the namespace fallback chain: callers list the qualified name
/// first and the unqualified local name second. Applied independently per
/// field, so one item may mix qualified and unqualified fields.
fn first_non_empty(fields: &[(String, String)], candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|candidate| {
        fields
            .iter()
            .find(|(name, value)| name == candidate && !value.is_empty())
            .map(|(_, value)| value.clone())
    })
}

fn item_from_fields(fields: &[(String, String)]) -> SourceItem {
    let additional_image_urls = fields
        .iter()
        .filter(|(name, value)| {
            (name == "g:additional_image_link" || name == "additional_image_link")
                && !value.is_empty()
        })
        .map(|(_, value)| value.clone())
        .collect();

    SourceItem {
        id: first_non_empty(fields, &["g:id", "id"]),
        gtin: first_non_empty(fields, &["g:gtin", "gtin"]),
        title: first_non_empty(fields, &["title", "g:title"]),
        description: first_non_empty(fields, &["description", "g:description"]),
        price_raw: first_non_empty(fields, &["g:price", "price"]),
        link: first_non_empty(fields, &["link", "g:link"]),
        image_url: first_non_empty(fields, &["g:image_link", "image_link"]),
        additional_image_urls,
    }
}
