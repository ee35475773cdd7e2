//! Shared quick-xml plumbing for the descriptor and site readers.

use encoding_rs::{Encoding, UTF_8};
use log::warn;
use quick_xml::Reader;
use quick_xml::events::BytesStart;
use regex::bytes::Regex;
use std::sync::LazyLock;

static ENCODING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*<\?xml[^>]*?encoding\s*=\s*["']([A-Za-z0-9._:\-]+)["']"#)
        .expect("BUG: invalid ENCODING_RE regex literal")
});

/// Where and why an XML document could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct XmlFailure {
    pub position: u64,
    pub message: String,
}

impl XmlFailure {
    pub fn at<R>(reader: &Reader<R>, message: impl ToString) -> Self {
        Self {
            position: reader.buffer_position(),
            message: message.to_string(),
        }
    }
}

/// The encoding named in the XML prolog, if any and if known.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(256)];
    let label = ENCODING_RE.captures(head)?.get(1)?;
    let encoding = Encoding::for_label(label.as_bytes());
    if encoding.is_none() {
        warn!(
            "Unknown XML encoding '{}', reading as UTF-8.",
            String::from_utf8_lossy(label.as_bytes())
        );
    }
    encoding
}

/// Decodes raw XML bytes: a BOM wins, then the prolog's `encoding`, then UTF-8.
pub(crate) fn decode_xml(bytes: &[u8]) -> String {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| declared_encoding(bytes))
        .unwrap_or(UTF_8);

    let (text, used, malformed) = encoding.decode(bytes);
    if malformed {
        warn!("Malformed {} input, some characters were replaced.", used.name());
    }
    text.into_owned()
}

/// Resolves a general entity reference (`amp`, `#x41`, `#65`, ...).
pub(crate) fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse::<u32>().ok()?
    };
    char::from_u32(code).map(|c| c.to_string())
}

/// Attributes of `e` by local name, unescaped.
pub(crate) fn attributes<R>(
    e: &BytesStart<'_>,
    reader: &Reader<R>,
) -> Result<Vec<(String, String)>, XmlFailure> {
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| XmlFailure::at(reader, err))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|err| XmlFailure::at(reader, err))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(attributes)
}

pub(crate) fn attribute<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

pub(crate) fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}
