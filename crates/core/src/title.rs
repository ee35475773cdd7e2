//! Titles of generated site documents, used to name their TOC entries.

use crate::xml::{XmlFailure, decode_xml, local_name, resolve_entity};
use log::{debug, error};
use quick_xml::Reader;
use quick_xml::events::Event as XmlEvent;
use std::fs;
use std::path::Path;

/// The text of the first `<title>` element of the document at `path`
/// (`properties/title` in xdoc, `head/title` in xhtml).
///
/// `None` when the document has no title, or when it cannot be read or
/// parsed; failures are logged.
pub fn document_title(path: &Path) -> Option<String> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Unable to read {}: {}", path.display(), e);
            return None;
        }
    };
    match first_title(&decode_xml(&bytes)) {
        Ok(Some(title)) => Some(title),
        Ok(None) => {
            debug!("No title in {}", path.display());
            None
        }
        Err(failure) => {
            error!(
                "Error parsing {} at position {}: {}",
                path.display(),
                failure.position,
                failure.message
            );
            None
        }
    }
}

fn first_title(source: &str) -> Result<Option<String>, XmlFailure> {
    let mut reader = Reader::from_str(source);
    let mut depth_in_title = 0usize;
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| XmlFailure::at(&reader, e))?;
        match &event {
            XmlEvent::Start(_) if depth_in_title > 0 => depth_in_title += 1,
            XmlEvent::Start(e) if local_name(e) == "title" => depth_in_title = 1,
            XmlEvent::Text(e) if depth_in_title > 0 => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            XmlEvent::CData(e) if depth_in_title > 0 => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            XmlEvent::GeneralRef(e) if depth_in_title > 0 => {
                let entity = String::from_utf8_lossy(e.as_ref());
                text.push_str(&resolve_entity(&entity).unwrap_or_default());
            }
            XmlEvent::End(_) if depth_in_title > 0 => {
                depth_in_title -= 1;
                if depth_in_title == 0 {
                    let title = text.split_whitespace().collect::<Vec<_>>().join(" ");
                    if !title.is_empty() {
                        return Ok(Some(title));
                    }
                    text.clear();
                }
            }
            XmlEvent::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_xdoc_and_xhtml_titles() {
        assert_eq!(
            first_title(
                "<document><properties><title>Dependency &amp; Plugins</title></properties>\
                 <body><section name=\"x\"><title>Other</title></section></body></document>"
            )
            .unwrap()
            .as_deref(),
            Some("Dependency & Plugins")
        );
        assert_eq!(
            first_title("<html><head><title>\n  Team\n  list </title></head><body/></html>")
                .unwrap()
                .as_deref(),
            Some("Team list")
        );
    }

    #[test]
    fn test_untitled_documents() {
        assert_eq!(first_title("<document><body/></document>").unwrap(), None);
        assert_eq!(first_title("<document><title>  </title></document>").unwrap(), None);
        assert_eq!(first_title("Plain apt text, no markup").unwrap(), None);
    }

    #[test]
    fn test_unreadable_or_malformed_is_none() {
        let dir = tempdir().unwrap();
        assert_eq!(document_title(&dir.path().join("missing.xml")), None);

        let broken = dir.path().join("broken.xml");
        fs::write(&broken, "<document><title>Half</document>").unwrap();
        assert_eq!(document_title(&broken), None);
    }
}
