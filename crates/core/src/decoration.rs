//! Reads the site descriptor (`site.xml`) for its menus and skin.

use crate::xml::{XmlFailure, attribute, attributes, decode_xml, local_name, resolve_entity};
use log::debug;
use quick_xml::Reader;
use quick_xml::events::Event as XmlEvent;
use quire_source::Interpolator;
use quire_traits::{CollaboratorError, DecorationLoader, DecorationModel, Menu, MenuItem};
use quire_types::Locale;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const SITE_DESCRIPTOR: &str = "site.xml";

/// Loads `site_<lang>.xml`, falling back to `site.xml`, from a site
/// directory. Placeholders are resolved before parsing.
pub struct SiteDescriptorLoader {
    site_dir: PathBuf,
    interpolator: Interpolator,
}

impl fmt::Debug for SiteDescriptorLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteDescriptorLoader")
            .field("site_dir", &self.site_dir)
            .field("sources", &self.interpolator.source_names())
            .finish()
    }
}

impl SiteDescriptorLoader {
    pub fn new(site_dir: impl Into<PathBuf>, interpolator: Interpolator) -> Self {
        Self {
            site_dir: site_dir.into(),
            interpolator,
        }
    }

    pub fn descriptor_path(&self, locale: &Locale) -> PathBuf {
        let localized = self.site_dir.join(format!("site_{}.xml", locale.language()));
        if localized.is_file() {
            localized
        } else {
            self.site_dir.join(SITE_DESCRIPTOR)
        }
    }

    fn read(&self, path: &Path) -> Result<DecorationModel, CollaboratorError> {
        let bytes = fs::read(path).map_err(|e| {
            CollaboratorError::Decoration(format!("Error reading site descriptor: {e}"))
        })?;
        let content = self.interpolator.interpolate(&decode_xml(&bytes)).map_err(|e| {
            CollaboratorError::Decoration(format!("Error when interpolating site descriptor: {e}"))
        })?;

        parse_site_descriptor(&content).map_err(|failure| {
            CollaboratorError::Decoration(format!(
                "Error parsing site descriptor {} at position {}: {}",
                path.display(),
                failure.position,
                failure.message
            ))
        })
    }
}

impl DecorationLoader for SiteDescriptorLoader {
    fn load(&self, locale: &Locale) -> Result<Option<DecorationModel>, CollaboratorError> {
        let path = self.descriptor_path(locale);
        if !path.is_file() {
            debug!("No site descriptor at {}", path.display());
            return Ok(None);
        }
        self.read(&path).map(Some)
    }
}

fn parse_site_descriptor(source: &str) -> Result<DecorationModel, XmlFailure> {
    let mut reader = Reader::from_str(source);
    let mut model = DecorationModel::default();
    let mut path: Vec<String> = Vec::new();
    let mut open_items: Vec<MenuItem> = Vec::new();
    let mut menu: Option<Menu> = None;
    let mut skin: [Option<String>; 3] = Default::default();
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| XmlFailure::at(&reader, e))?;
        let (start, end) = match &event {
            XmlEvent::Start(e) => (Some(e.clone()), false),
            XmlEvent::Empty(e) => (Some(e.clone()), true),
            XmlEvent::End(_) => (None, true),
            XmlEvent::Text(e) => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
                (None, false)
            }
            XmlEvent::GeneralRef(e) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                text.push_str(&resolve_entity(&entity).unwrap_or_default());
                (None, false)
            }
            XmlEvent::Eof => break,
            _ => (None, false),
        };

        if let Some(e) = start {
            let attrs = attributes(&e, &reader)?;
            let name = local_name(&e);
            text.clear();
            match (path.len(), name.as_str()) {
                (0, _) => model.name = attribute(&attrs, "name").map(str::to_string),
                (2, "menu") if path[1] == "body" => {
                    menu = Some(Menu {
                        name: attribute(&attrs, "name").map(str::to_string),
                        items: Vec::new(),
                    });
                }
                (_, "item") if menu.is_some() => {
                    open_items.push(MenuItem {
                        name: attribute(&attrs, "name").map(str::to_string),
                        href: attribute(&attrs, "href").map(str::to_string),
                        items: Vec::new(),
                    });
                }
                _ => {}
            }
            path.push(name);
        }

        if end {
            let value = std::mem::take(&mut text).trim().to_string();
            let closing = path.pop().unwrap_or_default();
            match (path.len(), closing.as_str()) {
                (2, "groupId" | "artifactId" | "version") if path[1] == "skin" => {
                    let slot = match closing.as_str() {
                        "groupId" => 0,
                        "artifactId" => 1,
                        _ => 2,
                    };
                    skin[slot] = Some(value);
                }
                (2, "menu") if path[1] == "body" => {
                    if let Some(menu) = menu.take() {
                        model.menus.push(menu);
                    }
                }
                (_, "item") if menu.is_some() => {
                    if let Some(item) = open_items.pop() {
                        match (open_items.last_mut(), menu.as_mut()) {
                            (Some(parent), _) => parent.items.push(item),
                            (None, Some(menu)) => menu.items.push(item),
                            (None, None) => {}
                        }
                    }
                }
                _ => {}
            }
        }
        buf.clear();
    }

    if !path.is_empty() {
        return Err(XmlFailure::at(&reader, format!("unclosed element <{}>", path.join("/"))));
    }

    if let [Some(group), Some(artifact), version] = &skin {
        model.skin = Some(match version {
            Some(version) => format!("{group}:{artifact}:{version}"),
            None => format!("{group}:{artifact}"),
        });
    }
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_source::MapValueSource;
    use tempfile::tempdir;

    const SITE: &str = r#"<?xml version="1.0"?>
<project name="${site.name}">
  <skin>
    <groupId>org.example</groupId>
    <artifactId>fluido</artifactId>
    <version>1.0</version>
  </skin>
  <body>
    <links><item name="Elsewhere" href="https://example.org"/></links>
    <menu name="Overview">
      <item name="Introduction" href="index.html"/>
      <item name="Guides" href="/guides/index.html">
        <item name="Install" href="guides/install.html"/>
      </item>
    </menu>
    <menu ref="reports"/>
  </body>
</project>
"#;

    fn loader(dir: &Path) -> SiteDescriptorLoader {
        SiteDescriptorLoader::new(
            dir,
            Interpolator::new().with_source(MapValueSource::from_pairs([("site.name", "Quire")])),
        )
    }

    #[test]
    fn test_reads_menus_and_skin() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("site.xml"), SITE).unwrap();

        let model = loader(dir.path()).load(&Locale::english()).unwrap().unwrap();
        assert_eq!(model.name.as_deref(), Some("Quire"));
        assert_eq!(model.skin.as_deref(), Some("org.example:fluido:1.0"));
        assert_eq!(model.menus.len(), 2);

        let overview = &model.menus[0];
        assert_eq!(overview.name.as_deref(), Some("Overview"));
        assert_eq!(overview.items.len(), 2);
        assert_eq!(overview.items[1].items[0].href.as_deref(), Some("guides/install.html"));
        assert!(model.menus[1].items.is_empty());
    }

    #[test]
    fn test_localized_descriptor_wins() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("site.xml"), "<project name=\"en\"/>").unwrap();
        fs::write(dir.path().join("site_fr.xml"), "<project name=\"fr\"/>").unwrap();

        let loader = loader(dir.path());
        let fr = loader.load(&Locale::new("fr")).unwrap().unwrap();
        let de = loader.load(&Locale::new("de")).unwrap().unwrap();
        assert_eq!(fr.name.as_deref(), Some("fr"));
        assert_eq!(de.name.as_deref(), Some("en"));
    }

    #[test]
    fn test_missing_descriptor_is_none() {
        let dir = tempdir().unwrap();
        assert_eq!(loader(dir.path()).load(&Locale::english()).unwrap(), None);
    }

    #[test]
    fn test_malformed_descriptor_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("site.xml"), "<project><body></project>").unwrap();
        assert!(matches!(
            loader(dir.path()).load(&Locale::english()),
            Err(CollaboratorError::Decoration(_))
        ));
    }
}
