//! The locale-agnostic TOC tree exchanged between build phases.
//!
//! A module's build writes its table of contents as a `TocTree`; the
//! aggregating build reads it back in the same shape, rewrites references and
//! only then turns it into [`DocumentTocItem`]s. No in-memory identity crosses
//! that boundary.

use crate::document::{DocumentToc, DocumentTocItem};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocTree {
    pub name: Option<String>,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    #[serde(default)]
    pub items: Vec<TocTree>,
}

impl TocTree {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.reference.is_none() && self.items.is_empty()
    }

    /// Rebuilds a TOC item from this node, mapping every reference of the
    /// subtree through `rewrite`. Order and shape are preserved.
    pub fn to_item_with<F>(&self, rewrite: &F) -> DocumentTocItem
    where
        F: Fn(Option<&str>) -> Option<String>,
    {
        DocumentTocItem {
            name: self.name.clone(),
            reference: rewrite(self.reference.as_deref()),
            items: self.items.iter().map(|i| i.to_item_with(rewrite)).collect(),
        }
    }
}

impl From<&DocumentTocItem> for TocTree {
    fn from(item: &DocumentTocItem) -> Self {
        Self {
            name: item.name.clone(),
            reference: item.reference.clone(),
            items: item.items.iter().map(TocTree::from).collect(),
        }
    }
}

impl From<&DocumentToc> for TocTree {
    fn from(toc: &DocumentToc) -> Self {
        Self {
            name: toc.name.clone(),
            reference: None,
            items: toc.items.iter().map(TocTree::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_document_toc_keeps_order() {
        let mut toc = DocumentToc {
            name: Some("Contents".to_string()),
            ..Default::default()
        };
        let mut guide = DocumentTocItem::new("Guide", "guide");
        guide.add_item(DocumentTocItem::new("Install", "install"));
        guide.add_item(DocumentTocItem::new("Usage", "usage"));
        toc.add_item(guide);
        toc.add_item(DocumentTocItem::new("FAQ", "faq"));

        let tree = TocTree::from(&toc);
        assert_eq!(tree.name.as_deref(), Some("Contents"));
        assert_eq!(tree.reference, None);
        assert_eq!(tree.items.len(), 2);
        assert_eq!(tree.items[0].items[1].reference.as_deref(), Some("usage"));
        assert_eq!(tree.items[1].name.as_deref(), Some("FAQ"));
    }

    #[test]
    fn test_to_item_with_rewrites_whole_subtree() {
        let tree = TocTree {
            name: Some("A".to_string()),
            reference: Some("a".to_string()),
            items: vec![TocTree {
                name: Some("B".to_string()),
                reference: Some("b".to_string()),
                items: vec![],
            }],
        };
        let item = tree.to_item_with(&|r| r.map(|r| format!("x/{r}")));
        assert_eq!(item.reference.as_deref(), Some("x/a"));
        assert_eq!(item.items[0].reference.as_deref(), Some("x/b"));
    }

    #[test]
    fn test_empty_tree() {
        assert!(TocTree::default().is_empty());
        let parsed: TocTree = serde_json::from_str("{}").unwrap();
        assert!(parsed.is_empty());
    }
}
