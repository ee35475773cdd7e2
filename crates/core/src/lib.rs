//! # quire-core
//!
//! Everything between a project's metadata and the document model handed to
//! a renderer:
//! - **descriptor**: reading (and writing) document descriptors
//! - **synthesizer**: a default model when there is no descriptor
//! - **decoration**: menus and skin from the site descriptor
//! - **locale**: the locales of a build and their directories
//! - **staging**: the staged site directory a module renders from
//! - **toc_store**: the per-module `toc.json`
//! - **title**: titles of generated documents
//! - **aggregator**: merging module TOCs and staged sites into a parent
//!
//! All filesystem access is blocking; nothing here spawns threads.

pub use quire_resource as resource;
pub use quire_source as source;
pub use quire_traits as traits;
pub use quire_types as types;

pub mod aggregator;
pub mod decoration;
pub mod descriptor;
pub mod dump;
pub mod error;
pub mod locale;
pub mod staging;
pub mod synthesizer;
pub mod title;
pub mod toc_store;
mod xml;

pub use aggregator::{AggregationReport, PROJECT_INFO_REF, TocAggregator};
pub use decoration::SiteDescriptorLoader;
pub use descriptor::DescriptorLoader;
pub use error::{CoreError, DescriptorError, TocStoreError};
pub use locale::{LocaleResolver, Locales};
pub use synthesizer::DefaultModelSynthesizer;

/// The tool's `meta.generator` value for a rendering backend.
pub fn generator_string(implementation: &str) -> String {
    format!(
        "quire v. {}, '{}' implementation.",
        env!("CARGO_PKG_VERSION"),
        implementation
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_string() {
        let generator = generator_string("fo");
        assert!(generator.starts_with("quire v. "));
        assert!(generator.ends_with(", 'fo' implementation."));
    }
}
