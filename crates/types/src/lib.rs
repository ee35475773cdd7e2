pub mod document;
pub mod ids;
pub mod project;
pub mod toc;

pub use document::{DocumentAuthor, DocumentCover, DocumentMeta, DocumentModel, DocumentToc, DocumentTocItem};
pub use ids::{Locale, StagedId};
pub use project::{Build, Developer, Organization, ProjectDescriptor, ReportPlugin, Reporting, Scm};
pub use toc::TocTree;
