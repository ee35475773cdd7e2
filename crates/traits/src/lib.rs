pub mod error;
pub mod i18n;
pub mod render;
pub mod report;
pub mod site;

pub use error::CollaboratorError;
pub use i18n::{BundledMessages, MessageCatalog};
pub use render::{DocumentRenderer, RenderContext};
pub use report::{NoReports, ReportDescriptor, ReportGenerator};
pub use site::{
    DecorationLoader, DecorationModel, DefaultSiteTool, Menu, MenuItem, SiteTool,
    StaticDecorationLoader,
};
