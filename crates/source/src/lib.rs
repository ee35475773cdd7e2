//! Value sources and `${…}` placeholder interpolation.
//!
//! This crate provides the `ValueSource` trait and the implementations the
//! document build probes, in priority order, when resolving a descriptor:
//!
//! - `MapValueSource`: build properties merged with project properties
//! - `EnvValueSource`: process environment variables (`env.` prefix optional)
//! - `ProjectValueSource`: dotted paths into the project object model
//! - `DateValueSource`: fields of one fixed build instant
//!
//! ## Example
//!
//! ```ignore
//! use quire_source::{Interpolator, MapValueSource};
//!
//! let interpolator = Interpolator::new()
//!     .with_source(MapValueSource::from_pairs([("name", "quire")]));
//!
//! assert_eq!(interpolator.interpolate("Hello ${name}")?, "Hello quire");
//! ```

mod date;
mod error;
mod interpolator;
mod map;
mod project;

pub use date::DateValueSource;
pub use error::InterpolationError;
pub use interpolator::Interpolator;
pub use map::{EnvValueSource, MapValueSource};
pub use project::ProjectValueSource;

/// A source of values for placeholder expressions.
///
/// Returning `Ok(None)` means "not mine": the interpolator moves on to the
/// next source. An `Err` aborts the whole interpolation, so sources should
/// only return one for problems the build cannot recover from.
pub trait ValueSource: Send + Sync {
    fn value(&self, expression: &str) -> Result<Option<String>, InterpolationError>;

    /// Returns a human-readable name for this source (for logging/debugging).
    fn name(&self) -> &'static str;
}

impl ValueSource for Box<dyn ValueSource> {
    fn value(&self, expression: &str) -> Result<Option<String>, InterpolationError> {
        (**self).value(expression)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
