use crate::{InterpolationError, ValueSource};
use chrono::{DateTime, Utc};

/// Exposes fields of a single UTC instant: `date`, `dateTime`, `time`,
/// `year`, `month`, `day`, `hour`, `minute`, `second` and `millisecond`.
///
/// Every field of one interpolation pass is computed from the same instant.
#[derive(Debug, Clone, Copy)]
pub struct DateValueSource {
    instant: DateTime<Utc>,
}

impl DateValueSource {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// `YYYY-MM-DD`
    pub fn date(&self) -> String {
        self.format("%Y-%m-%d")
    }

    /// `YYYY-MM-DDThh:mm:ssZ`
    pub fn date_time(&self) -> String {
        self.format("%Y-%m-%dT%H:%M:%SZ")
    }

    /// `hh:mm:ssZ`
    pub fn time(&self) -> String {
        self.format("%H:%M:%SZ")
    }

    fn format(&self, pattern: &str) -> String {
        self.instant.format(pattern).to_string()
    }
}

impl ValueSource for DateValueSource {
    fn value(&self, expression: &str) -> Result<Option<String>, InterpolationError> {
        let value = match expression {
            "date" => self.date(),
            "dateTime" => self.date_time(),
            "time" => self.time(),
            "year" => self.format("%Y"),
            "month" => self.format("%m"),
            "day" => self.format("%d"),
            "hour" => self.format("%H"),
            "minute" => self.format("%M"),
            "second" => self.format("%S"),
            "millisecond" => self.format("%3f"),
            _ => return Ok(None),
        };
        Ok(Some(value))
    }

    fn name(&self) -> &'static str {
        "DateValueSource"
    }
}
