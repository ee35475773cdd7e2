use crate::{
    DateValueSource, EnvValueSource, InterpolationError, MapValueSource, ProjectValueSource,
    ValueSource,
};
use chrono::{DateTime, Utc};
use log::debug;
use quire_types::ProjectDescriptor;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(.+?)\}").expect("BUG: invalid PLACEHOLDER_RE regex literal")
});

/// Replaces `${expression}` placeholders with the first value any source
/// yields, probing sources in the order they were added.
///
/// Unresolved placeholders are left as literal text. Resolved values are
/// interpolated in turn; an expression that (directly or indirectly) resolves
/// to itself is reported as [`InterpolationError::RecursiveExpression`].
#[derive(Default)]
pub struct Interpolator {
    sources: Vec<Box<dyn ValueSource>>,
}

impl Interpolator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl ValueSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// The source chain used for document descriptors:
    ///
    /// 1. build properties overlaid with project properties,
    /// 2. environment variables,
    /// 3. the project object model,
    /// 4. fields of `instant`.
    pub fn for_project(
        build_properties: &BTreeMap<String, String>,
        project: Option<&ProjectDescriptor>,
        instant: DateTime<Utc>,
    ) -> Self {
        let empty = BTreeMap::new();
        let project_properties = project.map(|p| &p.properties).unwrap_or(&empty);

        let mut interpolator = Self::new()
            .with_source(MapValueSource::layered([build_properties, project_properties]))
            .with_source(EnvValueSource::from_env());
        if let Some(project) = project {
            interpolator = interpolator.with_source(ProjectValueSource::new(project));
        }
        interpolator.with_source(DateValueSource::new(instant))
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn interpolate(&self, input: &str) -> Result<String, InterpolationError> {
        let mut in_progress = Vec::new();
        self.interpolate_with(input, &mut in_progress)
    }

    fn interpolate_with(
        &self,
        input: &str,
        in_progress: &mut Vec<String>,
    ) -> Result<String, InterpolationError> {
        let mut output = String::with_capacity(input.len());
        let mut last = 0;

        for caps in PLACEHOLDER_RE.captures_iter(input) {
            let (Some(whole), Some(expression)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            output.push_str(&input[last..whole.start()]);
            last = whole.end();

            let expression = expression.as_str();
            if in_progress.iter().any(|e| e == expression) {
                let mut chain = in_progress.clone();
                chain.push(expression.to_string());
                return Err(InterpolationError::RecursiveExpression { chain });
            }

            match self.lookup(expression)? {
                Some(value) => {
                    in_progress.push(expression.to_string());
                    let resolved = self.interpolate_with(&value, in_progress)?;
                    in_progress.pop();
                    output.push_str(&resolved);
                }
                None => {
                    debug!("No value found for '${{{}}}', leaving it as is.", expression);
                    output.push_str(whole.as_str());
                }
            }
        }

        output.push_str(&input[last..]);
        Ok(output)
    }

    fn lookup(&self, expression: &str) -> Result<Option<String>, InterpolationError> {
        for source in &self.sources {
            if let Some(value) = source.value(expression)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSource;

    impl ValueSource for FailingSource {
        fn value(&self, expression: &str) -> Result<Option<String>, InterpolationError> {
            Err(InterpolationError::Source {
                source_name: self.name().to_string(),
                expression: expression.to_string(),
                message: "boom".to_string(),
            })
        }

        fn name(&self) -> &'static str {
            "FailingSource"
        }
    }

    fn map(pairs: &[(&str, &str)]) -> Interpolator {
        Interpolator::new().with_source(MapValueSource::from_pairs(pairs.iter().copied()))
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        let interpolator = map(&[("a", "1")]);
        for text in ["", "plain text", "$ {a}", "{a}", "$a", "<x>100$</x>", "${"] {
            assert_eq!(interpolator.interpolate(text).unwrap(), text);
        }
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let interpolator = map(&[("name", "quire"), ("v", "1.0")]);
        assert_eq!(
            interpolator.interpolate("${name} v${v} (${name})").unwrap(),
            "quire v1.0 (quire)"
        );
    }

    #[test]
    fn test_unresolved_left_literal() {
        let interpolator = map(&[("a", "1")]);
        assert_eq!(interpolator.interpolate("${a}-${b}").unwrap(), "1-${b}");
    }

    #[test]
    fn test_first_source_wins() {
        let interpolator = Interpolator::new()
            .with_source(MapValueSource::from_pairs([("k", "first")]))
            .with_source(MapValueSource::from_pairs([("k", "second"), ("j", "only")]));
        assert_eq!(interpolator.interpolate("${k} ${j}").unwrap(), "first only");
    }

    #[test]
    fn test_values_are_interpolated_recursively() {
        let interpolator = map(&[("full", "${first} ${last}"), ("first", "Ada"), ("last", "Lovelace")]);
        assert_eq!(interpolator.interpolate("${full}").unwrap(), "Ada Lovelace");
    }

    #[test]
    fn test_cycle_is_fatal() {
        let interpolator = map(&[("a", "${b}"), ("b", "x${a}")]);
        let err = interpolator.interpolate("start ${a}").unwrap_err();
        assert_eq!(
            err,
            InterpolationError::RecursiveExpression {
                chain: vec!["a".to_string(), "b".to_string(), "a".to_string()]
            }
        );
    }

    #[test]
    fn test_repeated_expression_is_not_a_cycle() {
        let interpolator = map(&[("a", "${b}${b}"), ("b", "x")]);
        assert_eq!(interpolator.interpolate("${a}").unwrap(), "xx");
    }

    #[test]
    fn test_source_error_aborts() {
        let interpolator = Interpolator::new().with_source(FailingSource);
        assert!(matches!(
            interpolator.interpolate("${a}"),
            Err(InterpolationError::Source { .. })
        ));
        assert_eq!(interpolator.interpolate("no placeholders").unwrap(), "no placeholders");
    }

    #[test]
    fn test_project_properties_override_build_properties() {
        let build: BTreeMap<String, String> = [
            ("shared".to_string(), "build".to_string()),
            ("build.only".to_string(), "b".to_string()),
        ]
        .into();
        let mut project = ProjectDescriptor::new("core");
        project.version = Some("2.3.1".to_string());
        project.properties.insert("shared".to_string(), "project".to_string());

        let interpolator = Interpolator::for_project(&build, Some(&project), Utc::now());
        assert_eq!(
            interpolator.interpolate("${shared}/${build.only}/${project.version}").unwrap(),
            "project/b/2.3.1"
        );
        assert_eq!(
            interpolator.source_names(),
            vec!["MapValueSource", "EnvValueSource", "ProjectValueSource", "DateValueSource"]
        );
    }

    #[test]
    fn test_date_fields_share_one_instant() {
        let instant = DateTime::parse_from_rfc3339("2021-12-31T23:59:59Z")
            .unwrap()
            .with_timezone(&Utc);
        let interpolator = Interpolator::for_project(&BTreeMap::new(), None, instant);
        assert_eq!(
            interpolator.interpolate("${year}-${month}-${day} ${time}").unwrap(),
            "2021-12-31 23:59:59Z"
        );
    }
}
