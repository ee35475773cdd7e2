//! Dotted-path lookups into the project object model.
//!
//! The project is snapshotted to a JSON value once, at construction; paths
//! are then evaluated against that snapshot. Supported syntax is a chain of
//! field names separated by `.`, each optionally followed by `[n]` list
//! indexes: `project.developers[0].email`. The first segment names the root
//! and is ignored when the path has more than one segment, so
//! `project.version`, `pom.version` and `version` are equivalent.

use crate::{InterpolationError, ValueSource};
use log::warn;
use quire_types::ProjectDescriptor;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct ProjectValueSource {
    snapshot: Value,
}

#[derive(Debug, PartialEq, Eq)]
enum Step<'a> {
    Field(&'a str),
    Index(usize),
}

impl ProjectValueSource {
    pub fn new(project: &ProjectDescriptor) -> Self {
        let mut snapshot = serde_json::to_value(project).unwrap_or_else(|e| {
            warn!("Failed to snapshot project '{}': {}", project.artifact_id, e);
            Value::Null
        });
        Self::add_derived_values(&mut snapshot, project);
        Self { snapshot }
    }

    /// Values the project computes rather than stores: the absolute
    /// `build.directory` (defaulting to `<basedir>/target`).
    fn add_derived_values(snapshot: &mut Value, project: &ProjectDescriptor) {
        let Value::Object(root) = snapshot else {
            return;
        };
        let build_directory = Value::String(project.build_directory().display().to_string());
        match root.get_mut("build") {
            Some(Value::Object(build)) => {
                build.insert("directory".to_string(), build_directory);
            }
            _ => {
                let mut build = serde_json::Map::new();
                build.insert("directory".to_string(), build_directory);
                root.insert("build".to_string(), Value::Object(build));
            }
        }
        root.insert(
            "basedir".to_string(),
            Value::String(project.basedir.display().to_string()),
        );
    }

    fn parse_path(expression: &str) -> Result<Vec<Step<'_>>, String> {
        let mut segments: Vec<&str> = expression.split('.').collect();
        if segments.len() > 1 {
            segments.remove(0);
        }

        let mut steps = Vec::new();
        for segment in segments {
            let (field, mut rest) = match segment.find('[') {
                Some(pos) => segment.split_at(pos),
                None => (segment, ""),
            };
            if field.is_empty() {
                return Err(format!("empty property name in '{expression}'"));
            }
            steps.push(Step::Field(field));

            while !rest.is_empty() {
                let close = rest
                    .find(']')
                    .ok_or_else(|| format!("unclosed index in '{expression}'"))?;
                let index = rest[1..close]
                    .trim()
                    .parse::<usize>()
                    .map_err(|e| format!("bad index '{}' in '{expression}': {e}", &rest[1..close]))?;
                steps.push(Step::Index(index));
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(format!("unexpected '{rest}' after index in '{expression}'"));
                }
            }
        }
        Ok(steps)
    }

    fn evaluate(&self, expression: &str) -> Result<Option<String>, String> {
        let steps = Self::parse_path(expression)?;

        let mut current = &self.snapshot;
        for step in steps {
            let next = match step {
                Step::Field(name) => current.get(name),
                Step::Index(index) => current.get(index),
            };
            match next {
                Some(value) => current = value,
                None => return Ok(None),
            }
        }

        Ok(match current {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        })
    }
}

impl ValueSource for ProjectValueSource {
    fn value(&self, expression: &str) -> Result<Option<String>, InterpolationError> {
        match self.evaluate(expression) {
            Ok(value) => Ok(value),
            Err(message) => {
                warn!("Failed to extract '{}' from the project: {}", expression, message);
                Ok(None)
            }
        }
    }

    fn name(&self) -> &'static str {
        "ProjectValueSource"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_types::{Developer, Organization};

    fn project() -> ProjectDescriptor {
        let mut project = ProjectDescriptor::new("core");
        project.version = Some("2.3.1".to_string());
        project.organization = Some(Organization {
            name: Some("ACME".to_string()),
            url: None,
        });
        project.developers = vec![Developer {
            name: Some("Ada".to_string()),
            email: Some("ada@example.org".to_string()),
            ..Default::default()
        }];
        project
    }

    fn value(expression: &str) -> Option<String> {
        ProjectValueSource::new(&project()).value(expression).unwrap()
    }

    #[test]
    fn test_root_token_is_ignored() {
        assert_eq!(value("project.version").as_deref(), Some("2.3.1"));
        assert_eq!(value("pom.version").as_deref(), Some("2.3.1"));
        assert_eq!(value("version").as_deref(), Some("2.3.1"));
        assert_eq!(value("project.artifactId").as_deref(), Some("core"));
    }

    #[test]
    fn test_nested_and_indexed_paths() {
        assert_eq!(value("project.organization.name").as_deref(), Some("ACME"));
        assert_eq!(value("project.developers[0].email").as_deref(), Some("ada@example.org"));
        assert_eq!(value("project.developers[3].email"), None);
    }

    #[test]
    fn test_build_directory_is_resolved() {
        let mut project = project();
        project.basedir = std::path::PathBuf::from("/work/core");
        let source = ProjectValueSource::new(&project);
        assert_eq!(
            source.value("project.build.directory").unwrap().as_deref(),
            Some("/work/core/target")
        );
        assert_eq!(source.value("project.basedir").unwrap().as_deref(), Some("/work/core"));

        project.build.directory = Some("out".into());
        let source = ProjectValueSource::new(&project);
        assert_eq!(
            source.value("pom.build.directory").unwrap().as_deref(),
            Some("/work/core/out")
        );
    }

    #[test]
    fn test_missing_and_compound_values_fall_through() {
        assert_eq!(value("project.nothing.here"), None);
        assert_eq!(value("project.organization"), None);
        assert_eq!(value("project.name"), None);
        assert_eq!(value("date"), None);
    }

    #[test]
    fn test_malformed_paths_are_not_fatal() {
        assert_eq!(value("project.developers[x].name"), None);
        assert_eq!(value("project.developers[0"), None);
        assert_eq!(value("project..version"), None);
    }

    #[test]
    fn test_parse_path() {
        let steps = ProjectValueSource::parse_path("project.a[1][2].b").unwrap();
        assert_eq!(
            steps,
            vec![Step::Field("a"), Step::Index(1), Step::Index(2), Step::Field("b")]
        );
    }
}
