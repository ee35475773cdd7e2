//! The build project's object model, as seen by the document build.
//!
//! Only the fields the document pipeline reads are modelled. A descriptor is
//! usually loaded from a JSON manifest; field names follow the camelCase
//! spelling used in `${project.*}` expressions.

use crate::ids::StagedId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDescriptor {
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub version: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub inception_year: Option<String>,
    pub organization: Option<Organization>,
    pub developers: Vec<Developer>,
    pub scm: Option<Scm>,
    pub properties: BTreeMap<String, String>,
    pub build: Build,
    pub basedir: PathBuf,
    pub reporting: Option<Reporting>,
    pub parent: Option<Box<ProjectDescriptor>>,
}

impl ProjectDescriptor {
    pub fn new(artifact_id: impl Into<String>) -> Self {
        Self {
            artifact_id: artifact_id.into(),
            ..Default::default()
        }
    }

    /// The human-facing module name, falling back to the artifact id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.artifact_id)
    }

    /// Build output directory, resolved against `basedir` when relative.
    pub fn build_directory(&self) -> PathBuf {
        let dir = self
            .build
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("target"));
        if dir.is_absolute() {
            dir
        } else {
            self.basedir.join(dir)
        }
    }

    /// Resolves `path` against the project base directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.basedir.join(path)
        }
    }

    /// Iterates from this project up through its parents.
    pub fn lineage(&self) -> impl Iterator<Item = &ProjectDescriptor> {
        std::iter::successors(Some(self), |p| p.parent.as_deref())
    }

    /// The root-to-leaf chain of artifact ids identifying this module.
    pub fn staged_id(&self) -> StagedId {
        let mut path: Vec<&str> = self.lineage().map(|p| p.artifact_id.as_str()).collect();
        path.reverse();
        StagedId::from_segments(path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Organization {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Developer {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub organization: Option<String>,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scm {
    pub connection: Option<String>,
    pub developer_connection: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Build {
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reporting {
    pub exclude_defaults: bool,
    pub plugins: Vec<ReportPlugin>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportPlugin {
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub version: Option<String>,
}
