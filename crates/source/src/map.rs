use crate::{InterpolationError, ValueSource};
use std::collections::BTreeMap;

/// A flat key to value map.
#[derive(Debug, Clone, Default)]
pub struct MapValueSource {
    values: BTreeMap<String, String>,
}

impl MapValueSource {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Merges layers into one map; later layers override earlier ones.
    pub fn layered<'a, I>(layers: I) -> Self
    where
        I: IntoIterator<Item = &'a BTreeMap<String, String>>,
    {
        let mut values = BTreeMap::new();
        for layer in layers {
            values.extend(layer.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ValueSource for MapValueSource {
    fn value(&self, expression: &str) -> Result<Option<String>, InterpolationError> {
        Ok(self.values.get(expression).cloned())
    }

    fn name(&self) -> &'static str {
        "MapValueSource"
    }
}

/// Environment variables, snapshotted at construction.
///
/// Expressions may name a variable directly (`HOME`) or with an `env.`
/// prefix (`env.HOME`).
#[derive(Debug, Clone, Default)]
pub struct EnvValueSource {
    vars: BTreeMap<String, String>,
}

impl EnvValueSource {
    pub fn from_env() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn new(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }
}

impl ValueSource for EnvValueSource {
    fn value(&self, expression: &str) -> Result<Option<String>, InterpolationError> {
        let name = expression.strip_prefix("env.").unwrap_or(expression);
        Ok(self.vars.get(name).cloned())
    }

    fn name(&self) -> &'static str {
        "EnvValueSource"
    }
}
