use serde_json::Value;
use std::collections::HashSet;

/// Predicate over document bodies. Paths are dotted field names.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    #[default]
    All,
    Eq {
        path: String,
        value: Value,
    },
    In {
        path: String,
        values: Vec<Value>,
    },
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(path: impl Into<String>, value: Value) -> Self {
        Filter::Eq {
            path: path.into(),
            value,
        }
    }

    pub fn one_of(path: impl Into<String>, values: Vec<Value>) -> Self {
        Filter::In {
            path: path.into(),
            values,
        }
    }

    /// Conjunction, flattening nested `And`s and dropping `All`.
    pub fn and(self, other: Filter) -> Self {
        let mut parts = Vec::new();
        for filter in [self, other] {
            match filter {
                Filter::All => {}
                Filter::And(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        match parts.len() {
            0 => Filter::All,
            1 => parts.remove(0),
            _ => Filter::And(parts),
        }
    }

    pub fn matches(&self, body: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { path, value } => lookup(body, path) == Some(value),
            Filter::In { path, values } => {
                lookup(body, path).is_some_and(|found| values.contains(found))
            }
            Filter::And(filters) => filters.iter().all(|f| f.matches(body)),
        }
    }

    /// An equality-style clause on one of `indexed`, usable for an index probe.
    pub(crate) fn index_probe(&self, indexed: &HashSet<String>) -> Option<(&str, Vec<&Value>)> {
        match self {
            Filter::Eq { path, value } if indexed.contains(path) => {
                Some((path.as_str(), vec![value]))
            }
            Filter::In { path, values } if indexed.contains(path) => {
                Some((path.as_str(), values.iter().collect()))
            }
            Filter::And(filters) => filters.iter().find_map(|f| f.index_probe(indexed)),
            _ => None,
        }
    }
}

/// Resolves a dotted path inside a JSON document.
pub fn lookup<'a>(body: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(body, |current, segment| current.as_object()?.get(segment))
}
