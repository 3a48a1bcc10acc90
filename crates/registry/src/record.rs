use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    HasAgency,
    NoAgency,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::HasAgency => "has-agency",
            Category::NoAgency => "no-agency",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered `label -> value` pairs.
///
/// Serialized as a JSON object; entries keep their document order in both
/// directions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pairs: Vec<(String, String)>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((label.into(), value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates `(label, value)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.pairs.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }
}

impl<L: Into<String>, V: Into<String>> FromIterator<(L, V)> for Stats {
    fn from_iter<I: IntoIterator<Item = (L, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(l, v)| (l.into(), v.into()))
                .collect(),
        }
    }
}

impl Serialize for Stats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len()))?;
        for (label, value) in &self.pairs {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

struct StatsVisitor;

impl<'de> Visitor<'de> for StatsVisitor {
    type Value = Stats;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of stat labels to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Stats, A::Error> {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((label, value)) = access.next_entry::<String, String>()? {
            pairs.push((label, value));
        }
        Ok(Stats { pairs })
    }
}

impl<'de> Deserialize<'de> for Stats {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(StatsVisitor)
    }
}

/// Descriptive payload registered under one or more aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryEntry {
    pub status: String,
    pub details: String,
    #[serde(default)]
    pub stats: Stats,
    pub category: Category,
}

impl CountryEntry {
    pub fn new(status: impl Into<String>, details: impl Into<String>, category: Category) -> Self {
        Self {
            status: status.into(),
            details: details.into(),
            stats: Stats::new(),
            category,
        }
    }

    pub fn with_stat(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.stats = self.stats.with(label, value);
        self
    }
}

/// A registered country as seen through any of its aliases.
///
/// `name` is always the first alias of the registration, whichever alias
/// matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryRecord {
    pub name: String,
    pub status: String,
    pub details: String,
    pub stats: Stats,
    pub category: Category,
}

impl CountryRecord {
    pub fn from_entry(name: impl Into<String>, entry: CountryEntry) -> Self {
        Self {
            name: name.into(),
            status: entry.status,
            details: entry.details,
            stats: entry.stats,
            category: entry.category,
        }
    }

    pub fn has_agency(&self) -> bool {
        self.category == Category::HasAgency
    }
}

/// One element of a registry JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub aliases: Vec<String>,
    pub status: String,
    pub details: String,
    #[serde(default)]
    pub stats: Stats,
    pub category: Category,
}

impl Registration {
    pub fn into_parts(self) -> (Vec<String>, CountryEntry) {
        (
            self.aliases,
            CountryEntry {
                status: self.status,
                details: self.details,
                stats: self.stats,
                category: self.category,
            },
        )
    }
}
