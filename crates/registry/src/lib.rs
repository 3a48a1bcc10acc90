//! Country registry: normalized aliases mapped to shared, immutable records.
//!
//! Build one with [`RegistryBuilder`] (or load a JSON table), then hand the
//! frozen [`Registry`] to whoever needs lookups. Nothing mutates it after
//! `build()`.

pub mod builtin;
pub mod normalize;
pub mod record;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

pub use normalize::normalize;
pub use record::*;

#[derive(Debug)]
pub enum RegistryError {
    EmptyAliases,
    /// The alias has no ASCII letters left after normalization.
    EmptyKey { alias: String },
    Json(String),
    Io { path: PathBuf, source: std::io::Error },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::EmptyAliases => write!(f, "registration needs at least one alias"),
            RegistryError::EmptyKey { alias } => {
                write!(f, "alias {alias:?} normalizes to an empty key")
            }
            RegistryError::Json(msg) => write!(f, "registry JSON error: {msg}"),
            RegistryError::Io { path, source } => {
                write!(f, "failed to read registry {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for RegistryError {}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: BTreeMap<String, Arc<CountryRecord>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entry` under every alias; the first alias is the display
    /// name. A key that is already taken is overwritten.
    pub fn register<S: AsRef<str>>(
        &mut self,
        aliases: &[S],
        entry: CountryEntry,
    ) -> Result<(), RegistryError> {
        let Some(canonical) = aliases.first() else {
            return Err(RegistryError::EmptyAliases);
        };

        let mut keys = Vec::with_capacity(aliases.len());
        for alias in aliases {
            let key = normalize(alias.as_ref());
            if key.is_empty() {
                return Err(RegistryError::EmptyKey {
                    alias: alias.as_ref().to_string(),
                });
            }
            keys.push(key);
        }

        let record = Arc::new(CountryRecord::from_entry(canonical.as_ref(), entry));
        for key in keys {
            if let Some(prev) = self.entries.insert(key.clone(), Arc::clone(&record)) {
                if prev.name != record.name {
                    debug!(key = %key, previous = %prev.name, current = %record.name, "registry key overwritten");
                }
            }
        }
        Ok(())
    }

    pub fn register_all(
        &mut self,
        registrations: impl IntoIterator<Item = Registration>,
    ) -> Result<(), RegistryError> {
        for registration in registrations {
            let (aliases, entry) = registration.into_parts();
            self.register(&aliases, entry)?;
        }
        Ok(())
    }

    pub fn build(self) -> Registry {
        Registry {
            entries: self.entries,
        }
    }
}

/// Frozen alias table. Cheap to share behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<String, Arc<CountryRecord>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Parses a JSON array of registrations.
    pub fn from_json_str(payload: &str) -> Result<Self, RegistryError> {
        let registrations: Vec<Registration> =
            serde_json::from_str(payload).map_err(|e| RegistryError::Json(e.to_string()))?;
        let mut builder = RegistryBuilder::new();
        builder.register_all(registrations)?;
        Ok(builder.build())
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let payload = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&payload)
    }

    /// Looks up a raw display name. `None` is the ordinary outcome for
    /// countries that were never registered.
    pub fn lookup(&self, raw_name: &str) -> Option<&CountryRecord> {
        self.lookup_shared(raw_name).map(|r| r.as_ref())
    }

    pub fn lookup_shared(&self, raw_name: &str) -> Option<&Arc<CountryRecord>> {
        let key = normalize(raw_name);
        if key.is_empty() {
            return None;
        }
        self.entries.get(&key)
    }

    pub fn contains(&self, raw_name: &str) -> bool {
        self.lookup_shared(raw_name).is_some()
    }

    /// Number of alias keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Distinct records, ordered by canonical name.
    pub fn records(&self) -> Vec<&CountryRecord> {
        let mut out: Vec<&CountryRecord> = Vec::new();
        for record in self.entries.values() {
            if !out.iter().any(|r| std::ptr::eq(*r, record.as_ref())) {
                out.push(record.as_ref());
            }
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, CountryEntry, Registry, RegistryBuilder, RegistryError};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn nasa() -> CountryEntry {
        CountryEntry::new(
            "Has National Space Agency (NASA)",
            "Broad civil space programs.",
            Category::HasAgency,
        )
        .with_stat("Agency", "NASA")
        .with_stat("Launch", "Yes")
    }

    #[test]
    fn aliases_resolve_to_the_canonical_record() {
        let mut b = RegistryBuilder::new();
        b.register(&["USA", "United States"], nasa()).expect("register");
        let reg = b.build();

        let a = reg.lookup("usa").expect("usa");
        let b = reg.lookup("United   States").expect("united states");
        assert_eq!(a.name, "USA");
        assert_eq!(a.category, Category::HasAgency);
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(
            reg.lookup_shared("USA").expect("shared"),
            reg.lookup_shared("united-states").expect("shared")
        ));
    }

    #[test]
    fn unknown_names_are_not_found() {
        let mut b = RegistryBuilder::new();
        b.register(&["USA"], nasa()).expect("register");
        let reg = b.build();
        assert!(reg.lookup("Germany").is_none());
        assert!(reg.lookup("").is_none());
        assert!(reg.lookup("!!!").is_none());
    }

    #[test]
    fn rejects_empty_alias_lists_and_letterless_aliases() {
        let mut b = RegistryBuilder::new();
        let none: [&str; 0] = [];
        assert!(matches!(b.register(&none, nasa()), Err(RegistryError::EmptyAliases)));
        assert!(matches!(
            b.register(&["USA", "51"], nasa()),
            Err(RegistryError::EmptyKey { .. })
        ));
        assert!(b.build().is_empty());
    }

    #[test]
    fn later_registration_wins_on_key_collision() {
        let mut b = RegistryBuilder::new();
        b.register(&["Korea"], CountryEntry::new("first", "", Category::NoAgency))
            .expect("first");
        b.register(&["South Korea", "KOREA!"], CountryEntry::new("second", "", Category::HasAgency))
            .expect("second");
        let reg = b.build();
        let rec = reg.lookup("korea").expect("korea");
        assert_eq!(rec.name, "South Korea");
        assert_eq!(rec.status, "second");
    }

    #[test]
    fn loads_json_table_with_ordered_stats() {
        let payload = r#"[
            {
                "aliases": ["Ireland"],
                "status": "No Government Space Agency",
                "details": "ESA member.",
                "stats": {"Space Approach": "ESA Member", "HDI Rank": "Very High"},
                "category": "no-agency"
            },
            {
                "aliases": ["Japan", "Nippon"],
                "status": "Has National Space Agency (JAXA)",
                "details": "Sample returns.",
                "category": "has-agency"
            }
        ]"#;
        let reg = Registry::from_json_str(payload).expect("load");
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.records().len(), 2);

        let ireland = reg.lookup("IRELAND").expect("ireland");
        let stats: Vec<(&str, &str)> = ireland.stats.iter().collect();
        assert_eq!(stats, vec![("Space Approach", "ESA Member"), ("HDI Rank", "Very High")]);
        assert_eq!(reg.lookup("nippon").expect("nippon").name, "Japan");
    }

    #[test]
    fn json_with_unknown_category_is_rejected() {
        let payload = r#"[{"aliases":["X"],"status":"s","details":"d","category":"unknown"}]"#;
        assert!(matches!(Registry::from_json_str(payload), Err(RegistryError::Json(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Registry::from_json_file("/definitely/not/here.json").expect_err("missing");
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
