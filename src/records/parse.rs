use std::collections::HashMap;

use serde::Deserialize;

pub const UNKNOWN_AFFILIATION: &str = "Unknown affiliation";

/// One row of a bibliographic export, exactly as it was read.
///
/// Every field is optional so that missing columns, missing JSON keys and
/// empty CSV cells all load without error.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RawRecord {
    #[serde(default, rename = "Authors")]
    pub authors: Option<String>,
    #[serde(default, rename = "Publisher")]
    pub publisher: Option<String>,
    #[serde(default, rename = "Authors with affiliations")]
    pub authors_with_affiliations: Option<String>,
    #[serde(default, rename = "Country")]
    pub country: Option<String>,
}

/// A record split into its author list and affiliation segments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub authors: Vec<String>,
    pub publisher: String,
    pub affiliation_entries: Vec<String>,
    pub country: Option<String>,
}

impl Record {
    pub fn parse(raw: &RawRecord) -> Self {
        let authors = match raw.authors.as_deref() {
            Some(field) if !field.trim().is_empty() => {
                field.split(',').map(|name| name.trim().to_owned()).collect()
            }
            _ => Vec::new(),
        };

        let affiliation_entries = match raw.authors_with_affiliations.as_deref() {
            Some(field) if !field.is_empty() => field
                .split(';')
                .map(|entry| entry.trim().to_owned())
                .collect(),
            _ => Vec::new(),
        };

        let country = raw
            .country
            .as_ref()
            .filter(|country| !country.is_empty())
            .cloned();

        Self {
            authors,
            publisher: raw.publisher.clone().unwrap_or_default(),
            affiliation_entries,
            country,
        }
    }

    /// Maps a name key built from each affiliation entry to the rest of that entry.
    ///
    /// The key is the first two comma-separated tokens joined by a space. An
    /// entry with a single token keys on `"<token> undefined"` and carries no
    /// affiliation. Later entries with the same key replace earlier ones.
    pub fn affiliation_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::with_capacity(self.affiliation_entries.len());
        for entry in &self.affiliation_entries {
            if entry.is_empty() {
                continue;
            }

            let parts = entry.split(',').map(str::trim).collect::<Vec<_>>();
            let second = parts.get(1).copied().unwrap_or("undefined");
            let key = format!("{} {}", parts[0], second);
            let affiliation = if parts.len() > 1 {
                parts[1..].join(", ")
            } else {
                UNKNOWN_AFFILIATION.to_owned()
            };
            map.insert(key, affiliation);
        }
        map
    }
}

pub fn resolve_affiliation(map: &HashMap<String, String>, author: &str) -> String {
    map.get(author)
        .filter(|affiliation| !affiliation.is_empty())
        .cloned()
        .unwrap_or_else(|| UNKNOWN_AFFILIATION.to_owned())
}
