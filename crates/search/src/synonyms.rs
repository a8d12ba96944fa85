//! Synonym tables for string and list fields.
//!
//! A table maps a field name to groups of equivalent terms. Each group is a
//! canonical term plus its synonyms; lookups are symmetric, so any two
//! members of one group are synonyms of each other.

use crate::error::{Result, SearchError};
use crate::fuzzy::normalize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default)]
struct FieldGroups {
    canonicals: Vec<String>,
    // normalized term -> indices into `canonicals`
    members: HashMap<String, Vec<usize>>,
}

/// Field name -> canonical term -> synonym groups.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    fields: HashMap<String, FieldGroups>,
}

impl SynonymTable {
    /// Build a table from `field -> canonical -> synonyms`.
    pub fn new(tables: &BTreeMap<String, BTreeMap<String, Vec<String>>>) -> Result<Self> {
        let mut fields = HashMap::new();

        for (field, terms) in tables {
            let mut groups = FieldGroups::default();
            for (canonical, synonyms) in terms {
                let key = normalize(canonical);
                if key.is_empty() {
                    return Err(SearchError::InvalidSynonyms(format!(
                        "empty canonical term in {}",
                        field
                    )));
                }
                let index = groups.canonicals.len();
                groups.canonicals.push(canonical.clone());

                for term in std::iter::once(canonical).chain(synonyms) {
                    let term = normalize(term);
                    if term.is_empty() {
                        return Err(SearchError::InvalidSynonyms(format!(
                            "empty synonym for {} in {}",
                            canonical, field
                        )));
                    }
                    let entry = groups.members.entry(term).or_default();
                    if !entry.contains(&index) {
                        entry.push(index);
                    }
                }
            }
            fields.insert(field.clone(), groups);
        }

        Ok(Self { fields })
    }

    /// True when `a` and `b` share a synonym group for `field`.
    ///
    /// Both terms must already be normalized.
    pub fn are_synonyms(&self, field: &str, a: &str, b: &str) -> bool {
        let Some(groups) = self.fields.get(field) else {
            return false;
        };
        match (groups.members.get(a), groups.members.get(b)) {
            (Some(left), Some(right)) => left.iter().any(|g| right.contains(g)),
            _ => false,
        }
    }

    /// Canonical term for a (raw) term, when the field has one.
    pub fn canonical(&self, field: &str, term: &str) -> Option<&str> {
        let groups = self.fields.get(field)?;
        let index = *groups.members.get(&normalize(term))?.first()?;
        groups.canonicals.get(index).map(String::as_str)
    }

    /// Field names that carry a table.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}
