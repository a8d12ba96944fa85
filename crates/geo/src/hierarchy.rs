//! Neighborhood and metro-area lookup tables.
//!
//! Two tables consulted in order: neighborhood -> parent city, then
//! city -> metro-area cities. Lookups ignore case and surrounding or
//! repeated whitespace; unknown places simply do not resolve.

use crate::error::{GeoError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fold a place name into its lookup key.
pub fn fold_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// One step up the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expansion {
    /// A neighborhood widened to its parent city
    City(String),
    /// A city widened to its metro area; `cities` is in priority order
    Metro { city: String, cities: Vec<String> },
}

impl Expansion {
    /// Human-readable name of the widened area.
    pub fn display_name(&self) -> String {
        match self {
            Expansion::City(city) => city.clone(),
            Expansion::Metro { city, .. } => format!("the {} area", city),
        }
    }
}

/// Read-only geographic hierarchy.
#[derive(Debug, Clone, Default)]
pub struct GeographicHierarchy {
    neighborhoods: HashMap<String, String>,
    metros: HashMap<String, (String, Vec<String>)>,
}

impl GeographicHierarchy {
    /// Build the hierarchy from neighborhood and metro tables.
    pub fn new<N, M, L>(neighborhoods: N, metros: M) -> Result<Self>
    where
        N: IntoIterator<Item = (String, String)>,
        M: IntoIterator<Item = (String, L)>,
        L: IntoIterator<Item = String>,
    {
        let mut folded_neighborhoods = HashMap::new();
        for (neighborhood, city) in neighborhoods {
            let key = fold_key(&neighborhood);
            if key.is_empty() || city.trim().is_empty() {
                return Err(GeoError::InvalidEntry(format!(
                    "neighborhood '{}' -> '{}'",
                    neighborhood, city
                )));
            }
            if folded_neighborhoods
                .insert(key, city.trim().to_string())
                .is_some()
            {
                return Err(GeoError::DuplicateEntry(neighborhood));
            }
        }

        let mut folded_metros = HashMap::new();
        for (city, members) in metros {
            let key = fold_key(&city);
            let members: Vec<String> = members
                .into_iter()
                .map(|m| m.trim().to_string())
                .collect();
            if key.is_empty() || members.is_empty() || members.iter().any(String::is_empty) {
                return Err(GeoError::InvalidEntry(format!("metro '{}'", city)));
            }
            if folded_metros
                .insert(key, (city.trim().to_string(), members))
                .is_some()
            {
                return Err(GeoError::DuplicateEntry(city));
            }
        }

        Ok(Self {
            neighborhoods: folded_neighborhoods,
            metros: folded_metros,
        })
    }

    /// Parent city of a neighborhood.
    pub fn parent_city(&self, neighborhood: &str) -> Option<&str> {
        self.neighborhoods
            .get(&fold_key(neighborhood))
            .map(String::as_str)
    }

    /// Metro-area cities for a city, in priority order.
    pub fn metro_cities(&self, city: &str) -> Option<&[String]> {
        self.metros
            .get(&fold_key(city))
            .map(|(_, cities)| cities.as_slice())
    }

    /// Parent city for a neighborhood, otherwise the input unchanged.
    pub fn resolve(&self, name: &str) -> String {
        self.parent_city(name)
            .map(String::from)
            .unwrap_or_else(|| name.to_string())
    }

    /// Widen a place by one level, if the hierarchy knows how.
    ///
    /// Neighborhoods are consulted before metros. A metro list that adds no
    /// city beyond the input does not count as an expansion.
    pub fn expand(&self, name: &str) -> Option<Expansion> {
        if let Some(city) = self.parent_city(name) {
            return Some(Expansion::City(city.to_string()));
        }

        let key = fold_key(name);
        let (city, cities) = self.metros.get(&key)?;
        if cities.iter().all(|c| fold_key(c) == key) {
            return None;
        }
        Some(Expansion::Metro {
            city: city.clone(),
            cities: cities.clone(),
        })
    }

    pub fn neighborhood_count(&self) -> usize {
        self.neighborhoods.len()
    }

    pub fn metro_count(&self) -> usize {
        self.metros.len()
    }
}
