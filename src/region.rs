//! # Region Catalog
//!
//! The fixed set of regions every record is keyed by. Each entry carries three
//! identities:
//! - `id`: the stable integer stored as `region_id` (1..8 for the Australian set)
//! - `name`: the display name, which is also the column header used by Tables L and Q
//! - `abbreviation`: the sheet prefix used by Table O ("VIC" → sheet "VIC FY")
//!
//! The catalog is built once at startup and passed by reference into the
//! extractor, reshaper and loader. Lookups are exact-match; an unknown name or
//! abbreviation is a configuration error.

use crate::{EtlError, EtlResult};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub id: u32,
    pub name: String,
    pub abbreviation: String,
}

impl Region {
    pub fn new(id: u32, name: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            abbreviation: abbreviation.into(),
        }
    }
}

/// Immutable, ordered collection of [`Region`] entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionCatalog {
    regions: Vec<Region>,
}

// (id, name, abbreviation) in load order
const AUSTRALIAN_REGIONS: [(u32, &str, &str); 8] = [
    (1, "Australia", "AUS"),
    (2, "Victoria", "VIC"),
    (3, "New South Wales", "NSW"),
    (4, "Queensland", "QLD"),
    (5, "South Australia", "SA"),
    (6, "Northern Territory", "NT"),
    (7, "Western Australia", "WA"),
    (8, "Tasmania", "TAS"),
];

impl RegionCatalog {
    /// Build a catalog from explicit entries.
    ///
    /// # Errors
    /// - Empty catalog
    /// - Id of zero
    /// - Blank name or abbreviation
    /// - Duplicate id, name or abbreviation
    pub fn new(regions: Vec<Region>) -> EtlResult<Self> {
        if regions.is_empty() {
            return Err(EtlError::Config("region catalog is empty".into()));
        }

        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        let mut abbreviations = HashSet::new();
        for region in &regions {
            if region.id == 0 {
                return Err(EtlError::Config(format!(
                    "region '{}' has id 0; ids start at 1",
                    region.name
                )));
            }
            if region.name.trim().is_empty() || region.abbreviation.trim().is_empty() {
                return Err(EtlError::Config(format!(
                    "region {} has a blank name or abbreviation",
                    region.id
                )));
            }
            if !ids.insert(region.id) {
                return Err(EtlError::Config(format!("duplicate region id {}", region.id)));
            }
            if !names.insert(region.name.as_str()) {
                return Err(EtlError::Config(format!(
                    "duplicate region name '{}'",
                    region.name
                )));
            }
            if !abbreviations.insert(region.abbreviation.as_str()) {
                return Err(EtlError::Config(format!(
                    "duplicate region abbreviation '{}'",
                    region.abbreviation
                )));
            }
        }

        Ok(Self { regions })
    }

    /// The eight Australian Energy Statistics regions, national aggregate first.
    pub fn australia() -> Self {
        let regions = AUSTRALIAN_REGIONS
            .iter()
            .map(|&(id, name, abbreviation)| Region::new(id, name, abbreviation))
            .collect();
        Self { regions }
    }

    /// Keep only the named regions, preserving their catalog ids.
    pub fn subset(&self, names: &[&str]) -> EtlResult<Self> {
        let regions = names
            .iter()
            .map(|name| self.by_name(name).cloned())
            .collect::<EtlResult<Vec<_>>>()?;
        Self::new(regions)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn by_id(&self, id: u32) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn by_name(&self, name: &str) -> EtlResult<&Region> {
        self.regions
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| EtlError::Config(format!("unknown region name '{name}'")))
    }

    pub fn by_abbreviation(&self, abbreviation: &str) -> EtlResult<&Region> {
        self.regions
            .iter()
            .find(|r| r.abbreviation == abbreviation)
            .ok_or_else(|| {
                EtlError::Config(format!("unknown region abbreviation '{abbreviation}'"))
            })
    }

    pub fn contains_id(&self, id: u32) -> bool {
        self.by_id(id).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        self.regions.iter().map(|r| r.name.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a RegionCatalog {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}
