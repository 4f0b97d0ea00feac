use crate::types::MappingRow;
use std::collections::{HashMap, HashSet};

/// Facility to county lookup.
///
/// Counties keep the order in which they first appear in the mapping file.
/// Rows with a blank facility or county are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountyMap {
    counties: Vec<String>,
    facilities: HashMap<String, HashSet<String>>,
}

impl CountyMap {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = MappingRow>,
    {
        let mut map = Self::default();
        for row in rows {
            let facility = row.facility_name.as_deref().map(str::trim).unwrap_or("");
            let county = row.county.as_deref().map(str::trim).unwrap_or("");
            if facility.is_empty() || county.is_empty() {
                continue;
            }
            map.insert(facility, county);
        }
        map
    }

    pub fn insert(&mut self, facility: &str, county: &str) {
        if !self.facilities.contains_key(county) {
            self.counties.push(county.to_string());
        }
        self.facilities
            .entry(county.to_string())
            .or_default()
            .insert(facility.to_string());
    }

    /// Distinct counties in first-appearance order.
    pub fn counties(&self) -> &[String] {
        &self.counties
    }

    pub fn contains(&self, county: &str, facility: &str) -> bool {
        self.facilities
            .get(county)
            .is_some_and(|set| set.contains(facility))
    }

    pub fn is_empty(&self) -> bool {
        self.counties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counties.len()
    }
}
