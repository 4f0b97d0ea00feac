//! Group-by-year summation, statewide and per county.
//!
//! Everything here is a pure fold over borrowed records; callers get fresh
//! output on every call.

use crate::county::CountyMap;
use crate::types::{Counts, CountyEntry, Group, ProcessedDataset, ShelterRecord, YearSummary};
use std::cmp::Ordering;
use std::ops::RangeInclusive;
use tracing::debug;

/// Years a county must show meaningful data in to be listed.
pub const INCLUSION_WINDOW: RangeInclusive<i32> = 2020..=2024;

/// Latest complete year; counties are ranked on it.
pub const RANKING_YEAR: i32 = 2024;

/// A per-year record that can absorb one row's counters.
pub trait Tally: Default {
    fn add(&mut self, counts: &Counts);
}

pub fn summarize_years<'a, R, I>(records: I) -> YearSummary<R>
where
    R: Tally,
    I: IntoIterator<Item = &'a ShelterRecord>,
{
    let mut summary = YearSummary::new();
    for r in records {
        summary.entry(r.year).or_insert_with(R::default).add(&r.counts);
    }
    summary
}

/// One year summary per requested group.
pub fn process<R: Tally>(records: &[&ShelterRecord], groups: &[Group]) -> ProcessedDataset<R> {
    let mut dataset = ProcessedDataset::new();
    for group in groups {
        let summary: YearSummary<R> =
            summarize_years(records.iter().copied().filter(|r| group.matches(r)));
        debug!(group = group.label(), years = summary.len(), "group summarized");
        dataset.insert(*group, summary);
    }
    dataset
}

/// Per-county datasets, in mapping order, for counties with at least one row.
pub fn county_entries<R: Tally>(
    records: &[ShelterRecord],
    map: &CountyMap,
    groups: &[Group],
) -> Vec<CountyEntry<R>> {
    let mut entries = Vec::new();
    for county in map.counties() {
        let subset: Vec<&ShelterRecord> = records
            .iter()
            .filter(|r| {
                r.facility_name
                    .as_deref()
                    .is_some_and(|f| map.contains(county, f))
            })
            .collect();
        if subset.is_empty() {
            debug!(county = %county, "no rows for county");
            continue;
        }
        entries.push(CountyEntry {
            county: county.clone(),
            data: process(&subset, groups),
        });
    }
    entries
}

/// True when some year in `window` of the county's total satisfies `valid`.
pub fn has_meaningful_data<R, F>(entry: &CountyEntry<R>, window: RangeInclusive<i32>, valid: F) -> bool
where
    F: Fn(&R) -> bool,
{
    let Some(total) = entry.data.group(Group::Total) else {
        return false;
    };
    total.range(window).any(|(_, r)| valid(r))
}

/// Value a county is ranked on: `value` of its total for `year`, reading a
/// missing year as all zeros.
pub fn ranking_value<R, F>(entry: &CountyEntry<R>, year: i32, value: F) -> f64
where
    R: Default,
    F: Fn(&R) -> f64,
{
    match entry.data.year(Group::Total, year) {
        Some(r) => value(r),
        None => value(&R::default()),
    }
}

/// Sort descending by ranking value; ties go to the county name, ascending.
pub fn rank_descending<R, F>(entries: &mut [CountyEntry<R>], year: i32, value: F)
where
    R: Default,
    F: Fn(&R) -> f64,
{
    entries.sort_by(|a, b| {
        let va = ranking_value(a, year, &value);
        let vb = ranking_value(b, year, &value);
        vb.partial_cmp(&va)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.county.cmp(&b.county))
    });
}
