//! Chart-ready rows derived from processed datasets.
//!
//! These are the per-year numbers the dashboard draws: stacked dog/cat/other
//! bars, the not-adopted and not-returned pie slices, and the rates printed
//! above each bar.

use crate::types::{
    AdoptionPoint, AdoptionRecord, Group, IntakePoint, IntakeRecord, ProcessedDataset, RtoPoint,
    RtoRecord, TnoPoint, TnoRecord, YearSummary,
};
use crate::util::ratio;
use std::ops::RangeInclusive;

/// Years a chart covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearWindow(RangeInclusive<i32>);

impl YearWindow {
    /// Full statewide history.
    pub fn statewide() -> Self {
        Self(2015..=i32::MAX)
    }

    /// County mini charts.
    pub fn county() -> Self {
        Self(2020..=2024)
    }

    pub fn new(range: RangeInclusive<i32>) -> Self {
        Self(range)
    }

    pub fn contains(&self, year: i32) -> bool {
        self.0.contains(&year)
    }
}

/// Years of the `total` group that fall in the window.
fn window_years<R>(dataset: &ProcessedDataset<R>, window: &YearWindow) -> Vec<i32> {
    dataset
        .group(Group::Total)
        .map(|t| t.keys().copied().filter(|y| window.contains(*y)).collect())
        .unwrap_or_default()
}

fn year_or_default<R: Copy + Default>(summary: Option<&YearSummary<R>>, year: i32) -> R {
    summary.and_then(|s| s.get(&year)).copied().unwrap_or_default()
}

/// `total - dog - cat`. Negative when the species rows over-count the
/// total; left as is for the renderer to clamp.
pub fn other_category(total: i64, dog: i64, cat: i64) -> i64 {
    total.saturating_sub(dog).saturating_sub(cat)
}

pub fn adoption_series(
    dataset: &ProcessedDataset<AdoptionRecord>,
    window: &YearWindow,
) -> Vec<AdoptionPoint> {
    let (total, dog, cat) = (
        dataset.group(Group::Total),
        dataset.group(Group::Dog),
        dataset.group(Group::Cat),
    );
    window_years(dataset, window)
        .into_iter()
        .map(|year| {
            let t = year_or_default(total, year);
            let d = year_or_default(dog, year);
            let c = year_or_default(cat, year);
            AdoptionPoint {
                year,
                adoption_total: t.outcome_adoption,
                adoption_dog: d.outcome_adoption,
                adoption_cat: c.outcome_adoption,
                adoption_other: other_category(
                    t.outcome_adoption,
                    d.outcome_adoption,
                    c.outcome_adoption,
                ),
                intake_total: t.intake_total,
                intake_dog: d.intake_total,
                intake_cat: c.intake_total,
                not_adopted: t.intake_total.saturating_sub(t.outcome_adoption).max(0),
                adoption_rate: ratio(t.outcome_adoption, t.intake_total) * 100.0,
            }
        })
        .filter(|p| p.intake_total > 0)
        .collect()
}

pub fn rto_series(dataset: &ProcessedDataset<RtoRecord>, window: &YearWindow) -> Vec<RtoPoint> {
    let (total, dog, cat) = (
        dataset.group(Group::Total),
        dataset.group(Group::Dog),
        dataset.group(Group::Cat),
    );
    window_years(dataset, window)
        .into_iter()
        .map(|year| {
            let t = year_or_default(total, year);
            let d = year_or_default(dog, year);
            let c = year_or_default(cat, year);
            RtoPoint {
                year,
                rto_total: t.outcome_return_to_owner,
                rto_dog: d.outcome_return_to_owner,
                rto_cat: c.outcome_return_to_owner,
                rto_other: other_category(
                    t.outcome_return_to_owner,
                    d.outcome_return_to_owner,
                    c.outcome_return_to_owner,
                ),
                stray_total: t.intake_stray,
                stray_dog: d.intake_stray,
                stray_cat: c.intake_stray,
                not_returned: t.intake_stray.saturating_sub(t.outcome_return_to_owner).max(0),
                return_rate: ratio(t.outcome_return_to_owner, t.intake_stray) * 100.0,
            }
        })
        .filter(|p| p.stray_total > 0)
        .collect()
}

pub fn intake_series(
    dataset: &ProcessedDataset<IntakeRecord>,
    window: &YearWindow,
) -> Vec<IntakePoint> {
    let total = dataset.group(Group::Total);
    window_years(dataset, window)
        .into_iter()
        .map(|year| {
            let t = year_or_default(total, year);
            let other = t
                .intake_in_state_transfer
                .saturating_add(t.intake_out_of_state_transfer)
                .saturating_add(t.intake_other);
            IntakePoint {
                year,
                stray: t.intake_stray,
                relinquished: t.intake_relinquished,
                other,
                total: t
                    .intake_stray
                    .saturating_add(t.intake_relinquished)
                    .saturating_add(other),
            }
        })
        .collect()
}

pub fn tno_series(dataset: &ProcessedDataset<TnoRecord>, window: &YearWindow) -> Vec<TnoPoint> {
    let total = dataset.group(Group::Total);
    window_years(dataset, window)
        .into_iter()
        .map(|year| {
            let t = year_or_default(total, year);
            TnoPoint {
                year,
                out_of_state_intake: t.intake_out_of_state_transfer,
                missing_or_stolen: t.outcome_missing_or_stolen,
                euthanasia: t.outcome_euthanasia,
                deaths: t.outcome_deaths,
                negative_total: t.negative_total(),
            }
        })
        .collect()
}
