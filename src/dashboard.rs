//! Every question's output for one load of the input files.

use crate::loader::{LoadError, LoadReport};
use crate::reports::{
    adoption_data, county_adoption_data, county_intake_data, county_rto_data, county_tno_data,
    intake_data_total, rto_data, tno_data_total,
};
use crate::sources::DataSources;
use crate::types::{
    AdoptionRecord, CountyEntry, IntakeRecord, ProcessedDataset, RtoRecord, TnoRecord,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView<R> {
    pub statewide: ProcessedDataset<R>,
    pub counties: Vec<CountyEntry<R>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub load: LoadReport,
    pub mapped_counties: usize,
    pub adoption: QuestionView<AdoptionRecord>,
    pub intake: QuestionView<IntakeRecord>,
    pub rto: QuestionView<RtoRecord>,
    pub tno: QuestionView<TnoRecord>,
}

/// Run every statewide and county aggregation over the shared sources.
///
/// Fails only when the dataset itself cannot be read; an unreadable county
/// mapping leaves the county lists empty.
pub fn build_dashboard(sources: &DataSources) -> Result<Dashboard, LoadError> {
    let records = sources.records()?;
    let load = sources.load_report()?.clone();
    let map = sources.county_map_or_empty();

    let dashboard = Dashboard {
        generated_at: Utc::now(),
        load,
        mapped_counties: map.len(),
        adoption: QuestionView {
            statewide: adoption_data(records),
            counties: county_adoption_data(records, map),
        },
        intake: QuestionView {
            statewide: intake_data_total(records),
            counties: county_intake_data(records, map),
        },
        rto: QuestionView {
            statewide: rto_data(records),
            counties: county_rto_data(records, map),
        },
        tno: QuestionView {
            statewide: tno_data_total(records),
            counties: county_tno_data(records, map),
        },
    };
    info!(
        adoption_counties = dashboard.adoption.counties.len(),
        intake_counties = dashboard.intake.counties.len(),
        rto_counties = dashboard.rto.counties.len(),
        tno_counties = dashboard.tno.counties.len(),
        "dashboard aggregated"
    );
    Ok(dashboard)
}
