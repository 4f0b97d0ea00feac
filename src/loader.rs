use crate::county::CountyMap;
use crate::types::{AgeClass, AnimalCategory, Counts, Field, MappingRow, RawRow, ShelterRecord};
use crate::util::{parse_count, parse_year};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },
    #[error("{source_name} has no `{column}` column")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },
}

/// Why a single row was left out of the aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowIssue {
    #[error("unparseable year {0:?}")]
    UnparseableYear(Option<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    /// Records the CSV reader itself rejected (bad encoding and the like).
    pub malformed_rows: usize,
    pub dropped_bad_year: usize,
}

/// Turn one raw row into a typed record.
///
/// Counters never fail: an absent or non-numeric value counts as zero. A row
/// without a readable year is rejected instead of being filed under a
/// made-up key.
pub fn normalize_row(row: RawRow) -> Result<ShelterRecord, RowIssue> {
    let Some(year) = parse_year(row.year.as_deref()) else {
        return Err(RowIssue::UnparseableYear(row.year));
    };

    let mut counts = Counts::default();
    for field in Field::ALL {
        counts[field] = parse_count(row.field(field));
    }

    let facility_name = row
        .facility_name
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok(ShelterRecord {
        year,
        facility_name,
        category: parse_category(row.animal_category.as_deref()),
        age_class: parse_age_class(row.animal_type.as_deref()),
        counts,
    })
}

/// Normalize a batch of rows, dropping (and counting) rows with a bad year.
pub fn normalize_rows<I>(rows: I) -> (Vec<ShelterRecord>, LoadReport)
where
    I: IntoIterator<Item = RawRow>,
{
    let mut report = LoadReport::default();
    let mut records = Vec::new();
    for row in rows {
        report.total_rows += 1;
        match normalize_row(row) {
            Ok(r) => records.push(r),
            Err(issue) => {
                debug!(row = report.total_rows, %issue, "dropping row");
                report.dropped_bad_year += 1;
            }
        }
    }
    report.kept_rows = records.len();
    if report.dropped_bad_year > 0 {
        warn!(
            dropped = report.dropped_bad_year,
            "rows without a readable year were left out"
        );
    }
    (records, report)
}

fn parse_category(s: Option<&str>) -> AnimalCategory {
    match s.map(str::trim) {
        Some(c) if c.eq_ignore_ascii_case("dog") => AnimalCategory::Dog,
        Some(c) if c.eq_ignore_ascii_case("cat") => AnimalCategory::Cat,
        _ => AnimalCategory::Other,
    }
}

fn parse_age_class(s: Option<&str>) -> AgeClass {
    match s.map(str::trim) {
        Some(c) if c.eq_ignore_ascii_case("juvenile") => AgeClass::Juvenile,
        Some(c) if c.eq_ignore_ascii_case("adult") => AgeClass::Adult,
        _ => AgeClass::Unknown,
    }
}

pub fn load_dataset(path: &Path) -> Result<(Vec<ShelterRecord>, LoadReport), LoadError> {
    let source_name = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| LoadError::Csv {
        source_name: source_name.clone(),
        source: e.into(),
    })?;
    read_dataset(file, &source_name)
}

pub fn read_dataset<R: Read>(
    reader: R,
    source_name: &str,
) -> Result<(Vec<ShelterRecord>, LoadReport), LoadError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    require_columns(&mut rdr, source_name, &["year"])?;
    let counted: Vec<&'static str> = Field::ALL.iter().map(|f| f.column()).collect();
    for column in absent_columns(&mut rdr, source_name, &counted)? {
        warn!(source = source_name, column, "column not present; counted as zero");
    }

    let mut malformed_rows = 0usize;
    let mut raw = Vec::new();
    for result in rdr.deserialize::<RawRow>() {
        match result {
            Ok(r) => raw.push(r),
            Err(e) => {
                debug!(source = source_name, error = %e, "skipping malformed record");
                malformed_rows += 1;
            }
        }
    }

    let (records, mut report) = normalize_rows(raw);
    report.total_rows += malformed_rows;
    report.malformed_rows = malformed_rows;
    Ok((records, report))
}

pub fn load_county_map(path: &Path) -> Result<CountyMap, LoadError> {
    let source_name = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| LoadError::Csv {
        source_name: source_name.clone(),
        source: e.into(),
    })?;
    read_county_map(file, &source_name)
}

pub fn read_county_map<R: Read>(reader: R, source_name: &str) -> Result<CountyMap, LoadError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    require_columns(&mut rdr, source_name, &["facility_name", "county"])?;

    let mut rows = Vec::new();
    for result in rdr.deserialize::<MappingRow>() {
        match result {
            Ok(r) => rows.push(r),
            Err(e) => debug!(source = source_name, error = %e, "skipping malformed mapping row"),
        }
    }
    Ok(CountyMap::from_rows(rows))
}

fn require_columns<R: Read>(
    rdr: &mut csv::Reader<R>,
    source_name: &str,
    columns: &[&'static str],
) -> Result<(), LoadError> {
    match absent_columns(rdr, source_name, columns)?.first() {
        Some(&column) => Err(LoadError::MissingColumn {
            source_name: source_name.to_string(),
            column,
        }),
        None => Ok(()),
    }
}

fn absent_columns<R: Read>(
    rdr: &mut csv::Reader<R>,
    source_name: &str,
    columns: &[&'static str],
) -> Result<Vec<&'static str>, LoadError> {
    let headers = rdr.headers().map_err(|e| LoadError::Csv {
        source_name: source_name.to_string(),
        source: e,
    })?;
    Ok(columns
        .iter()
        .copied()
        .filter(|c| !headers.iter().any(|h| h.trim() == *c))
        .collect())
}
