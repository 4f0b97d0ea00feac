use crate::county::CountyMap;
use crate::loader::{load_county_map, load_dataset, LoadError, LoadReport};
use crate::types::ShelterRecord;
use once_cell::unsync::OnceCell;
use std::path::PathBuf;
use tracing::{info, warn};

/// Both input files, each read at most once and then shared by every
/// question that asks for it.
pub struct DataSources {
    dataset_path: PathBuf,
    mapping_path: PathBuf,
    dataset: OnceCell<(Vec<ShelterRecord>, LoadReport)>,
    mapping: OnceCell<CountyMap>,
}

impl DataSources {
    pub fn new(dataset_path: impl Into<PathBuf>, mapping_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            mapping_path: mapping_path.into(),
            dataset: OnceCell::new(),
            mapping: OnceCell::new(),
        }
    }

    /// Sources already in memory; nothing is read from disk.
    pub fn preloaded(records: Vec<ShelterRecord>, report: LoadReport, mapping: CountyMap) -> Self {
        Self {
            dataset_path: PathBuf::new(),
            mapping_path: PathBuf::new(),
            dataset: OnceCell::with_value((records, report)),
            mapping: OnceCell::with_value(mapping),
        }
    }

    pub fn records(&self) -> Result<&[ShelterRecord], LoadError> {
        Ok(&self.dataset()?.0)
    }

    pub fn load_report(&self) -> Result<&LoadReport, LoadError> {
        Ok(&self.dataset()?.1)
    }

    fn dataset(&self) -> Result<&(Vec<ShelterRecord>, LoadReport), LoadError> {
        self.dataset.get_or_try_init(|| {
            let loaded = load_dataset(&self.dataset_path)?;
            info!(
                path = %self.dataset_path.display(),
                rows = loaded.1.kept_rows,
                "dataset loaded"
            );
            Ok(loaded)
        })
    }

    pub fn county_map(&self) -> Result<&CountyMap, LoadError> {
        self.mapping.get_or_try_init(|| {
            let map = load_county_map(&self.mapping_path)?;
            info!(
                path = %self.mapping_path.display(),
                counties = map.len(),
                "county mapping loaded"
            );
            Ok(map)
        })
    }

    /// The county mapping, or an empty one when it cannot be read, so county
    /// views come out empty instead of failing the whole run.
    pub fn county_map_or_empty(&self) -> &CountyMap {
        match self.county_map() {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "county mapping unavailable; county views will be empty");
                self.mapping.get_or_init(CountyMap::empty)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_dataset_is_read_once() {
        let dir = tempfile::tempdir().unwrap();
        let data = write_file(&dir, "data.csv", "year,Facility_Name,intake_stray\n2023,A,4\n");
        let mapping = write_file(&dir, "map.csv", "facility_name,county\nA,Denver\n");
        let sources = DataSources::new(&data, &mapping);

        assert_eq!(sources.records().unwrap().len(), 1);
        std::fs::remove_file(&data).unwrap();
        assert_eq!(sources.records().unwrap().len(), 1);
        assert_eq!(sources.load_report().unwrap().kept_rows, 1);
        assert_eq!(sources.county_map().unwrap().counties(), ["Denver"]);
    }

    #[test]
    fn test_missing_dataset_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let sources = DataSources::new(dir.path().join("nope.csv"), dir.path().join("map.csv"));
        assert!(sources.records().is_err());
    }

    #[test]
    fn test_missing_mapping_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let sources = DataSources::new(dir.path().join("data.csv"), dir.path().join("nope.csv"));
        assert!(sources.county_map().is_err());
        assert!(sources.county_map_or_empty().is_empty());
        assert!(sources.county_map().unwrap().is_empty());
    }
}
