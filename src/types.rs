use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};
use tabled::Tabled;

/// One line of the shelter dataset exactly as it appears in the CSV.
///
/// Every column is optional text; normalization decides what a missing or
/// garbled value means.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRow {
    #[serde(rename = "year")]
    pub year: Option<String>,
    #[serde(rename = "Facility_Name")]
    pub facility_name: Option<String>,
    #[serde(rename = "animal_category")]
    pub animal_category: Option<String>,
    #[serde(rename = "animal_type")]
    pub animal_type: Option<String>,
    #[serde(rename = "intake_stray")]
    pub intake_stray: Option<String>,
    #[serde(rename = "intake_relinquished")]
    pub intake_relinquished: Option<String>,
    #[serde(rename = "intake_in_state_transfer")]
    pub intake_in_state_transfer: Option<String>,
    #[serde(rename = "intake_out_of_state_transfer")]
    pub intake_out_of_state_transfer: Option<String>,
    #[serde(rename = "intake_other")]
    pub intake_other: Option<String>,
    #[serde(rename = "outcome_adoption")]
    pub outcome_adoption: Option<String>,
    #[serde(rename = "outcome_return_to_owner")]
    pub outcome_return_to_owner: Option<String>,
    #[serde(rename = "outcome_missing_or_stolen")]
    pub outcome_missing_or_stolen: Option<String>,
    #[serde(rename = "outcome_euthanasia")]
    pub outcome_euthanasia: Option<String>,
    #[serde(rename = "outcome_deaths")]
    pub outcome_deaths: Option<String>,
}

impl RawRow {
    /// Raw text of a counted column.
    pub fn field(&self, field: Field) -> Option<&str> {
        let v = match field {
            Field::IntakeStray => &self.intake_stray,
            Field::IntakeRelinquished => &self.intake_relinquished,
            Field::IntakeInStateTransfer => &self.intake_in_state_transfer,
            Field::IntakeOutOfStateTransfer => &self.intake_out_of_state_transfer,
            Field::IntakeOther => &self.intake_other,
            Field::OutcomeAdoption => &self.outcome_adoption,
            Field::OutcomeReturnToOwner => &self.outcome_return_to_owner,
            Field::OutcomeMissingOrStolen => &self.outcome_missing_or_stolen,
            Field::OutcomeEuthanasia => &self.outcome_euthanasia,
            Field::OutcomeDeaths => &self.outcome_deaths,
        };
        v.as_deref()
    }
}

/// One line of the facility to county lookup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MappingRow {
    pub facility_name: Option<String>,
    pub county: Option<String>,
}

/// The counted columns of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    IntakeStray,
    IntakeRelinquished,
    IntakeInStateTransfer,
    IntakeOutOfStateTransfer,
    IntakeOther,
    OutcomeAdoption,
    OutcomeReturnToOwner,
    OutcomeMissingOrStolen,
    OutcomeEuthanasia,
    OutcomeDeaths,
}

impl Field {
    pub const COUNT: usize = 10;

    pub const ALL: [Field; Field::COUNT] = [
        Field::IntakeStray,
        Field::IntakeRelinquished,
        Field::IntakeInStateTransfer,
        Field::IntakeOutOfStateTransfer,
        Field::IntakeOther,
        Field::OutcomeAdoption,
        Field::OutcomeReturnToOwner,
        Field::OutcomeMissingOrStolen,
        Field::OutcomeEuthanasia,
        Field::OutcomeDeaths,
    ];

    /// The five intake reasons that add up to an intake total.
    pub const INTAKE: [Field; 5] = [
        Field::IntakeStray,
        Field::IntakeRelinquished,
        Field::IntakeInStateTransfer,
        Field::IntakeOutOfStateTransfer,
        Field::IntakeOther,
    ];

    /// CSV column header.
    pub fn column(self) -> &'static str {
        match self {
            Field::IntakeStray => "intake_stray",
            Field::IntakeRelinquished => "intake_relinquished",
            Field::IntakeInStateTransfer => "intake_in_state_transfer",
            Field::IntakeOutOfStateTransfer => "intake_out_of_state_transfer",
            Field::IntakeOther => "intake_other",
            Field::OutcomeAdoption => "outcome_adoption",
            Field::OutcomeReturnToOwner => "outcome_return_to_owner",
            Field::OutcomeMissingOrStolen => "outcome_missing_or_stolen",
            Field::OutcomeEuthanasia => "outcome_euthanasia",
            Field::OutcomeDeaths => "outcome_deaths",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Integer value of every counted column for a single row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts([i64; Field::COUNT]);

impl Counts {
    pub fn sum(&self, fields: &[Field]) -> i64 {
        fields.iter().fold(0i64, |acc, f| acc.saturating_add(self[*f]))
    }
}

impl Index<Field> for Counts {
    type Output = i64;

    fn index(&self, field: Field) -> &i64 {
        &self.0[field.slot()]
    }
}

impl IndexMut<Field> for Counts {
    fn index_mut(&mut self, field: Field) -> &mut i64 {
        &mut self.0[field.slot()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimalCategory {
    Dog,
    Cat,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeClass {
    Juvenile,
    Adult,
    Unknown,
}

/// A dataset row after normalization: a valid year and typed counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelterRecord {
    pub year: i32,
    pub facility_name: Option<String>,
    pub category: AnimalCategory,
    pub age_class: AgeClass,
    pub counts: Counts,
}

/// Sub-population a year summary is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Group {
    Total,
    Dog,
    Cat,
    JuvenileDog,
    AdultDog,
    JuvenileCat,
    AdultCat,
}

impl Group {
    pub fn matches(self, record: &ShelterRecord) -> bool {
        use AgeClass::{Adult, Juvenile};
        use AnimalCategory::{Cat, Dog};
        match self {
            Group::Total => true,
            Group::Dog => record.category == Dog,
            Group::Cat => record.category == Cat,
            Group::JuvenileDog => record.category == Dog && record.age_class == Juvenile,
            Group::AdultDog => record.category == Dog && record.age_class == Adult,
            Group::JuvenileCat => record.category == Cat && record.age_class == Juvenile,
            Group::AdultCat => record.category == Cat && record.age_class == Adult,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Group::Total => "total",
            Group::Dog => "dog",
            Group::Cat => "cat",
            Group::JuvenileDog => "juvenileDog",
            Group::AdultDog => "adultDog",
            Group::JuvenileCat => "juvenileCat",
            Group::AdultCat => "adultCat",
        }
    }
}

/// Summed metrics per year for one group.
pub type YearSummary<R> = BTreeMap<i32, R>;

/// Year summaries keyed by group label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProcessedDataset<R> {
    groups: BTreeMap<Group, YearSummary<R>>,
}

impl<R> ProcessedDataset<R> {
    pub fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, group: Group, summary: YearSummary<R>) {
        self.groups.insert(group, summary);
    }

    pub fn group(&self, group: Group) -> Option<&YearSummary<R>> {
        self.groups.get(&group)
    }

    pub fn year(&self, group: Group, year: i32) -> Option<&R> {
        self.groups.get(&group).and_then(|s| s.get(&year))
    }

    pub fn groups(&self) -> impl Iterator<Item = Group> + '_ {
        self.groups.keys().copied()
    }

    /// True when no group has a single year of data.
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(|s| s.is_empty())
    }
}

impl<R> Default for ProcessedDataset<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountyEntry<R> {
    pub county: String,
    pub data: ProcessedDataset<R>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdoptionRecord {
    pub intake_total: i64,
    pub outcome_adoption: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RtoRecord {
    pub intake_stray: i64,
    pub outcome_return_to_owner: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IntakeRecord {
    pub intake_stray: i64,
    pub intake_relinquished: i64,
    pub intake_in_state_transfer: i64,
    pub intake_out_of_state_transfer: i64,
    pub intake_other: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TnoRecord {
    pub intake_out_of_state_transfer: i64,
    pub outcome_missing_or_stolen: i64,
    pub outcome_euthanasia: i64,
    pub outcome_deaths: i64,
}

fn display_pct(v: &f64) -> String {
    format!("{:.0}%", v)
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct AdoptionPoint {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "AdoptionTotal")]
    #[tabled(rename = "AdoptionTotal")]
    pub adoption_total: i64,
    #[serde(rename = "AdoptionDog")]
    #[tabled(rename = "AdoptionDog")]
    pub adoption_dog: i64,
    #[serde(rename = "AdoptionCat")]
    #[tabled(rename = "AdoptionCat")]
    pub adoption_cat: i64,
    #[serde(rename = "AdoptionOther")]
    #[tabled(rename = "AdoptionOther")]
    pub adoption_other: i64,
    #[serde(rename = "IntakeTotal")]
    #[tabled(rename = "IntakeTotal")]
    pub intake_total: i64,
    #[serde(rename = "IntakeDog")]
    #[tabled(rename = "IntakeDog")]
    pub intake_dog: i64,
    #[serde(rename = "IntakeCat")]
    #[tabled(rename = "IntakeCat")]
    pub intake_cat: i64,
    #[serde(rename = "NotAdopted")]
    #[tabled(rename = "NotAdopted")]
    pub not_adopted: i64,
    #[serde(rename = "AdoptionRate")]
    #[tabled(rename = "AdoptionRate", display_with = "display_pct")]
    pub adoption_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct RtoPoint {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "RtoTotal")]
    #[tabled(rename = "RtoTotal")]
    pub rto_total: i64,
    #[serde(rename = "RtoDog")]
    #[tabled(rename = "RtoDog")]
    pub rto_dog: i64,
    #[serde(rename = "RtoCat")]
    #[tabled(rename = "RtoCat")]
    pub rto_cat: i64,
    #[serde(rename = "RtoOther")]
    #[tabled(rename = "RtoOther")]
    pub rto_other: i64,
    #[serde(rename = "StrayTotal")]
    #[tabled(rename = "StrayTotal")]
    pub stray_total: i64,
    #[serde(rename = "StrayDog")]
    #[tabled(rename = "StrayDog")]
    pub stray_dog: i64,
    #[serde(rename = "StrayCat")]
    #[tabled(rename = "StrayCat")]
    pub stray_cat: i64,
    #[serde(rename = "NotReturned")]
    #[tabled(rename = "NotReturned")]
    pub not_returned: i64,
    #[serde(rename = "ReturnRate")]
    #[tabled(rename = "ReturnRate", display_with = "display_pct")]
    pub return_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct IntakePoint {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Stray")]
    #[tabled(rename = "Stray")]
    pub stray: i64,
    #[serde(rename = "Relinquished")]
    #[tabled(rename = "Relinquished")]
    pub relinquished: i64,
    #[serde(rename = "Other")]
    #[tabled(rename = "Other")]
    pub other: i64,
    #[serde(rename = "Total")]
    #[tabled(rename = "Total")]
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct TnoPoint {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "OutOfStateIntake")]
    #[tabled(rename = "OutOfStateIntake")]
    pub out_of_state_intake: i64,
    #[serde(rename = "MissingOrStolen")]
    #[tabled(rename = "MissingOrStolen")]
    pub missing_or_stolen: i64,
    #[serde(rename = "Euthanasia")]
    #[tabled(rename = "Euthanasia")]
    pub euthanasia: i64,
    #[serde(rename = "Deaths")]
    #[tabled(rename = "Deaths")]
    pub deaths: i64,
    #[serde(rename = "NegativeTotal")]
    #[tabled(rename = "NegativeTotal")]
    pub negative_total: i64,
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct CountyRankRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "County")]
    #[tabled(rename = "County")]
    pub county: String,
    #[serde(rename = "RankingValue")]
    #[tabled(rename = "RankingValue")]
    pub ranking_value: String,
    #[serde(rename = "YearsWithData")]
    #[tabled(rename = "YearsWithData")]
    pub years_with_data: usize,
}
