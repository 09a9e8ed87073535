use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One raw CSV row as it appears on disk. Every column is optional so the
/// reader tolerates both schema variants (the older one has no `Program`
/// column) and hand-edited files with missing cells.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Timestamp")]
    pub timestamp: Option<String>,
    #[serde(rename = "Division")]
    pub division: Option<String>,
    #[serde(rename = "Department")]
    pub department: Option<String>,
    #[serde(rename = "Program")]
    pub program: Option<String>,
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "Activity")]
    pub activity: Option<String>,
    #[serde(rename = "PersonInCharge")]
    pub person_in_charge: Option<String>,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "BeneficiaryCount")]
    pub beneficiary_count: Option<String>,
    #[serde(rename = "Budget")]
    pub budget: Option<String>,
}

/// A submitted activity record. Created once at submission time and
/// immutable thereafter; numeric fields are already coerced.
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: Option<NaiveDateTime>,
    pub division: String,
    pub department: String,
    pub method: String,
    pub region: String,
    pub activity: String,
    pub person_in_charge: String,
    pub location: String,
    pub beneficiaries: u64,
    pub budget: f64,
}

impl Record {
    /// Year-month label used for month filtering, e.g. `2025-11`.
    /// `None` when the timestamp did not parse; such rows are excluded
    /// from month-based filtering.
    pub fn month_label(&self) -> Option<String> {
        self.timestamp.map(|t| t.format("%Y-%m").to_string())
    }
}

/// Serialization form of a `Record`: the exact on-disk column set, in
/// order. Appends and filtered exports both go through this struct so the
/// two stay byte-compatible.
#[derive(Debug, Serialize)]
pub struct WireRow {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Division")]
    pub division: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Program")]
    pub program: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Activity")]
    pub activity: String,
    #[serde(rename = "PersonInCharge")]
    pub person_in_charge: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "BeneficiaryCount")]
    pub beneficiary_count: u64,
    #[serde(rename = "Budget")]
    pub budget: f64,
}

impl From<&Record> for WireRow {
    fn from(r: &Record) -> Self {
        WireRow {
            timestamp: r
                .timestamp
                .map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string())
                .unwrap_or_default(),
            division: r.division.clone(),
            department: r.department.clone(),
            program: r.method.clone(),
            region: r.region.clone(),
            activity: r.activity.clone(),
            person_in_charge: r.person_in_charge.clone(),
            location: r.location.clone(),
            beneficiary_count: r.beneficiaries,
            budget: r.budget,
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DivisionSummaryRow {
    #[serde(rename = "Division")]
    #[tabled(rename = "Division")]
    pub division: String,
    #[serde(rename = "Beneficiaries")]
    #[tabled(rename = "Beneficiaries")]
    pub beneficiaries: String,
    #[serde(rename = "Budget")]
    #[tabled(rename = "Budget")]
    pub budget: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DepartmentSummaryRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Department")]
    #[tabled(rename = "Department")]
    pub department: String,
    #[serde(rename = "Beneficiaries")]
    #[tabled(rename = "Beneficiaries")]
    pub beneficiaries: String,
    #[serde(rename = "Budget")]
    #[tabled(rename = "Budget")]
    pub budget: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RegionSummaryRow {
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "Beneficiaries")]
    #[tabled(rename = "Beneficiaries")]
    pub beneficiaries: String,
    #[serde(rename = "Budget")]
    #[tabled(rename = "Budget")]
    pub budget: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_records: usize,
    pub total_beneficiaries: u64,
    pub total_budget: f64,
    pub divisions: usize,
    pub regions: usize,
}
