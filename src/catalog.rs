// Reference data and the category dispatch table.
//
// The three reference lists (Divisions, Departments, Regions) are
// single-column CSV files under the data directory. The dispatch table
// (division -> allowed departments / allowed methods / default method per
// department) and the designated-region set live in a versioned JSON
// configuration file. Compiled-in copies of all four keep the binary
// usable when the data directory is missing.
//
// Everything here is loaded once in `main` and passed by reference to the
// flows that need it; there is no mutation path after load.
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use log::warn;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const MANUAL_METHOD: &str = "Manual";

const EMBEDDED_CATALOG: &str = include_str!("../data/catalog.json");
const EMBEDDED_DIVISIONS: &str = include_str!("../data/divisions.csv");
const EMBEDDED_DEPARTMENTS: &str = include_str!("../data/departments.csv");
const EMBEDDED_REGIONS: &str = include_str!("../data/regions.csv");

/// Dispatch entry for one division.
#[derive(Debug, Clone, Deserialize)]
pub struct DivisionRule {
    pub name: String,
    pub departments: Vec<String>,
    pub methods: Vec<String>,
    /// Department -> default calculation method. Departments not listed
    /// here default to `Manual`.
    #[serde(default)]
    pub defaults: HashMap<String, String>,
}

/// The category dispatch table plus the designated-region set, loaded from
/// `catalog.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub version: u32,
    pub designated_regions: Vec<String>,
    pub divisions: Vec<DivisionRule>,
}

impl Catalog {
    /// Load `catalog.json` from the data directory, falling back to the
    /// compiled-in copy if the file is absent or malformed.
    pub fn load(data_dir: &Path) -> Result<Catalog> {
        let path = data_dir.join("catalog.json");
        match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(catalog) => return Ok(catalog),
                Err(e) => warn!("ignoring malformed {}: {}", path.display(), e),
            },
            Err(e) => warn!("no catalog at {} ({}), using built-in", path.display(), e),
        }
        serde_json::from_str(EMBEDDED_CATALOG).context("built-in catalog is malformed")
    }

    fn rule(&self, division: &str) -> Option<&DivisionRule> {
        self.divisions.iter().find(|d| d.name == division)
    }

    /// Departments valid for a division, in catalog order. Unknown
    /// divisions get an empty list; callers fall back to the flat
    /// reference list.
    pub fn departments_for(&self, division: &str) -> &[String] {
        self.rule(division).map(|r| r.departments.as_slice()).unwrap_or(&[])
    }

    /// Calculation methods valid for a division, in catalog order.
    /// Unknown divisions degrade to the Manual-only list.
    pub fn methods_for(&self, division: &str) -> Vec<String> {
        match self.rule(division) {
            Some(r) => r.methods.clone(),
            None => vec![MANUAL_METHOD.to_string()],
        }
    }

    /// Default method for a department, `Manual` when unmapped or when the
    /// division itself is unknown.
    pub fn default_method(&self, division: &str, department: &str) -> &str {
        self.rule(division)
            .and_then(|r| r.defaults.get(department))
            .map(String::as_str)
            .unwrap_or(MANUAL_METHOD)
    }

    pub fn is_designated_region(&self, region: &str) -> bool {
        self.designated_regions.iter().any(|r| r == region)
    }
}

/// The three flat reference lists.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub divisions: Vec<String>,
    pub departments: Vec<String>,
    pub regions: Vec<String>,
}

impl ReferenceData {
    pub fn load(data_dir: &Path) -> ReferenceData {
        ReferenceData {
            divisions: load_list(&data_dir.join("divisions.csv"), EMBEDDED_DIVISIONS),
            departments: load_list(&data_dir.join("departments.csv"), EMBEDDED_DEPARTMENTS),
            regions: load_list(&data_dir.join("regions.csv"), EMBEDDED_REGIONS),
        }
    }
}

/// Read a single-column CSV list (header row skipped). Falls back to the
/// compiled-in copy when the file cannot be read.
fn load_list(path: &Path, embedded: &str) -> Vec<String> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            warn!("no list at {} ({}), using built-in", path.display(), e);
            embedded.to_string()
        }
    };
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(text.as_bytes());
    let mut values = Vec::new();
    for record in rdr.records().flatten() {
        if let Some(v) = record.get(0) {
            let v = v.trim();
            if !v.is_empty() {
                values.push(v.to_string());
            }
        }
    }
    values
}
