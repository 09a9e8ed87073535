// The CSV-backed record store.
//
// One flat file functioning as an append-only table. Writers are not
// coordinated: `append` reads the whole table and rewrites it, so two
// simultaneous appends race and the last rewrite wins. Accepted for the
// expected write volume (manual field-staff submissions).
use crate::types::{RawRow, Record, WireRow};
use crate::util::{parse_f64_safe, parse_timestamp_safe, parse_u64_safe};
use anyhow::Result;
use csv::{ReaderBuilder, WriterBuilder};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk column order. The older schema variant lacks `Program`; the
/// reader treats the column as absent, and the next append rewrites the
/// file under this header.
pub const HEADER: [&str; 10] = [
    "Timestamp",
    "Division",
    "Department",
    "Program",
    "Region",
    "Activity",
    "PersonInCharge",
    "Location",
    "BeneficiaryCount",
    "Budget",
];

pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> RecordStore {
        RecordStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the backing file with the fixed header if it does not exist.
    /// Idempotent; an existing file is left untouched.
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut wtr = csv::Writer::from_path(&self.path)?;
        wtr.write_record(HEADER)?;
        wtr.flush()?;
        info!("initialized record store at {}", self.path.display());
        Ok(())
    }

    /// Load every row, coercing numeric columns (invalid or missing values
    /// become 0) and the timestamp (unparseable values become `None`).
    /// A missing file reads as an empty table.
    pub fn load_all(&self) -> Result<Vec<Record>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut rdr = ReaderBuilder::new().flexible(true).from_path(&self.path)?;
        let mut records = Vec::new();
        let mut skipped = 0usize;
        for result in rdr.deserialize::<RawRow>() {
            let row = match result {
                Ok(r) => r,
                Err(_) => {
                    skipped += 1;
                    continue;
                }
            };
            records.push(record_from_raw(row));
        }
        if skipped > 0 {
            warn!("{} unreadable rows skipped in {}", skipped, self.path.display());
        }
        info!("{} records loaded from {}", records.len(), self.path.display());
        Ok(records)
    }

    /// Append one record: read the full table, add the row, rewrite the
    /// file. O(n) per write, and older-schema rows come out normalized
    /// under the current header.
    pub fn append(&self, record: &Record) -> Result<()> {
        let existing = self.load_all()?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // The header is written by hand, so automatic headers stay off.
        let mut wtr = WriterBuilder::new().has_headers(false).from_path(&self.path)?;
        wtr.write_record(HEADER)?;
        for r in &existing {
            wtr.serialize(WireRow::from(r))?;
        }
        wtr.serialize(WireRow::from(record))?;
        wtr.flush()?;
        Ok(())
    }
}

fn record_from_raw(row: RawRow) -> Record {
    Record {
        timestamp: parse_timestamp_safe(row.timestamp.as_deref()),
        division: row.division.unwrap_or_default().trim().to_string(),
        department: row.department.unwrap_or_default().trim().to_string(),
        method: row.program.unwrap_or_default().trim().to_string(),
        region: row.region.unwrap_or_default().trim().to_string(),
        activity: row.activity.unwrap_or_default().trim().to_string(),
        person_in_charge: row.person_in_charge.unwrap_or_default().trim().to_string(),
        location: row.location.unwrap_or_default().trim().to_string(),
        beneficiaries: parse_u64_safe(row.beneficiary_count.as_deref()).unwrap_or(0),
        budget: parse_f64_safe(row.budget.as_deref()).unwrap_or(0.0).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    fn temp_store(name: &str) -> RecordStore {
        let mut path = std::env::temp_dir();
        path.push(format!("benreport_{}_{}.csv", std::process::id(), name));
        let _ = fs::remove_file(&path);
        RecordStore::new(path)
    }

    fn sample_record(activity: &str) -> Record {
        Record {
            timestamp: NaiveDate::from_ymd_opt(2025, 11, 3)
                .and_then(|d| d.and_hms_opt(14, 5, 0)),
            division: "Humanitarian".to_string(),
            department: "Water Access".to_string(),
            method: "WaterAccess".to_string(),
            region: "Kelantan".to_string(),
            activity: activity.to_string(),
            person_in_charge: "Aminah".to_string(),
            location: "Kampung Pulai".to_string(),
            beneficiaries: 21900,
            budget: 1250.50,
        }
    }

    #[test]
    fn ensure_initialized_is_idempotent() {
        let store = temp_store("init");
        store.ensure_initialized().unwrap();
        store.ensure_initialized().unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], HEADER.join(","));
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn append_then_load_round_trips() {
        let store = temp_store("roundtrip");
        store.ensure_initialized().unwrap();
        for i in 0..5 {
            store.append(&sample_record(&format!("activity {}", i))).unwrap();
        }
        let records = store.load_all().unwrap();
        assert_eq!(records.len(), 5);
        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.activity, format!("activity {}", i));
            assert_eq!(r.division, "Humanitarian");
            assert_eq!(r.method, "WaterAccess");
            assert_eq!(r.beneficiaries, 21900);
            assert_eq!(r.budget, 1250.50);
            assert_eq!(r.month_label().as_deref(), Some("2025-11"));
        }
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let store = temp_store("missing");
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn first_append_creates_the_file() {
        let store = temp_store("lazy");
        store.append(&sample_record("first")).unwrap();
        let records = store.load_all().unwrap();
        assert_eq!(records.len(), 1);
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn tolerates_older_schema_without_program_column() {
        let store = temp_store("oldschema");
        fs::write(
            store.path(),
            "Timestamp,Division,Department,Region,Activity,PersonInCharge,Location,BeneficiaryCount,Budget\n\
             2025-01-10T09:00:00,Outreach,Goodwill Visits,Perlis,Visit,Zul,Kangar,12,100.00\n",
        )
        .unwrap();
        let records = store.load_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].method, "");
        assert_eq!(records[0].beneficiaries, 12);

        // The next append rewrites the file under the current header and
        // keeps the old row.
        store.append(&sample_record("new")).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.lines().next().unwrap().contains("Program"));
        assert_eq!(store.load_all().unwrap().len(), 2);
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn coerces_bad_numerics_and_timestamps() {
        let store = temp_store("coerce");
        fs::write(
            store.path(),
            format!(
                "{}\n\
                 not a date,Humanitarian,Welfare,Manual,Sabah,Aid,Lim,Tawau,lots,-5\n",
                HEADER.join(",")
            ),
        )
        .unwrap();
        let records = store.load_all().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].timestamp.is_none());
        assert!(records[0].month_label().is_none());
        assert_eq!(records[0].beneficiaries, 0);
        assert_eq!(records[0].budget, 0.0);
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn store_does_not_enforce_dispatch_invariant() {
        // Department outside the division's allowed set still appends; only
        // the entry flow constrains the pairing.
        let store = temp_store("invariant");
        let mut record = sample_record("mismatched");
        record.division = "Enterprise".to_string();
        record.department = "Community Kitchen".to_string();
        store.append(&record).unwrap();
        let records = store.load_all().unwrap();
        assert_eq!(records[0].division, "Enterprise");
        assert_eq!(records[0].department, "Community Kitchen");
        let _ = fs::remove_file(store.path());
    }
}
