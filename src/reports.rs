// Filtering and aggregation over the loaded record set.
use crate::types::{
    DepartmentSummaryRow, DivisionSummaryRow, Record, RegionSummaryRow, SummaryStats,
};
use crate::util::{format_int, format_number};
use std::collections::{HashMap, HashSet};

/// The department breakdown is cut to the top entries by beneficiaries.
pub const TOP_DEPARTMENTS: usize = 20;

/// Inclusion-set filters. An empty set means "no filter" for that field.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    pub months: Vec<String>,
    pub divisions: Vec<String>,
    pub departments: Vec<String>,
    pub regions: Vec<String>,
}

impl FilterSet {
    pub fn matches(&self, r: &Record) -> bool {
        if !self.months.is_empty() {
            // Rows without a parseable timestamp have no month and are
            // excluded from month-based filtering.
            match r.month_label() {
                Some(m) if self.months.contains(&m) => {}
                _ => return false,
            }
        }
        if !self.divisions.is_empty() && !self.divisions.contains(&r.division) {
            return false;
        }
        if !self.departments.is_empty() && !self.departments.contains(&r.department) {
            return false;
        }
        if !self.regions.is_empty() && !self.regions.contains(&r.region) {
            return false;
        }
        true
    }
}

pub fn apply(records: &[Record], filters: &FilterSet) -> Vec<Record> {
    records.iter().filter(|r| filters.matches(r)).cloned().collect()
}

/// Sum of beneficiaries and budget for one grouping key.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub key: String,
    pub beneficiaries: u64,
    pub budget: f64,
}

#[derive(Debug, Clone)]
pub struct Summary {
    pub total_beneficiaries: u64,
    pub total_budget: f64,
    pub by_division: Vec<GroupTotal>,
    /// Top entries by beneficiaries, descending, at most `TOP_DEPARTMENTS`.
    pub by_department: Vec<GroupTotal>,
    pub by_region: Vec<GroupTotal>,
}

fn group_by<F>(records: &[Record], key_of: F) -> Vec<GroupTotal>
where
    F: Fn(&Record) -> &str,
{
    let mut map: HashMap<String, (u64, f64)> = HashMap::new();
    for r in records {
        let e = map.entry(key_of(r).to_string()).or_insert((0, 0.0));
        e.0 += r.beneficiaries;
        e.1 += r.budget;
    }
    let mut groups: Vec<GroupTotal> = map
        .into_iter()
        .map(|(key, (beneficiaries, budget))| GroupTotal {
            key,
            beneficiaries,
            budget,
        })
        .collect();
    groups.sort_by(|a, b| a.key.cmp(&b.key));
    groups
}

pub fn summarize(records: &[Record]) -> Summary {
    let total_beneficiaries = records.iter().map(|r| r.beneficiaries).sum();
    let total_budget = records.iter().map(|r| r.budget).sum();

    let mut by_department = group_by(records, |r| &r.department);
    by_department.sort_by(|a, b| {
        b.beneficiaries
            .cmp(&a.beneficiaries)
            .then_with(|| a.key.cmp(&b.key))
    });
    by_department.truncate(TOP_DEPARTMENTS);

    Summary {
        total_beneficiaries,
        total_budget,
        by_division: group_by(records, |r| &r.division),
        by_department,
        by_region: group_by(records, |r| &r.region),
    }
}

/// Sorted distinct month labels present in the record set, for the month
/// filter options.
pub fn month_options(records: &[Record]) -> Vec<String> {
    let set: HashSet<String> = records.iter().filter_map(|r| r.month_label()).collect();
    let mut months: Vec<String> = set.into_iter().collect();
    months.sort();
    months
}

/// Sorted distinct values of one field, for the other filter options.
pub fn distinct_values<F>(records: &[Record], field: F) -> Vec<String>
where
    F: Fn(&Record) -> &str,
{
    let set: HashSet<&str> = records
        .iter()
        .map(|r| field(r).trim())
        .filter(|v| !v.is_empty())
        .collect();
    let mut values: Vec<String> = set.into_iter().map(str::to_string).collect();
    values.sort();
    values
}

pub fn division_rows(groups: &[GroupTotal]) -> Vec<DivisionSummaryRow> {
    groups
        .iter()
        .map(|g| DivisionSummaryRow {
            division: g.key.clone(),
            beneficiaries: format_int(g.beneficiaries),
            budget: format_number(g.budget, 2),
        })
        .collect()
}

pub fn department_rows(groups: &[GroupTotal]) -> Vec<DepartmentSummaryRow> {
    groups
        .iter()
        .enumerate()
        .map(|(idx, g)| DepartmentSummaryRow {
            rank: idx + 1,
            department: g.key.clone(),
            beneficiaries: format_int(g.beneficiaries),
            budget: format_number(g.budget, 2),
        })
        .collect()
}

pub fn region_rows(groups: &[GroupTotal]) -> Vec<RegionSummaryRow> {
    groups
        .iter()
        .map(|g| RegionSummaryRow {
            region: g.key.clone(),
            beneficiaries: format_int(g.beneficiaries),
            budget: format_number(g.budget, 2),
        })
        .collect()
}

pub fn summary_stats(records: &[Record], summary: &Summary) -> SummaryStats {
    SummaryStats {
        total_records: records.len(),
        total_beneficiaries: summary.total_beneficiaries,
        total_budget: summary.total_budget,
        divisions: summary.by_division.len(),
        regions: summary.by_region.len(),
    }
}
