// Entry point and high-level CLI flow.
//
// - Option [1] runs the data-entry flow and appends one record.
// - Option [2] loads the table, asks for filters and renders the
//   dashboard summaries, with an optional CSV export of the view.
// - Option [3] drops the cached table so the next dashboard re-reads it.
mod calc;
mod catalog;
mod entry;
mod output;
mod prompt;
mod reports;
mod store;
mod types;
mod util;

use anyhow::Result;
use catalog::{Catalog, ReferenceData};
use clap::Parser;
use once_cell::sync::Lazy;
use reports::FilterSet;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use store::RecordStore;
use types::{Record, WireRow};
use util::{format_int, format_number};

/// Loaded records are kept briefly so flipping between filters does not
/// re-read the table on every interaction; Reload clears the cache on
/// demand.
const CACHE_TTL: Duration = Duration::from_secs(60);

// Simple in-memory app state so the table is read at most once per TTL
// window while the menu loop runs.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { cache: None }));

struct AppState {
    cache: Option<(Vec<Record>, Instant)>,
}

#[derive(Parser)]
#[command(name = "benreport", about = "Beneficiary activity records and reporting")]
struct Args {
    /// Directory holding the backing table and reference data
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
}

fn load_records(store: &RecordStore) -> Result<Vec<Record>> {
    {
        let state = APP_STATE.lock().unwrap();
        if let Some((records, loaded_at)) = &state.cache {
            if loaded_at.elapsed() < CACHE_TTL {
                return Ok(records.clone());
            }
        }
    }
    let records = store.load_all()?;
    let mut state = APP_STATE.lock().unwrap();
    state.cache = Some((records.clone(), Instant::now()));
    Ok(records)
}

fn invalidate_cache() {
    let mut state = APP_STATE.lock().unwrap();
    state.cache = None;
}

fn handle_entry(store: &RecordStore, refdata: &ReferenceData, catalog: &Catalog) {
    match entry::run(store, refdata, catalog) {
        Ok(true) => invalidate_cache(),
        Ok(false) => {}
        Err(e) => eprintln!("Failed to save the record: {}\n", e),
    }
}

fn handle_dashboard(store: &RecordStore) -> Result<()> {
    let records = load_records(store)?;
    if records.is_empty() {
        println!("No records yet. Add one first (option 1).\n");
        return Ok(());
    }

    println!("\nFilters (empty selection = all)\n");
    let filters = FilterSet {
        months: prompt::select_many("Month(s)", &reports::month_options(&records)),
        divisions: prompt::select_many(
            "Division(s)",
            &reports::distinct_values(&records, |r| &r.division),
        ),
        departments: prompt::select_many(
            "Department(s)",
            &reports::distinct_values(&records, |r| &r.department),
        ),
        regions: prompt::select_many(
            "Region(s)",
            &reports::distinct_values(&records, |r| &r.region),
        ),
    };
    let filtered = reports::apply(&records, &filters);
    let summary = reports::summarize(&filtered);

    println!(
        "\nTotal beneficiaries: {} ({} of {} records in view)",
        format_int(summary.total_beneficiaries),
        format_int(filtered.len() as u64),
        format_int(records.len() as u64)
    );
    println!(
        "Cumulative budget (RM): {}\n",
        format_number(summary.total_budget, 2)
    );

    println!("Beneficiaries by Division");
    output::preview_table_rows(&reports::division_rows(&summary.by_division), usize::MAX);
    println!("Top Departments by Beneficiaries");
    output::preview_table_rows(
        &reports::department_rows(&summary.by_department),
        reports::TOP_DEPARTMENTS,
    );
    println!("Beneficiaries by Region");
    output::preview_table_rows(&reports::region_rows(&summary.by_region), usize::MAX);

    let stats = reports::summary_stats(&filtered, &summary);
    output::write_json("summary.json", &stats)?;
    println!("Summary stats written to summary.json\n");

    if prompt::confirm("Export the filtered records to CSV") {
        let rows: Vec<WireRow> = filtered.iter().map(WireRow::from).collect();
        output::write_csv("beneficiaries_filtered.csv", &rows)?;
        println!(
            "Exported {} records to beneficiaries_filtered.csv\n",
            format_int(rows.len() as u64)
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Reference data and the dispatch catalog are read once and passed by
    // reference; the backing table is created lazily on first write.
    let refdata = ReferenceData::load(&args.data_dir);
    let catalog = Catalog::load(&args.data_dir)?;
    let store = RecordStore::new(args.data_dir.join("beneficiaries.csv"));

    loop {
        println!("[1] Add a record");
        println!("[2] Dashboard");
        println!("[3] Reload data");
        println!("[4] Exit\n");
        match prompt::read_text("Enter choice").as_str() {
            "1" => handle_entry(&store, &refdata, &catalog),
            "2" => {
                if let Err(e) = handle_dashboard(&store) {
                    eprintln!("Failed to build the dashboard: {}\n", e);
                }
                if !prompt::confirm("Back to the menu") {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => {
                invalidate_cache();
                println!("Cache cleared; data will be re-read on the next dashboard.\n");
            }
            "4" => break,
            _ => println!("Invalid choice. Please enter 1-4.\n"),
        }
    }
    Ok(())
}
