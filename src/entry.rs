// The data-entry flow: pick the organizational context, fill in the
// activity details, answer the method-specific inputs, preview the
// computed beneficiary count, submit.
//
// The division narrows both the department and the method choices; the
// chosen department preselects its default method. The store itself does
// not re-check the pairing, so this flow is the only guard on the
// dispatch-table invariant.
use crate::calc::{AnimalType, CalcInputs, Calculator};
use crate::catalog::{Catalog, ReferenceData};
use crate::prompt;
use crate::store::RecordStore;
use crate::types::Record;
use crate::util::{format_int, format_number};
use anyhow::Result;
use chrono::Local;
use log::info;

/// Run one submission. Returns `true` if a record was appended.
pub fn run(store: &RecordStore, refdata: &ReferenceData, catalog: &Catalog) -> Result<bool> {
    println!("\nStep 1 - Pick the context\n");
    let division = prompt::select_one("Division", &refdata.divisions, 1);
    let region = prompt::select_one("Region", &refdata.regions, 1);

    let division_departments = catalog.departments_for(&division);
    let departments: &[String] = if division_departments.is_empty() {
        // Unknown division: fall back to the flat reference list.
        &refdata.departments
    } else {
        division_departments
    };
    let department = prompt::select_one("Department", departments, 1);

    let methods = catalog.methods_for(&division);
    let default_method = catalog.default_method(&division, &department);
    let default_idx = methods
        .iter()
        .position(|m| m == default_method)
        .map(|i| i + 1)
        .unwrap_or(methods.len());
    let method = prompt::select_one("Calculation method", &methods, default_idx);

    println!("\nStep 2 - Activity details\n");
    let activity = prompt::read_text("Activity (program name / short description)");
    let person_in_charge = prompt::read_text("Person in charge (name or email)");
    let location = prompt::read_text("Location");
    let budget = prompt::read_f64("Budget spent (RM)");

    println!("\nStep 3 - Calculation inputs\n");
    let inputs = prompt_inputs(&method);
    let beneficiaries = Calculator::new(catalog).compute(&method, &inputs, &region);

    println!(
        "\nComputed beneficiaries: {} | Budget: RM {}",
        format_int(beneficiaries),
        format_number(budget, 2)
    );
    if !prompt::confirm("Submit this record") {
        println!("Submission cancelled.\n");
        return Ok(false);
    }
    if activity.is_empty() || person_in_charge.is_empty() {
        println!("Error: Activity and Person in charge are required. Nothing was saved.\n");
        return Ok(false);
    }

    let record = Record {
        timestamp: Some(Local::now().naive_local()),
        division,
        department,
        method,
        region,
        activity,
        person_in_charge,
        location,
        beneficiaries,
        budget,
    };
    store.ensure_initialized()?;
    store.append(&record)?;
    info!("record appended to {}", store.path().display());
    println!(
        "Record saved. Beneficiaries = {}\n",
        format_int(record.beneficiaries)
    );
    Ok(true)
}

/// Ask only for the inputs the chosen method reads.
fn prompt_inputs(method: &str) -> CalcInputs {
    let mut inputs = CalcInputs::default();
    match method {
        "Community-Kitchen" => {
            inputs.packs = prompt::read_u64("Meal packs served");
            inputs.days = prompt::read_u64("Number of days");
        }
        "BasicGoods-Domestic" => {
            inputs.packs = prompt::read_u64("Goods packs (domestic)");
        }
        "BasicGoods-Overseas" => {
            inputs.packs = prompt::read_u64("Goods packs (overseas)");
            inputs.days = prompt::read_u64("Estimated days");
        }
        "Shelter-Domestic" | "Shelter-Overseas" => {
            inputs.tents = prompt::read_u64("Tents");
            inputs.days = prompt::read_u64("Number of days");
        }
        "TransitHousing" => {
            inputs.families = prompt::read_u64("Families housed");
            inputs.days = prompt::read_u64("Number of days");
        }
        "Ambulance-Standard" => {
            inputs.patients = prompt::read_u64("Patients transported");
        }
        "Ambulance-EventStandby" => {
            inputs.crowd_estimate = prompt::read_u64("Estimated event crowd");
        }
        "MedicalCamp-BloodDonation" => {
            inputs.blood_bags = prompt::read_u64("Blood bags collected");
        }
        "MedicalCamp-Circumcision" => {
            inputs.participants = prompt::read_u64("Participants");
        }
        "MedicalCamp-General" => {
            inputs.patients = prompt::read_u64("Patients seen");
        }
        "WaterAccess" => {
            inputs.families = prompt::read_u64("Families served");
        }
        "Kindergarten" => {
            inputs.students = prompt::read_u64("Students enrolled");
        }
        "ScholarshipProgram" => {
            inputs.students = prompt::read_u64("Scholarship students");
        }
        "LivestockSacrifice" => {
            let names: Vec<String> = AnimalType::ALL.iter().map(|a| a.name().to_string()).collect();
            let picked = prompt::select_one("Animal type", &names, 1);
            inputs.animal_type = AnimalType::ALL
                .into_iter()
                .find(|a| a.name() == picked)
                .unwrap_or_default();
            inputs.animal_count = prompt::read_u64("Animals sacrificed");
        }
        "QuranWaqf" => {
            inputs.copies = prompt::read_u64("Copies distributed");
        }
        "CommunityMeal-Breakfast" | "CommunityMeal-Lunch" => {
            inputs.packs_per_day = prompt::read_u64("Meal packs per day");
        }
        _ => {
            inputs.manual_count = prompt::read_u64("Beneficiary count (manual)");
        }
    }
    inputs
}
