// The beneficiary calculator: one fixed formula per named method.
//
// Every formula is total over its inputs. Inputs are unsigned so the
// non-negativity clamp holds by construction, and unknown method names
// take the Manual identity path instead of erroring.
use crate::catalog::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimalType {
    Cattle,
    Goat,
    Camel,
}

impl AnimalType {
    pub const ALL: [AnimalType; 3] = [AnimalType::Cattle, AnimalType::Goat, AnimalType::Camel];

    pub fn name(self) -> &'static str {
        match self {
            AnimalType::Cattle => "Cattle",
            AnimalType::Goat => "Goat",
            AnimalType::Camel => "Camel",
        }
    }

    /// Beneficiaries per animal.
    pub fn factor(self) -> u64 {
        match self {
            AnimalType::Cattle => 500,
            AnimalType::Goat => 70,
            AnimalType::Camel => 600,
        }
    }
}

impl Default for AnimalType {
    fn default() -> Self {
        AnimalType::Cattle
    }
}

/// Named inputs for the formulas. Each method reads only the fields it
/// needs; the rest stay at zero.
#[derive(Debug, Clone, Default)]
pub struct CalcInputs {
    pub packs: u64,
    pub days: u64,
    pub tents: u64,
    pub families: u64,
    pub patients: u64,
    pub crowd_estimate: u64,
    pub blood_bags: u64,
    pub participants: u64,
    pub students: u64,
    pub animal_count: u64,
    pub animal_type: AnimalType,
    pub copies: u64,
    pub packs_per_day: u64,
    pub manual_count: u64,
}

/// Computes beneficiary counts against the catalog's designated-region
/// set. Borrow one wherever a count is needed; it carries no state of its
/// own.
pub struct Calculator<'a> {
    catalog: &'a Catalog,
}

impl<'a> Calculator<'a> {
    pub fn new(catalog: &'a Catalog) -> Calculator<'a> {
        Calculator { catalog }
    }

    /// Household multiplier: 5 for designated regions, 7 elsewhere.
    pub fn region_factor(&self, region: &str) -> u64 {
        if self.catalog.is_designated_region(region) {
            5
        } else {
            7
        }
    }

    /// Beneficiary count for one activity. Total for all inputs; fractional
    /// intermediate results truncate toward zero.
    pub fn compute(&self, method: &str, inputs: &CalcInputs, region: &str) -> u64 {
        match method {
            "Community-Kitchen" => inputs.packs * inputs.days,
            "BasicGoods-Domestic" => inputs.packs * self.region_factor(region) * 7,
            "BasicGoods-Overseas" => inputs.packs * 7 * inputs.days,
            "Shelter-Domestic" => inputs.tents * 5 * inputs.days,
            "Shelter-Overseas" => inputs.tents * 10 * inputs.days,
            "TransitHousing" => inputs.families * inputs.days,
            "Ambulance-Standard" => inputs.patients * self.region_factor(region),
            "Ambulance-EventStandby" => (inputs.crowd_estimate as f64 * 0.60) as u64,
            "MedicalCamp-BloodDonation" => inputs.blood_bags * 3 * self.region_factor(region),
            "MedicalCamp-Circumcision" => inputs.participants * 3,
            "MedicalCamp-General" => inputs.patients,
            "WaterAccess" => inputs.families * 10 * 365,
            "Kindergarten" => inputs.students * 200 * 3,
            "ScholarshipProgram" => ((inputs.students * 750) as f64 * 0.20) as u64,
            "LivestockSacrifice" => inputs.animal_count * inputs.animal_type.factor(),
            "QuranWaqf" => inputs.copies * 6,
            "CommunityMeal-Breakfast" | "CommunityMeal-Lunch" => inputs.packs_per_day * 26 * 12,
            // Manual, and any name the catalog knows but we do not.
            _ => inputs.manual_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use std::path::PathBuf;

    fn catalog() -> Catalog {
        Catalog::load(&PathBuf::from("/nonexistent/benreport-data")).unwrap()
    }

    #[test]
    fn region_factor_is_five_or_seven() {
        let catalog = catalog();
        let calc = Calculator::new(&catalog);
        for region in ["Selangor", "Kuala Lumpur", "Johor"] {
            assert_eq!(calc.region_factor(region), 5);
        }
        for region in ["Sabah", "Kelantan", "Headquarters", "nowhere"] {
            assert_eq!(calc.region_factor(region), 7);
        }
    }

    #[test]
    fn community_kitchen_scenario() {
        let catalog = catalog();
        let calc = Calculator::new(&catalog);
        let inputs = CalcInputs {
            packs: 100,
            days: 3,
            ..Default::default()
        };
        assert_eq!(calc.compute("Community-Kitchen", &inputs, "Selangor"), 300);
    }

    #[test]
    fn basic_goods_domestic_depends_on_region() {
        let catalog = catalog();
        let calc = Calculator::new(&catalog);
        let inputs = CalcInputs {
            packs: 10,
            ..Default::default()
        };
        assert_eq!(calc.compute("BasicGoods-Domestic", &inputs, "Selangor"), 350);
        assert_eq!(calc.compute("BasicGoods-Domestic", &inputs, "Sabah"), 490);
    }

    #[test]
    fn event_standby_truncates() {
        let catalog = catalog();
        let calc = Calculator::new(&catalog);
        let inputs = CalcInputs {
            crowd_estimate: 1000,
            ..Default::default()
        };
        assert_eq!(calc.compute("Ambulance-EventStandby", &inputs, "Perak"), 600);
        let inputs = CalcInputs {
            crowd_estimate: 3,
            ..Default::default()
        };
        // 3 * 0.60 = 1.8, truncated toward zero.
        assert_eq!(calc.compute("Ambulance-EventStandby", &inputs, "Perak"), 1);
    }

    #[test]
    fn scholarship_scenario() {
        let catalog = catalog();
        let calc = Calculator::new(&catalog);
        let inputs = CalcInputs {
            students: 100,
            ..Default::default()
        };
        assert_eq!(calc.compute("ScholarshipProgram", &inputs, "Melaka"), 15000);
    }

    #[test]
    fn livestock_factors() {
        let catalog = catalog();
        let calc = Calculator::new(&catalog);
        for (animal, expected) in [
            (AnimalType::Cattle, 2500),
            (AnimalType::Goat, 350),
            (AnimalType::Camel, 3000),
        ] {
            let inputs = CalcInputs {
                animal_count: 5,
                animal_type: animal,
                ..Default::default()
            };
            assert_eq!(calc.compute("LivestockSacrifice", &inputs, "Johor"), expected);
        }
    }

    #[test]
    fn remaining_formulas() {
        let catalog = catalog();
        let calc = Calculator::new(&catalog);
        let inputs = CalcInputs {
            packs: 4,
            days: 3,
            tents: 2,
            families: 6,
            patients: 9,
            blood_bags: 2,
            participants: 7,
            students: 5,
            copies: 10,
            packs_per_day: 2,
            ..Default::default()
        };
        assert_eq!(calc.compute("BasicGoods-Overseas", &inputs, "Sabah"), 84);
        assert_eq!(calc.compute("Shelter-Domestic", &inputs, "Sabah"), 30);
        assert_eq!(calc.compute("Shelter-Overseas", &inputs, "Sabah"), 60);
        assert_eq!(calc.compute("TransitHousing", &inputs, "Sabah"), 18);
        assert_eq!(calc.compute("Ambulance-Standard", &inputs, "Selangor"), 45);
        assert_eq!(calc.compute("MedicalCamp-BloodDonation", &inputs, "Selangor"), 30);
        assert_eq!(calc.compute("MedicalCamp-Circumcision", &inputs, "Sabah"), 21);
        assert_eq!(calc.compute("MedicalCamp-General", &inputs, "Sabah"), 9);
        assert_eq!(calc.compute("WaterAccess", &inputs, "Sabah"), 21900);
        assert_eq!(calc.compute("Kindergarten", &inputs, "Sabah"), 3000);
        assert_eq!(calc.compute("QuranWaqf", &inputs, "Sabah"), 60);
        assert_eq!(calc.compute("CommunityMeal-Breakfast", &inputs, "Sabah"), 624);
        assert_eq!(calc.compute("CommunityMeal-Lunch", &inputs, "Sabah"), 624);
    }

    #[test]
    fn unknown_method_takes_manual_path() {
        let catalog = catalog();
        let calc = Calculator::new(&catalog);
        let inputs = CalcInputs {
            manual_count: 42,
            packs: 100,
            days: 100,
            ..Default::default()
        };
        assert_eq!(calc.compute("Manual", &inputs, "Sabah"), 42);
        assert_eq!(calc.compute("Not-A-Method", &inputs, "Sabah"), 42);
    }

    #[test]
    fn compute_is_total_and_zero_on_empty_inputs() {
        let catalog = catalog();
        let calc = Calculator::new(&catalog);
        let empty = CalcInputs::default();
        for rule in &catalog.divisions {
            for method in &rule.methods {
                assert_eq!(calc.compute(method, &empty, "Selangor"), 0);
                assert_eq!(calc.compute(method, &empty, "Sabah"), 0);
            }
        }
    }
}
