//! Shared builders for unit tests.

use crate::tables::{DiseaseOccurrence, DiseaseTable, Partner, PartnerTable};

pub fn make_partner(id: &str, country: &str, specialization: &str) -> Partner {
    Partner {
        partner_id: id.to_string(),
        name: format!("{id} Health"),
        country: country.to_string(),
        city: format!("{country} City"),
        specialization: specialization.to_string(),
        latitude: -1.29,
        longitude: 36.82,
    }
}

pub fn make_occurrence(country: &str, disease: &str, year: i64, cases: i64) -> DiseaseOccurrence {
    DiseaseOccurrence {
        country: country.to_string(),
        disease: disease.to_string(),
        year,
        latitude: 20.59,
        longitude: 78.96,
        cases,
    }
}

pub fn sample_partners() -> PartnerTable {
    PartnerTable::from_records(&[
        make_partner("P1", "Kenya", "Diagnostics"),
        make_partner("P2", "Kenya", "Treatment"),
        make_partner("P3", "India", "Diagnostics"),
        make_partner("P4", "Brazil", "Research"),
        make_partner("P5", "India", "Diagnostics"),
    ])
    .unwrap()
}

pub fn sample_diseases() -> DiseaseTable {
    DiseaseTable::from_records(&[
        make_occurrence("India", "Malaria", 2020, 10),
        make_occurrence("India", "Malaria", 2021, 5),
        make_occurrence("India", "Dengue", 2020, 4),
        make_occurrence("Kenya", "Malaria", 2019, 8),
        make_occurrence("Kenya", "Schistosomiasis", 2021, 2),
        make_occurrence("Brazil", "Dengue", 2022, 12),
    ])
    .unwrap()
}
