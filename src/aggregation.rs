//! Aggregation engine: the grouped summaries behind each chart.
//!
//! Every function is a pure group-by over a filtered table and returns a
//! DataFrame in a fixed order, so identical inputs always give identical
//! output. An empty table yields a frame with zero rows.

use polars::prelude::*;

use crate::error::DashboardError;
use crate::schema::{disease, partner, summary};
use crate::tables::{DiseaseTable, PartnerTable};

/// Sum of Cases per (Latitude, Longitude, Disease), sorted by those keys.
pub fn disease_locations(diseases: &DiseaseTable) -> Result<DataFrame, DashboardError> {
    let df = diseases
        .frame()
        .clone()
        .lazy()
        .group_by([
            col(disease::LATITUDE),
            col(disease::LONGITUDE),
            col(disease::DISEASE),
        ])
        .agg([col(disease::CASES).sum()])
        .sort_by_exprs(
            [
                col(disease::LATITUDE),
                col(disease::LONGITUDE),
                col(disease::DISEASE),
            ],
            SortMultipleOptions::default(),
        )
        .collect()?;
    Ok(df)
}

/// Number of partners per Country, sorted by Country.
pub fn partners_per_country(partners: &PartnerTable) -> Result<DataFrame, DashboardError> {
    let df = partners
        .frame()
        .clone()
        .lazy()
        .filter(col(partner::COUNTRY).is_not_null())
        .group_by([col(partner::COUNTRY)])
        .agg([len()
            .cast(DataType::UInt64)
            .alias(summary::NUMBER_OF_PARTNERS)])
        .sort_by_exprs([col(partner::COUNTRY)], SortMultipleOptions::default())
        .collect()?;
    Ok(df)
}

/// Partner count per Specialization. Blank specializations are not counted.
///
/// Ordered by descending Count; equal counts fall back to ascending
/// Specialization name.
pub fn specialization_distribution(partners: &PartnerTable) -> Result<DataFrame, DashboardError> {
    let df = partners
        .frame()
        .clone()
        .lazy()
        .filter(col(partner::SPECIALIZATION).is_not_null())
        .group_by([col(partner::SPECIALIZATION)])
        .agg([len().cast(DataType::UInt64).alias(summary::COUNT)])
        .sort_by_exprs(
            [col(summary::COUNT), col(partner::SPECIALIZATION)],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .collect()?;
    Ok(df)
}

/// Sum of Cases per (Year, Disease), sorted by Year then Disease.
///
/// Years with no filtered records are absent rather than zero.
pub fn cases_over_time(diseases: &DiseaseTable) -> Result<DataFrame, DashboardError> {
    let df = diseases
        .frame()
        .clone()
        .lazy()
        .group_by([col(disease::YEAR), col(disease::DISEASE)])
        .agg([col(disease::CASES).sum()])
        .sort_by_exprs(
            [col(disease::YEAR), col(disease::DISEASE)],
            SortMultipleOptions::default(),
        )
        .collect()?;
    Ok(df)
}

/// Partner count per (Country, Specialization), sorted by both keys.
/// Rows with a blank key are left out.
pub fn partner_involvement(partners: &PartnerTable) -> Result<DataFrame, DashboardError> {
    let df = partners
        .frame()
        .clone()
        .lazy()
        .filter(
            col(partner::COUNTRY)
                .is_not_null()
                .and(col(partner::SPECIALIZATION).is_not_null()),
        )
        .group_by([col(partner::COUNTRY), col(partner::SPECIALIZATION)])
        .agg([len().cast(DataType::UInt64).alias(summary::COUNT)])
        .sort_by_exprs(
            [col(partner::COUNTRY), col(partner::SPECIALIZATION)],
            SortMultipleOptions::default(),
        )
        .collect()?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{filter_diseases, filter_partners};
    use crate::fixtures::{make_occurrence, make_partner, sample_diseases, sample_partners};
    use crate::selection::{FilterOptions, FilterSelection, YearRange};
    use crate::summary::{
        CountryPartners, DiseaseLocation, FromFrame, SpecializationCount,
        SpecializationInvolvement, YearlyCases,
    };

    fn everything() -> FilterSelection {
        FilterOptions::from_tables(&sample_partners(), &sample_diseases())
            .unwrap()
            .default_selection()
    }

    #[test]
    fn test_partners_per_country_after_filter() {
        let raw = PartnerTable::from_records(&[
            make_partner("P1", "Kenya", "A"),
            make_partner("P2", "Kenya", "A"),
            make_partner("P3", "India", "B"),
        ])
        .unwrap();
        let filtered = filter_partners(&raw, &everything().with_countries(["Kenya"])).unwrap();

        let rows = CountryPartners::from_frame(&partners_per_country(&filtered).unwrap()).unwrap();
        assert_eq!(
            rows,
            vec![CountryPartners {
                country: "Kenya".into(),
                partners: 2
            }]
        );
    }

    #[test]
    fn test_partners_per_country_column_names() {
        let df = partners_per_country(&sample_partners()).unwrap();
        assert_eq!(
            df.get_column_names_str(),
            vec![partner::COUNTRY, summary::NUMBER_OF_PARTNERS]
        );
    }

    #[test]
    fn test_cases_over_time_respects_year_range() {
        let raw = DiseaseTable::from_records(&[
            make_occurrence("India", "Malaria", 2020, 10),
            make_occurrence("India", "Malaria", 2021, 5),
        ])
        .unwrap();
        let selection = FilterSelection::new(["India"], ["Malaria"], YearRange::new(2020, 2020));
        let filtered = filter_diseases(&raw, &selection).unwrap();

        let rows = YearlyCases::from_frame(&cases_over_time(&filtered).unwrap()).unwrap();
        assert_eq!(
            rows,
            vec![YearlyCases {
                year: 2020,
                disease: "Malaria".into(),
                cases: 10
            }]
        );
    }

    #[test]
    fn test_cases_over_time_does_not_zero_fill() {
        let raw = DiseaseTable::from_records(&[
            make_occurrence("India", "Malaria", 2018, 1),
            make_occurrence("India", "Malaria", 2021, 2),
        ])
        .unwrap();
        let rows = YearlyCases::from_frame(&cases_over_time(&raw).unwrap()).unwrap();
        let years: Vec<i64> = rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2018, 2021]);
    }

    #[test]
    fn test_specialization_order() {
        let raw = PartnerTable::from_records(&[
            make_partner("P1", "Kenya", "A"),
            make_partner("P2", "Kenya", "A"),
            make_partner("P3", "India", "B"),
        ])
        .unwrap();
        let rows =
            SpecializationCount::from_frame(&specialization_distribution(&raw).unwrap()).unwrap();
        assert_eq!(
            rows,
            vec![
                SpecializationCount {
                    specialization: "A".into(),
                    count: 2
                },
                SpecializationCount {
                    specialization: "B".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_specialization_ties_sorted_by_name() {
        let raw = PartnerTable::from_records(&[
            make_partner("P1", "Kenya", "Zoonoses"),
            make_partner("P2", "Kenya", "Anthelmintics"),
            make_partner("P3", "India", "Vectors"),
            make_partner("P4", "India", "Vectors"),
        ])
        .unwrap();
        let rows =
            SpecializationCount::from_frame(&specialization_distribution(&raw).unwrap()).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.specialization.as_str()).collect();
        assert_eq!(names, vec!["Vectors", "Anthelmintics", "Zoonoses"]);
    }

    #[test]
    fn test_blank_specialization_is_not_a_group() {
        let df = polars::df![
            partner::PARTNER_ID => ["P1", "P2", "P3"],
            partner::NAME => ["A", "B", "C"],
            partner::COUNTRY => ["Kenya", "Kenya", "India"],
            partner::CITY => ["N", "N", "D"],
            partner::SPECIALIZATION => [None, Some("Diagnostics"), Some("Diagnostics")],
            partner::LATITUDE => [1.0, 1.0, 2.0],
            partner::LONGITUDE => [2.0, 2.0, 3.0],
        ]
        .unwrap();
        let table = PartnerTable::from_frame(df).unwrap();

        let dist =
            SpecializationCount::from_frame(&specialization_distribution(&table).unwrap()).unwrap();
        assert_eq!(
            dist,
            vec![SpecializationCount {
                specialization: "Diagnostics".into(),
                count: 2
            }]
        );

        let involvement =
            SpecializationInvolvement::from_frame(&partner_involvement(&table).unwrap()).unwrap();
        assert!(involvement.iter().all(|r| !r.specialization.is_empty()));
        assert_eq!(involvement.len(), 2);

        // The partner itself still counts towards its country.
        let per_country =
            CountryPartners::from_frame(&partners_per_country(&table).unwrap()).unwrap();
        assert_eq!(per_country.iter().map(|r| r.partners).sum::<u64>(), 3);
    }

    #[test]
    fn test_disease_locations_sum_duplicates() {
        let raw = DiseaseTable::from_records(&[
            make_occurrence("India", "Malaria", 2020, 10),
            make_occurrence("India", "Malaria", 2021, 5),
            make_occurrence("India", "Dengue", 2021, 3),
        ])
        .unwrap();
        let rows = DiseaseLocation::from_frame(&disease_locations(&raw).unwrap()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].disease, "Dengue");
        assert_eq!(rows[0].cases, 3);
        assert_eq!(rows[1].disease, "Malaria");
        assert_eq!(rows[1].cases, 15);
    }

    #[test]
    fn test_case_totals_are_conserved() {
        let selection = everything().with_countries(["India", "Kenya"]);
        let filtered = filter_diseases(&sample_diseases(), &selection).unwrap();
        let total = filtered.total_cases().unwrap();

        let by_location = DiseaseLocation::from_frame(&disease_locations(&filtered).unwrap())
            .unwrap()
            .iter()
            .map(|r| r.cases)
            .sum::<i64>();
        let by_year = YearlyCases::from_frame(&cases_over_time(&filtered).unwrap())
            .unwrap()
            .iter()
            .map(|r| r.cases)
            .sum::<i64>();
        assert_eq!(by_location, total);
        assert_eq!(by_year, total);
    }

    #[test]
    fn test_partner_counts_are_conserved() {
        let filtered =
            filter_partners(&sample_partners(), &everything().with_countries(["India", "Brazil"]))
                .unwrap();
        let per_country =
            CountryPartners::from_frame(&partners_per_country(&filtered).unwrap()).unwrap();
        let involvement =
            SpecializationInvolvement::from_frame(&partner_involvement(&filtered).unwrap())
                .unwrap();

        let n = filtered.height() as u64;
        assert_eq!(per_country.iter().map(|r| r.partners).sum::<u64>(), n);
        assert_eq!(involvement.iter().map(|r| r.count).sum::<u64>(), n);
    }

    #[test]
    fn test_partner_involvement_groups() {
        let rows =
            SpecializationInvolvement::from_frame(&partner_involvement(&sample_partners()).unwrap())
                .unwrap();
        let keys: Vec<(&str, &str, u64)> = rows
            .iter()
            .map(|r| (r.country.as_str(), r.specialization.as_str(), r.count))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Brazil", "Research", 1),
                ("India", "Diagnostics", 2),
                ("Kenya", "Diagnostics", 1),
                ("Kenya", "Treatment", 1),
            ]
        );
    }

    #[test]
    fn test_empty_disease_selection_gives_zero_groups() {
        let filtered = filter_diseases(
            &sample_diseases(),
            &everything().with_diseases(Vec::<String>::new()),
        )
        .unwrap();
        assert_eq!(disease_locations(&filtered).unwrap().height(), 0);
        assert_eq!(cases_over_time(&filtered).unwrap().height(), 0);
    }

    #[test]
    fn test_empty_partner_table_gives_zero_groups() {
        let empty = PartnerTable::from_records(&[]).unwrap();
        assert_eq!(partners_per_country(&empty).unwrap().height(), 0);
        assert_eq!(specialization_distribution(&empty).unwrap().height(), 0);
        assert_eq!(partner_involvement(&empty).unwrap().height(), 0);
    }

    #[test]
    fn test_aggregation_is_repeatable() {
        let a = cases_over_time(&sample_diseases()).unwrap();
        let b = cases_over_time(&sample_diseases()).unwrap();
        assert!(a.equals(&b));
    }
}
