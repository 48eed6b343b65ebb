//! Typed rows for the aggregation outputs.
//!
//! The aggregation engine speaks DataFrames; renderers and tests read these
//! rows instead so a renamed column fails here rather than in a chart.

use polars::prelude::*;
use serde::Serialize;

use crate::error::DashboardError;
use crate::schema::{disease, partner, summary};
use crate::tables::{float_values, int_values, text_values};

/// Build typed rows from an aggregation frame.
pub trait FromFrame: Sized {
    fn from_frame(df: &DataFrame) -> Result<Vec<Self>, DashboardError>;
}

const SUMMARY: &str = "summary";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseLocation {
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Disease")]
    pub disease: String,
    #[serde(rename = "Cases")]
    pub cases: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryPartners {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Number of Partners")]
    pub partners: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecializationCount {
    #[serde(rename = "Specialization")]
    pub specialization: String,
    #[serde(rename = "Count")]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyCases {
    #[serde(rename = "Year")]
    pub year: i64,
    #[serde(rename = "Disease")]
    pub disease: String,
    #[serde(rename = "Cases")]
    pub cases: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecializationInvolvement {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Specialization")]
    pub specialization: String,
    #[serde(rename = "Count")]
    pub count: u64,
}

/// Row of the partner details table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartnerDetail {
    #[serde(rename = "Partner ID")]
    pub partner_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Specialization")]
    pub specialization: String,
}

impl FromFrame for DiseaseLocation {
    fn from_frame(df: &DataFrame) -> Result<Vec<Self>, DashboardError> {
        let lats = float_values(df, SUMMARY, disease::LATITUDE)?;
        let lons = float_values(df, SUMMARY, disease::LONGITUDE)?;
        let diseases = text_values(df, disease::DISEASE)?;
        let cases = int_values(df, SUMMARY, disease::CASES)?;

        Ok(lats
            .into_iter()
            .zip(lons)
            .zip(diseases)
            .zip(cases)
            .map(|(((latitude, longitude), disease), cases)| Self {
                latitude,
                longitude,
                disease,
                cases,
            })
            .collect())
    }
}

impl FromFrame for CountryPartners {
    fn from_frame(df: &DataFrame) -> Result<Vec<Self>, DashboardError> {
        let countries = text_values(df, partner::COUNTRY)?;
        let counts = count_values(df, summary::NUMBER_OF_PARTNERS)?;

        Ok(countries
            .into_iter()
            .zip(counts)
            .map(|(country, partners)| Self { country, partners })
            .collect())
    }
}

impl FromFrame for SpecializationCount {
    fn from_frame(df: &DataFrame) -> Result<Vec<Self>, DashboardError> {
        let specs = text_values(df, partner::SPECIALIZATION)?;
        let counts = count_values(df, summary::COUNT)?;

        Ok(specs
            .into_iter()
            .zip(counts)
            .map(|(specialization, count)| Self {
                specialization,
                count,
            })
            .collect())
    }
}

impl FromFrame for YearlyCases {
    fn from_frame(df: &DataFrame) -> Result<Vec<Self>, DashboardError> {
        let years = int_values(df, SUMMARY, disease::YEAR)?;
        let diseases = text_values(df, disease::DISEASE)?;
        let cases = int_values(df, SUMMARY, disease::CASES)?;

        Ok(years
            .into_iter()
            .zip(diseases)
            .zip(cases)
            .map(|((year, disease), cases)| Self {
                year,
                disease,
                cases,
            })
            .collect())
    }
}

impl FromFrame for SpecializationInvolvement {
    fn from_frame(df: &DataFrame) -> Result<Vec<Self>, DashboardError> {
        let countries = text_values(df, partner::COUNTRY)?;
        let specs = text_values(df, partner::SPECIALIZATION)?;
        let counts = count_values(df, summary::COUNT)?;

        Ok(countries
            .into_iter()
            .zip(specs)
            .zip(counts)
            .map(|((country, specialization), count)| Self {
                country,
                specialization,
                count,
            })
            .collect())
    }
}

impl FromFrame for PartnerDetail {
    fn from_frame(df: &DataFrame) -> Result<Vec<Self>, DashboardError> {
        let ids = text_values(df, partner::PARTNER_ID)?;
        let names = text_values(df, partner::NAME)?;
        let countries = text_values(df, partner::COUNTRY)?;
        let cities = text_values(df, partner::CITY)?;
        let specs = text_values(df, partner::SPECIALIZATION)?;

        Ok(ids
            .into_iter()
            .zip(names)
            .zip(countries)
            .zip(cities)
            .zip(specs)
            .map(
                |((((partner_id, name), country), city), specialization)| Self {
                    partner_id,
                    name,
                    country,
                    city,
                    specialization,
                },
            )
            .collect())
    }
}

fn count_values(df: &DataFrame, name: &str) -> Result<Vec<u64>, DashboardError> {
    df.column(name)?
        .u64()?
        .into_iter()
        .map(|v| {
            v.ok_or_else(|| DashboardError::Malformed {
                table: SUMMARY,
                reason: format!("null count in column '{}'", name),
            })
        })
        .collect()
}
