//! Typed input tables.
//!
//! Both tables wrap a polars DataFrame whose schema is checked once at
//! construction, so the engines can address columns through `schema` without
//! re-validating on every render.

use std::collections::HashSet;

use polars::prelude::*;
use serde::Serialize;

use crate::error::DashboardError;
use crate::schema::{disease, partner};

/// One healthcare partner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partner {
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
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

/// Case count for one disease at one location in one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseOccurrence {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Disease")]
    pub disease: String,
    #[serde(rename = "Year")]
    pub year: i64,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Cases")]
    pub cases: i64,
}

// ── Partner table ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PartnerTable {
    df: DataFrame,
}

impl PartnerTable {
    pub(crate) const TABLE: &'static str = "partner";

    /// Wrap a DataFrame, checking that every partner column is present with
    /// its expected dtype. Extra columns are kept.
    pub fn from_frame(df: DataFrame) -> Result<Self, DashboardError> {
        for name in [
            partner::PARTNER_ID,
            partner::NAME,
            partner::COUNTRY,
            partner::CITY,
            partner::SPECIALIZATION,
        ] {
            require_dtype(&df, Self::TABLE, name, &DataType::String)?;
        }
        require_dtype(&df, Self::TABLE, partner::LATITUDE, &DataType::Float64)?;
        require_dtype(&df, Self::TABLE, partner::LONGITUDE, &DataType::Float64)?;
        Ok(Self { df })
    }

    pub fn from_records(records: &[Partner]) -> Result<Self, DashboardError> {
        let df = DataFrame::new(vec![
            text_column(partner::PARTNER_ID, records, |p| &p.partner_id),
            text_column(partner::NAME, records, |p| &p.name),
            text_column(partner::COUNTRY, records, |p| &p.country),
            text_column(partner::CITY, records, |p| &p.city),
            text_column(partner::SPECIALIZATION, records, |p| &p.specialization),
            Column::new(
                partner::LATITUDE.into(),
                records.iter().map(|p| p.latitude).collect::<Vec<f64>>(),
            ),
            Column::new(
                partner::LONGITUDE.into(),
                records.iter().map(|p| p.longitude).collect::<Vec<f64>>(),
            ),
        ])?;
        Ok(Self { df })
    }

    /// Filter results are already schema-checked.
    pub(crate) fn from_validated(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_frame(self) -> DataFrame {
        self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn records(&self) -> Result<Vec<Partner>, DashboardError> {
        let ids = text_values(&self.df, partner::PARTNER_ID)?;
        let names = text_values(&self.df, partner::NAME)?;
        let countries = text_values(&self.df, partner::COUNTRY)?;
        let cities = text_values(&self.df, partner::CITY)?;
        let specs = text_values(&self.df, partner::SPECIALIZATION)?;
        let lats = float_values(&self.df, Self::TABLE, partner::LATITUDE)?;
        let lons = float_values(&self.df, Self::TABLE, partner::LONGITUDE)?;

        let mut out = Vec::with_capacity(self.df.height());
        for i in 0..self.df.height() {
            out.push(Partner {
                partner_id: ids[i].clone(),
                name: names[i].clone(),
                country: countries[i].clone(),
                city: cities[i].clone(),
                specialization: specs[i].clone(),
                latitude: lats[i],
                longitude: lons[i],
            });
        }
        Ok(out)
    }

    /// Distinct countries in first-seen order.
    pub fn countries(&self) -> Result<Vec<String>, DashboardError> {
        distinct_in_order(&self.df, partner::COUNTRY)
    }

    /// Partner IDs that occur more than once, in first-seen order.
    pub fn duplicate_ids(&self) -> Result<Vec<String>, DashboardError> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut dups = Vec::new();
        for id in self.df.column(partner::PARTNER_ID)?.str()?.into_iter().flatten() {
            if !seen.insert(id) && reported.insert(id) {
                dups.push(id.to_string());
            }
        }
        Ok(dups)
    }

    /// Projection used by the partner details table.
    pub fn details(&self) -> Result<DataFrame, DashboardError> {
        Ok(self.df.select(partner::DETAILS)?)
    }
}

// ── Disease table ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DiseaseTable {
    df: DataFrame,
}

impl DiseaseTable {
    pub(crate) const TABLE: &'static str = "disease";

    pub fn from_frame(df: DataFrame) -> Result<Self, DashboardError> {
        require_dtype(&df, Self::TABLE, disease::COUNTRY, &DataType::String)?;
        require_dtype(&df, Self::TABLE, disease::DISEASE, &DataType::String)?;
        require_dtype(&df, Self::TABLE, disease::YEAR, &DataType::Int64)?;
        require_dtype(&df, Self::TABLE, disease::LATITUDE, &DataType::Float64)?;
        require_dtype(&df, Self::TABLE, disease::LONGITUDE, &DataType::Float64)?;
        require_dtype(&df, Self::TABLE, disease::CASES, &DataType::Int64)?;
        Ok(Self { df })
    }

    pub fn from_records(records: &[DiseaseOccurrence]) -> Result<Self, DashboardError> {
        let df = DataFrame::new(vec![
            text_column(disease::COUNTRY, records, |d| &d.country),
            text_column(disease::DISEASE, records, |d| &d.disease),
            Column::new(
                disease::YEAR.into(),
                records.iter().map(|d| d.year).collect::<Vec<i64>>(),
            ),
            Column::new(
                disease::LATITUDE.into(),
                records.iter().map(|d| d.latitude).collect::<Vec<f64>>(),
            ),
            Column::new(
                disease::LONGITUDE.into(),
                records.iter().map(|d| d.longitude).collect::<Vec<f64>>(),
            ),
            Column::new(
                disease::CASES.into(),
                records.iter().map(|d| d.cases).collect::<Vec<i64>>(),
            ),
        ])?;
        Ok(Self { df })
    }

    pub(crate) fn from_validated(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_frame(self) -> DataFrame {
        self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn records(&self) -> Result<Vec<DiseaseOccurrence>, DashboardError> {
        let countries = text_values(&self.df, disease::COUNTRY)?;
        let diseases = text_values(&self.df, disease::DISEASE)?;
        let years = int_values(&self.df, Self::TABLE, disease::YEAR)?;
        let lats = float_values(&self.df, Self::TABLE, disease::LATITUDE)?;
        let lons = float_values(&self.df, Self::TABLE, disease::LONGITUDE)?;
        let cases = int_values(&self.df, Self::TABLE, disease::CASES)?;

        let mut out = Vec::with_capacity(self.df.height());
        for i in 0..self.df.height() {
            out.push(DiseaseOccurrence {
                country: countries[i].clone(),
                disease: diseases[i].clone(),
                year: years[i],
                latitude: lats[i],
                longitude: lons[i],
                cases: cases[i],
            });
        }
        Ok(out)
    }

    /// Distinct diseases in first-seen order.
    pub fn diseases(&self) -> Result<Vec<String>, DashboardError> {
        distinct_in_order(&self.df, disease::DISEASE)
    }

    /// Observed `(min, max)` year, `None` for an empty table.
    pub fn year_bounds(&self) -> Result<Option<(i64, i64)>, DashboardError> {
        let years = self.df.column(disease::YEAR)?.i64()?;
        let min = years.into_iter().flatten().min();
        let max = years.into_iter().flatten().max();
        Ok(min.zip(max))
    }

    pub fn total_cases(&self) -> Result<i64, DashboardError> {
        Ok(self
            .df
            .column(disease::CASES)?
            .i64()?
            .into_iter()
            .flatten()
            .sum())
    }
}

// ── Column helpers ──────────────────────────────────────────────────────────

fn require_dtype(
    df: &DataFrame,
    table: &'static str,
    name: &str,
    expected: &DataType,
) -> Result<(), DashboardError> {
    let column = df.column(name).map_err(|_| DashboardError::MissingColumn {
        table,
        column: name.to_string(),
    })?;
    if column.dtype() != expected {
        return Err(DashboardError::Malformed {
            table,
            reason: format!(
                "column '{}' has dtype {}, expected {}",
                name,
                column.dtype(),
                expected
            ),
        });
    }
    Ok(())
}

fn text_column<T>(name: &str, records: &[T], field: impl Fn(&T) -> &String) -> Column {
    let values: Vec<&str> = records.iter().map(|r| field(r).as_str()).collect();
    Column::new(name.into(), values)
}

/// Null text cells read back as empty strings.
pub(crate) fn text_values(df: &DataFrame, name: &str) -> Result<Vec<String>, DashboardError> {
    Ok(df
        .column(name)?
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect())
}

pub(crate) fn float_values(
    df: &DataFrame,
    table: &'static str,
    name: &str,
) -> Result<Vec<f64>, DashboardError> {
    df.column(name)?
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(i, v)| v.ok_or_else(|| null_cell(table, name, i)))
        .collect()
}

pub(crate) fn int_values(
    df: &DataFrame,
    table: &'static str,
    name: &str,
) -> Result<Vec<i64>, DashboardError> {
    df.column(name)?
        .i64()?
        .into_iter()
        .enumerate()
        .map(|(i, v)| v.ok_or_else(|| null_cell(table, name, i)))
        .collect()
}

fn null_cell(table: &'static str, name: &str, row: usize) -> DashboardError {
    DashboardError::Malformed {
        table,
        reason: format!("null value in column '{}' at row {}", name, row),
    }
}

fn distinct_in_order(df: &DataFrame, name: &str) -> Result<Vec<String>, DashboardError> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for v in df.column(name)?.str()?.into_iter().flatten() {
        if seen.insert(v) {
            out.push(v.to_string());
        }
    }
    Ok(out)
}
