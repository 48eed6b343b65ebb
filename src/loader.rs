//! CSV loading for the partner and disease tables.

use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::error::DashboardError;
use crate::schema::{disease, partner};
use crate::tables::{DiseaseTable, PartnerTable};

/// Load the partner CSV.
///
/// Required columns: Partner ID, Name, Country, City, Specialization,
/// Latitude, Longitude. Latitude and Longitude are parsed as Float64; every
/// other column stays a string. Duplicate partner IDs are logged, not rejected.
pub fn load_partners(path: &Path) -> Result<PartnerTable, DashboardError> {
    let raw = read_csv_as_strings(path)?;
    require_columns(&raw, PartnerTable::TABLE, &partner::REQUIRED)?;

    let df = parse_numeric_columns(
        raw,
        PartnerTable::TABLE,
        &[partner::LATITUDE, partner::LONGITUDE],
        DataType::Float64,
    )?;
    let table = PartnerTable::from_frame(df)?;

    let duplicates = table.duplicate_ids()?;
    if !duplicates.is_empty() {
        warn!(
            "Partner ID is not unique in {}: {}",
            path.display(),
            duplicates.join(", ")
        );
    }

    info!("Loaded {} partners from {}", table.height(), path.display());
    Ok(table)
}

/// Load the disease occurrence CSV.
///
/// Required columns: Country, Disease, Year, Latitude, Longitude, Cases.
/// Year and Cases are parsed as Int64, coordinates as Float64.
pub fn load_diseases(path: &Path) -> Result<DiseaseTable, DashboardError> {
    let raw = read_csv_as_strings(path)?;
    require_columns(&raw, DiseaseTable::TABLE, &disease::REQUIRED)?;

    let df = parse_numeric_columns(
        raw,
        DiseaseTable::TABLE,
        &[disease::YEAR, disease::CASES],
        DataType::Int64,
    )?;
    let df = parse_numeric_columns(
        df,
        DiseaseTable::TABLE,
        &[disease::LATITUDE, disease::LONGITUDE],
        DataType::Float64,
    )?;
    let table = DiseaseTable::from_frame(df)?;

    info!(
        "Loaded {} disease records from {}",
        table.height(),
        path.display()
    );
    Ok(table)
}

/// Read a CSV file with all columns as String dtype.
/// Trims whitespace from column names.
fn read_csv_as_strings(path: &Path) -> Result<DataFrame, DashboardError> {
    if !path.is_file() {
        return Err(DashboardError::FileNotFound(path.to_path_buf()));
    }

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    debug!(
        "Read {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

fn require_columns(
    df: &DataFrame,
    table: &'static str,
    required: &[&str],
) -> Result<(), DashboardError> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(DashboardError::MissingColumn {
                table,
                column: col_name.to_string(),
            });
        }
    }
    Ok(())
}

/// Parse string columns to a numeric dtype.
///
/// Empty cells and values that do not parse are both rejected; the error
/// names the column and how many cells failed.
fn parse_numeric_columns(
    df: DataFrame,
    table: &'static str,
    columns: &[&str],
    dtype: DataType,
) -> Result<DataFrame, DashboardError> {
    let exprs: Vec<Expr> = columns
        .iter()
        .map(|c| {
            col(*c)
                .str()
                .strip_chars(lit(" \t\r\n"))
                .cast(dtype.clone())
        })
        .collect();

    let parsed = df.lazy().with_columns(exprs).collect()?;

    for &name in columns {
        let bad = parsed.column(name)?.null_count();
        if bad > 0 {
            return Err(DashboardError::Malformed {
                table,
                reason: format!(
                    "column '{}' has {} empty or non-{} values",
                    name, bad, dtype
                ),
            });
        }
    }

    Ok(parsed)
}
