//! Filter engine: projects the raw tables onto the current selection.
//!
//! Filtering never touches its input; each call builds a boolean mask from
//! the typed columns and returns a new table with row order preserved.

use polars::prelude::*;
use tracing::debug;

use crate::error::DashboardError;
use crate::schema::{disease, partner};
use crate::selection::FilterSelection;
use crate::tables::{DiseaseTable, PartnerTable};

/// Keep partners whose Country is selected.
pub fn filter_partners(
    partners: &PartnerTable,
    selection: &FilterSelection,
) -> Result<PartnerTable, DashboardError> {
    let df = partners.frame();
    let mask: BooleanChunked = df
        .column(partner::COUNTRY)?
        .str()?
        .into_iter()
        .map(|country| country.is_some_and(|c| selection.countries.contains(c)))
        .collect();

    let filtered = df.filter(&mask)?;
    debug!(
        "Partner filter kept {} of {} rows",
        filtered.height(),
        df.height()
    );
    Ok(PartnerTable::from_validated(filtered))
}

/// Keep disease records whose Country and Disease are selected and whose
/// Year lies in the selected range.
pub fn filter_diseases(
    diseases: &DiseaseTable,
    selection: &FilterSelection,
) -> Result<DiseaseTable, DashboardError> {
    let df = diseases.frame();
    let countries = df.column(disease::COUNTRY)?.str()?;
    let names = df.column(disease::DISEASE)?.str()?;
    let years = df.column(disease::YEAR)?.i64()?;

    let mask: BooleanChunked = countries
        .into_iter()
        .zip(names)
        .zip(years)
        .map(|((country, name), year)| match (country, name, year) {
            (Some(c), Some(d), Some(y)) => {
                selection.countries.contains(c)
                    && selection.diseases.contains(d)
                    && selection.years.contains(y)
            }
            _ => false,
        })
        .collect();

    let filtered = df.filter(&mask)?;
    debug!(
        "Disease filter kept {} of {} rows",
        filtered.height(),
        df.height()
    );
    Ok(DiseaseTable::from_validated(filtered))
}

/// Filter both tables with one selection.
pub fn filter(
    partners: &PartnerTable,
    diseases: &DiseaseTable,
    selection: &FilterSelection,
) -> Result<(PartnerTable, DiseaseTable), DashboardError> {
    Ok((
        filter_partners(partners, selection)?,
        filter_diseases(diseases, selection)?,
    ))
}
