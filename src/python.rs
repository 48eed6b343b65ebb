//! Python extension module, built with the `python` feature.
//!
//! A Python UI (e.g. a Streamlit sidebar) owns the widgets; this module owns
//! the tables and hands back polars DataFrames for each render.

use std::collections::HashMap;
use std::path::PathBuf;

use pyo3::prelude::*;
use pyo3::types::PyModule;
use pyo3_polars::PyDataFrame;

use crate::config::{DataConfig, RenderConfig};
use crate::model::Dashboard;
use crate::schema::{self, files};
use crate::selection::{FilterSelection, YearRange};
use crate::visualization;

#[pyclass(name = "Dashboard")]
pub struct PyDashboard {
    inner: Dashboard,
    render: RenderConfig,
}

#[pymethods]
impl PyDashboard {
    #[new]
    #[pyo3(signature = (partners_path=None, diseases_path=None))]
    fn new(partners_path: Option<PathBuf>, diseases_path: Option<PathBuf>) -> PyResult<Self> {
        let data = DataConfig {
            partners: partners_path.unwrap_or_else(|| PathBuf::from(files::PARTNERS)),
            diseases: diseases_path.unwrap_or_else(|| PathBuf::from(files::DISEASES)),
        };
        Ok(Self {
            inner: Dashboard::from_config(&data)?,
            render: RenderConfig::default(),
        })
    }

    /// Widget options: (countries, diseases, (min_year, max_year) or None).
    fn options(&self) -> PyResult<(Vec<String>, Vec<String>, Option<(i64, i64)>)> {
        let options = self.inner.options()?;
        Ok((
            options.countries,
            options.diseases,
            options.years.map(|y| (y.start, y.end)),
        ))
    }

    /// Filtered (partners, diseases) tables. Omitted arguments select everything.
    #[pyo3(signature = (countries=None, diseases=None, years=None))]
    fn filter(
        &self,
        countries: Option<Vec<String>>,
        diseases: Option<Vec<String>>,
        years: Option<(i64, i64)>,
    ) -> PyResult<(PyDataFrame, PyDataFrame)> {
        let selection = self.selection(countries, diseases, years)?;
        let (partners, diseases) = self.inner.filter(&selection)?;
        Ok((
            PyDataFrame(partners.into_frame()),
            PyDataFrame(diseases.into_frame()),
        ))
    }

    /// The five chart summaries plus `partner_details`, keyed by name.
    #[pyo3(signature = (countries=None, diseases=None, years=None))]
    fn summaries(
        &self,
        countries: Option<Vec<String>>,
        diseases: Option<Vec<String>>,
        years: Option<(i64, i64)>,
    ) -> PyResult<HashMap<String, PyDataFrame>> {
        let selection = self.selection(countries, diseases, years)?;
        Ok(self
            .inner
            .summary_frames(&selection)?
            .into_iter()
            .map(|(name, df)| (name.to_string(), PyDataFrame(df)))
            .collect())
    }

    /// Self-contained HTML page for the selection.
    #[pyo3(signature = (countries=None, diseases=None, years=None))]
    fn render_html(
        &self,
        countries: Option<Vec<String>>,
        diseases: Option<Vec<String>>,
        years: Option<(i64, i64)>,
    ) -> PyResult<String> {
        let selection = self.selection(countries, diseases, years)?;
        let view = self.inner.render(&selection)?;
        Ok(visualization::generate_dashboard_html(&view, &self.render)?)
    }

    #[getter]
    fn partners_df(&self) -> PyDataFrame {
        PyDataFrame(self.inner.partners().frame().clone())
    }

    #[getter]
    fn diseases_df(&self) -> PyDataFrame {
        PyDataFrame(self.inner.diseases().frame().clone())
    }
}

impl PyDashboard {
    fn selection(
        &self,
        countries: Option<Vec<String>>,
        diseases: Option<Vec<String>>,
        years: Option<(i64, i64)>,
    ) -> PyResult<FilterSelection> {
        let mut selection = self.inner.default_selection()?;
        if let Some(countries) = countries {
            selection = selection.with_countries(countries);
        }
        if let Some(diseases) = diseases {
            selection = selection.with_diseases(diseases);
        }
        if let Some((start, end)) = years {
            selection = selection.with_years(YearRange::new(start, end));
        }
        Ok(selection)
    }
}

/// Export column-name constants as Python submodules
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Partner
    let partner = PyModule::new(m.py(), "partner")?;
    partner.add("PARTNER_ID", schema::partner::PARTNER_ID)?;
    partner.add("NAME", schema::partner::NAME)?;
    partner.add("COUNTRY", schema::partner::COUNTRY)?;
    partner.add("CITY", schema::partner::CITY)?;
    partner.add("SPECIALIZATION", schema::partner::SPECIALIZATION)?;
    partner.add("LATITUDE", schema::partner::LATITUDE)?;
    partner.add("LONGITUDE", schema::partner::LONGITUDE)?;
    m.add_submodule(&partner)?;

    // Disease
    let disease = PyModule::new(m.py(), "disease")?;
    disease.add("COUNTRY", schema::disease::COUNTRY)?;
    disease.add("DISEASE", schema::disease::DISEASE)?;
    disease.add("YEAR", schema::disease::YEAR)?;
    disease.add("LATITUDE", schema::disease::LATITUDE)?;
    disease.add("LONGITUDE", schema::disease::LONGITUDE)?;
    disease.add("CASES", schema::disease::CASES)?;
    m.add_submodule(&disease)?;

    // Summary
    let summary = PyModule::new(m.py(), "summary")?;
    summary.add("NUMBER_OF_PARTNERS", schema::summary::NUMBER_OF_PARTNERS)?;
    summary.add("COUNT", schema::summary::COUNT)?;
    m.add_submodule(&summary)?;

    Ok(())
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDashboard>()?;
    add_schema_exports(m)?;
    Ok(())
}
