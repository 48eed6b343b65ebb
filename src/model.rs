use std::path::Path;

use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregation;
use crate::config::DataConfig;
use crate::error::DashboardError;
use crate::filter;
use crate::loader;
use crate::selection::{FilterOptions, FilterSelection};
use crate::summary::{
    CountryPartners, DiseaseLocation, FromFrame, PartnerDetail, SpecializationCount,
    SpecializationInvolvement, YearlyCases,
};
use crate::tables::{DiseaseTable, PartnerTable};

/// The two raw tables, loaded once and borrowed by every render.
#[derive(Debug, Clone)]
pub struct Dashboard {
    partners: PartnerTable,
    diseases: DiseaseTable,
}

/// Everything one render shows, derived from a single selection.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub selection: FilterSelection,
    pub partners: PartnerTable,
    pub diseases: DiseaseTable,
    pub summaries: Summaries,
}

/// The five chart summaries plus the partner details table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summaries {
    pub disease_locations: Vec<DiseaseLocation>,
    pub partners_per_country: Vec<CountryPartners>,
    pub specialization_distribution: Vec<SpecializationCount>,
    pub cases_over_time: Vec<YearlyCases>,
    pub partner_involvement: Vec<SpecializationInvolvement>,
    pub partner_details: Vec<PartnerDetail>,
}

/// Summaries as DataFrames, keyed by the name each output is published under.
pub type SummaryFrames = Vec<(&'static str, DataFrame)>;

impl Dashboard {
    pub fn new(partners: PartnerTable, diseases: DiseaseTable) -> Self {
        Self { partners, diseases }
    }

    // ── Data loading ────────────────────────────────────────────────────────

    pub fn load(partners_path: &Path, diseases_path: &Path) -> Result<Self, DashboardError> {
        let partners = loader::load_partners(partners_path)?;
        let diseases = loader::load_diseases(diseases_path)?;
        Ok(Self::new(partners, diseases))
    }

    pub fn from_config(data: &DataConfig) -> Result<Self, DashboardError> {
        Self::load(&data.partners, &data.diseases)
    }

    pub fn partners(&self) -> &PartnerTable {
        &self.partners
    }

    pub fn diseases(&self) -> &DiseaseTable {
        &self.diseases
    }

    // ── Widgets ─────────────────────────────────────────────────────────────

    pub fn options(&self) -> Result<FilterOptions, DashboardError> {
        FilterOptions::from_tables(&self.partners, &self.diseases)
    }

    pub fn default_selection(&self) -> Result<FilterSelection, DashboardError> {
        Ok(self.options()?.default_selection())
    }

    // ── Filter + aggregate ──────────────────────────────────────────────────

    pub fn filter(
        &self,
        selection: &FilterSelection,
    ) -> Result<(PartnerTable, DiseaseTable), DashboardError> {
        filter::filter(&self.partners, &self.diseases, selection)
    }

    /// Raw summary frames for a selection, in chart order.
    pub fn summary_frames(
        &self,
        selection: &FilterSelection,
    ) -> Result<SummaryFrames, DashboardError> {
        let (partners, diseases) = self.filter(selection)?;
        Ok(vec![
            (
                "disease_locations",
                aggregation::disease_locations(&diseases)?,
            ),
            (
                "partners_per_country",
                aggregation::partners_per_country(&partners)?,
            ),
            (
                "specialization_distribution",
                aggregation::specialization_distribution(&partners)?,
            ),
            ("cases_over_time", aggregation::cases_over_time(&diseases)?),
            (
                "partner_involvement",
                aggregation::partner_involvement(&partners)?,
            ),
            ("partner_details", partners.details()?),
        ])
    }

    /// Run one full filter + aggregate pass. Nothing is cached between calls.
    pub fn render(&self, selection: &FilterSelection) -> Result<DashboardView, DashboardError> {
        if selection.years.is_empty() {
            debug!(
                "Year range {} is inverted; disease views will be empty",
                selection.years
            );
        }

        let (partners, diseases) = self.filter(selection)?;
        let summaries = Summaries {
            disease_locations: DiseaseLocation::from_frame(&aggregation::disease_locations(
                &diseases,
            )?)?,
            partners_per_country: CountryPartners::from_frame(
                &aggregation::partners_per_country(&partners)?,
            )?,
            specialization_distribution: SpecializationCount::from_frame(
                &aggregation::specialization_distribution(&partners)?,
            )?,
            cases_over_time: YearlyCases::from_frame(&aggregation::cases_over_time(&diseases)?)?,
            partner_involvement: SpecializationInvolvement::from_frame(
                &aggregation::partner_involvement(&partners)?,
            )?,
            partner_details: PartnerDetail::from_frame(&partners.details()?)?,
        };

        info!(
            "Rendered {} of {} partners and {} of {} disease records",
            partners.height(),
            self.partners.height(),
            diseases.height(),
            self.diseases.height()
        );

        Ok(DashboardView {
            selection: selection.clone(),
            partners,
            diseases,
            summaries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{sample_diseases, sample_partners};
    use crate::selection::YearRange;

    fn dashboard() -> Dashboard {
        Dashboard::new(sample_partners(), sample_diseases())
    }

    #[test]
    fn test_default_render_covers_everything() {
        let dashboard = dashboard();
        let view = dashboard
            .render(&dashboard.default_selection().unwrap())
            .unwrap();
        assert_eq!(view.partners.height(), 5);
        assert_eq!(view.diseases.height(), 6);
        assert_eq!(view.summaries.partner_details.len(), 5);
        assert_eq!(
            view.summaries
                .partners_per_country
                .iter()
                .map(|r| r.country.as_str())
                .collect::<Vec<_>>(),
            vec!["Brazil", "India", "Kenya"]
        );
    }

    #[test]
    fn test_render_does_not_touch_raw_tables() {
        let dashboard = dashboard();
        let selection = dashboard
            .default_selection()
            .unwrap()
            .with_countries(["Kenya"])
            .with_years(YearRange::new(2021, 2021));
        let view = dashboard.render(&selection).unwrap();

        assert_eq!(view.partners.height(), 2);
        assert_eq!(view.diseases.height(), 1);
        assert_eq!(dashboard.partners().height(), 5);
        assert_eq!(dashboard.diseases().height(), 6);
    }

    #[test]
    fn test_empty_disease_selection_renders() {
        let dashboard = dashboard();
        let selection = dashboard
            .default_selection()
            .unwrap()
            .with_diseases(Vec::<String>::new());
        let view = dashboard.render(&selection).unwrap();

        assert!(view.diseases.is_empty());
        assert!(view.summaries.disease_locations.is_empty());
        assert!(view.summaries.cases_over_time.is_empty());
        assert_eq!(view.summaries.partner_details.len(), 5);
    }

    #[test]
    fn test_summary_frames_names_and_order() {
        let dashboard = dashboard();
        let frames = dashboard
            .summary_frames(&dashboard.default_selection().unwrap())
            .unwrap();
        let names: Vec<&str> = frames.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "disease_locations",
                "partners_per_country",
                "specialization_distribution",
                "cases_over_time",
                "partner_involvement",
                "partner_details",
            ]
        );
    }

    #[test]
    fn test_render_is_repeatable() {
        let dashboard = dashboard();
        let selection = dashboard.default_selection().unwrap();
        let a = dashboard.render(&selection).unwrap();
        let b = dashboard.render(&selection).unwrap();
        assert_eq!(a.summaries, b.summaries);
    }
}
