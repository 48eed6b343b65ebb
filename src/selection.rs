//! Filter selection and the widget options it is chosen from.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::DashboardError;
use crate::tables::{DiseaseTable, PartnerTable};

/// Inclusive year interval. `start > end` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub start: i64,
    pub end: i64,
}

impl YearRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Used when the disease table has no rows to observe bounds from.
    pub fn unbounded() -> Self {
        Self {
            start: i64::MIN,
            end: i64::MAX,
        }
    }

    pub fn contains(&self, year: i64) -> bool {
        self.start <= year && year <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn overlaps(&self, other: YearRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.start <= other.end && other.start <= self.end
    }

    /// Restrict both ends to `bounds`, as a slider over `bounds` would.
    /// An empty `bounds` leaves the range unchanged.
    pub fn clamp_to(&self, bounds: YearRange) -> Self {
        if bounds.is_empty() {
            return *self;
        }
        Self {
            start: self.start.clamp(bounds.start, bounds.end),
            end: self.end.clamp(bounds.start, bounds.end),
        }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Choices offered by the filter widgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Distinct partner countries, first-seen order.
    pub countries: Vec<String>,
    /// Distinct diseases, first-seen order.
    pub diseases: Vec<String>,
    /// Observed year range of the disease table.
    pub years: Option<YearRange>,
}

impl FilterOptions {
    pub fn from_tables(
        partners: &PartnerTable,
        diseases: &DiseaseTable,
    ) -> Result<Self, DashboardError> {
        Ok(Self {
            countries: partners.countries()?,
            diseases: diseases.diseases()?,
            years: diseases
                .year_bounds()?
                .map(|(min, max)| YearRange::new(min, max)),
        })
    }

    /// Everything selected: every country, every disease, the full year range.
    pub fn default_selection(&self) -> FilterSelection {
        FilterSelection {
            countries: self.countries.iter().cloned().collect(),
            diseases: self.diseases.iter().cloned().collect(),
            years: self.years.unwrap_or_else(YearRange::unbounded),
        }
    }
}

/// The user's current choice. Built fresh for every render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSelection {
    pub countries: BTreeSet<String>,
    pub diseases: BTreeSet<String>,
    pub years: YearRange,
}

impl FilterSelection {
    pub fn new<C, D>(countries: C, diseases: D, years: YearRange) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            countries: countries.into_iter().map(Into::into).collect(),
            diseases: diseases.into_iter().map(Into::into).collect(),
            years,
        }
    }

    pub fn with_countries<I>(mut self, countries: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_diseases<I>(mut self, diseases: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.diseases = diseases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_years(mut self, years: YearRange) -> Self {
        self.years = years;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{sample_diseases, sample_partners};

    #[test]
    fn test_year_range_inclusive() {
        let r = YearRange::new(2019, 2021);
        assert!(r.contains(2019));
        assert!(r.contains(2021));
        assert!(!r.contains(2018));
        assert!(!r.contains(2022));
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let r = YearRange::new(2022, 2020);
        assert!(r.is_empty());
        assert!(!r.contains(2021));
    }

    #[test]
    fn test_clamp_to_bounds() {
        let bounds = YearRange::new(2015, 2022);
        assert_eq!(
            YearRange::new(2000, 2030).clamp_to(bounds),
            YearRange::new(2015, 2022)
        );
        assert_eq!(
            YearRange::new(2018, 2019).clamp_to(bounds),
            YearRange::new(2018, 2019)
        );
    }

    #[test]
    fn test_clamp_to_inverted_bounds_is_identity() {
        let r = YearRange::new(2000, 2030);
        assert_eq!(r.clamp_to(YearRange::new(2022, 2015)), r);
    }

    #[test]
    fn test_overlaps() {
        let bounds = YearRange::new(2015, 2022);
        assert!(YearRange::new(2010, 2015).overlaps(bounds));
        assert!(YearRange::new(2022, 2040).overlaps(bounds));
        assert!(!YearRange::new(2030, 2040).overlaps(bounds));
        assert!(!YearRange::new(2000, 2014).overlaps(bounds));
        assert!(!YearRange::new(2020, 2018).overlaps(bounds));
    }

    #[test]
    fn test_display_uses_ascii_separator() {
        assert_eq!(YearRange::new(2019, 2021).to_string(), "2019-2021");
    }

    #[test]
    fn test_options_from_tables() {
        let options = FilterOptions::from_tables(&sample_partners(), &sample_diseases()).unwrap();
        assert_eq!(options.countries, vec!["Kenya", "India", "Brazil"]);
        assert_eq!(
            options.diseases,
            vec!["Malaria", "Dengue", "Schistosomiasis"]
        );
        assert_eq!(options.years, Some(YearRange::new(2019, 2022)));
    }

    #[test]
    fn test_default_selection_selects_everything() {
        let options = FilterOptions::from_tables(&sample_partners(), &sample_diseases()).unwrap();
        let selection = options.default_selection();
        assert_eq!(selection.countries.len(), 3);
        assert_eq!(selection.diseases.len(), 3);
        assert_eq!(selection.years, YearRange::new(2019, 2022));
    }

    #[test]
    fn test_default_years_without_disease_rows() {
        let options = FilterOptions {
            countries: vec!["Kenya".into()],
            diseases: vec![],
            years: None,
        };
        assert_eq!(options.default_selection().years, YearRange::unbounded());
    }
}
