//! Configuration file handling.
//!
//! Settings come from an optional `ntd_dashboard.toml`; every field has a
//! default so an empty or missing file yields a working dashboard.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::schema::files;

pub const DEFAULT_CONFIG_FILE: &str = "ntd_dashboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Input file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_partners")]
    pub partners: PathBuf,

    #[serde(default = "default_diseases")]
    pub diseases: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            partners: default_partners(),
            diseases: default_diseases(),
        }
    }
}

fn default_partners() -> PathBuf {
    PathBuf::from(files::PARTNERS)
}

fn default_diseases() -> PathBuf {
    PathBuf::from(files::DISEASES)
}

/// Page and chart settings for the HTML dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_title")]
    pub title: String,

    /// Base map tiles for both maps.
    #[serde(default = "default_map_style")]
    pub map_style: String,

    #[serde(default = "default_map_zoom")]
    pub map_zoom: f64,

    /// Map height in pixels.
    #[serde(default = "default_map_height")]
    pub map_height: u32,

    /// Kernel radius of the disease density map, in pixels.
    #[serde(default = "default_density_radius")]
    pub density_radius: u32,

    /// `[lat, lon]` the disease map opens on.
    #[serde(default = "default_density_center")]
    pub density_center: [f64; 2],

    /// Where the page loads plotly.js from.
    #[serde(default = "default_plotly_src")]
    pub plotly_src: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            map_style: default_map_style(),
            map_zoom: default_map_zoom(),
            map_height: default_map_height(),
            density_radius: default_density_radius(),
            density_center: default_density_center(),
            plotly_src: default_plotly_src(),
        }
    }
}

fn default_title() -> String {
    "NTD Partners and Disease Occurrence Dashboard".to_string()
}

fn default_map_style() -> String {
    "open-street-map".to_string()
}

fn default_map_zoom() -> f64 {
    3.0
}

fn default_map_height() -> u32 {
    600
}

fn default_density_radius() -> u32 {
    10
}

fn default_density_center() -> [f64; 2] {
    [20.0, 80.0]
}

fn default_plotly_src() -> String {
    "https://cdn.plot.ly/plotly-2.35.2.min.js".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("ntd_dashboard.html")
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DashboardError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `ntd_dashboard.toml` from the working directory if it exists.
    pub fn load_default() -> Result<Option<Self>, DashboardError> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Ok(Some(Self::load(path)?))
        } else {
            Ok(None)
        }
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.render.density_radius == 0 {
            return Err(DashboardError::Config(
                "render.density_radius must be at least 1".to_string(),
            ));
        }
        if !(0.0..=22.0).contains(&self.render.map_zoom) {
            return Err(DashboardError::Config(
                "render.map_zoom must be between 0 and 22".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Config::default()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.partners, PathBuf::from("partners_data.csv"));
        assert_eq!(config.data.diseases, PathBuf::from("disease_data.csv"));
        assert_eq!(config.render.density_radius, 10);
        assert_eq!(config.render.density_center, [20.0, 80.0]);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[data]
partners = "data/partners.csv"

[render]
title = "Kenya NTD Overview"
map_zoom = 5.0
"#;
        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.data.partners, PathBuf::from("data/partners.csv"));
        assert_eq!(config.data.diseases, PathBuf::from("disease_data.csv"));
        assert_eq!(config.render.title, "Kenya NTD Overview");
        assert_eq!(config.render.map_zoom, 5.0);
        assert_eq!(config.render.map_height, 600);
    }

    #[test]
    fn test_default_toml_round_trips() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[data]"));
        assert!(toml_str.contains("[render]"));
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ntd_dashboard.toml");
        std::fs::write(&path, "[render]\ndensity_radius = 0\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ntd_dashboard.toml");
        std::fs::write(&path, "[render\n").unwrap();

        assert!(matches!(
            Config::load(&path).unwrap_err(),
            DashboardError::Toml(_)
        ));
    }
}
