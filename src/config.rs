//! Processing and logging configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::filter::validate_window;
use crate::data::model::DatasetKind;
use crate::error::ProcessResult;

/// Top-level configuration, loadable from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub processing: ProcessParams,
    pub logging: LoggingConfig,
}

/// Caller-supplied smoothing parameters and dataset selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessParams {
    /// Polynomial-fit window; positive and odd. Also the Gaussian sigma.
    pub window_size: usize,
    /// Fit degree; must be below `window_size`.
    pub polyorder: usize,
    pub datasets: DatasetSelection,
}

/// Which datasets a processing run populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSelection {
    pub facs: bool,
    pub landmarks_2d: bool,
    pub landmarks_3d: bool,
    pub rigid: bool,
    pub non_rigid: bool,
    pub eye_landmarks_2d: bool,
    pub eye_landmarks_3d: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter (e.g. "info", "facs_smooth=debug"); `RUST_LOG` wins.
    pub level: String,
    /// Prefix records with a timestamp.
    pub timestamps: bool,
}

impl Default for ProcessParams {
    fn default() -> Self {
        Self {
            window_size: 5,
            polyorder: 2,
            datasets: DatasetSelection::default(),
        }
    }
}

impl ProcessParams {
    pub fn new(window_size: usize, polyorder: usize, datasets: DatasetSelection) -> Self {
        Self {
            window_size,
            polyorder,
            datasets,
        }
    }

    pub fn validate(&self) -> ProcessResult<()> {
        validate_window(self.window_size, self.polyorder)
    }
}

impl Default for DatasetSelection {
    fn default() -> Self {
        Self {
            facs: true,
            landmarks_2d: true,
            landmarks_3d: true,
            rigid: false,
            non_rigid: false,
            eye_landmarks_2d: false,
            eye_landmarks_3d: false,
        }
    }
}

impl DatasetSelection {
    pub fn none() -> Self {
        Self::from_kinds(&[])
    }

    pub fn all() -> Self {
        Self::from_kinds(&DatasetKind::ALL)
    }

    pub fn from_kinds(kinds: &[DatasetKind]) -> Self {
        let mut sel = Self {
            facs: false,
            landmarks_2d: false,
            landmarks_3d: false,
            rigid: false,
            non_rigid: false,
            eye_landmarks_2d: false,
            eye_landmarks_3d: false,
        };
        for &kind in kinds {
            *sel.flag_mut(kind) = true;
        }
        sel
    }

    pub fn contains(&self, kind: DatasetKind) -> bool {
        match kind {
            DatasetKind::Facs => self.facs,
            DatasetKind::Landmarks2D => self.landmarks_2d,
            DatasetKind::Landmarks3D => self.landmarks_3d,
            DatasetKind::Rigid => self.rigid,
            DatasetKind::NonRigid => self.non_rigid,
            DatasetKind::EyeLandmarks2D => self.eye_landmarks_2d,
            DatasetKind::EyeLandmarks3D => self.eye_landmarks_3d,
        }
    }

    pub fn flag_mut(&mut self, kind: DatasetKind) -> &mut bool {
        match kind {
            DatasetKind::Facs => &mut self.facs,
            DatasetKind::Landmarks2D => &mut self.landmarks_2d,
            DatasetKind::Landmarks3D => &mut self.landmarks_3d,
            DatasetKind::Rigid => &mut self.rigid,
            DatasetKind::NonRigid => &mut self.non_rigid,
            DatasetKind::EyeLandmarks2D => &mut self.eye_landmarks_2d,
            DatasetKind::EyeLandmarks3D => &mut self.eye_landmarks_3d,
        }
    }

    /// Selected kinds in canonical order.
    pub fn kinds(&self) -> Vec<DatasetKind> {
        DatasetKind::ALL
            .into_iter()
            .filter(|&k| self.contains(k))
            .collect()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            timestamps: false,
        }
    }
}

impl AppConfig {
    /// Load config from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tracker_addon() {
        let params = ProcessParams::default();
        assert_eq!((params.window_size, params.polyorder), (5, 2));
        assert_eq!(
            params.datasets.kinds(),
            vec![DatasetKind::Facs, DatasetKind::Landmarks2D, DatasetKind::Landmarks3D]
        );
        assert!(params.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{"processing": {"window_size": 9, "datasets": {"rigid": true}}}"#).unwrap();
        assert_eq!(cfg.processing.window_size, 9);
        assert_eq!(cfg.processing.polyorder, 2);
        assert!(cfg.processing.datasets.rigid);
        assert!(cfg.processing.datasets.facs);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn selection_round_trips_kinds() {
        let kinds = [DatasetKind::Rigid, DatasetKind::EyeLandmarks3D];
        let sel = DatasetSelection::from_kinds(&kinds);
        assert_eq!(sel.kinds(), kinds.to_vec());
        assert!(DatasetSelection::none().kinds().is_empty());
        assert_eq!(DatasetSelection::all().kinds().len(), DatasetKind::ALL.len());
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("facs-smooth-config-{}", std::process::id()))
            .join("config.json");
        let cfg = AppConfig {
            processing: ProcessParams::new(9, 3, DatasetSelection::from_kinds(&[DatasetKind::NonRigid])),
            logging: LoggingConfig {
                timestamps: true,
                ..LoggingConfig::default()
            },
        };

        cfg.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();
        std::fs::remove_dir_all(path.parent().unwrap()).ok();

        assert_eq!(loaded.processing, cfg.processing);
        assert!(loaded.logging.timestamps);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let path = std::env::temp_dir().join("facs-smooth-no-such-config.json");
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn even_window_fails_validation() {
        let params = ProcessParams::new(4, 2, DatasetSelection::default());
        assert!(params.validate().is_err());
    }
}
