use std::path::{Path, PathBuf};

use facs_smooth::{AppConfig, Channel, DatasetKind, FaceDataStore, ProcessParams, ProcessSummary};

use crate::color::ChannelColors;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// All processed datasets.
    pub store: FaceDataStore,

    /// Parameters for the next processing run (edited in the side panel).
    pub params: ProcessParams,

    /// CSV most recently opened.
    pub source: Option<PathBuf>,

    /// Totals from the last successful run.
    pub summary: Option<ProcessSummary>,

    /// Dataset shown in the channel list and plot.
    pub dataset: DatasetKind,

    /// Channel shown in the plot.
    pub channel: Option<String>,

    /// Colours for the channels of `dataset`.
    pub colors: Option<ChannelColors>,

    /// Draw maxima/minima markers.
    pub show_extrema: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let mut store = FaceDataStore::new();
        for kind in config.processing.datasets.kinds() {
            store.initialize(kind);
        }
        Self {
            store,
            params: config.processing.clone(),
            source: None,
            summary: None,
            dataset: DatasetKind::Facs,
            channel: None,
            colors: None,
            show_extrema: true,
            status_message: None,
        }
    }

    /// Process `path` with the current parameters.
    pub fn open(&mut self, path: PathBuf) {
        self.source = Some(path);
        self.reprocess();
    }

    /// Re-run processing on the current source file.
    pub fn reprocess(&mut self) {
        let Some(path) = self.source.clone() else {
            self.status_message = Some("No CSV file opened".to_string());
            return;
        };

        match self.store.process_file(&path, &self.params) {
            Ok(summary) => {
                log::info!(
                    "{}: {} frames accepted, {} rejected",
                    path.display(),
                    summary.ingest.accepted,
                    summary.ingest.rejected
                );
                if !self.params.datasets.contains(self.dataset) {
                    if let Some(first) = self.params.datasets.kinds().first() {
                        self.dataset = *first;
                    }
                }
                self.summary = Some(summary);
                self.status_message = None;
                self.refresh_channels();
            }
            Err(e) => {
                log::error!("Failed to process {}: {e}", path.display());
                self.summary = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Clear every dataset, keeping the channel layout.
    pub fn reset(&mut self) {
        self.store.reset_all();
        self.summary = None;
        self.status_message = None;
    }

    /// Switch the displayed dataset.
    pub fn set_dataset(&mut self, kind: DatasetKind) {
        self.dataset = kind;
        self.refresh_channels();
    }

    /// Rebuild colours and keep the selected channel if it still exists.
    fn refresh_channels(&mut self) {
        let Some(ds) = self.store.get(self.dataset) else {
            self.colors = None;
            self.channel = None;
            return;
        };
        let smoothed: Vec<&str> = ds
            .iter()
            .filter(|(_, c)| c.kind().is_smoothed())
            .map(|(name, _)| name)
            .collect();

        let keep = self
            .channel
            .as_deref()
            .is_some_and(|current| smoothed.contains(&current));
        if !keep {
            self.channel = smoothed.first().map(|s| s.to_string());
        }
        self.colors = Some(ChannelColors::new(&smoothed));
    }

    /// The selected channel and the frame numbers to plot it against.
    pub fn current_channel(&self) -> Option<(&str, &Channel, Option<&[f64]>)> {
        let ds = self.store.get(self.dataset)?;
        let name = self.channel.as_deref()?;
        let channel = ds.channel(name)?;
        let frames = ds
            .channel(facs_smooth::data::model::FRAME)
            .map(|f| f.values.as_slice())
            .filter(|f| f.len() == channel.values.len());
        Some((name, channel, frames))
    }

    /// Write the displayed dataset as JSON.
    pub fn export_json(&mut self, path: &Path) {
        let result = self
            .store
            .to_json(self.dataset)
            .map_err(anyhow::Error::from)
            .and_then(|json| std::fs::write(path, json).map_err(anyhow::Error::from));
        match result {
            Ok(()) => {
                log::info!("Exported {} to {}", self.dataset, path.display());
                self.status_message = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
