use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use super::filter::{SmoothingFilter, Smoothed, POSE_POLYORDER, POSE_WINDOW};
use super::loader::{self, IngestReport};
use super::model::{ChannelKind, Dataset, DatasetKind};
use crate::config::ProcessParams;
use crate::error::{IngestError, ProcessError, ProcessResult};

/// Per-dataset totals after a processing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub kind: DatasetKind,
    pub channels: usize,
    pub samples: usize,
    pub maxima: usize,
    pub minima: usize,
}

/// Result of [`FaceDataStore::process_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessSummary {
    pub ingest: IngestReport,
    pub datasets: Vec<DatasetSummary>,
}

// ---------------------------------------------------------------------------
// FaceDataStore – owner of every dataset
// ---------------------------------------------------------------------------

/// Owns all datasets. Channels come into existence only through
/// [`initialize`](Self::initialize); consumers get shared references.
///
/// Not synchronised: callers must not reset a dataset while a processing
/// run on it is in flight.
#[derive(Debug, Clone, Default)]
pub struct FaceDataStore {
    datasets: BTreeMap<DatasetKind, Dataset>,
}

impl FaceDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the empty channels of `kind`. Already-initialised datasets
    /// are left untouched.
    pub fn initialize(&mut self, kind: DatasetKind) {
        self.datasets.entry(kind).or_insert_with(|| {
            log::debug!("initialising {kind} dataset");
            Dataset::new(kind)
        });
    }

    pub fn initialize_all(&mut self) {
        for kind in DatasetKind::ALL {
            self.initialize(kind);
        }
    }

    pub fn is_initialized(&self, kind: DatasetKind) -> bool {
        self.datasets.contains_key(&kind)
    }

    /// Truncate every channel of `kind`. No-op before `initialize`.
    pub fn reset(&mut self, kind: DatasetKind) {
        if let Some(ds) = self.datasets.get_mut(&kind) {
            ds.clear();
        }
    }

    pub fn reset_all(&mut self) {
        for ds in self.datasets.values_mut() {
            ds.clear();
        }
    }

    pub fn get(&self, kind: DatasetKind) -> Option<&Dataset> {
        self.datasets.get(&kind)
    }

    /// The primary action-unit / gaze / pose dataset.
    pub fn facs(&self) -> Option<&Dataset> {
        self.get(DatasetKind::Facs)
    }

    /// Initialised datasets in canonical order.
    pub fn datasets(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.values()
    }

    /// Ingest the CSV at `path` into the selected datasets, then smooth and
    /// extract extrema for every non-timeline channel.
    ///
    /// Parameters are validated before the file is opened. Every initialised
    /// dataset is then cleared, so nothing from an earlier file survives a
    /// run; if ingestion fails the selected datasets are left empty, if
    /// smoothing cannot run they keep their raw samples.
    pub fn process_file(&mut self, path: &Path, params: &ProcessParams) -> ProcessResult<ProcessSummary> {
        self.run(params, |targets| loader::ingest_path(path, targets))
    }

    /// [`process_file`](Self::process_file) over any reader.
    pub fn process_reader<R: Read>(&mut self, input: R, params: &ProcessParams) -> ProcessResult<ProcessSummary> {
        self.run(params, |targets| loader::ingest_reader(input, targets))
    }

    fn run<F>(&mut self, params: &ProcessParams, ingest: F) -> ProcessResult<ProcessSummary>
    where
        F: FnOnce(&mut [&mut Dataset]) -> Result<IngestReport, IngestError>,
    {
        params.validate()?;
        let kinds = params.datasets.kinds();
        if kinds.is_empty() {
            return Err(ProcessError::invalid_parameters("no dataset selected"));
        }

        let filters = FilterSet::new(params)?;

        self.reset_all();
        for &kind in &kinds {
            self.initialize(kind);
        }

        let ingested = {
            let mut targets: Vec<&mut Dataset> = self
                .datasets
                .iter_mut()
                .filter(|(kind, _)| params.datasets.contains(**kind))
                .map(|(_, ds)| ds)
                .collect();
            ingest(targets.as_mut_slice())
        };
        let report = match ingested {
            Ok(report) => report,
            Err(e) => {
                for &kind in &kinds {
                    self.reset(kind);
                }
                return Err(e.into());
            }
        };

        // Check every selected dataset before smoothing any of them.
        for ds in self.selected(params) {
            filters.check_samples(ds)?;
        }

        let mut summaries = Vec::with_capacity(kinds.len());
        for ds in self.selected_mut(params) {
            summaries.push(smooth_dataset(ds, &filters)?);
        }

        log::info!(
            "processed {} datasets over {} frames (window {}, polyorder {})",
            summaries.len(),
            report.accepted,
            params.window_size,
            params.polyorder
        );

        Ok(ProcessSummary {
            ingest: report,
            datasets: summaries,
        })
    }

    fn selected<'a>(&'a self, params: &'a ProcessParams) -> impl Iterator<Item = &'a Dataset> {
        self.datasets
            .iter()
            .filter(move |(kind, _)| params.datasets.contains(**kind))
            .map(|(_, ds)| ds)
    }

    fn selected_mut<'a>(&'a mut self, params: &'a ProcessParams) -> impl Iterator<Item = &'a mut Dataset> {
        self.datasets
            .iter_mut()
            .filter(move |(kind, _)| params.datasets.contains(**kind))
            .map(|(_, ds)| ds)
    }

    /// Pretty JSON of one dataset: `{channel: {values, maxima, minima}}` in
    /// column order, or `null` if it was never initialised.
    pub fn to_json(&self, kind: DatasetKind) -> ProcessResult<String> {
        Ok(serde_json::to_string_pretty(&self.get(kind))?)
    }

    /// JSON dump of the primary dataset.
    pub fn primary_json(&self) -> ProcessResult<String> {
        self.to_json(DatasetKind::Facs)
    }
}

// ---------------------------------------------------------------------------
// Smoothing pass
// ---------------------------------------------------------------------------

/// The two filters a run needs: caller parameters and the pose override.
struct FilterSet {
    base: SmoothingFilter,
    pose: SmoothingFilter,
}

impl FilterSet {
    fn new(params: &ProcessParams) -> ProcessResult<Self> {
        Ok(Self {
            base: SmoothingFilter::new(params.window_size, params.polyorder)?,
            pose: SmoothingFilter::for_channel(ChannelKind::Pose, params.window_size, params.polyorder)?,
        })
    }

    fn for_kind(&self, kind: ChannelKind) -> &SmoothingFilter {
        match kind {
            ChannelKind::Pose => &self.pose,
            _ => &self.base,
        }
    }

    fn check_samples(&self, ds: &Dataset) -> ProcessResult<()> {
        let available = ds.len();
        for (name, channel) in ds.iter().filter(|(_, c)| c.kind().is_smoothed()) {
            let required = self.for_kind(channel.kind()).min_samples();
            if available < required {
                log::error!(
                    "{} dataset: channel {name} needs {required} samples, have {available}",
                    ds.kind()
                );
                return Err(ProcessError::InsufficientSamples {
                    required,
                    available,
                });
            }
        }
        Ok(())
    }
}

/// Smooth every non-timeline channel of `ds`. All channels are computed
/// before any is written back.
fn smooth_dataset(ds: &mut Dataset, filters: &FilterSet) -> ProcessResult<DatasetSummary> {
    let mut results: Vec<(String, Smoothed)> = Vec::with_capacity(ds.channel_count());
    for (name, channel) in ds.iter().filter(|(_, c)| c.kind().is_smoothed()) {
        if channel.kind() == ChannelKind::Pose {
            log::debug!("{name}: fixed pose window {POSE_WINDOW}, polyorder {POSE_POLYORDER}");
        }
        let smoothed = filters.for_kind(channel.kind()).apply(&channel.values)?;
        results.push((name.to_string(), smoothed));
    }

    let mut summary = DatasetSummary {
        kind: ds.kind(),
        channels: results.len(),
        samples: ds.len(),
        maxima: 0,
        minima: 0,
    };
    for (name, smoothed) in results {
        summary.maxima += smoothed.maxima.len();
        summary.minima += smoothed.minima.len();
        if let Some(channel) = ds.channel_mut(&name) {
            channel.values = smoothed.values;
            channel.maxima = smoothed.maxima;
            channel.minima = smoothed.minima;
        }
    }

    log::debug!(
        "{} dataset: {} channels smoothed, {} maxima, {} minima",
        summary.kind,
        summary.channels,
        summary.maxima,
        summary.minima
    );
    Ok(summary)
}
