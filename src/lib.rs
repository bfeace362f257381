//! Smoothing and keyframe extrema extraction for facial tracking data.
//!
//! A tracker CSV (one row per video frame) is read into named datasets of
//! channels, rows below the confidence threshold are dropped, and every
//! measurement channel is smoothed and annotated with its local maxima and
//! minima. An animation driver places keyframes at those indices.
//!
//! ```no_run
//! use facs_smooth::{FaceDataStore, ProcessParams};
//!
//! let mut store = FaceDataStore::new();
//! store.process_file("openface.csv".as_ref(), &ProcessParams::default())?;
//! let au04 = store.facs().and_then(|ds| ds.channel("AU04_r"));
//! # Ok::<(), facs_smooth::ProcessError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod logging;

pub use config::{AppConfig, DatasetSelection, LoggingConfig, ProcessParams};
pub use data::filter::{smooth, Smoothed, SmoothingFilter};
pub use data::model::{Channel, ChannelKind, Dataset, DatasetKind};
pub use data::store::{DatasetSummary, FaceDataStore, ProcessSummary};
pub use error::{IngestError, ProcessError, ProcessResult};
