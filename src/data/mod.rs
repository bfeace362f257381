/// Data layer: channel store, ingestion, smoothing and extrema.
///
/// Pipeline for one processing run:
/// ```text
///   tracker .csv ──► loader ──► Dataset (raw) ──► filter ──► extrema
///                      │                            │           │
///             confidence < 0.7             savgol → gaussian    │
///               rows dropped                                    ▼
///                                     store: Channel { values, maxima, minima }
/// ```

pub mod extrema;
pub mod filter;
pub mod loader;
pub mod model;
pub mod store;
