//! End-to-end tests: tracker CSV in, smoothed channels and extrema out.
//!
//! Tests cover:
//! - Known waveforms landing their extrema where the analytic peaks are
//! - Confidence filtering at the threshold
//! - Column and parameter errors and what they leave behind
//! - The fixed head-rotation window
//! - Reset followed by reprocessing

use std::path::PathBuf;

use facs_smooth::{
    smooth, DatasetKind, DatasetSelection, FaceDataStore, IngestError, ProcessError, ProcessParams,
};

/// Header for the given datasets: `confidence` plus every channel name,
/// with the shared timeline columns once.
fn header_for(kinds: &[DatasetKind], skip: &[&str]) -> Vec<String> {
    let mut header = vec!["confidence".to_string()];
    for kind in kinds {
        for (name, _) in kind.vocabulary() {
            if !header.contains(&name) && !skip.contains(&name.as_str()) {
                header.push(name);
            }
        }
    }
    header
}

/// Build a CSV with `rows` rows. `value(column, row)` supplies every channel;
/// `confidence(row)` the tracker confidence.
fn build_csv(
    header: &[String],
    rows: usize,
    confidence: impl Fn(usize) -> f64,
    value: impl Fn(&str, usize) -> f64,
) -> String {
    let mut csv = header.join(",");
    csv.push('\n');
    for i in 0..rows {
        let fields: Vec<String> = header
            .iter()
            .map(|name| match name.as_str() {
                "confidence" => format!("{}", confidence(i)),
                "frame" => format!("{}", i + 1),
                "timestamp" => format!("{}", i as f64 / 30.0),
                other => format!("{}", value(other, i)),
            })
            .collect();
        csv.push_str(&fields.join(","));
        csv.push('\n');
    }
    csv
}

fn sine(i: usize) -> f64 {
    (i as f64 / 10.0).sin() * 2.0
}

fn facs_only(window_size: usize, polyorder: usize) -> ProcessParams {
    ProcessParams::new(
        window_size,
        polyorder,
        DatasetSelection::from_kinds(&[DatasetKind::Facs]),
    )
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("facs-smooth-{}-{name}", std::process::id()))
}

/// Integer indices closest to `phase + 2πk` (scaled by 10) strictly inside `0..n`.
fn analytic_indices(phase: f64, n: usize) -> Vec<usize> {
    (0..)
        .map(|k| 10.0 * (phase + 2.0 * std::f64::consts::PI * k as f64))
        .take_while(|x| *x < (n - 1) as f64)
        .filter(|x| *x > 0.0)
        .map(|x| x.round() as usize)
        .collect()
}

#[test]
fn sine_extrema_land_on_analytic_peaks() {
    let header = header_for(&[DatasetKind::Facs], &[]);
    let csv = build_csv(&header, 100, |_| 0.95, |name, i| {
        if name == "AU04_r" {
            sine(i)
        } else {
            0.0
        }
    });

    let mut store = FaceDataStore::new();
    let summary = store.process_reader(csv.as_bytes(), &facs_only(5, 2)).unwrap();
    assert_eq!(summary.ingest.accepted, 100);
    assert_eq!(summary.ingest.rejected, 0);

    let au04 = store.facs().unwrap().channel("AU04_r").unwrap();
    assert_eq!(au04.values.len(), 100);
    assert_eq!(au04.maxima, vec![16, 79]);
    assert_eq!(au04.minima, vec![47]);

    let half_pi = std::f64::consts::FRAC_PI_2;
    assert_eq!(au04.maxima, analytic_indices(half_pi, 100));
    assert_eq!(au04.minima, analytic_indices(3.0 * half_pi, 100));

    // A flat channel has no turning points.
    let au01 = store.facs().unwrap().channel("AU01_r").unwrap();
    assert!(au01.maxima.is_empty());
    assert!(au01.minima.is_empty());
}

#[test]
fn channels_share_one_length_across_datasets() {
    let kinds = [DatasetKind::Facs, DatasetKind::Rigid, DatasetKind::Landmarks2D];
    let header = header_for(&kinds, &[]);
    let csv = build_csv(
        &header,
        40,
        |i| if i % 7 == 3 { 0.2 } else { 0.9 },
        |_, i| (i as f64 * 0.3).cos(),
    );

    let mut store = FaceDataStore::new();
    let params = ProcessParams::new(5, 2, DatasetSelection::from_kinds(&kinds));
    let summary = store.process_reader(csv.as_bytes(), &params).unwrap();

    let rejected = (0..40).filter(|i| i % 7 == 3).count();
    assert_eq!(summary.ingest.rejected, rejected);
    assert_eq!(summary.ingest.accepted, 40 - rejected);

    for kind in kinds {
        let ds = store.get(kind).unwrap();
        assert_eq!(ds.len(), 40 - rejected);
        for (name, channel) in ds.iter() {
            assert_eq!(channel.values.len(), 40 - rejected, "{kind}: {name}");
        }
    }
    assert!(!store.is_initialized(DatasetKind::NonRigid));
}

#[test]
fn deselected_datasets_are_cleared_on_the_next_run() {
    let kinds = [DatasetKind::Facs, DatasetKind::Rigid];
    let header = header_for(&kinds, &[]);
    let csv = build_csv(&header, 30, |_| 0.9, |_, i| sine(i));

    let mut store = FaceDataStore::new();
    let both = ProcessParams::new(5, 2, DatasetSelection::from_kinds(&kinds));
    store.process_reader(csv.as_bytes(), &both).unwrap();
    assert_eq!(store.get(DatasetKind::Rigid).unwrap().len(), 30);

    let shorter = build_csv(&header, 20, |_| 0.9, |_, i| sine(i));
    store.process_reader(shorter.as_bytes(), &facs_only(5, 2)).unwrap();
    assert_eq!(store.facs().unwrap().len(), 20);

    let rigid = store.get(DatasetKind::Rigid).unwrap();
    assert!(rigid.is_empty());
    assert!(rigid.iter().all(|(_, c)| c.values.is_empty() && c.maxima.is_empty()));
}

#[test]
fn confidence_threshold_is_inclusive() {
    let header = header_for(&[DatasetKind::Rigid], &[]);
    let confidences = [0.9, 0.69, 0.7, 0.71, 0.1, 0.7, 0.95, 0.8, 0.75, 0.699];
    let csv = build_csv(&header, confidences.len(), |i| confidences[i], |_, i| i as f64);

    let mut store = FaceDataStore::new();
    let params = ProcessParams::new(3, 1, DatasetSelection::from_kinds(&[DatasetKind::Rigid]));
    let summary = store.process_reader(csv.as_bytes(), &params).unwrap();

    assert_eq!(summary.ingest.accepted, 7);
    assert_eq!(summary.ingest.rejected, 3);

    let frames = &store.get(DatasetKind::Rigid).unwrap().channel("frame").unwrap().values;
    assert_eq!(frames, &vec![1.0, 3.0, 4.0, 6.0, 7.0, 8.0, 9.0]);
}

#[test]
fn missing_pose_columns_fail_only_when_facs_is_requested() {
    let kinds = [DatasetKind::Facs, DatasetKind::Rigid];
    let header = header_for(&kinds, &["pose_Rx", "pose_Ry", "pose_Rz"]);
    let csv = build_csv(&header, 30, |_| 0.9, |_, i| sine(i));

    let mut store = FaceDataStore::new();
    let err = store.process_reader(csv.as_bytes(), &facs_only(5, 2)).unwrap_err();
    match err {
        ProcessError::Ingest(IngestError::MissingColumn(column)) => assert_eq!(column, "pose_Rx"),
        other => panic!("expected missing pose_Rx, got {other:?}"),
    }
    assert!(store.facs().unwrap().is_empty());

    let rigid_only = ProcessParams::new(5, 2, DatasetSelection::from_kinds(&[DatasetKind::Rigid]));
    let summary = store.process_reader(csv.as_bytes(), &rigid_only).unwrap();
    assert_eq!(summary.ingest.accepted, 30);
    assert_eq!(store.get(DatasetKind::Rigid).unwrap().len(), 30);
}

#[test]
fn invalid_window_is_rejected_before_reading() {
    let mut store = FaceDataStore::new();
    let missing = temp_path("never-written.csv");

    let err = store.process_file(&missing, &facs_only(4, 2)).unwrap_err();
    assert!(matches!(err, ProcessError::InvalidParameters(_)), "{err:?}");

    let err = store.process_file(&missing, &facs_only(5, 5)).unwrap_err();
    assert!(matches!(err, ProcessError::InvalidParameters(_)), "{err:?}");

    // Nothing was touched.
    assert!(!store.is_initialized(DatasetKind::Facs));
}

#[test]
fn missing_file_is_reported() {
    let mut store = FaceDataStore::new();
    let missing = temp_path("absent.csv");

    let err = store.process_file(&missing, &facs_only(5, 2)).unwrap_err();
    match err {
        ProcessError::Ingest(IngestError::NotFound(path)) => assert_eq!(path, missing),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn process_file_reads_from_disk() {
    let header = header_for(&[DatasetKind::Facs], &[]);
    let csv = build_csv(&header, 60, |_| 0.9, |_, i| sine(i));
    let path = temp_path("disk.csv");
    std::fs::write(&path, &csv).unwrap();

    let mut from_disk = FaceDataStore::new();
    let mut from_memory = FaceDataStore::new();
    let a = from_disk.process_file(&path, &facs_only(7, 3));
    let b = from_memory.process_reader(csv.as_bytes(), &facs_only(7, 3));
    std::fs::remove_file(&path).ok();

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(from_disk.primary_json().unwrap(), from_memory.primary_json().unwrap());
}

#[test]
fn head_rotation_uses_fixed_window() {
    let header = header_for(&[DatasetKind::Facs], &[]);
    let csv = build_csv(&header, 100, |_| 0.9, |_, i| sine(i));
    let raw: Vec<f64> = (0..100).map(sine).collect();

    for (w, p) in [(5, 2), (7, 3), (3, 0)] {
        let mut store = FaceDataStore::new();
        store.process_reader(csv.as_bytes(), &facs_only(w, p)).unwrap();
        let facs = store.facs().unwrap();

        let expected_pose = smooth(&raw, 11, 5).unwrap();
        for name in ["pose_Rx", "pose_Ry", "pose_Rz"] {
            let channel = facs.channel(name).unwrap();
            assert_eq!(channel.values, expected_pose.values, "{name} at ({w}, {p})");
            assert_eq!(channel.maxima, expected_pose.maxima);
            assert_eq!(channel.minima, expected_pose.minima);
        }

        let expected_au = smooth(&raw, w, p).unwrap();
        let au01 = facs.channel("AU01_r").unwrap();
        assert_eq!(au01.values, expected_au.values);
        assert_eq!(au01.maxima, expected_au.maxima);
    }

    // The fixed window moves the first peak on this waveform.
    let base = smooth(&raw, 5, 2).unwrap();
    let pose = smooth(&raw, 11, 5).unwrap();
    assert_eq!(base.maxima, vec![16, 79]);
    assert_eq!(pose.maxima, vec![12, 79]);
    assert_eq!(pose.minima, vec![47]);
}

#[test]
fn too_few_rows_for_the_pose_window() {
    let header = header_for(&[DatasetKind::Facs], &[]);
    let csv = build_csv(&header, 8, |_| 0.9, |_, i| i as f64);

    let mut store = FaceDataStore::new();
    let err = store.process_reader(csv.as_bytes(), &facs_only(5, 2)).unwrap_err();
    match err {
        ProcessError::InsufficientSamples {
            required,
            available,
        } => assert_eq!((required, available), (11, 8)),
        other => panic!("expected InsufficientSamples, got {other:?}"),
    }

    // Raw samples stay in place, without extrema.
    let au01 = store.facs().unwrap().channel("AU01_r").unwrap();
    assert_eq!(au01.values, (0..8).map(|i| i as f64).collect::<Vec<_>>());
    assert!(au01.maxima.is_empty());
}

#[test]
fn reset_then_reprocess_is_reproducible() {
    let header = header_for(&[DatasetKind::Facs, DatasetKind::Landmarks3D], &[]);
    let csv = build_csv(&header, 50, |i| 0.6 + (i % 5) as f64 * 0.1, |name, i| {
        sine(i) + name.len() as f64 * 0.01 * (i as f64).cos()
    });
    let params = ProcessParams::new(
        9,
        4,
        DatasetSelection::from_kinds(&[DatasetKind::Facs, DatasetKind::Landmarks3D]),
    );

    let mut store = FaceDataStore::new();
    // Reset before anything exists is a no-op.
    store.reset_all();
    store.reset(DatasetKind::Facs);
    assert!(!store.is_initialized(DatasetKind::Facs));

    store.process_reader(csv.as_bytes(), &params).unwrap();
    let first = store.clone();
    let channels = store.facs().unwrap().channel_count();

    store.reset_all();
    let facs = store.facs().unwrap();
    assert!(facs.is_empty());
    assert_eq!(facs.channel_count(), channels);
    assert!(facs.iter().all(|(_, c)| c.values.is_empty() && c.maxima.is_empty()));

    store.process_reader(csv.as_bytes(), &params).unwrap();
    for kind in [DatasetKind::Facs, DatasetKind::Landmarks3D] {
        let before = first.get(kind).unwrap();
        let after = store.get(kind).unwrap();
        for ((name, a), (_, b)) in before.iter().zip(after.iter()) {
            let bits = |c: &facs_smooth::Channel| c.values.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
            assert_eq!(bits(a), bits(b), "{name}");
            assert_eq!(a.maxima, b.maxima);
            assert_eq!(a.minima, b.minima);
        }
    }
}

#[test]
fn json_dump_lists_channels_in_column_order() {
    let header = header_for(&[DatasetKind::Facs], &[]);
    let csv = build_csv(&header, 100, |_| 0.9, |name, i| {
        if name == "AU04_r" {
            sine(i)
        } else {
            1.0
        }
    });

    let mut store = FaceDataStore::new();
    assert_eq!(store.primary_json().unwrap(), "null");
    store.process_reader(csv.as_bytes(), &facs_only(5, 2)).unwrap();

    let json: serde_json::Value = serde_json::from_str(&store.primary_json().unwrap()).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), DatasetKind::Facs.vocabulary().len());
    assert_eq!(json["AU04_r"]["maxima"], serde_json::json!([16, 79]));
    assert_eq!(json["AU04_r"]["minima"], serde_json::json!([47]));
    assert_eq!(json["frame"]["values"][0], serde_json::json!(1.0));
    assert_eq!(json["frame"]["maxima"], serde_json::json!([]));
}
