use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

/// Landmark points tracked per face (0-67).
pub const LANDMARK_POINTS: usize = 68;
/// Landmark points tracked around both eyes (0-55).
pub const EYE_LANDMARK_POINTS: usize = 56;
/// Non-rigid shape parameters of the point-distribution model.
pub const NON_RIGID_PARAMS: usize = 34;

/// Reserved channel names, present in every dataset and never smoothed.
pub const FRAME: &str = "frame";
pub const TIMESTAMP: &str = "timestamp";

const ACTION_UNITS: [&str; 17] = [
    "AU01_r", "AU02_r", "AU04_r", "AU05_r", "AU06_r", "AU07_r", "AU09_r", "AU10_r", "AU12_r",
    "AU14_r", "AU15_r", "AU17_r", "AU20_r", "AU23_r", "AU25_r", "AU26_r", "AU45_r",
];
const GAZE: [&str; 2] = ["gaze_angle_x", "gaze_angle_y"];
const POSE: [&str; 3] = ["pose_Rx", "pose_Ry", "pose_Rz"];
const RIGID: [&str; 6] = ["p_scale", "p_rx", "p_ry", "p_rz", "p_tx", "p_ty"];

// ---------------------------------------------------------------------------
// ChannelKind – per-channel classification fixed at creation time
// ---------------------------------------------------------------------------

/// What a channel measures. Decides how it is smoothed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    /// `frame` / `timestamp`: passed through raw.
    Timeline,
    ActionUnit,
    Gaze,
    /// Head rotation; smoothed with the fixed pose window.
    Pose,
    Landmark2D,
    Landmark3D,
    Rigid,
    NonRigid,
}

impl ChannelKind {
    /// Whether the smoothing/extrema pass applies to this channel.
    pub fn is_smoothed(self) -> bool {
        self != ChannelKind::Timeline
    }
}

// ---------------------------------------------------------------------------
// Channel – one named time series
// ---------------------------------------------------------------------------

/// One time series: samples plus the extrema found after smoothing.
#[derive(Debug, Clone)]
pub struct Channel {
    kind: ChannelKind,
    /// Raw samples until smoothing, smoothed samples afterwards.
    pub values: Vec<f64>,
    /// Frame indices of local peaks in `values`.
    pub maxima: Vec<usize>,
    /// Frame indices of local troughs in `values`.
    pub minima: Vec<usize>,
}

impl Channel {
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            values: Vec::new(),
            maxima: Vec::new(),
            minima: Vec::new(),
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    /// Truncate all three sequences, keeping their allocations.
    pub fn clear(&mut self) {
        self.values.clear();
        self.maxima.clear();
        self.minima.clear();
    }
}

impl Serialize for Channel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Channel", 3)?;
        s.serialize_field("values", &self.values)?;
        s.serialize_field("maxima", &self.maxima)?;
        s.serialize_field("minima", &self.minima)?;
        s.end()
    }
}

// ---------------------------------------------------------------------------
// DatasetKind – the named datasets and their vocabularies
// ---------------------------------------------------------------------------

/// The named datasets a tracker CSV can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    /// Action units, gaze angles and head rotation.
    Facs,
    Landmarks2D,
    Landmarks3D,
    Rigid,
    NonRigid,
    EyeLandmarks2D,
    EyeLandmarks3D,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 7] = [
        DatasetKind::Facs,
        DatasetKind::Landmarks2D,
        DatasetKind::Landmarks3D,
        DatasetKind::Rigid,
        DatasetKind::NonRigid,
        DatasetKind::EyeLandmarks2D,
        DatasetKind::EyeLandmarks3D,
    ];

    /// Every channel of this dataset, in column order, with its classification.
    pub fn vocabulary(self) -> Vec<(String, ChannelKind)> {
        let mut names = vec![
            (FRAME.to_string(), ChannelKind::Timeline),
            (TIMESTAMP.to_string(), ChannelKind::Timeline),
        ];
        match self {
            DatasetKind::Facs => {
                push_fixed(&mut names, &ACTION_UNITS, ChannelKind::ActionUnit);
                push_fixed(&mut names, &GAZE, ChannelKind::Gaze);
                push_fixed(&mut names, &POSE, ChannelKind::Pose);
            }
            DatasetKind::Landmarks2D => {
                push_grid(&mut names, &["x_", "y_"], LANDMARK_POINTS, ChannelKind::Landmark2D);
            }
            DatasetKind::Landmarks3D => {
                push_grid(&mut names, &["X_", "Y_", "Z_"], LANDMARK_POINTS, ChannelKind::Landmark3D);
            }
            DatasetKind::Rigid => push_fixed(&mut names, &RIGID, ChannelKind::Rigid),
            DatasetKind::NonRigid => {
                push_grid(&mut names, &["p_"], NON_RIGID_PARAMS, ChannelKind::NonRigid);
            }
            DatasetKind::EyeLandmarks2D => push_grid(
                &mut names,
                &["eye_lmk_x_", "eye_lmk_y_"],
                EYE_LANDMARK_POINTS,
                ChannelKind::Landmark2D,
            ),
            DatasetKind::EyeLandmarks3D => push_grid(
                &mut names,
                &["eye_lmk_X_", "eye_lmk_Y_", "eye_lmk_Z_"],
                EYE_LANDMARK_POINTS,
                ChannelKind::Landmark3D,
            ),
        }
        names
    }

    pub fn label(self) -> &'static str {
        match self {
            DatasetKind::Facs => "Action units / gaze / pose",
            DatasetKind::Landmarks2D => "2D landmarks",
            DatasetKind::Landmarks3D => "3D landmarks",
            DatasetKind::Rigid => "Rigid parameters",
            DatasetKind::NonRigid => "Non-rigid parameters",
            DatasetKind::EyeLandmarks2D => "2D eye landmarks",
            DatasetKind::EyeLandmarks3D => "3D eye landmarks",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn push_fixed(out: &mut Vec<(String, ChannelKind)>, names: &[&str], kind: ChannelKind) {
    out.extend(names.iter().map(|n| (n.to_string(), kind)));
}

/// `prefix_0 .. prefix_{count-1}` for each prefix in turn.
fn push_grid(out: &mut Vec<(String, ChannelKind)>, prefixes: &[&str], count: usize, kind: ChannelKind) {
    for prefix in prefixes {
        out.extend((0..count).map(|i| (format!("{prefix}{i}"), kind)));
    }
}

// ---------------------------------------------------------------------------
// Dataset – a fixed set of named channels
// ---------------------------------------------------------------------------

/// A named collection of channels. The channel set is fixed at construction;
/// only channel contents change afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    kind: DatasetKind,
    /// Channel names in column order.
    order: Vec<String>,
    channels: BTreeMap<String, Channel>,
}

impl Dataset {
    /// Allocate every channel of `kind`'s vocabulary, all empty.
    pub fn new(kind: DatasetKind) -> Self {
        let vocabulary = kind.vocabulary();
        let order = vocabulary.iter().map(|(name, _)| name.clone()).collect();
        let channels = vocabulary
            .into_iter()
            .map(|(name, ck)| (name, Channel::new(ck)))
            .collect();
        Dataset {
            kind,
            order,
            channels,
        }
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }

    pub(crate) fn channel_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.get_mut(name)
    }

    /// Channel names in column order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Channels in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Channel)> {
        self.order
            .iter()
            .filter_map(|name| self.channels.get(name).map(|c| (name.as_str(), c)))
    }

    /// Number of samples held (every channel has the same count).
    pub fn len(&self) -> usize {
        self.channels
            .get(FRAME)
            .map(|c| c.values.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel_count(&self) -> usize {
        self.order.len()
    }

    /// Truncate every channel.
    pub fn clear(&mut self) {
        for channel in self.channels.values_mut() {
            channel.clear();
        }
    }
}

impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (name, channel) in self.iter() {
            map.serialize_entry(name, channel)?;
        }
        map.end()
    }
}
