//! Frame sort modes and the frame ordering function.

use super::exposure::{f_number, shutter_seconds};
use crate::model::frame::Frame;
use crate::model::gear::{compare_gear, Lens};
use crate::model::LensId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Frame attribute selecting display order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSortMode {
    /// Ascending frame number.
    #[default]
    FrameCount,
    /// Ascending capture date.
    Date,
    /// Ascending f-number; unparseable apertures last.
    FStop,
    /// Ascending exposure time; bulb and unknown values last.
    ShutterSpeed,
    /// Ascending lens make/model; frames without lens first.
    Lens,
}

impl FrameSortMode {
    /// Stable integer used for caller-side preference persistence.
    pub fn value(self) -> i32 {
        match self {
            Self::FrameCount => 0,
            Self::Date => 1,
            Self::FStop => 2,
            Self::ShutterSpeed => 3,
            Self::Lens => 4,
        }
    }

    /// Inverse of [`FrameSortMode::value`]; unknown values fall back to
    /// `FrameCount`.
    pub fn from_value(value: i32) -> Self {
        match value {
            1 => Self::Date,
            2 => Self::FStop,
            3 => Self::ShutterSpeed,
            4 => Self::Lens,
            _ => Self::FrameCount,
        }
    }
}

/// Returns `frames` in display order for `mode`.
///
/// `lenses` resolves `Frame::lens_id` for [`FrameSortMode::Lens`]; a frame
/// whose lens is missing from it is treated as having no lens. Equal keys
/// are ordered by ascending frame id.
pub fn sort_frames(frames: &[Frame], mode: FrameSortMode, lenses: &[Lens]) -> Vec<Frame> {
    let lens_index: HashMap<LensId, &Lens> = lenses.iter().map(|lens| (lens.id, lens)).collect();
    let mut sorted = frames.to_vec();
    sorted.sort_by(|a, b| compare_frames(a, b, mode, &lens_index).then_with(|| a.id.cmp(&b.id)));
    sorted
}

fn compare_frames(
    a: &Frame,
    b: &Frame,
    mode: FrameSortMode,
    lenses: &HashMap<LensId, &Lens>,
) -> Ordering {
    match mode {
        FrameSortMode::FrameCount => a.count.cmp(&b.count),
        FrameSortMode::Date => a.date.cmp(&b.date),
        FrameSortMode::FStop => compare_missing_last(f_number(&a.aperture), f_number(&b.aperture)),
        FrameSortMode::ShutterSpeed => {
            compare_missing_last(shutter_seconds(&a.shutter), shutter_seconds(&b.shutter))
        }
        FrameSortMode::Lens => {
            let lens_a = a.lens_id.and_then(|id| lenses.get(&id));
            let lens_b = b.lens_id.and_then(|id| lenses.get(&id));
            match (lens_a, lens_b) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(x), Some(y)) => compare_gear(
                    (x.make.as_str(), x.model.as_str(), x.id),
                    (y.make.as_str(), y.model.as_str(), y.id),
                ),
            }
        }
    }
}

fn compare_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
