//! Roll sort modes.

use crate::model::gear::{compare_gear, Camera};
use crate::model::roll::Roll;
use crate::model::CameraId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollSortMode {
    /// Newest load date first; equal dates newest insert first.
    #[default]
    Date,
    /// Ascending roll name.
    Name,
    /// Ascending camera make/model; rolls without camera first.
    Camera,
}

impl RollSortMode {
    pub fn value(self) -> i32 {
        match self {
            Self::Date => 0,
            Self::Name => 1,
            Self::Camera => 2,
        }
    }

    /// Unknown values fall back to `Date`.
    pub fn from_value(value: i32) -> Self {
        match value {
            1 => Self::Name,
            2 => Self::Camera,
            _ => Self::Date,
        }
    }
}

/// Returns `rolls` in display order for `mode`.
pub fn sort_rolls(rolls: &[Roll], mode: RollSortMode, cameras: &[Camera]) -> Vec<Roll> {
    let camera_index: HashMap<CameraId, &Camera> =
        cameras.iter().map(|camera| (camera.id, camera)).collect();
    let mut sorted = rolls.to_vec();
    sorted.sort_by(|a, b| match mode {
        RollSortMode::Date => b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)),
        RollSortMode::Name => a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)),
        RollSortMode::Camera => {
            compare_cameras(a, b, &camera_index).then_with(|| a.id.cmp(&b.id))
        }
    });
    sorted
}

fn compare_cameras(a: &Roll, b: &Roll, cameras: &HashMap<CameraId, &Camera>) -> Ordering {
    let camera_a = a.camera_id.and_then(|id| cameras.get(&id));
    let camera_b = b.camera_id.and_then(|id| cameras.get(&id));
    match (camera_a, camera_b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => compare_gear(
            (x.make.as_str(), x.model.as_str(), x.id),
            (y.make.as_str(), y.model.as_str(), y.id),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{sort_rolls, RollSortMode};
    use crate::model::gear::Camera;
    use crate::model::roll::Roll;
    use chrono::NaiveDate;

    fn roll(id: i64, name: &str, day: u32, camera_id: Option<i64>) -> Roll {
        let date = NaiveDate::from_ymd_opt(2023, 8, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let mut roll = Roll::new(name, date);
        roll.id = id;
        roll.camera_id = camera_id;
        roll
    }

    #[test]
    fn each_mode_produces_expected_order() {
        let mut nikon = Camera::new("Nikon", "F3");
        nikon.id = 1;
        let mut canon = Camera::new("Canon", "A-1");
        canon.id = 2;
        let rolls = vec![
            roll(1, "Portra", 3, Some(1)),
            roll(2, "HP5", 9, None),
            roll(3, "Ektar", 9, Some(2)),
        ];
        let cameras = [nikon, canon];

        let ids = |mode| -> Vec<i64> {
            sort_rolls(&rolls, mode, &cameras)
                .iter()
                .map(|roll| roll.id)
                .collect()
        };
        assert_eq!(ids(RollSortMode::Date), vec![3, 2, 1]);
        assert_eq!(ids(RollSortMode::Name), vec![3, 2, 1]);
        assert_eq!(ids(RollSortMode::Camera), vec![2, 3, 1]);
    }
}
