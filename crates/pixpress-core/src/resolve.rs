use serde::{Deserialize, Serialize};

use crate::consts::MIN_DIMENSION;

/// Which dimension the user last edited. Passed explicitly by the caller;
/// never inferred from focus or input order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Width,
    Height,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Width => write!(f, "width"),
            Self::Height => write!(f, "height"),
        }
    }
}

/// A single edited dimension value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DimensionEdit {
    pub axis: Axis,
    pub value: u32,
}

impl DimensionEdit {
    pub fn width(value: u32) -> Self {
        Self { axis: Axis::Width, value }
    }

    pub fn height(value: u32) -> Self {
        Self { axis: Axis::Height, value }
    }
}

/// Resolve a dimension edit into a new `(width, height)` pair.
///
/// With `keep_ratio` the un-edited axis is recomputed from the *original*
/// aspect ratio, so repeated edits never drift. Without it only the edited
/// axis changes. Returns `None` when the edited value is zero; callers
/// treat that as "no change" so a transient invalid input never corrupts a
/// record's current dimensions.
pub fn resolve_dimensions(
    original: (u32, u32),
    current: (u32, u32),
    edit: DimensionEdit,
    keep_ratio: bool,
) -> Option<(u32, u32)> {
    if edit.value == 0 {
        return None;
    }

    if !keep_ratio {
        return Some(match edit.axis {
            Axis::Width => (edit.value, current.1),
            Axis::Height => (current.0, edit.value),
        });
    }

    let ratio = aspect_ratio(original);
    Some(match edit.axis {
        Axis::Width => {
            let height = (edit.value as f64 / ratio).round() as u32;
            (edit.value, height.max(MIN_DIMENSION))
        }
        Axis::Height => {
            let width = (edit.value as f64 * ratio).round() as u32;
            (width.max(MIN_DIMENSION), edit.value)
        }
    })
}

/// Proportionally scale an original size to a shared target width.
///
/// Used by bulk apply: each record's *own* ratio is applied against the one
/// shared width, so differently-shaped originals scale proportionally
/// instead of being stretched to a uniform pair.
pub fn scale_to_width(original: (u32, u32), target_width: u32) -> (u32, u32) {
    let height = (target_width as f64 / aspect_ratio(original)).round() as u32;
    (target_width.max(MIN_DIMENSION), height.max(MIN_DIMENSION))
}

fn aspect_ratio(original: (u32, u32)) -> f64 {
    // Source dimensions come from decoded image metadata and are positive;
    // clamp anyway so a degenerate record cannot divide by zero.
    original.0.max(1) as f64 / original.1.max(1) as f64
}
