use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_QUALITY, MIN_DIMENSION, QUALITY_MAX, QUALITY_MIN};
use crate::error::{PixpressError, Result};
use crate::record::{ImageRecord, OutputFormat};
use crate::resolve::{resolve_dimensions, scale_to_width, Axis, DimensionEdit};
use crate::store::RecordStore;

/// The shared control values: the template displayed on selection change
/// and applied wholesale by bulk apply. Not owned by any record.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SharedSettings {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default = "default_quality")]
    pub quality: u8,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub enhance: bool,
    #[serde(default = "default_true")]
    pub keep_ratio: bool,
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

fn default_true() -> bool {
    true
}

impl Default for SharedSettings {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            quality: DEFAULT_QUALITY,
            format: OutputFormat::default(),
            enhance: false,
            keep_ratio: true,
        }
    }
}

impl SharedSettings {
    /// Template values for displaying a selected record's settings.
    pub fn for_record(record: &ImageRecord) -> Self {
        Self {
            width: record.width(),
            height: record.height(),
            quality: record.quality(),
            format: record.format(),
            enhance: record.enhance(),
            keep_ratio: true,
        }
    }
}

/// A partial settings edit targeting the selected record. Absent fields are
/// left untouched; `keep_ratio` only affects dimension resolution.
#[derive(Clone, Copy, Debug, Default)]
pub struct SettingsDelta {
    pub dimension: Option<DimensionEdit>,
    pub quality: Option<u8>,
    pub format: Option<OutputFormat>,
    pub enhance: Option<bool>,
    pub keep_ratio: bool,
}

fn validate_quality(quality: u8) -> Result<()> {
    if (QUALITY_MIN..=QUALITY_MAX).contains(&quality) {
        Ok(())
    } else {
        Err(PixpressError::InvalidQuality(quality))
    }
}

/// Apply a settings delta to the selected record.
///
/// Returns `Ok(false)` when nothing is selected. The whole delta is
/// validated before any field is written, so a rejected edit leaves the
/// store untouched. Every applied field moves the record back to pending
/// and clears its previous result.
pub fn apply_to_selected(store: &mut RecordStore, delta: &SettingsDelta) -> Result<bool> {
    let Some(id) = store.selected_id() else {
        return Ok(false);
    };

    if let Some(quality) = delta.quality {
        validate_quality(quality)?;
    }

    let resolved = match delta.dimension {
        Some(edit) => {
            let record = match store.get(id) {
                Some(record) => record,
                None => return Ok(false),
            };
            let original = (record.source().width, record.source().height);
            let current = (record.width(), record.height());
            match resolve_dimensions(original, current, edit, delta.keep_ratio) {
                Some(pair) => Some(pair),
                None => {
                    return Err(PixpressError::InvalidDimension {
                        axis: edit.axis,
                        value: edit.value,
                    })
                }
            }
        }
        None => None,
    };

    let Some(record) = store.get_mut(id) else {
        return Ok(false);
    };
    if let Some((width, height)) = resolved {
        record.set_dimensions(width, height);
    }
    if let Some(quality) = delta.quality {
        record.set_quality(quality);
    }
    if let Some(format) = delta.format {
        record.set_format(format);
    }
    if let Some(enhance) = delta.enhance {
        record.set_enhance(enhance);
    }
    Ok(true)
}

/// Apply the shared settings to every record.
///
/// Both target dimensions and the quality must be valid up front or the
/// whole call is rejected; partial application is not permitted. With
/// `keep_ratio`, each record is scaled by its own original ratio against
/// the shared target width. Every record moves to pending with its result
/// cleared. Returns the number of records touched.
pub fn apply_to_all(store: &mut RecordStore, shared: &SharedSettings) -> Result<usize> {
    if shared.width < MIN_DIMENSION {
        return Err(PixpressError::InvalidDimension {
            axis: Axis::Width,
            value: shared.width,
        });
    }
    if shared.height < MIN_DIMENSION {
        return Err(PixpressError::InvalidDimension {
            axis: Axis::Height,
            value: shared.height,
        });
    }
    validate_quality(shared.quality)?;

    let mut touched = 0;
    for record in store.records_mut() {
        let (width, height) = if shared.keep_ratio {
            let original = (record.source().width, record.source().height);
            scale_to_width(original, shared.width)
        } else {
            (shared.width, shared.height)
        };
        record.set_dimensions(width, height);
        record.set_quality(shared.quality);
        record.set_format(shared.format);
        record.set_enhance(shared.enhance);
        touched += 1;
    }
    Ok(touched)
}
