//! Hover readout: from a pointer position to the highlighted sample.
//!
//! The pointer x coordinate is relative to the origin of the drawing area of a
//! panel (after the margins). Every panel owns its own [HoverState].

use log::debug;

use crate::config::{Series, TransformError};
use crate::panel::{LABEL_ABOVE_DY, LABEL_BELOW_DY};
use crate::scale::CoordinateMapper;

/// The sample index under the pointer, for `len` samples taken every month
/// from `first_month` on.
///
/// The pointer is turned into a fractional month, rounded to the nearest month,
/// offset so that `first_month` is index 0 and clamped to the last sample.
/// Returns `None` only when there is no sample at all.
pub fn resolve_index(
    mapper: &CoordinateMapper,
    pointer_x: f64,
    first_month: i32,
    len: usize,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let month = mapper.invert_x(pointer_x);
    // Saturating cast: NaN becomes 0 and infinities the extreme integers.
    let offset = (month - first_month as f64).round() as i64;
    let last = (len - 1) as i64;
    Some(offset.clamp(0, last) as usize)
}

/// The sample index of `series` under the pointer.
pub fn resolve_hover_index(
    mapper: &CoordinateMapper,
    pointer_x: f64,
    series: &Series,
) -> Option<usize> {
    let first = series.records.first()?;
    resolve_index(mapper, pointer_x, first.month, series.len())
}

/// Same as [resolve_hover_index], with a search on the months of the series.
///
/// Both agree on series that have one sample per month. This one also copes
/// with series that skip months.
pub fn resolve_hover_index_bisect(
    mapper: &CoordinateMapper,
    pointer_x: f64,
    series: &Series,
) -> Option<usize> {
    if series.is_empty() {
        return None;
    }
    let month = mapper.invert_x(pointer_x);
    let idx = series
        .records
        .partition_point(|r| (r.month as f64) < month);
    if idx == 0 {
        return Some(0);
    }
    if idx == series.len() {
        return Some(series.len() - 1);
    }
    let before = series.records[idx - 1].month as f64;
    let after = series.records[idx].month as f64;
    // Halfway between two samples goes to the later one.
    if month - before < after - month {
        Some(idx - 1)
    } else {
        Some(idx)
    }
}

/// Abstract pointer events, independent from any drawing surface.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum PointerEvent {
    Enter(f64),
    Move(f64),
    Leave,
}

/// What the panel has to redraw after an event.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum HoverChange {
    /// The marker appears at this index.
    Shown(usize),
    /// The marker moves to this index.
    Moved(usize),
    /// Nothing to redraw.
    Unchanged,
    /// The marker and its text disappear.
    Hidden,
}

#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering { pointer_x: f64, index: usize },
}

impl HoverState {
    pub fn new() -> HoverState {
        HoverState::Idle
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            HoverState::Idle => None,
            HoverState::Hovering { index, .. } => Some(*index),
        }
    }

    pub fn pointer_x(&self) -> Option<f64> {
        match self {
            HoverState::Idle => None,
            HoverState::Hovering { pointer_x, .. } => Some(*pointer_x),
        }
    }

    pub fn is_hovering(&self) -> bool {
        matches!(self, HoverState::Hovering { .. })
    }

    /// Applies a pointer event.
    ///
    /// The samples of the panel start at `first_month`; `sample_count` is the
    /// number of samples the index is clamped to.
    /// A move without a prior enter is treated as an enter.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        mapper: &CoordinateMapper,
        first_month: i32,
        sample_count: usize,
    ) -> HoverChange {
        let previous = *self;
        let change = match event {
            PointerEvent::Leave => {
                *self = HoverState::Idle;
                if previous.is_hovering() {
                    HoverChange::Hidden
                } else {
                    HoverChange::Unchanged
                }
            }
            PointerEvent::Enter(pointer_x) | PointerEvent::Move(pointer_x) => {
                match resolve_index(mapper, pointer_x, first_month, sample_count) {
                    None => {
                        *self = HoverState::Idle;
                        if previous.is_hovering() {
                            HoverChange::Hidden
                        } else {
                            HoverChange::Unchanged
                        }
                    }
                    Some(index) => {
                        *self = HoverState::Hovering { pointer_x, index };
                        match previous.index() {
                            Some(prev) if prev == index => HoverChange::Unchanged,
                            Some(_) => HoverChange::Moved(index),
                            None => HoverChange::Shown(index),
                        }
                    }
                }
            }
        };
        debug!(
            "HoverState::handle: {:?}: {:?} -> {:?} ({:?})",
            event, previous, self, change
        );
        change
    }
}

/// The hover marker of one series: a dot and the result as text.
#[derive(PartialEq, Debug, Clone)]
pub struct HoverMarker {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub label: String,
    /// Vertical offset of the label: above the point for the upper record of a pair.
    pub dy: f64,
}

pub fn hover_marker(
    mapper: &CoordinateMapper,
    series: &Series,
    index: usize,
) -> Result<HoverMarker, TransformError> {
    let r = series.sample(index)?;
    Ok(HoverMarker {
        index,
        x: mapper.map_x(r.month as f64),
        y: mapper.map_y(r.result as f64),
        label: format!("{}%", r.result),
        dy: if r.upper == Some(true) {
            LABEL_ABOVE_DY
        } else {
            LABEL_BELOW_DY
        },
    })
}
