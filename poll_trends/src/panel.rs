//! The description of one panel, as consumed by a renderer.
//!
//! Nothing here draws. A [PanelView] lists where every element of a year's
//! small chart goes, in the pixel coordinates of its drawing area.

use log::{debug, warn};

use crate::config::{ChartLayout, GroupedStructure, Series, YearGroup};
use crate::hover::{hover_marker, resolve_hover_index, HoverMarker, HoverState};
use crate::scale::CoordinateMapper;

/// Vertical offset of a label drawn above its point.
pub const LABEL_ABOVE_DY: f64 = -10.0;
/// Vertical offset of a label drawn below its point.
pub const LABEL_BELOW_DY: f64 = 17.0;
/// Horizontal offset of the delta label, from the last point.
pub const RESULT_LABEL_DX: f64 = 5.0;
/// Distance between two legend lines.
pub const LEGEND_LINE_HEIGHT: f64 = 14.0;
pub const LEGEND_X: f64 = 5.0;
/// Appended to the legend of the first candidate of a panel.
pub const LEADER_MARK: &str = " ★";
/// Requested number of ticks on the y axis.
pub const Y_TICK_COUNT: usize = 4;

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// The dot on the last sample of a series, with the delta next to it.
#[derive(PartialEq, Debug, Clone)]
pub struct ResultMarker {
    pub x: f64,
    pub y: f64,
    /// `None` when the series is too short to have a delta.
    pub label: Option<String>,
    pub dx: f64,
    pub dy: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct LegendEntry {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct AxisTick {
    pub value: f64,
    pub y: f64,
    pub label: String,
}

/// The year, centered under the drawing area.
#[derive(PartialEq, Debug, Clone)]
pub struct Caption {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub dy: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct LineView {
    pub candidate: String,
    /// Style key, see [crate::party_class].
    pub party_class: Option<String>,
    pub points: Vec<Point>,
    pub result_marker: Option<ResultMarker>,
    pub legend: LegendEntry,
    pub hover: Option<HoverMarker>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct PanelView {
    pub year: String,
    pub outer_width: f64,
    pub outer_height: f64,
    /// Translation of the drawing area inside the panel.
    pub origin: Point,
    /// Size of the area that receives the pointer events. It covers the right margin.
    pub hit_width: f64,
    pub hit_height: f64,
    pub caption: Caption,
    pub y_ticks: Vec<AxisTick>,
    pub lines: Vec<LineView>,
}

impl PanelView {
    /// Lays out the panel of one year, without any hover marker.
    pub fn build(group: &YearGroup, mapper: &CoordinateMapper, layout: &ChartLayout) -> PanelView {
        let lines: Vec<LineView> = group
            .series
            .iter()
            .enumerate()
            .map(|(idx, s)| line_view(idx, s, mapper))
            .collect();

        let y_ticks = mapper
            .y
            .ticks(Y_TICK_COUNT)
            .into_iter()
            .map(|value| AxisTick {
                value,
                y: mapper.map_y(value),
                label: format!("{}%", value),
            })
            .collect();

        debug!(
            "PanelView::build: year {}: {} lines",
            group.year,
            lines.len()
        );

        PanelView {
            year: group.year.clone(),
            outer_width: layout.outer_width(),
            outer_height: layout.outer_height(),
            origin: Point {
                x: layout.margin.left,
                y: layout.margin.top,
            },
            hit_width: layout.width + layout.margin.right,
            hit_height: layout.height,
            caption: Caption {
                text: group.year.clone(),
                x: layout.width / 2.0,
                y: layout.height,
                dy: layout.margin.bottom / 2.0,
            },
            y_ticks,
            lines,
        }
    }

    /// Sets or clears the hover marker of every line, from the hover state of this panel.
    ///
    /// Each line resolves the pointer against its own samples.
    pub fn apply_hover(
        &mut self,
        group: &YearGroup,
        mapper: &CoordinateMapper,
        state: &HoverState,
    ) {
        for (line, s) in self.lines.iter_mut().zip(group.series.iter()) {
            line.hover = state.pointer_x().and_then(|pointer_x| {
                let index = resolve_hover_index(mapper, pointer_x, s)?;
                match hover_marker(mapper, s, index) {
                    Ok(marker) => Some(marker),
                    Err(e) => {
                        warn!("apply_hover: {}: {}", s.candidate, e);
                        None
                    }
                }
            });
        }
    }

    pub fn with_hover(
        mut self,
        group: &YearGroup,
        mapper: &CoordinateMapper,
        state: &HoverState,
    ) -> PanelView {
        self.apply_hover(group, mapper, state);
        self
    }
}

fn line_view(idx: usize, series: &Series, mapper: &CoordinateMapper) -> LineView {
    let points: Vec<Point> = series
        .records
        .iter()
        .map(|r| Point {
            x: mapper.map_x(r.month as f64),
            y: mapper.map_y(r.result as f64),
        })
        .collect();

    let result_marker = series.records.last().map(|last| {
        let label = match series.delta() {
            Ok(delta) => Some(delta.label()),
            Err(e) => {
                warn!("line_view: no delta label: {}", e);
                None
            }
        };
        ResultMarker {
            x: mapper.map_x(last.month as f64),
            y: mapper.map_y(last.result as f64),
            label,
            dx: RESULT_LABEL_DX,
            // The first candidate of a panel has its delta above the point.
            dy: if idx == 0 {
                LABEL_ABOVE_DY
            } else {
                LABEL_BELOW_DY
            },
        }
    });

    let legend_text = if idx == 0 {
        format!("{}{}", series.candidate, LEADER_MARK)
    } else {
        series.candidate.clone()
    };

    LineView {
        candidate: series.candidate.clone(),
        party_class: series.party_class(),
        points,
        result_marker,
        legend: LegendEntry {
            text: legend_text,
            x: LEGEND_X,
            y: idx as f64 * LEGEND_LINE_HEIGHT,
        },
        hover: None,
    }
}

/// Lays out the panels of all the years, in order.
pub fn build_panels(
    grouped: &GroupedStructure,
    layout: &ChartLayout,
) -> Vec<PanelView> {
    let mapper = CoordinateMapper::new(layout);
    grouped
        .years
        .iter()
        .map(|g| PanelView::build(g, &mapper, layout))
        .collect()
}
