//! Linear mapping between data values and pixels.

use crate::config::ChartLayout;

/// A linear interpolation from a domain onto a range.
///
/// Nothing is clamped or rounded: values outside the domain map outside the range.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> LinearScale {
        LinearScale { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 {
            // Degenerate domain: everything sits at the start of the range.
            return r0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        if span == 0.0 {
            return d0;
        }
        d0 + (pixel - r0) / span * (d1 - d0)
    }

    /// Round tick values over the domain, for about `count` ticks.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}

/// The two scales shared by all the panels of a chart.
///
/// x: month -> horizontal pixel, from 0 to the width of the drawing area.
/// y: percentage -> vertical pixel. The range is inverted (height to 0) because
/// higher values are drawn higher on screen.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct CoordinateMapper {
    pub x: LinearScale,
    pub y: LinearScale,
}

impl CoordinateMapper {
    pub fn new(layout: &ChartLayout) -> CoordinateMapper {
        CoordinateMapper {
            x: LinearScale::new(layout.month_domain, (0.0, layout.width)),
            y: LinearScale::new(layout.percent_domain, (layout.height, 0.0)),
        }
    }

    pub fn map_x(&self, month: f64) -> f64 {
        self.x.map(month)
    }

    pub fn map_y(&self, percentage: f64) -> f64 {
        self.y.map(percentage)
    }

    /// The fractional month under a horizontal pixel position.
    pub fn invert_x(&self, pixel: f64) -> f64 {
        self.x.invert(pixel)
    }
}

const MAX_EXACT: f64 = 9007199254740992.0;
const MAX_TICKS: i64 = 10_000;

/// Tick positions between `start` and `stop` with a step of 1, 2 or 5 times a power of ten.
///
/// The step is chosen so that the number of ticks is close to `count`.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let (lo, hi) = if start <= stop {
        (start, stop)
    } else {
        (stop, start)
    };
    let span = hi - lo;
    if count == 0 || !span.is_finite() || span <= 0.0 {
        return Vec::new();
    }

    let m = count as f64;
    let mut step = 10f64.powf((span / m).log10().floor());
    let err = m / span * step;
    if err <= 0.15 {
        step *= 10.0;
    } else if err <= 0.35 {
        step *= 5.0;
    } else if err <= 0.75 {
        step *= 2.0;
    }

    let first = (lo / step).ceil();
    let last = (hi / step).floor();
    // Beyond 2^53 consecutive multiples of the step are not representable.
    if !(first.abs() <= MAX_EXACT && last.abs() <= MAX_EXACT) {
        return Vec::new();
    }
    let n = (last - first) as i64;
    if n < 0 || n > MAX_TICKS {
        return Vec::new();
    }
    (0..=n).map(|i| (first + i as f64) * step).collect()
}
