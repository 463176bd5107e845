// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A poll observation as delivered by a reader, before any coercion.
///
/// All the fields are kept as text. The numeric ones are coerced exactly once,
/// when the records enter the transformation.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct RawRecord {
    pub year: String,
    pub candidate: String,
    pub party: String,
    pub month: String,
    pub result: String,
}

impl RawRecord {
    pub fn new(year: &str, candidate: &str, party: &str, month: &str, result: &str) -> RawRecord {
        RawRecord {
            year: year.to_string(),
            candidate: candidate.to_string(),
            party: party.to_string(),
            month: month.to_string(),
            result: result.to_string(),
        }
    }
}

/// A coerced poll observation.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Record {
    /// Opaque grouping key. It is never interpreted as a number.
    pub year: String,
    pub candidate: String,
    pub party: String,
    /// The ordinal sampling period within the year.
    pub month: i32,
    /// The result, in percent.
    pub result: i32,
    /// Whether the label of this point goes above the point.
    /// `None` when no comparison was applied to this record.
    pub upper: Option<bool>,
}

// ******** Output data structures *********

/// The chronological results of one candidate in one year.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Series {
    pub candidate: String,
    // Sorted by month, stable with respect to the input order.
    pub records: Vec<Record>,
}

/// All the series of one year, in the order the candidates were first seen.
///
/// This is the content of one panel.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct YearGroup {
    pub year: String,
    pub series: Vec<Series>,
}

/// The grouped structure: year -> candidate -> series.
///
/// Both levels keep the first-seen order of the input.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct GroupedStructure {
    pub years: Vec<YearGroup>,
}

/// The difference between the last two results of a series.
#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
pub struct Delta(pub i32);

impl Delta {
    /// The text of the label drawn next to the last point, for example `+5%`.
    pub fn label(&self) -> String {
        format!("{}%", self)
    }
}

impl Display for Delta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 > 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ********* Configuration **********

/// What to do with records that cannot be put in a comparison pair.
///
/// Records are expected to come in pairs: two parties polled for the same
/// year and month, one after the other.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum PairingPolicy {
    /// An odd number of records, or a pair spanning two different periods, fails
    /// the transformation.
    Reject,
    /// The records that cannot be paired get no upper flag.
    SkipUnpaired,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TransformRules {
    pub pairing: PairingPolicy,
    /// If false, no pairwise comparison is run and no record gets an upper flag.
    pub compute_upper: bool,
}

impl TransformRules {
    pub const DEFAULT_RULES: TransformRules = TransformRules {
        pairing: PairingPolicy::Reject,
        compute_upper: true,
    };
}

impl Default for TransformRules {
    fn default() -> Self {
        TransformRules::DEFAULT_RULES
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// The geometry shared by all the panels of one chart.
///
/// It is built once and passed by reference to everything that maps or lays out points.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ChartLayout {
    /// Width of the drawing area, without the margins.
    pub width: f64,
    /// Height of the drawing area, without the margins.
    pub height: f64,
    pub margin: Margin,
    /// First and last month shown on the x axis.
    pub month_domain: (f64, f64),
    /// Lowest and highest percentage shown on the y axis.
    pub percent_domain: (f64, f64),
}

impl ChartLayout {
    pub const DEFAULT_LAYOUT: ChartLayout = ChartLayout {
        width: 150.0,
        height: 120.0,
        margin: Margin {
            top: 20.0,
            right: 30.0,
            bottom: 20.0,
            left: 40.0,
        },
        month_domain: (1.0, 5.0),
        percent_domain: (0.0, 100.0),
    };

    pub fn outer_width(&self) -> f64 {
        self.width + self.margin.left + self.margin.right
    }

    pub fn outer_height(&self) -> f64 {
        self.height + self.margin.top + self.margin.bottom
    }
}

impl Default for ChartLayout {
    fn default() -> Self {
        ChartLayout::DEFAULT_LAYOUT
    }
}

// ********* Errors **********

/// The numeric fields of a record.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Field {
    Month,
    Result,
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Month => write!(f, "month"),
            Field::Result => write!(f, "result"),
        }
    }
}

/// Errors raised by the transformation and the lookups on its output.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TransformError {
    /// A numeric field is not an integer. `index` is the position of the record in the input.
    Parse {
        index: usize,
        field: Field,
        value: String,
    },
    /// The record at `index` has no partner for the upper flag comparison.
    Pairing { index: usize, len: usize },
    /// The series does not have enough samples for the requested value.
    InsufficientData { candidate: String, samples: usize },
    /// A sample index outside the series.
    IndexOutOfRange { index: usize, len: usize },
}

impl Error for TransformError {}

impl Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformError::Parse {
                index,
                field,
                value,
            } => write!(
                f,
                "record {}: field {} is not an integer: {:?}",
                index, field, value
            ),
            TransformError::Pairing { index, len } => write!(
                f,
                "record {} (out of {}) cannot be paired with the next record",
                index, len
            ),
            TransformError::InsufficientData { candidate, samples } => write!(
                f,
                "series {:?} has {} sample(s), at least 2 are required",
                candidate, samples
            ),
            TransformError::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for a series of {}", index, len)
            }
        }
    }
}
