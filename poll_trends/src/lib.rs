/*!
Transformation and coordinate-mapping engine for small-multiple poll charts.

A flat table of poll records (year, candidate, party, month, result) is turned
into one panel per year, each panel holding one chronological series per
candidate. The crate also maps months and percentages onto the drawing
surface of a panel and resolves pointer positions to samples for the hover
readout.

```
use poll_trends::*;

let records = vec![
    RawRecord::new("2016", "Trump", "R", "1", "40"),
    RawRecord::new("2016", "Clinton", "D", "1", "45"),
    RawRecord::new("2016", "Trump", "R", "2", "42"),
    RawRecord::new("2016", "Clinton", "D", "2", "44"),
];
let grouped = transform(&records)?;
let clinton = grouped.series("2016", "Clinton").unwrap();
assert_eq!(clinton.delta()?.label(), "-1%");
# Ok::<(), TransformError>(())
```

See the [manual] for the details of every step.
*/

mod config;
pub mod builder;
pub mod hover;
pub mod manual;
pub mod panel;
pub mod scale;

use log::{debug, info, warn};

use std::collections::HashMap;

pub use crate::config::*;
pub use crate::hover::{resolve_hover_index, HoverChange, HoverState, PointerEvent};
pub use crate::panel::PanelView;
pub use crate::scale::{CoordinateMapper, LinearScale};

/// Runs the transformation with the default rules.
pub fn transform(records: &[RawRecord]) -> Result<GroupedStructure, TransformError> {
    transform_with_rules(records, &TransformRules::DEFAULT_RULES)
}

/// Runs the transformation.
///
/// Arguments:
/// * `records` the raw records, in the order of the source table
/// * `rules` the policy for the upper flags
///
/// All the records are coerced before anything else happens: a single invalid
/// number fails the whole call and nothing is returned.
pub fn transform_with_rules(
    records: &[RawRecord],
    rules: &TransformRules,
) -> Result<GroupedStructure, TransformError> {
    info!(
        "Processing {:?} records, rules: {:?}",
        records.len(),
        rules
    );

    let mut coerced: Vec<Record> = Vec::with_capacity(records.len());
    for (idx, raw) in records.iter().enumerate() {
        coerced.push(coerce_record(idx, raw)?);
    }

    if rules.compute_upper {
        compute_upper_flags(&mut coerced, rules.pairing)?;
    }

    let grouped = group_records(coerced);
    info!(
        "Grouped into {:?} years, {:?} series",
        grouped.years.len(),
        grouped.years.iter().map(|y| y.series.len()).sum::<usize>()
    );
    Ok(grouped)
}

/// Coerces the numeric fields of a raw record.
///
/// `index` is only used to locate the record in the error message.
pub fn coerce_record(index: usize, raw: &RawRecord) -> Result<Record, TransformError> {
    let month = parse_int(index, Field::Month, &raw.month)?;
    let result = parse_int(index, Field::Result, &raw.result)?;
    Ok(Record {
        year: raw.year.clone(),
        candidate: raw.candidate.clone(),
        party: raw.party.clone(),
        month,
        result,
        upper: None,
    })
}

fn parse_int(index: usize, field: Field, value: &str) -> Result<i32, TransformError> {
    // Surrounding blanks are common in hand-edited tables.
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| TransformError::Parse {
            index,
            field,
            value: value.to_string(),
        })
}

/// Sets the upper flag on every comparison pair.
///
/// The records are taken two by two in input order: (0, 1), (2, 3), ...
/// In each pair, the record with the greater or equal result is the upper one,
/// so the first record wins ties.
///
/// A record cannot be paired when it is the last one of an odd-sized input, or
/// when the two records of a pair are not from the same year and month.
/// Depending on the policy, this is an error or these records are left without flag.
pub fn compute_upper_flags(
    records: &mut [Record],
    policy: PairingPolicy,
) -> Result<(), TransformError> {
    let len = records.len();
    if len % 2 == 1 {
        match policy {
            PairingPolicy::Reject => {
                return Err(TransformError::Pairing {
                    index: len - 1,
                    len,
                });
            }
            PairingPolicy::SkipUnpaired => {
                warn!(
                    "compute_upper_flags: odd number of records ({}), the last record gets no upper flag",
                    len
                );
            }
        }
    }

    for (pair_idx, pair) in records.chunks_exact_mut(2).enumerate() {
        let index = pair_idx * 2;
        if pair[0].year != pair[1].year || pair[0].month != pair[1].month {
            match policy {
                PairingPolicy::Reject => {
                    return Err(TransformError::Pairing { index, len });
                }
                PairingPolicy::SkipUnpaired => {
                    warn!(
                        "compute_upper_flags: records {} and {} are not from the same period: {:?} {:?}",
                        index,
                        index + 1,
                        (&pair[0].year, pair[0].month),
                        (&pair[1].year, pair[1].month)
                    );
                    continue;
                }
            }
        }
        let first_is_upper = pair[0].result >= pair[1].result;
        pair[0].upper = Some(first_is_upper);
        pair[1].upper = Some(!first_is_upper);
        debug!(
            "compute_upper_flags: pair {}: {} {} / {} {} -> first upper: {}",
            index,
            pair[0].candidate,
            pair[0].result,
            pair[1].candidate,
            pair[1].result,
            first_is_upper
        );
    }
    Ok(())
}

/// Groups the records by year, then by candidate, and sorts every series by month.
///
/// The years and the candidates appear in the order in which they are first
/// seen in the input. The sort is stable.
pub fn group_records(records: Vec<Record>) -> GroupedStructure {
    let mut years: Vec<YearGroup> = Vec::new();
    let mut year_positions: HashMap<String, usize> = HashMap::new();
    // (year position, candidate) -> series position in that year
    let mut series_positions: HashMap<(usize, String), usize> = HashMap::new();

    for r in records {
        let year_pos = *year_positions.entry(r.year.clone()).or_insert_with(|| {
            years.push(YearGroup {
                year: r.year.clone(),
                series: Vec::new(),
            });
            years.len() - 1
        });
        let group = &mut years[year_pos];
        let series_pos = *series_positions
            .entry((year_pos, r.candidate.clone()))
            .or_insert_with(|| {
                group.series.push(Series {
                    candidate: r.candidate.clone(),
                    records: Vec::new(),
                });
                group.series.len() - 1
            });
        group.series[series_pos].records.push(r);
    }

    for group in years.iter_mut() {
        for s in group.series.iter_mut() {
            s.records.sort_by_key(|r| r.month);
        }
    }
    GroupedStructure { years }
}

/// The difference between the last two results of a series.
pub fn series_delta(series: &Series) -> Result<Delta, TransformError> {
    match series.records.as_slice() {
        [.., before_last, last] => Ok(Delta(last.result - before_last.result)),
        _ => Err(TransformError::InsufficientData {
            candidate: series.candidate.clone(),
            samples: series.records.len(),
        }),
    }
}

/// Normalizes a party label into the key used to pick a rendering style.
pub fn party_class(party: &str) -> String {
    party.to_lowercase()
}

/// Case-insensitive comparison of two party labels.
pub fn same_party(a: &str, b: &str) -> bool {
    party_class(a) == party_class(b)
}

impl Series {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn delta(&self) -> Result<Delta, TransformError> {
        series_delta(self)
    }

    /// The sample at the given position, or an error if there is none.
    pub fn sample(&self, index: usize) -> Result<&Record, TransformError> {
        self.records
            .get(index)
            .ok_or(TransformError::IndexOutOfRange {
                index,
                len: self.records.len(),
            })
    }

    /// The style key of the series, taken from its first record.
    pub fn party_class(&self) -> Option<String> {
        self.records.first().map(|r| party_class(&r.party))
    }
}

impl YearGroup {
    pub fn candidate(&self, candidate: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.candidate == candidate)
    }

    /// The earliest sampled month of the year, 1 when there is no sample.
    pub fn first_month(&self) -> i32 {
        self.series
            .iter()
            .filter_map(|s| s.records.first())
            .map(|r| r.month)
            .min()
            .unwrap_or(1)
    }

    /// The number of samples of the longest series.
    pub fn max_samples(&self) -> usize {
        self.series.iter().map(|s| s.len()).max().unwrap_or(0)
    }
}

impl GroupedStructure {
    pub fn year(&self, year: &str) -> Option<&YearGroup> {
        self.years.iter().find(|g| g.year == year)
    }

    pub fn series(&self, year: &str, candidate: &str) -> Option<&Series> {
        self.year(year).and_then(|g| g.candidate(candidate))
    }

    /// The total number of records, across all the series.
    pub fn record_count(&self) -> usize {
        self.years
            .iter()
            .flat_map(|g| g.series.iter())
            .map(|s| s.len())
            .sum()
    }
}
