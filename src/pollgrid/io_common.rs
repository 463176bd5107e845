use std::path::Path;

use crate::pollgrid::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// The positions of the poll columns, found by name in the first row.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ColumnIndexes {
    pub year: usize,
    pub candidate: usize,
    pub party: usize,
    pub month: usize,
    pub result: usize,
}

impl ColumnIndexes {
    pub fn from_header<S: AsRef<str>>(header: &[S], path: &str) -> PollResult<ColumnIndexes> {
        let find = |column: &str| -> PollResult<usize> {
            header
                .iter()
                .position(|h| h.as_ref().trim().eq_ignore_ascii_case(column))
                .context(MissingColumnSnafu { column, path })
        };
        let res = ColumnIndexes {
            year: find("year")?,
            candidate: find("candidate")?,
            party: find("party")?,
            month: find("month")?,
            result: find("result")?,
        };
        debug!("from_header: {:?}: {:?}", path, res);
        Ok(res)
    }

    /// Picks the poll fields of one line. The values are not checked here.
    pub fn record<S: AsRef<str>>(&self, cells: &[S], lineno: usize) -> PollResult<RawRecord> {
        let get = |idx: usize, column: &str| -> PollResult<String> {
            cells
                .get(idx)
                .map(|c| c.as_ref().to_string())
                .context(LineTooShortSnafu { lineno, column })
        };
        Ok(RawRecord {
            year: get(self.year, "year")?,
            candidate: get(self.candidate, "candidate")?,
            party: get(self.party, "party")?,
            month: get(self.month, "month")?,
            result: get(self.result, "result")?,
        })
    }
}
