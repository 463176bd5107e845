// Primitives for reading delimited files (tab or comma separated).

use crate::pollgrid::{io_common::ColumnIndexes, *};

pub fn read_delimited(path: &str, delimiter: u8) -> PollResult<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let header = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1usize })?
        .clone();
    let columns = ColumnIndexes::from_header(&header.iter().collect::<Vec<&str>>(), path)?;

    let mut res: Vec<RawRecord> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is the first line.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let cells: Vec<&str> = line.iter().collect();
        debug!("read_delimited: lineno: {:?} row: {:?}", lineno, cells);
        res.push(columns.record(&cells, lineno)?);
    }
    Ok(res)
}
