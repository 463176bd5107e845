use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::pollgrid::{io_common::ColumnIndexes, *};

pub fn read_excel_file(path: &str, worksheet_name: Option<&str>) -> PollResult<Vec<RawRecord>> {
    let wrange = get_range(path, worksheet_name)?;
    let mut rows = wrange.rows();

    let header_row = rows.next().context(EmptyExcelSnafu { path })?;
    let header = header_row
        .iter()
        .map(|c| cell_text(c, path, 1))
        .collect::<PollResult<Vec<String>>>()?;
    debug!("read_excel_file: header: {:?}", header);
    let columns = ColumnIndexes::from_header(&header, path)?;

    let mut res: Vec<RawRecord> = Vec::new();
    for (idx, row) in rows.enumerate() {
        let lineno = idx + 2;
        let cells = row
            .iter()
            .map(|c| cell_text(c, path, lineno))
            .collect::<PollResult<Vec<String>>>()?;
        // Worksheets often end with formatted but empty rows.
        if cells.iter().all(|c| c.is_empty()) {
            debug!("read_excel_file: skipping empty row {}", lineno);
            continue;
        }
        res.push(columns.record(&cells, lineno)?);
    }
    Ok(res)
}

/// The text of a cell. Whole numbers are written without a fractional part.
fn cell_text(cell: &DataType, path: &str, lineno: usize) -> PollResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) if f.fract() == 0.0 => Ok(format!("{:.0}", f)),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Empty => Ok(String::new()),
        _ => ExcelWrongCellTypeSnafu {
            path,
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> PollResult<Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let name = match worksheet_name {
        Some(name) => name.to_string(),
        None => {
            let names = workbook.sheet_names().to_vec();
            match names.as_slice() {
                [] => return EmptyExcelSnafu { path }.fail(),
                [first] => first.clone(),
                [first, ..] => {
                    warn!(
                        "get_range: {:?} has {} worksheets, reading {:?}",
                        path,
                        names.len(),
                        first
                    );
                    first.clone()
                }
            }
        }
    };
    workbook
        .worksheet_range(&name)
        .context(MissingWorksheetSnafu { name: name.as_str(), path })?
        .context(OpeningExcelSnafu { path })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_as_text() {
        assert_eq!(cell_text(&DataType::Float(2016.0), "x", 2).unwrap(), "2016");
        assert_eq!(cell_text(&DataType::Int(45), "x", 2).unwrap(), "45");
        assert_eq!(cell_text(&DataType::Float(45.5), "x", 2).unwrap(), "45.5");
        assert_eq!(
            cell_text(&DataType::String("Clinton".to_string()), "x", 2).unwrap(),
            "Clinton"
        );
        assert_eq!(cell_text(&DataType::Empty, "x", 2).unwrap(), "");
        assert!(matches!(
            cell_text(&DataType::Bool(true), "x", 7),
            Err(PollError::ExcelWrongCellType { lineno: 7, .. })
        ));
    }

    fn fixture() -> String {
        format!("{}/data/polls.xlsx", env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn named_worksheet() {
        let records = read_excel_file(&fixture(), Some("Polls")).unwrap();
        // The empty fourth row is skipped.
        assert_eq!(
            records,
            vec![
                RawRecord::new("2016", "Clinton", "D", "1", "48"),
                RawRecord::new("2016", "Trump", "R", "1", "36"),
                RawRecord::new("2016", "Clinton", "D", "2", "47"),
                RawRecord::new("2016", "Trump", "R", "2", "38"),
            ]
        );
    }

    #[test]
    fn first_worksheet_by_default() {
        // The first worksheet holds notes, not polls.
        assert!(matches!(
            read_excel_file(&fixture(), None),
            Err(PollError::MissingColumn { .. })
        ));
    }

    #[test]
    fn unknown_worksheet() {
        assert!(matches!(
            read_excel_file(&fixture(), Some("Form1")),
            Err(PollError::MissingWorksheet { .. })
        ));
    }

    #[test]
    fn missing_workbook() {
        assert!(matches!(
            read_excel_file("/nonexistent/polls.xlsx", None),
            Err(PollError::OpeningExcel { .. })
        ));
    }
}
