use log::{debug, info, warn};

use poll_trends::hover::HoverChange;
use poll_trends::panel::{build_panels, LineView, PanelView, Point};
use poll_trends::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::PathBuf;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;

use crate::pollgrid::config_reader::*;

#[derive(Debug, Snafu)]
pub enum PollError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening delimited file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Line {lineno} has no value for column {column}"))]
    LineTooShort { lineno: usize, column: String },
    #[snafu(display("Column {column} not found in the first row of {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Excel file {path}, line {lineno}: cannot read cell {content}"))]
    ExcelWrongCellType {
        path: String,
        lineno: usize,
        content: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Invalid poll data"))]
    Transform { source: TransformError },
    #[snafu(display("Difference detected between the panels and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type PollResult<T> = Result<T, PollError>;

/// Everything needed to produce the panels, once the configuration file and
/// the command line flags have been merged.
#[derive(PartialEq, Debug, Clone)]
pub struct ChartJob {
    pub chart_name: String,
    pub sources: Vec<DataSource>,
    /// The directory against which the relative file paths are resolved.
    pub root: Option<PathBuf>,
    pub layout: ChartLayout,
    pub rules: TransformRules,
    pub hover_x: Option<f64>,
    /// File path or 'stdout'.
    pub out: Option<String>,
    pub reference: Option<String>,
}

pub fn job_from_args(args: &Args) -> PollResult<ChartJob> {
    let (config, root) = match &args.config {
        Some(config_path) => {
            let (c, r) = read_config(config_path)?;
            (c, Some(r))
        }
        None => {
            if args.input.is_none() {
                whatever!("No input: use --config or --input");
            }
            (ChartConfig::from_input_name(args.input.as_deref()), None)
        }
    };
    debug!("job_from_args: config: {:?}", config);

    let sources: Vec<DataSource> = match &args.input {
        Some(input) => vec![DataSource::new(
            input,
            args.input_type.as_deref(),
            args.excel_worksheet_name.clone(),
        )],
        None => config.data_sources.clone(),
    };
    // An input given on the command line is relative to the current directory.
    let root = if args.input.is_some() { None } else { root };

    let mut rules = config.transform_rules()?;
    if let Some(pairing) = &args.pairing {
        rules.pairing = parse_pairing(pairing)?;
    }

    let out = match &args.out {
        Some(out) => Some(out.clone()),
        None => config
            .output_settings
            .output_path
            .as_ref()
            .map(|p| resolve_output(root.as_deref(), p)),
    };

    Ok(ChartJob {
        chart_name: config.output_settings.chart_name.clone(),
        sources,
        root,
        layout: config.chart_layout(),
        rules,
        hover_x: args.hover_x,
        out,
        reference: args.reference.clone(),
    })
}

/// Reads all the sources, in order.
pub fn load_records(job: &ChartJob) -> PollResult<Vec<RawRecord>> {
    if job.sources.is_empty() {
        whatever!("No data source for chart {:?}", job.chart_name);
    }
    let mut res: Vec<RawRecord> = Vec::new();
    for source in job.sources.iter() {
        let mut records = read_source(job.root.as_deref(), source)?;
        res.append(&mut records);
    }
    info!("load_records: {} records", res.len());
    Ok(res)
}

/// Runs the transformation and lays out one panel per year.
pub fn build_panel_views(job: &ChartJob, records: &[RawRecord]) -> PollResult<Vec<PanelView>> {
    let grouped = transform_with_rules(records, &job.rules).context(TransformSnafu {})?;
    let mapper = CoordinateMapper::new(&job.layout);
    let mut panels = build_panels(&grouped, &job.layout);

    if let Some(pointer_x) = job.hover_x {
        for (panel, group) in panels.iter_mut().zip(grouped.years.iter()) {
            // One hover state per panel.
            let mut state = HoverState::new();
            let change = state.handle(
                PointerEvent::Enter(pointer_x),
                &mapper,
                group.first_month(),
                group.max_samples(),
            );
            if let HoverChange::Shown(index) = change {
                debug!("build_panel_views: {}: hover at index {}", group.year, index);
            }
            panel.apply_hover(group, &mapper, &state);
        }
    }
    Ok(panels)
}

fn point_to_json(p: &Point) -> JSValue {
    json!([p.x, p.y])
}

fn line_to_json(line: &LineView) -> JSValue {
    let result = line.result_marker.as_ref().map(|m| {
        json!({
            "x": m.x,
            "y": m.y,
            "dx": m.dx,
            "dy": m.dy,
            "label": m.label,
        })
    });
    let hover = line.hover.as_ref().map(|h| {
        json!({
            "index": h.index,
            "x": h.x,
            "y": h.y,
            "dy": h.dy,
            "label": h.label,
        })
    });
    json!({
        "candidate": line.candidate,
        "party": line.party_class,
        "points": line.points.iter().map(point_to_json).collect::<Vec<JSValue>>(),
        "result": result,
        "legend": {
            "text": line.legend.text,
            "x": line.legend.x,
            "y": line.legend.y,
        },
        "hover": hover,
    })
}

fn panel_to_json(panel: &PanelView) -> JSValue {
    let ticks: Vec<JSValue> = panel
        .y_ticks
        .iter()
        .map(|t| json!({"value": t.value, "y": t.y, "label": t.label}))
        .collect();
    json!({
        "year": panel.year,
        "width": panel.outer_width,
        "height": panel.outer_height,
        "origin": point_to_json(&panel.origin),
        "hitArea": {"width": panel.hit_width, "height": panel.hit_height},
        "caption": {
            "text": panel.caption.text,
            "x": panel.caption.x,
            "y": panel.caption.y,
            "dy": panel.caption.dy,
        },
        "yTicks": ticks,
        "lines": panel.lines.iter().map(line_to_json).collect::<Vec<JSValue>>(),
    })
}

pub fn build_summary_js(job: &ChartJob, panels: &[PanelView]) -> JSValue {
    json!({
        "config": {
            "chart": job.chart_name,
            "width": job.layout.width,
            "height": job.layout.height,
            "monthDomain": [job.layout.month_domain.0, job.layout.month_domain.1],
            "percentDomain": [job.layout.percent_domain.0, job.layout.percent_domain.1],
            "hoverX": job.hover_x,
        },
        "panels": panels.iter().map(panel_to_json).collect::<Vec<JSValue>>(),
    })
}

fn write_output(out: Option<&str>, contents: &str) -> PollResult<()> {
    match out {
        None | Some("stdout") => {
            println!("{}", contents);
        }
        Some(path) => {
            info!("Writing panels to {:?}", path);
            fs::write(path, contents).context(WritingFileSnafu { path })?;
        }
    }
    Ok(())
}

/// Compares the pretty-printed summary with a reference file.
pub fn check_reference(reference_path: &str, pretty_js: &str) -> PollResult<()> {
    let reference = read_summary(reference_path)?;
    let pretty_reference = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
    if pretty_reference != pretty_js {
        warn!("Found differences with the reference {:?}", reference_path);
        print_diff(pretty_reference.as_str(), pretty_js, "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("Output matches the reference {:?}", reference_path);
    Ok(())
}

pub fn run_job(job: &ChartJob) -> PollResult<JSValue> {
    info!("run_job: {:?}", job);
    let records = load_records(job)?;
    let panels = build_panel_views(job, &records)?;
    let summary = build_summary_js(job, &panels);

    let pretty_js = serde_json::to_string_pretty(&summary).context(ParsingJsonSnafu {})?;
    write_output(job.out.as_deref(), &pretty_js)?;

    if let Some(reference_path) = &job.reference {
        check_reference(reference_path, &pretty_js)?;
    }
    Ok(summary)
}

pub fn run_args(args: &Args) -> PollResult<()> {
    let job = job_from_args(args)?;
    run_job(&job)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::TempDir;

    fn data_path(name: &str) -> String {
        format!("{}/data/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    fn args(extra: &[&str]) -> Args {
        let mut all = vec!["pollgrid"];
        all.extend_from_slice(extra);
        Args::parse_from(all)
    }

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> String {
        let path = dir.path().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path.display().to_string()
    }

    fn summary_for(extra: &[&str]) -> PollResult<JSValue> {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.json").display().to_string();
        let mut all = extra.to_vec();
        all.extend_from_slice(&["-o", out.as_str()]);
        let job = job_from_args(&args(&all))?;
        run_job(&job)
    }

    #[test]
    fn panels_from_tsv() {
        let input = data_path("polls.tsv");
        let js = summary_for(&["-i", input.as_str()]).unwrap();
        let panels = js["panels"].as_array().unwrap();
        let years: Vec<&str> = panels.iter().map(|p| p["year"].as_str().unwrap()).collect();
        assert_eq!(years, vec!["2008", "2012", "2016"]);

        let obama = &panels[0]["lines"][0];
        assert_eq!(obama["candidate"], "Obama");
        assert_eq!(obama["party"], "d");
        assert_eq!(obama["legend"]["text"], "Obama ★");
        assert_eq!(obama["result"]["label"], "+3%");
        assert_eq!(obama["points"].as_array().unwrap().len(), 5);
        assert!(obama["hover"].is_null());

        let trump = &panels[2]["lines"][1];
        assert_eq!(trump["legend"]["text"], "Trump");
        assert_eq!(trump["result"]["label"], "-1%");
        assert_eq!(trump["result"]["dy"], 17.0);
    }

    #[test]
    fn hover_from_the_command_line() {
        let input = data_path("polls.tsv");
        // Month 3.6: the fourth sample.
        let js = summary_for(&["-i", input.as_str(), "--hover-x", "97.5"]).unwrap();
        let obama = &js["panels"][0]["lines"][0]["hover"];
        assert_eq!(obama["index"], 3);
        assert_eq!(obama["label"], "49%");
        assert_eq!(obama["dy"], -10.0);
        let mccain = &js["panels"][0]["lines"][1]["hover"];
        assert_eq!(mccain["label"], "43%");
        assert_eq!(mccain["dy"], 17.0);

        let js = summary_for(&["-i", input.as_str(), "--hover-x", "500"]).unwrap();
        assert_eq!(js["panels"][1]["lines"][0]["hover"]["index"], 4);
    }

    #[test]
    fn config_file_paths_are_relative() {
        let config_path = data_path("polls_config.json");
        let job = job_from_args(&args(&["-c", config_path.as_str()])).unwrap();
        assert_eq!(job.chart_name, "Presidential polls");
        assert_eq!(job.layout, ChartLayout::DEFAULT_LAYOUT);
        assert_eq!(job.rules.pairing, PairingPolicy::Reject);
        let records = load_records(&job).unwrap();
        assert_eq!(records.len(), 30);
        assert_eq!(records[0], RawRecord::new("2008", "Obama", "D", "1", "44"));
    }

    #[test]
    fn flags_override_the_config_file() {
        let config_path = data_path("polls_config.json");
        let job = job_from_args(&args(&[
            "-c",
            config_path.as_str(),
            "--pairing",
            "skip-unpaired",
            "-o",
            "stdout",
        ]))
        .unwrap();
        assert_eq!(job.rules.pairing, PairingPolicy::SkipUnpaired);
        assert_eq!(job.out, Some("stdout".to_string()));
    }

    #[test]
    fn no_input_at_all() {
        assert!(matches!(
            job_from_args(&args(&[])),
            Err(PollError::Whatever { .. })
        ));
    }

    #[test]
    fn bad_number_fails_the_load() {
        let dir = TempDir::new().unwrap();
        let input = write_file(
            &dir,
            "bad.tsv",
            "year\tcandidate\tparty\tmonth\tresult\n2016\tA\tR\t1\t40\n2016\tB\tD\t1\tn/a\n",
        );
        let res = summary_for(&["-i", input.as_str()]);
        match res {
            Err(PollError::Transform {
                source: TransformError::Parse { index, field, .. },
            }) => {
                assert_eq!(index, 1);
                assert_eq!(field, Field::Result);
            }
            x => panic!("unexpected result: {:?}", x),
        }
    }

    #[test]
    fn odd_table_depends_on_policy() {
        let dir = TempDir::new().unwrap();
        let input = write_file(
            &dir,
            "odd.tsv",
            "year\tcandidate\tparty\tmonth\tresult\n2016\tA\tR\t1\t40\n2016\tB\tD\t1\t45\n2016\tA\tR\t2\t41\n",
        );
        assert!(matches!(
            summary_for(&["-i", input.as_str()]),
            Err(PollError::Transform {
                source: TransformError::Pairing { .. }
            })
        ));
        let js = summary_for(&["-i", input.as_str(), "--pairing", "skip-unpaired"]).unwrap();
        assert_eq!(js["panels"][0]["lines"][0]["result"]["label"], "+1%");
        // B has a single sample: no delta.
        assert!(js["panels"][0]["lines"][1]["result"]["label"].is_null());
    }

    #[test]
    fn comma_separated_input() {
        let dir = TempDir::new().unwrap();
        let input = write_file(
            &dir,
            "polls.csv",
            "result,month,party,candidate,year\n40,1,R,A,2016\n45,1,D,B,2016\n",
        );
        let js = summary_for(&["-i", input.as_str(), "--input-type", "csv"]).unwrap();
        let lines = js["panels"][0]["lines"].as_array().unwrap();
        assert_eq!(lines[0]["candidate"], "A");
        assert_eq!(lines[1]["candidate"], "B");
    }

    #[test]
    fn excel_input() {
        let input = data_path("polls.xlsx");
        let js = summary_for(&[
            "-i",
            input.as_str(),
            "--input-type",
            "xlsx",
            "--excel-worksheet-name",
            "Polls",
        ])
        .unwrap();
        let lines = js["panels"][0]["lines"].as_array().unwrap();
        assert_eq!(js["panels"][0]["year"], "2016");
        assert_eq!(lines[0]["result"]["label"], "-1%");
        assert_eq!(lines[1]["result"]["label"], "+2%");
    }

    #[test]
    fn missing_column() {
        let dir = TempDir::new().unwrap();
        let input = write_file(&dir, "short.tsv", "year\tcandidate\tmonth\tresult\n");
        assert!(matches!(
            summary_for(&["-i", input.as_str()]),
            Err(PollError::MissingColumn { .. })
        ));
    }

    #[test]
    fn reference_comparison() {
        let dir = TempDir::new().unwrap();
        let input = data_path("polls.tsv");
        let reference = dir.path().join("reference.json").display().to_string();
        let job = job_from_args(&args(&["-i", input.as_str(), "-o", reference.as_str()])).unwrap();
        run_job(&job).unwrap();

        let out = dir.path().join("out.json").display().to_string();
        let job = job_from_args(&args(&[
            "-i",
            input.as_str(),
            "-o",
            out.as_str(),
            "-r",
            reference.as_str(),
        ]))
        .unwrap();
        assert!(run_job(&job).is_ok());

        let job = job_from_args(&args(&[
            "-i",
            input.as_str(),
            "-o",
            out.as_str(),
            "-r",
            reference.as_str(),
            "--hover-x",
            "10",
        ]))
        .unwrap();
        assert!(matches!(
            run_job(&job),
            Err(PollError::ReferenceMismatch { .. })
        ));
    }
}
