use crate::pollgrid::*;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "chartName")]
    pub chart_name: String,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    /// tsv, csv or xlsx
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "worksheetName")]
    pub worksheet_name: Option<String>,
    /// Overrides the delimiter implied by the provider. A single character.
    pub delimiter: Option<String>,
}

impl DataSource {
    pub fn new(
        file_path: &str,
        provider: Option<&str>,
        worksheet_name: Option<String>,
    ) -> DataSource {
        DataSource {
            provider: provider.unwrap_or("tsv").to_string(),
            file_path: file_path.to_string(),
            worksheet_name,
            delimiter: None,
        }
    }

    pub fn delimiter_byte(&self) -> PollResult<u8> {
        match (self.delimiter.as_deref(), self.provider.as_str()) {
            (Some(d), _) if d.len() == 1 => Ok(d.as_bytes()[0]),
            (Some("\\t"), _) => Ok(b'\t'),
            (Some(d), _) => whatever!("The delimiter must be a single character: {:?}", d),
            (None, "csv") => Ok(b','),
            (None, _) => Ok(b'\t'),
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MarginSettings {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSettings {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub margin: Option<MarginSettings>,
    #[serde(rename = "monthDomain")]
    pub month_domain: Option<(f64, f64)>,
    #[serde(rename = "percentDomain")]
    pub percent_domain: Option<(f64, f64)>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RulesSettings {
    pub pairing: Option<String>,
    #[serde(rename = "computeUpper")]
    pub compute_upper: Option<bool>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "dataSources")]
    pub data_sources: Vec<DataSource>,
    pub layout: Option<LayoutSettings>,
    pub rules: Option<RulesSettings>,
}

impl ChartConfig {
    /// The configuration used when only an input file is given.
    pub fn from_input_name(input: Option<&str>) -> ChartConfig {
        let chart_name = input
            .map(io_common::simplify_file_name)
            .unwrap_or_default();
        ChartConfig {
            output_settings: OutputSettings {
                chart_name,
                output_path: None,
            },
            data_sources: vec![],
            layout: None,
            rules: None,
        }
    }

    pub fn chart_layout(&self) -> ChartLayout {
        let default = ChartLayout::DEFAULT_LAYOUT;
        match &self.layout {
            None => default,
            Some(l) => ChartLayout {
                width: l.width.unwrap_or(default.width),
                height: l.height.unwrap_or(default.height),
                margin: l
                    .margin
                    .as_ref()
                    .map(|m| Margin {
                        top: m.top,
                        right: m.right,
                        bottom: m.bottom,
                        left: m.left,
                    })
                    .unwrap_or(default.margin),
                month_domain: l.month_domain.unwrap_or(default.month_domain),
                percent_domain: l.percent_domain.unwrap_or(default.percent_domain),
            },
        }
    }

    pub fn transform_rules(&self) -> PollResult<TransformRules> {
        let default = TransformRules::DEFAULT_RULES;
        match &self.rules {
            None => Ok(default),
            Some(r) => Ok(TransformRules {
                pairing: match &r.pairing {
                    Some(p) => parse_pairing(p)?,
                    None => default.pairing,
                },
                compute_upper: r.compute_upper.unwrap_or(default.compute_upper),
            }),
        }
    }
}

pub fn parse_pairing(s: &str) -> PollResult<PairingPolicy> {
    match s {
        "reject" => Ok(PairingPolicy::Reject),
        "skip-unpaired" | "skipUnpaired" => Ok(PairingPolicy::SkipUnpaired),
        _ => whatever!("unknown pairing policy: {}", s),
    }
}

/// Joins a path from the configuration file to the directory of that file.
pub fn resolve_path(root: Option<&Path>, file_path: &str) -> PathBuf {
    match root {
        Some(r) => r.join(file_path),
        None => PathBuf::from(file_path),
    }
}

pub fn resolve_output(root: Option<&Path>, output_path: &str) -> String {
    if output_path == "stdout" {
        output_path.to_string()
    } else {
        resolve_path(root, output_path).display().to_string()
    }
}

/// Reads the configuration file. Also returns the directory that contains it.
pub fn read_config(path: &str) -> PollResult<(ChartConfig, PathBuf)> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let config: ChartConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    info!("read_config: {:?}: {:?}", path, config.output_settings);
    let root = match Path::new(path).parent() {
        Some(p) => p.to_path_buf(),
        None => whatever!("The configuration file {:?} has no parent directory", path),
    };
    Ok((config, root))
}

pub fn read_summary(path: &str) -> PollResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let js: JSValue = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    debug!(
        "read_summary: {:?}: {} panels",
        path,
        js["panels"].as_array().map_or(0, |a| a.len())
    );
    Ok(js)
}

pub fn read_source(root: Option<&Path>, source: &DataSource) -> PollResult<Vec<RawRecord>> {
    let p = resolve_path(root, &source.file_path).display().to_string();
    info!("Attempting to read poll file {:?}", p);
    let res = match source.provider.as_str() {
        "tsv" | "csv" => io_csv::read_delimited(&p, source.delimiter_byte()?)?,
        "xlsx" => io_excel::read_excel_file(&p, source.worksheet_name.as_deref())?,
        x => whatever!("Provider not implemented {:?}", x),
    };
    info!(
        "read_source: {} records from {}",
        res.len(),
        io_common::simplify_file_name(&p)
    );
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_layout_keeps_the_defaults() {
        let config: ChartConfig = serde_json::from_str(
            r#"{
                "outputSettings": {"chartName": "test"},
                "dataSources": [{"provider": "csv", "filePath": "a.csv"}],
                "layout": {"width": 300, "monthDomain": [0, 12]},
                "rules": {"computeUpper": false}
            }"#,
        )
        .unwrap();
        let layout = config.chart_layout();
        assert_eq!(layout.width, 300.0);
        assert_eq!(layout.height, 120.0);
        assert_eq!(layout.month_domain, (0.0, 12.0));
        assert_eq!(layout.margin, ChartLayout::DEFAULT_LAYOUT.margin);
        let rules = config.transform_rules().unwrap();
        assert!(!rules.compute_upper);
        assert_eq!(rules.pairing, PairingPolicy::Reject);
        assert_eq!(config.data_sources[0].delimiter_byte().unwrap(), b',');
    }

    #[test]
    fn missing_chart_name() {
        let res: Result<ChartConfig, serde_json::Error> =
            serde_json::from_str(r#"{"outputSettings": {}, "dataSources": []}"#);
        assert!(res.is_err());
    }

    #[test]
    fn pairing_names() {
        assert_eq!(parse_pairing("reject").unwrap(), PairingPolicy::Reject);
        assert_eq!(
            parse_pairing("skip-unpaired").unwrap(),
            PairingPolicy::SkipUnpaired
        );
        assert!(parse_pairing("skip-last").is_err());
    }

    #[test]
    fn delimiters() {
        let mut source = DataSource::new("a.txt", None, None);
        assert_eq!(source.delimiter_byte().unwrap(), b'\t');
        source.delimiter = Some(";".to_string());
        assert_eq!(source.delimiter_byte().unwrap(), b';');
        source.delimiter = Some("\\t".to_string());
        assert_eq!(source.delimiter_byte().unwrap(), b'\t');
        source.delimiter = Some(";;".to_string());
        assert!(source.delimiter_byte().is_err());
    }

    #[test]
    fn paths_from_the_config_directory() {
        let root = Path::new("/data/charts");
        assert_eq!(
            resolve_path(Some(root), "polls.tsv"),
            PathBuf::from("/data/charts/polls.tsv")
        );
        assert_eq!(resolve_path(None, "polls.tsv"), PathBuf::from("polls.tsv"));
        assert_eq!(resolve_output(Some(root), "stdout"), "stdout");
    }
}
