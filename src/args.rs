use clap::Parser;

/// Builds small-multiple panels of poll trends, one panel per election year.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the chart and its data sources.
    /// The file paths it contains are relative to its own directory.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the panels in JSON format. If provided, pollgrid will
    /// check that the output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the panels will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) If specified, the poll results are read from this file. Setting this option
    /// overrides the data sources that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default tsv) The type of the input: tsv, csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use. By default, the first one.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (reject or skip-unpaired) What to do with the rows that do not form a pair of the same year and month.
    #[clap(long, value_parser)]
    pub pairing: Option<String>,

    /// (pixels) If specified, the pointer is placed at this horizontal position in every panel and the
    /// hovered samples are included in the output.
    #[clap(long, value_parser, allow_hyphen_values = true)]
    pub hover_x: Option<f64>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
