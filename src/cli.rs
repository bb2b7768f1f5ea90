use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::Parser;
use std::path::PathBuf;

const fn extra_build_info() -> &'static str {
    match option_env!("CARGO_BUILD_DESC") {
        Some(e) => e,
        None => env!("CARGO_PKG_VERSION"),
    }
}
pub const VERSION: &str = extra_build_info();
const INFO_STRING: &str = "
read_filter version ";
const AFTER_STRING: &str = "
   ──────────────────────────────────
   length filtering of demultiplexed nanopore reads, one output file per barcode
   reads <dir>/DemultiplexedGuppy/barcode<BC>/*.fastq
   writes <dir>/Demultiplexed/BC<BC>.fastq";

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser, Debug)]
#[command(
    version = VERSION,
    about = format!("{}{}{}", INFO_STRING, VERSION, AFTER_STRING),
    arg_required_else_help = true,
    styles = STYLES
)]
pub struct Cli {
    /// the root input directory, containing `DemultiplexedGuppy/`
    #[arg(short, long = "inputdirectory")]
    pub input_directory: PathBuf,

    /// minimum read length (inclusive)
    #[arg(short, long = "minlen", default_value_t = 0)]
    pub min_len: usize,

    /// maximum read length (inclusive). `inf` for no upper bound
    #[arg(
        short = 'M',
        long = "maxlen",
        value_parser = |x: &str| MaxLength::try_from(x),
        default_value = "inf"
    )]
    pub max_len: MaxLength,

    /// comma-separated list of barcodes to filter, in order, e.g. `01,02,11`
    #[arg(short, long = "barcode")]
    pub barcodes: String,

    /// the number of barcodes to filter at the same time
    #[arg(short, long, default_value_t = 1)]
    pub threads: usize,

    /// write a tab-separated report of every file processed
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Upper read length bound given on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MaxLength(pub usize);

/// Error type for parsing a maximum length.
#[derive(Debug)]
pub struct ParseLengthErr(String);

impl std::fmt::Display for ParseLengthErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid maximum length: {}", self.0)
    }
}

impl std::error::Error for ParseLengthErr {}

impl<'a> TryFrom<&'a str> for MaxLength {
    type Error = ParseLengthErr;

    fn try_from(arg: &'a str) -> Result<MaxLength, Self::Error> {
        match arg.trim().to_lowercase().as_str() {
            "inf" => Ok(MaxLength(crate::filter::LengthRange::UNBOUNDED)),
            s => s.parse::<usize>().map(MaxLength).map_err(|_| {
                ParseLengthErr(indoc::formatdoc! {"
                '{arg}' should be a non-negative integer or `inf`, as in:
                  --maxlen 15000
                  --maxlen inf
                "})
            }),
        }
    }
}
