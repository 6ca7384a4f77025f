use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "foliomatch", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Transport manifest (.pdf, or .txt with operator-corrected text)
    #[arg(value_name = "MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// QC master spreadsheet (.xlsx, .xls, .csv)
    #[arg(long, value_name = "FILE")]
    pub master: Option<PathBuf>,

    /// Worksheet to read (default: first sheet)
    #[arg(long, value_name = "NAME")]
    pub sheet: Option<String>,

    /// Operator-corrected raw text; replaces the extracted manifest text
    #[arg(long, value_name = "FILE")]
    pub text: Option<PathBuf>,

    /// Container ID override (normally discovered in the manifest)
    #[arg(long, value_name = "ID")]
    pub container: Option<String>,

    /// Extraction pattern override (normally inferred)
    #[arg(long, value_name = "REGEX")]
    pub pattern: Option<String>,

    /// Prefix trimmed off each raw match (normally inferred)
    #[arg(long, value_name = "DIGITS")]
    pub prefix: Option<String>,

    /// Suffix trimmed off each raw match (normally inferred)
    #[arg(long, value_name = "DIGITS")]
    pub suffix: Option<String>,

    /// Reviewed scan profile (.yaml, as emitted by `infer`)
    #[arg(long, value_name = "FILE")]
    pub rule: Option<PathBuf>,

    /// Report column (repeatable; default: suggested QC columns present in the sheet)
    #[arg(long = "column", value_name = "NAME")]
    pub columns: Vec<String>,

    /// Column to average (repeatable; default: numeric report columns minus identifiers)
    #[arg(long = "avg-column", value_name = "NAME")]
    pub avg_columns: Vec<String>,

    /// Capture sack counts following each code and emit daily totals
    #[arg(long)]
    pub sacks: bool,

    /// Date column used for daily sack totals
    #[arg(long, value_name = "NAME", default_value = "Fecha Análisis")]
    pub date_column: String,

    /// Report output path (default: Reporte_<container>.xlsx)
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Emit progress to stderr
    #[arg(long)]
    pub progress: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan a manifest and emit a reviewable YAML scan profile
    Infer {
        /// Transport manifest (.pdf or .txt)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        /// Operator-corrected raw text; replaces the extracted manifest text
        #[arg(long, value_name = "FILE")]
        text: Option<PathBuf>,

        /// Output file for the scan profile (default: stdout)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// List a master workbook's sheets, or one sheet's header columns
    Sheets {
        /// QC master spreadsheet (.xlsx, .xls, .csv)
        #[arg(value_name = "FILE")]
        master: PathBuf,

        /// Print the header columns of this sheet instead of sheet names
        #[arg(long, value_name = "NAME")]
        sheet: Option<String>,
    },
}
