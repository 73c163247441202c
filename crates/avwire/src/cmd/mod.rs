use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod cmp;
pub mod decode;
pub mod dump;
pub mod encode;
pub mod parse_int;
pub mod probe;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a message and emit its wire frame.
    Encode(EncodeArgs),
    /// Decode wire frames from a file or stdin.
    Decode(DecodeArgs),
    /// Hex dump the bytes of a file.
    Dump(DumpArgs),
    /// Check whether a file exists.
    Probe(ProbeArgs),
    /// Parse a decimal integer with a fixed width.
    ParseInt(ParseIntArgs),
    /// Compare the leading bytes of two files.
    Cmp(CmpArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args),
        Command::Decode(args) => decode::run(args, format),
        Command::Dump(args) => dump::run(args),
        Command::Probe(args) => probe::run(args, format),
        Command::ParseInt(args) => parse_int::run(args, format),
        Command::Cmp(args) => cmp::run(args, format),
        Command::Version(args) => version::run(args, format),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Method name.
    #[arg(long, short = 'm')]
    pub method: String,
    /// Correlation uuid (canonical 36-char form). Default: a fresh v4 uuid.
    #[arg(long)]
    pub uuid: Option<String>,
    /// Status byte, -128..=127.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub status: String,
    /// Protection status body.
    #[arg(long, value_name = "STATE", conflicts_with_all = ["scan", "error_code", "data"])]
    pub protection: Option<Toggle>,
    /// Scan request body carrying PATH.
    #[arg(long, value_name = "PATH", conflicts_with_all = ["protection", "error_code", "data"])]
    pub scan: Option<String>,
    /// Require the scan target to exist.
    #[arg(long, requires = "scan")]
    pub check_exists: bool,
    /// Error body code.
    #[arg(
        long,
        value_name = "CODE",
        allow_hyphen_values = true,
        requires = "error_text",
        conflicts_with_all = ["protection", "scan", "data"]
    )]
    pub error_code: Option<i32>,
    /// Error body description.
    #[arg(long, value_name = "TEXT", requires = "error_code")]
    pub error_text: Option<String>,
    /// Raw body bytes as hex.
    #[arg(long, value_name = "HEX", conflicts_with_all = ["protection", "scan", "error_code"])]
    pub data: Option<String>,
    /// Write the frame to FILE instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub out: Option<PathBuf>,
    /// Print a hex dump instead of raw frame bytes.
    #[arg(long)]
    pub hex: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File holding one or more frames. Reads stdin when omitted or "-".
    pub input: Option<PathBuf>,
    /// Keep bodies undecoded instead of using the antivirus method table.
    #[arg(long)]
    pub raw_bodies: bool,
    /// Maximum accepted body size in bytes.
    #[arg(long, value_name = "BYTES", env = "AVWIRE_MAX_BODY")]
    pub max_body: Option<String>,
    /// Print the Error reply a server would send for each rejected frame.
    #[arg(long)]
    pub reply: bool,
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// File to dump.
    pub path: PathBuf,
    /// Dump at most this many bytes.
    #[arg(long, short = 'n', value_name = "BYTES")]
    pub length: Option<String>,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Path to check.
    pub path: PathBuf,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum IntWidth {
    I8,
    U8,
    U32,
}

#[derive(Args, Debug)]
pub struct ParseIntArgs {
    /// Decimal text to parse.
    #[arg(allow_hyphen_values = true)]
    pub value: String,
    /// Target width.
    #[arg(long, short = 'w', default_value = "u32")]
    pub width: IntWidth,
}

#[derive(Args, Debug)]
pub struct CmpArgs {
    /// Reference file.
    pub target: PathBuf,
    /// File to compare against the reference.
    pub current: PathBuf,
    /// Number of leading bytes to compare.
    #[arg(long, short = 'n', value_name = "BYTES")]
    pub length: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show build details.
    #[arg(long)]
    pub extended: bool,
}
