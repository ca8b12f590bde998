use std::fmt::Display;

use clap::{error::ErrorKind, value_parser, CommandFactory, Parser, ValueEnum};

/// Standard input filename
const STDIN_FILE: &str = "-";

const USAGE_SHORT: &str = r#"
This program accepts the delays between successive edges of an IRIG-B signal and decodes the time and date that they carry. Each fully-received frame is printed as one line.

See --help for more details.
"#;

const USAGE_LONG: &str = r#"
This program accepts the delays between successive edges of an IRIG-B signal and decodes the time and date that they carry. Each fully-received frame is printed as one line.

Both rising and falling edges must be timed. Each IRIG-B bit lasts 10 ms and contains one delay of 2, 5, or 8 ms followed by the remainder. By default, delays are read as whitespace-separated decimal numbers of milliseconds:

    8 2 8 2 2 8 2 8 5 5 ...

If your timer counts faster than 1 kHz, give its rate with --ticks-per-ms. Raw captures from a timer peripheral may be read as native-endian 16-bit integers:

    capture-tool --raw | irigbdec --format u16 --ticks-per-ms 32

Years are decoded as two digits and assumed to fall between 2000 and 2099.

Try --demo to decode a synthesized signal for the current time.
"#;

/// Top-level program arguments
#[derive(Parser, Clone, Debug)]
#[command(version)]
#[command(about, long_about = None)]
#[command(after_help = USAGE_SHORT, after_long_help = USAGE_LONG)]
#[command(max_term_width = 100)]
pub struct Args {
    /// Verbosity level (-vvv for more)
    #[arg(short, long, default_value_t = 0, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print NOTHING, not even timestamps
    #[arg(short, long)]
    pub quiet: bool,

    /// Input file (or "-" for stdin)
    #[arg(long, default_value_t = STDIN_FILE.to_string())]
    pub file: String,

    /// Input format
    #[arg(long, value_enum, default_value_t = InputFormat::Text)]
    pub format: InputFormat,

    /// Timer ticks per millisecond
    ///
    /// Delays are divided by this value, rounding to the nearest,
    /// to obtain milliseconds.
    #[arg(long, default_value_t = 1)]
    #[arg(value_parser = value_parser!(u32).range(1..))]
    pub ticks_per_ms: u32,

    /// Print timestamps in RFC 3339 format (UTC)
    #[arg(long)]
    pub rfc3339: bool,

    /// Decode N synthesized frames for the current time and exit
    ///
    /// No input is read.
    #[arg(long, value_name = "N")]
    #[arg(value_parser = value_parser!(u8).range(1..=60))]
    pub demo: Option<u8>,
}

impl Args {
    /// Return true if the user requests input from stdin
    pub fn input_is_stdin(&self) -> bool {
        self.file == STDIN_FILE
    }
}

/// Format of input delays
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    /// Whitespace-separated decimal integers
    Text,

    /// Native-endian unsigned 16-bit integers
    U16,
}

/// Fatal error, with the exit status to report
///
/// Argument errors carry clap's own status: 0 for `--help` and
/// `--version`, 2 for usage errors. Everything else, such as an
/// unreadable input, exits with 1.
#[derive(Debug)]
pub struct CliError {
    error: anyhow::Error,
    status: i32,
}

impl CliError {
    /// Exit status for this error
    pub fn status(&self) -> i32 {
        self.status
    }

    /// Report this error on the terminal and exit
    ///
    /// clap renders its own errors, help, and version text.
    /// Other errors are rendered in the same style, with their
    /// full chain of context.
    pub fn exit(&self) -> ! {
        let shown = match self.error.downcast_ref::<clap::Error>() {
            Some(clap_err) => clap_err.print(),
            None => Args::command()
                .error(ErrorKind::Io, format!("{:#}", self.error))
                .print(),
        };
        drop(shown);
        std::process::exit(self.status)
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.error)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(error: anyhow::Error) -> CliError {
        CliError { error, status: 1 }
    }
}

impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> CliError {
        CliError {
            status: err.exit_code(),
            error: err.into(),
        }
    }
}
