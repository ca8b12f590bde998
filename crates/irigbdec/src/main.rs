use std::io::{self, BufRead, BufReader};

use anyhow::{bail, Context};
use clap::Parser;
use log::{info, LevelFilter};

use irigb::IrigbReceiver;

mod app;
mod cli;
mod source;

use cli::{Args, CliError, InputFormat};

fn main() {
    if let Err(err) = irigbdec() {
        err.exit();
    }
}

fn irigbdec() -> Result<(), CliError> {
    let args = Args::try_parse()?;
    log_setup(&args);

    let mut rx = IrigbReceiver::new(args.ticks_per_ms);
    if let Some(frames) = args.demo {
        return Ok(app::run_demo(&args, &mut rx, frames)?);
    }

    let stdin = io::stdin();
    let input = open_input(&args, stdin.lock())?;
    match args.format {
        InputFormat::Text => app::run(&args, &mut rx, source::text_delays(input))?,
        InputFormat::U16 => app::run(&args, &mut rx, source::u16_delays(input))?,
    }

    Ok(())
}

// Install the logger
//
// `RUST_LOG`, if set, overrides the `-v` count. `--quiet`
// disables logging entirely.
fn log_setup(args: &Args) {
    if args.quiet {
        return;
    }

    if std::env::var_os("RUST_LOG").is_some() {
        pretty_env_logger::init();
        return;
    }

    let level = verbosity_level(args.verbose);
    pretty_env_logger::formatted_builder()
        .filter_module("irigb", level)
        .filter_module("irigbdec", level)
        .init();
}

// Log level for a count of `-v` flags
fn verbosity_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

// Open the delay source named by `--file`
//
// Raw `u16` captures are binary, so they are never read from
// an interactive terminal.
fn open_input<'stdin>(
    args: &Args,
    stdin: io::StdinLock<'stdin>,
) -> Result<Box<dyn BufRead + 'stdin>, anyhow::Error> {
    if !args.input_is_stdin() {
        info!("reading delays from \"{}\"", args.file);
        let file = std::fs::File::open(&args.file)
            .with_context(|| format!("cannot open delay file \"{}\"", args.file))?;
        return Ok(Box::new(BufReader::new(file)));
    }

    if args.format == InputFormat::U16 && stdin_is_terminal() {
        bail!(
            "--format u16 expects raw timer captures, not keyboard input.

Pipe a capture into this program, give one with --file, or use
--format text to enter delays in milliseconds."
        );
    }

    info!("reading delays from standard input");
    Ok(Box::new(stdin))
}

#[cfg(unix)]
fn stdin_is_terminal() -> bool {
    use std::os::fd::AsRawFd;
    terminal_size::terminal_size_using_fd(io::stdin().as_raw_fd()).is_some()
}

#[cfg(windows)]
fn stdin_is_terminal() -> bool {
    use std::os::windows::io::AsRawHandle;
    terminal_size::terminal_size_using_handle(io::stdin().as_raw_handle()).is_some()
}
