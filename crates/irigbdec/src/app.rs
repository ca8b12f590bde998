//! Decoding loop
//!
//! Feeds raw delays to the receiver and prints one line for
//! every completed frame. Sync changes are only logged.

use std::io;

use anyhow::Context;
use chrono::{DateTime, Datelike, Duration, SecondsFormat, Timelike, Utc};
use log::{debug, warn};

use irigb::{encode_frame, frame_pulses, FrameOut, IrigbReceiver, TimeDate};

use crate::cli::Args;

/// Run the application
///
/// Runs the receiver with the given command-line `args`, a
/// fully-initialized `receiver`, and an `input` iterator which
/// returns each raw delay from some input source until it is
/// exhausted. A read error stops decoding and is returned.
pub fn run<I>(args: &Args, receiver: &mut IrigbReceiver, input: I) -> Result<(), anyhow::Error>
where
    I: Iterator<Item = io::Result<u32>>,
{
    let mut read_error = None;
    let delays = input.map_while(|delay| match delay {
        Ok(delay) => Some(delay),
        Err(err) => {
            read_error = Some(err);
            None
        }
    });

    for evt in receiver.iter(delays) {
        match evt {
            FrameOut::Ready(td) => {
                if !args.quiet {
                    println!("{}", format_time_date(&td, args.rfc3339));
                }
            }
            FrameOut::Searching | FrameOut::Acquiring => {
                debug!("receiver: {:?}", evt);
            }
        }
    }

    debug!(
        "input ended after {} delays in state {}",
        receiver.pulse_counter(),
        receiver.decoder().state()
    );

    match read_error {
        Some(err) => Err(err).with_context(|| {
            format!(
                "unable to read delay {} of input",
                receiver.pulse_counter() + 1
            )
        }),
        None => Ok(()),
    }
}

/// Run in demonstration mode
///
/// Synthesizes `frames` consecutive frames, starting at the
/// current time, and decodes them.
pub fn run_demo(
    args: &Args,
    receiver: &mut IrigbReceiver,
    frames: u8,
) -> Result<(), anyhow::Error> {
    warn!("demonstration (--demo) mode: the following timestamps are NOT LIVE!");

    let delays = make_demo_delays(&Utc::now(), frames, receiver.ticks_per_ms());
    run(args, receiver, delays.into_iter().map(Ok))
}

// Format a decoded time and date for output
//
// If `rfc3339` is set but the timestamp is not a valid date,
// falls back to the plain format.
fn format_time_date(td: &TimeDate, rfc3339: bool) -> String {
    if !rfc3339 {
        return td.to_string();
    }

    match td.to_utc() {
        Ok(ts) => ts.to_rfc3339_opts(SecondsFormat::Secs, true),
        Err(err) => {
            warn!("{}: {}", err, td);
            td.to_string()
        }
    }
}

// Create demonstration delays
//
// Encodes `frames` frames, one per second, beginning at `at`.
// Delays are scaled to `ticks_per_ms`. The stream begins with
// the end marker of the frame before `at`.
fn make_demo_delays(at: &DateTime<Utc>, frames: u8, ticks_per_ms: u32) -> Vec<u32> {
    let mut out: Vec<u8> = vec![8, 2];
    for i in 0..frames {
        let ts = *at + Duration::seconds(i as i64);
        let frame = encode_frame(
            ts.second() as u8,
            ts.minute() as u8,
            ts.hour() as u8,
            ts.ordinal() as u16,
            (ts.year() % 100) as u8,
        );
        out.extend(frame_pulses(&frame));
    }

    out.into_iter()
        .map(|d| (d as u32).saturating_mul(ticks_per_ms))
        .collect()
}
