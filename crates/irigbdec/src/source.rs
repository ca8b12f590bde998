//! Sources of raw delays
//!
//! Every source yields `io::Result<u32>`. An `Err` is a read
//! failure and ends decoding. End-of-file is not an error.

use std::io::{self, BufRead};

use byteorder::{NativeEndian, ReadBytesExt};
use log::warn;

/// Read whitespace-separated decimal delays
///
/// Input is split on newlines and decoded lossily, so bytes
/// which are not UTF-8 become part of an unparseable token.
/// Tokens which are not unsigned integers are reported and
/// replaced with a zero delay. This is never a valid IRIG-B
/// delay, so the decoder will drop sync and start over.
pub fn text_delays<'a, R>(input: R) -> impl Iterator<Item = io::Result<u32>> + 'a
where
    R: BufRead + 'a,
{
    // stop after the first read error
    let mut failed = false;
    input
        .split(b'\n')
        .map_while(move |line| {
            if failed {
                return None;
            }
            failed = line.is_err();
            Some(line)
        })
        .flat_map(|line| match line {
            Ok(line) => String::from_utf8_lossy(&line)
                .split_whitespace()
                .map(|token| Ok(parse_delay(token)))
                .collect::<Vec<_>>(),
            Err(err) => vec![Err(err)],
        })
}

/// Read native-endian `u16` delays
///
/// A trailing partial sample is discarded.
pub fn u16_delays<'a, R>(mut input: R) -> impl Iterator<Item = io::Result<u32>> + 'a
where
    R: BufRead + 'a,
{
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }

        match input.read_u16::<NativeEndian>() {
            Ok(delay) => Some(Ok(delay as u32)),
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                done = true;
                None
            }
            Err(err) => {
                done = true;
                Some(Err(err))
            }
        }
    })
}

// Parse one decimal delay, or zero if it isn't one
fn parse_delay(token: &str) -> u32 {
    match token.parse::<u32>() {
        Ok(delay) => delay,
        Err(err) => {
            warn!("invalid delay \"{}\": {}", token, err);
            0
        }
    }
}
