//! IRIG-B pulse stream synthesis
//!
//! Generates nominal delays for a frame, for use when testing
//! a receiver without a time source attached.
//!
//! ```
//! use irigb::{encode_frame, frame_pulses, FrameDecoder, PulseClass};
//!
//! let frame = encode_frame(30, 15, 9, 45, 24);
//! let mut decoder = FrameDecoder::new();
//!
//! // the previous frame's end marker, then our frame
//! for d in [8, 2].into_iter().chain(frame_pulses(&frame)) {
//!     decoder.feed(PulseClass::classify(d as u32));
//! }
//!
//! let (td, ok) = decoder.assemble();
//! assert!(ok);
//! assert_eq!(0x09, td.hour);
//! ```

use crate::bcd::{bin_to_bcd16, bin_to_bcd8};
use crate::framing::{bit_slot, is_marker_position, FRAME_LENGTH};
use crate::pulse::FrameSymbol;

/// One frame's worth of symbols
pub type Frame = [FrameSymbol; FRAME_LENGTH as usize];

/// Lay out one frame
///
/// Encodes the given `second`, `minute`, `hour`, one-based
/// `day_of_year`, and two-digit `year` as a frame of symbols.
/// All inputs are binary, not BCD. Position 0 holds the frame
/// reference marker and position 99 holds the end-of-frame
/// marker.
///
/// Index bits, control functions, and straight binary seconds
/// are all sent as `Zero`.
pub fn encode_frame(second: u8, minute: u8, hour: u8, day_of_year: u16, year: u8) -> Frame {
    let day_of_year = bin_to_bcd16(day_of_year);

    // BCD value finalized by each marker group
    let groups: [u8; 7] = [
        0,
        bin_to_bcd8(second),
        bin_to_bcd8(minute),
        bin_to_bcd8(hour),
        (day_of_year & 0xff) as u8,
        (day_of_year >> 8) as u8,
        bin_to_bcd8(year),
    ];

    let mut frame = [FrameSymbol::Zero; FRAME_LENGTH as usize];
    for (position, symbol) in (0..FRAME_LENGTH).zip(frame.iter_mut()) {
        if is_marker_position(position) {
            *symbol = FrameSymbol::Marker;
            continue;
        }

        // data bits belong to the group ended by the next marker
        let slot = bit_slot(position);
        let value = groups.get(slot.group as usize + 1).copied().unwrap_or(0);
        if let Some(bit) = slot.accumulator_bit {
            if value & (1 << bit) != 0 {
                *symbol = FrameSymbol::One;
            }
        }
    }

    frame
}

/// Nominal delays for a frame
///
/// Yields two delays, in milliseconds, for each symbol of
/// `frame`.
pub fn frame_pulses(frame: &Frame) -> impl Iterator<Item = u8> + '_ {
    frame.iter().flat_map(|sym| {
        let (high, low) = sym.pulses();
        [high, low]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_frame() {
        let frame = encode_frame(30, 15, 9, 45, 24);
        let text: String = frame.iter().map(|s| s.as_char()).collect();
        assert_eq!(
            concat!(
                "P00000110P",
                "101001000P",
                "100100000P",
                "101000010P",
                "000000000P",
                "001000100P",
                "000000000P",
                "000000000P",
                "000000000P",
                "000000000P"
            ),
            text
        );
    }

    #[test]
    fn test_frame_pulses() {
        let frame = encode_frame(1, 0, 0, 1, 0);
        let pulses: Vec<u8> = frame_pulses(&frame).collect();
        assert_eq!(200, pulses.len());
        assert_eq!(&[8, 2, 5, 5, 2, 8], &pulses[0..6]);
        assert_eq!(&[8, 2], &pulses[198..200]);
    }
}
