//! IRIG-B frame synchronization and decoding

#[cfg(not(test))]
use log::{debug, trace};

#[cfg(test)]
use std::println as debug;
#[cfg(test)]
use std::println as trace;

use std::fmt;

use crate::pulse::{FrameSymbol, PulseClass};
use crate::timedate::TimeDate;

/// Number of bit positions in one frame
pub const FRAME_LENGTH: u8 = 100;

/// Frame synchronization state
///
/// The decoder starts by *chasing* the frame boundary. The end
/// of one frame (`P0`, at position 99) and the start of the next
/// (`Pr`, at position 0) are the only place where two markers
/// appear back-to-back:
///
/// ```txt
///   … | P0 high | P0 low | Pr high | Pr low | first data bit …
///   … |  Long   | Short  |  Long   | Short  | Short or Medium
/// ```
///
/// Each `Chase*` state waits for one of these delays. Once the
/// first data bit begins, the decoder is `Acquiring` its first
/// frame. When a full frame has been read, it is `Locked` and
/// stays locked for as long as the signal remains valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::IntoStaticStr)]
pub enum SyncState {
    /// Waiting for the high part of the end-of-frame marker
    ChaseEndMarkerHigh,

    /// Waiting for the low part of the end-of-frame marker
    ChaseEndMarkerLow,

    /// Waiting for the high part of the frame reference marker
    ChaseStartMarkerHigh,

    /// Waiting for the low part of the frame reference marker
    ChaseStartMarkerLow,

    /// Waiting for the first delay of the first data bit
    ChaseFirstDataPulse,

    /// Reading the first frame
    ///
    /// Scratch fields may be partial or stale.
    Acquiring,

    /// At least one full frame has been read
    Locked,
}

impl SyncState {
    /// True if still searching for the frame boundary
    pub fn is_chasing(&self) -> bool {
        !matches!(self, Self::Acquiring | Self::Locked)
    }

    /// True if a full frame has been read
    pub fn is_locked(&self) -> bool {
        *self == Self::Locked
    }

    /// Name of this state, like `ChaseEndMarkerHigh`
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::ChaseEndMarkerHigh
    }
}

/// Where a frame position is stored
///
/// Returned by [`bit_slot()`]. Every position belongs to a
/// `group` of bits which is finalized by the marker that ends
/// the group. Positions which carry a BCD bit report the
/// scratch accumulator bit which they set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitSlot {
    /// Marker group index
    ///
    /// The marker at position `p` finalizes group `(p + 1) / 10`.
    /// Group 1 is seconds, 2 is minutes, 3 is hours, 4 and 5 are
    /// the day of year, and 6 is the year. Groups 7–10 carry
    /// control functions and straight binary seconds.
    pub group: u8,

    /// Scratch accumulator bit, if this position carries one
    pub accumulator_bit: Option<u8>,
}

/// Map a frame position to its group and accumulator bit
///
/// Within each group of ten positions, the first four carry
/// the BCD units digit (accumulator bits 0–3), the fifth is an
/// unused index bit, and the next four carry the tens digit
/// (accumulator bits 4–7). The tenth position is a marker.
///
/// The seconds group is one position shorter: position 0 is the
/// frame reference marker, so positions 1–8 map to local
/// indices 0–7.
///
/// ```
/// use irigb::{bit_slot, BitSlot};
///
/// // seconds units, bit 0
/// assert_eq!(BitSlot { group: 0, accumulator_bit: Some(0) }, bit_slot(1));
/// // unused index bit
/// assert_eq!(BitSlot { group: 1, accumulator_bit: None }, bit_slot(14));
/// // end of the minutes group
/// assert_eq!(BitSlot { group: 2, accumulator_bit: None }, bit_slot(19));
/// ```
pub fn bit_slot(position: u8) -> BitSlot {
    let group = ((position as u16 + 1) / 10) as u8;
    let local = match (group, position % 10) {
        (0, 0) => None,
        (0, local) => Some(local - 1),
        (_, local) => Some(local),
    };

    let accumulator_bit = match local {
        Some(local @ 0..=3) => Some(local),
        Some(local @ 5..=8) => Some(local - 1),
        _ => None,
    };

    BitSlot {
        group,
        accumulator_bit,
    }
}

/// True if a marker may legally appear at `position`
#[inline]
pub fn is_marker_position(position: u8) -> bool {
    position == 0 || position % 10 == 9
}

/// IRIG-B frame decoder
///
/// The `FrameDecoder` accepts one classified delay at a time
/// via [`feed()`](FrameDecoder::feed) and tracks frame
/// synchronization. It holds the BCD scratch fields for the
/// frame in progress. Once [locked](SyncState::Locked), use
/// [`assemble()`](FrameDecoder::assemble) or
/// `TimeDate::try_from()` to obtain the calendar time.
///
/// Any invalid delay or symbol returns the decoder to
/// [`SyncState::ChaseEndMarkerHigh`]. Loss of sync is a
/// normal event, and the decoder will re-lock on its own once
/// the signal is valid again.
///
/// ```
/// use irigb::{FrameDecoder, PulseClass, SyncState};
///
/// let mut decoder = FrameDecoder::new();
/// assert!(!decoder.assemble().1);
///
/// for d in [8, 2, 8, 2, 2] {
///     decoder.feed(PulseClass::classify(d));
/// }
/// assert_eq!(SyncState::Acquiring, decoder.state());
///
/// decoder.feed(PulseClass::Invalid);
/// assert_eq!(SyncState::ChaseEndMarkerHigh, decoder.state());
/// ```
///
/// The decoder performs no I/O and no allocation. It must be fed
/// from a single writer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameDecoder {
    // synchronization state
    state: SyncState,

    // position of the next symbol in the frame, 0 to 99
    frame_position: u8,

    // first delay of a symbol, while waiting for the second
    leading_pulse: Option<PulseClass>,

    // bits of the group in progress
    scratch_acc: u8,

    // BCD scratch fields
    scratch_second: u8,
    scratch_minute: u8,
    scratch_hour: u8,
    scratch_day_of_year: u16,
    scratch_year: u8,
}

impl FrameDecoder {
    /// New decoder, chasing the frame boundary
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all state and chase the frame boundary
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Synchronization state
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// True if a full frame has been read
    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }

    /// Position of the next symbol in the frame
    ///
    /// Ranges from 0 to 99. Only meaningful while
    /// `Acquiring` or `Locked`.
    pub fn frame_position(&self) -> u8 {
        self.frame_position
    }

    /// Seconds, in BCD
    pub fn scratch_second(&self) -> u8 {
        self.scratch_second
    }

    /// Minutes, in BCD
    pub fn scratch_minute(&self) -> u8 {
        self.scratch_minute
    }

    /// Hours, in BCD
    pub fn scratch_hour(&self) -> u8 {
        self.scratch_hour
    }

    /// One-based day of year, in BCD
    pub fn scratch_day_of_year(&self) -> u16 {
        self.scratch_day_of_year
    }

    /// Two-digit year, in BCD
    pub fn scratch_year(&self) -> u8 {
        self.scratch_year
    }

    /// Handle one delay
    ///
    /// Accepts the next classified delay in the IRIG-B pulse
    /// stream and returns the new synchronization state. Delays
    /// must be fed in the order they were received.
    ///
    /// Scratch fields are only guaranteed to describe a single,
    /// complete frame while the returned state is
    /// [`SyncState::Locked`].
    pub fn feed(&mut self, pulse: PulseClass) -> SyncState {
        self.state = match (self.state, pulse) {
            (_, PulseClass::Invalid) => self.resync(),

            (SyncState::ChaseEndMarkerHigh, PulseClass::Long) => SyncState::ChaseEndMarkerLow,

            // a second Long may be the real end marker
            (SyncState::ChaseEndMarkerLow, PulseClass::Short) => SyncState::ChaseStartMarkerHigh,
            (SyncState::ChaseEndMarkerLow, PulseClass::Long) => SyncState::ChaseEndMarkerLow,

            (SyncState::ChaseStartMarkerHigh, PulseClass::Long) => SyncState::ChaseStartMarkerLow,

            // a Long here is the high part of a later end marker
            (SyncState::ChaseStartMarkerLow, PulseClass::Short) => SyncState::ChaseFirstDataPulse,
            (SyncState::ChaseStartMarkerLow, PulseClass::Long) => SyncState::ChaseEndMarkerLow,

            (SyncState::ChaseFirstDataPulse, PulseClass::Short | PulseClass::Medium) => {
                trace!("framing: found frame start");
                self.frame_position = 1;
                self.scratch_acc = 0;
                self.leading_pulse = Some(pulse);
                SyncState::Acquiring
            }

            (SyncState::Acquiring | SyncState::Locked, _) => self.read(pulse),

            (_, _) => self.resync(),
        };

        self.state
    }

    /// Assemble the time and date
    ///
    /// If the decoder is locked, returns the decoded
    /// [`TimeDate`] and `true`. Otherwise, returns a `TimeDate`
    /// with every field set to `0xff` and `false`. This is
    /// expected until the first frame has been read.
    ///
    /// This method does not alter the decoder.
    pub fn assemble(&self) -> (TimeDate, bool) {
        match TimeDate::try_from(self) {
            Ok(td) => (td, true),
            Err(_) => (TimeDate::UNSET, false),
        }
    }

    // Read one delay of a frame in progress
    fn read(&mut self, pulse: PulseClass) -> SyncState {
        let lead = match self.leading_pulse.take() {
            Some(lead) => lead,
            None => {
                self.leading_pulse = Some(pulse);
                return self.state;
            }
        };

        let position = self.frame_position;
        let symbol = FrameSymbol::from_pulses(lead, pulse);
        let slot = bit_slot(position);
        match symbol {
            FrameSymbol::Invalid => {
                debug!(
                    "framing: sync lost: invalid delays ({}, {}) at position {}",
                    lead, pulse, position
                );
                return self.resync();
            }
            FrameSymbol::Marker if !is_marker_position(position) => {
                debug!("framing: sync lost: marker at position {}", position);
                return self.resync();
            }
            FrameSymbol::Marker => {
                self.finalize_group(slot.group);
                self.scratch_acc = 0;
            }
            FrameSymbol::One => {
                if let Some(bit) = slot.accumulator_bit {
                    self.scratch_acc |= 1 << bit;
                }
            }
            FrameSymbol::Zero => {}
        }

        self.frame_position += 1;
        if self.frame_position >= FRAME_LENGTH {
            self.frame_position = 0;
            SyncState::Locked
        } else {
            self.state
        }
    }

    // Store the accumulator in the scratch field for `group`
    //
    // Groups above 6 are read, but not stored.
    fn finalize_group(&mut self, group: u8) {
        let acc = self.scratch_acc;
        match group {
            1 => self.scratch_second = acc & 0x7f,
            2 => self.scratch_minute = acc & 0x7f,
            3 => self.scratch_hour = acc & 0x3f,
            4 => self.scratch_day_of_year = acc as u16,
            5 => self.scratch_day_of_year |= ((acc & 0x03) as u16) << 8,
            6 => self.scratch_year = acc,
            _ => {}
        }
    }

    // Abandon the frame in progress
    fn resync(&mut self) -> SyncState {
        self.leading_pulse = None;
        SyncState::ChaseEndMarkerHigh
    }
}
