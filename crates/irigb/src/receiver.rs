//! Streaming receiver

#[cfg(not(test))]
use log::{debug, info};

#[cfg(test)]
use std::println as debug;
#[cfg(test)]
use std::println as info;

use std::iter::{IntoIterator, Iterator};

use crate::framing::{FrameDecoder, SyncState, FRAME_LENGTH};
use crate::pulse::PulseClass;
use crate::timedate::TimeDate;

/// Receiver event
///
/// Emitted by the [`IrigbReceiver`] whenever the frame
/// synchronization changes or a frame is completed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FrameOut {
    /// Synchronization lost; searching for a frame boundary
    Searching,

    /// Frame boundary found; reading the first frame
    Acquiring,

    /// A full frame has been read
    ///
    /// Contains the time and date which the frame carries.
    Ready(TimeDate),
}

impl FrameOut {
    /// Time and date, if this event completes a frame
    pub fn time_date(&self) -> Option<&TimeDate> {
        match self {
            Self::Ready(td) => Some(td),
            _ => None,
        }
    }

    /// Consume event, returning the time and date, if any
    pub fn into_time_date(self) -> Option<TimeDate> {
        match self {
            Self::Ready(td) => Some(td),
            _ => None,
        }
    }
}

/// IRIG-B receiver for raw delays
///
/// Wraps a [`FrameDecoder`] and accepts raw timer values
/// instead of classified delays. Each raw value is converted
/// to milliseconds, rounding to the nearest, before it is
/// [classified](PulseClass::classify).
///
/// ```
/// use irigb::{encode_frame, frame_pulses, FrameOut, IrigbReceiver};
///
/// // timer runs at 1 kHz: ticks are milliseconds
/// let mut rx = IrigbReceiver::new(1);
///
/// let frame = encode_frame(30, 15, 9, 45, 24);
/// let source = [8, 2].into_iter().chain(frame_pulses(&frame)).map(|d| d as u32);
///
/// let events: Vec<FrameOut> = rx.iter(source).collect();
/// assert_eq!(FrameOut::Acquiring, events[0]);
/// let td = events[1].time_date().expect("expected frame");
/// assert_eq!(0x30, td.second);
/// ```
///
/// The receiver is not thread-safe. Feed it from one place,
/// such as a single capture interrupt handler or polling loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IrigbReceiver {
    decoder: FrameDecoder,
    ticks_per_ms: u32,
    pulse_counter: u64,
}

impl IrigbReceiver {
    /// New receiver
    ///
    /// Raw delays are measured in timer ticks, and there are
    /// `ticks_per_ms` ticks in one millisecond. A value of zero
    /// is treated as one.
    pub fn new(ticks_per_ms: u32) -> Self {
        Self {
            decoder: FrameDecoder::new(),
            ticks_per_ms: ticks_per_ms.max(1),
            pulse_counter: 0,
        }
    }

    /// Timer ticks per millisecond
    pub fn ticks_per_ms(&self) -> u32 {
        self.ticks_per_ms
    }

    /// Lifetime total of delays processed
    pub fn pulse_counter(&self) -> u64 {
        self.pulse_counter
    }

    /// The frame decoder
    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    /// Discard all state and search for a frame boundary
    pub fn reset(&mut self) {
        self.decoder.reset();
        self.pulse_counter = 0;
    }

    /// Convert a raw delay to milliseconds
    pub fn ticks_to_ms(&self, ticks: u32) -> u32 {
        let rounded = ticks as u64 + (self.ticks_per_ms / 2) as u64;
        (rounded / self.ticks_per_ms as u64) as u32
    }

    /// Process one raw delay
    ///
    /// Returns an event if the delay changed the frame
    /// synchronization or completed a frame. Returns `None`
    /// otherwise.
    pub fn input(&mut self, ticks: u32) -> Option<FrameOut> {
        let pulse = PulseClass::classify(self.ticks_to_ms(ticks));
        let last_state = self.decoder.state();
        let last_position = self.decoder.frame_position();

        let state = self.decoder.feed(pulse);
        self.pulse_counter = self.pulse_counter.wrapping_add(1);

        let frame_complete = state == SyncState::Locked
            && self.decoder.frame_position() == 0
            && last_position == FRAME_LENGTH - 1;

        if frame_complete {
            let (td, _) = self.decoder.assemble();
            if last_state == SyncState::Acquiring {
                info!("receiver [{:<10}]: frame locked", self.pulse_counter);
            }
            debug!("receiver [{:<10}]: {}", self.pulse_counter, td);
            Some(FrameOut::Ready(td))
        } else if last_state.is_chasing() && !state.is_chasing() {
            info!("receiver [{:<10}]: found frame start", self.pulse_counter);
            Some(FrameOut::Acquiring)
        } else if !last_state.is_chasing() && state.is_chasing() {
            info!(
                "receiver [{:<10}]: sync lost at frame position {}",
                self.pulse_counter, last_position
            );
            Some(FrameOut::Searching)
        } else {
            None
        }
    }

    /// Receive events from a source of raw delays
    ///
    /// Binds an iterator which consumes the `input` and emits
    /// [`FrameOut`] events. The iterator consumes as many delays
    /// as are required to produce the next event. It returns
    /// `None` once the `input` is exhausted.
    #[must_use = "iterators are lazy and do nothing unless consumed"]
    pub fn iter<'rx, I, T>(&'rx mut self, input: I) -> SourceIter<'rx, T>
    where
        I: IntoIterator<Item = u32> + IntoIterator<IntoIter = T>,
        T: Iterator<Item = u32>,
    {
        SourceIter {
            source: input.into_iter(),
            receiver: self,
        }
    }

    /// Receive timestamps from a source of raw delays
    ///
    /// Like [`iter()`](IrigbReceiver::iter), but only emits
    /// the time and date of each completed frame.
    #[must_use = "iterators are lazy and do nothing unless consumed"]
    pub fn iter_timestamps<'rx, I, T>(
        &'rx mut self,
        input: I,
    ) -> impl Iterator<Item = TimeDate> + 'rx
    where
        I: IntoIterator<Item = u32> + IntoIterator<IntoIter = T>,
        T: Iterator<Item = u32> + 'rx,
    {
        self.iter(input).filter_map(FrameOut::into_time_date)
    }
}

impl Default for IrigbReceiver {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Raw delay source iterator
///
/// Bound to a source of raw delays. Calling `next()` returns
/// the next [`FrameOut`] event from the [`IrigbReceiver`], or
/// `None` once the source is exhausted.
#[derive(Debug)]
pub struct SourceIter<'rx, I>
where
    I: Iterator<Item = u32>,
{
    source: I,
    receiver: &'rx mut IrigbReceiver,
}

impl<'rx, I> Iterator for SourceIter<'rx, I>
where
    I: Iterator<Item = u32>,
{
    type Item = FrameOut;

    fn next(&mut self) -> Option<Self::Item> {
        for ticks in &mut self.source {
            if let Some(out) = self.receiver.input(ticks) {
                return Some(out);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::timecode::{encode_frame, frame_pulses};

    // Delays for consecutive frames, starting at `second`
    fn make_stream(first_second: u8, count: u8) -> Vec<u32> {
        let mut out = vec![8, 2];
        for second in first_second..first_second + count {
            let frame = encode_frame(second, 59, 23, 365, 25);
            out.extend(frame_pulses(&frame).map(|d| d as u32));
        }
        out
    }

    #[test]
    fn test_ticks_to_ms() {
        let rx = IrigbReceiver::new(0);
        assert_eq!(1, rx.ticks_per_ms());
        assert_eq!(8, rx.ticks_to_ms(8));

        let rx = IrigbReceiver::new(32);
        assert_eq!(0, rx.ticks_to_ms(15));
        assert_eq!(1, rx.ticks_to_ms(16));
        assert_eq!(2, rx.ticks_to_ms(64));
        assert_eq!(8, rx.ticks_to_ms(270));
        assert_eq!(134217728, rx.ticks_to_ms(u32::MAX));
    }

    #[test]
    fn test_receiver_events() {
        let mut rx = IrigbReceiver::default();
        let stream = make_stream(10, 3);
        let events: Vec<FrameOut> = rx.iter(stream.iter().copied()).collect();

        assert_eq!(4, events.len());
        assert_eq!(FrameOut::Acquiring, events[0]);
        for (evt, second) in events[1..].iter().zip([0x10, 0x11, 0x12]) {
            let td = evt.time_date().expect("expected frame");
            assert_eq!(second, td.second);
            assert_eq!(0x59, td.minute);
            assert_eq!(0x23, td.hour);
            assert_eq!(0x12, td.month);
            assert_eq!(0x31, td.day_of_month);
            assert_eq!(0x25, td.year);
        }

        assert_eq!(stream.len() as u64, rx.pulse_counter());
        assert!(rx.decoder().is_locked());
    }

    #[test]
    fn test_receiver_loses_sync() {
        let mut rx = IrigbReceiver::new(4);
        let mut stream: Vec<u32> = make_stream(0, 1).iter().map(|d| d * 4).collect();
        stream.push(0);
        stream.extend(make_stream(30, 1).iter().map(|d| d * 4 + 1));

        let events: Vec<FrameOut> = rx.iter(stream).collect();
        assert_eq!(5, events.len());
        assert_eq!(FrameOut::Acquiring, events[0]);
        assert_eq!(Some(0x00), events[1].time_date().map(|td| td.second));
        assert_eq!(FrameOut::Searching, events[2]);
        assert_eq!(FrameOut::Acquiring, events[3]);
        assert_eq!(Some(0x30), events[4].time_date().map(|td| td.second));
    }

    #[test]
    fn test_iter_timestamps() {
        let mut rx = IrigbReceiver::default();
        let seconds: Vec<u8> = rx
            .iter_timestamps(make_stream(40, 5))
            .map(|td| td.second)
            .collect();
        assert_eq!(vec![0x40, 0x41, 0x42, 0x43, 0x44], seconds);

        rx.reset();
        assert_eq!(0, rx.pulse_counter());
        assert_eq!(SyncState::ChaseEndMarkerHigh, rx.decoder().state());
    }
}
