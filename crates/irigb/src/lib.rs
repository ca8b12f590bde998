//! # irigb: IRIG-B Timecode Decoding
//!
//! This crate decodes the
//! [IRIG-B](https://en.wikipedia.org/wiki/IRIG_timecode) timecode
//! into a calendar date and time. IRIG-B is used to distribute
//! time across test ranges, power substations, and telescope
//! observatories. It transmits one frame per second, and each
//! frame holds 100 pulse-width-coded bits.
//!
//! ## Disclaimer
//!
//! This crate is dual-licensed MIT and Apache 2.0. Read these licenses
//! carefully as they may affect your rights.
//!
//! This crate only decodes the year and day-of-year flavors of IRIG-B
//! (B004 through B007). Years are two digits only and are assumed to
//! fall between 2000 and 2099. Control functions and straight binary
//! seconds are read but ignored.
//!
//! ## Example
//!
//! You will first need to measure the time between successive
//! *edges* of the IRIG-B signal, both rising and falling. This is
//! usually done with a timer capture peripheral or an interrupt
//! handler. Obtaining these delays is beyond the scope of this
//! crate. Each bit of the timecode is 10 ms long, and this crate
//! only needs to know whether each delay is about 2, 5, or 8 ms.
//!
//! ```
//! use irigb::{FrameDecoder, PulseClass};
//!
//! # let some_edge_timer = || irigb::frame_pulses(&irigb::encode_frame(30, 15, 9, 45, 24))
//! #     .map(|d| d as u32)
//! #     .collect::<Vec<u32>>();
//! let mut decoder = FrameDecoder::new();
//!
//! // let delays_ms be the time between each edge, in milliseconds
//! let delays_ms = some_edge_timer();
//! # let delays_ms = [8, 2].into_iter().chain(delays_ms);
//! for delay in delays_ms {
//!     decoder.feed(PulseClass::classify(delay));
//! }
//!
//! // once a full frame is read, the time is available in BCD
//! let (td, ok) = decoder.assemble();
//! if ok {
//!     println!("it is now {}", td);
//! }
//! # assert!(ok);
//! # assert_eq!(0x14, td.day_of_month);
//! ```
//!
//! The [`FrameDecoder`] accepts one classified delay at a time.
//! It first *chases* the frame boundary, which is marked by two
//! position identifiers in a row. It then reads a whole frame. Once
//! the first full frame is read, the decoder is
//! [`Locked`](SyncState::Locked) and the
//! [`TimeDate`] may be obtained. Any invalid delay causes the
//! decoder to drop sync and start over.
//!
//! If your delays are measured in timer ticks, or if you would
//! prefer to be told when each frame arrives, use the
//! [`IrigbReceiver`] instead.
//!
//! The [`TimeDate`] is given in packed BCD, like many RTC chips.
//! The [`bcd`](bin_to_bcd8) and [`calendar`](day_of_week)
//! utilities are available on their own.
//!
//! ## Crate features
//!
//! * `chrono`: Use chrono to convert a [`TimeDate`] into a
//!   true UTC timestamp. If enabled, `chrono` becomes part of
//!   this crate's public API.
//!

mod bcd;
mod calendar;
mod framing;
mod pulse;
mod receiver;
mod timecode;
mod timedate;

pub use bcd::{bcd_to_bin16, bcd_to_bin8, bin_to_bcd16, bin_to_bcd8};
pub use calendar::{
    day_of_week, day_of_year_from_month_and_day, days_of_month, days_of_year, is_leap,
    month_and_day_from_day_of_year,
};
pub use framing::{bit_slot, is_marker_position, BitSlot, FrameDecoder, SyncState, FRAME_LENGTH};
pub use pulse::{classify, FrameSymbol, PulseClass};
pub use receiver::{FrameOut, IrigbReceiver, SourceIter};
pub use timecode::{encode_frame, frame_pulses, Frame};
pub use timedate::{InvalidDateErr, NotLockedErr, TimeDate};
