//! Pulse classification and symbol decoding
//!
//! Every IRIG-B bit lasts 10 ms. The signal is high for 2, 5,
//! or 8 ms and low for the remainder. A receiver which measures
//! the time between successive edges, regardless of their
//! polarity, therefore sees two delays per bit:
//!
//! | Symbol   | High | Low  |
//! |----------|------|------|
//! | `Zero`   | 2 ms | 8 ms |
//! | `One`    | 5 ms | 5 ms |
//! | `Marker` | 8 ms | 2 ms |
//!
//! Delays are first quantized into a [`PulseClass`]. Pairs of
//! classes are then decoded into a [`FrameSymbol`].

use std::fmt;

/// Quantized width of one delay between edges
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::EnumIter, strum_macros::IntoStaticStr,
)]
pub enum PulseClass {
    /// About 2 ms
    Short,

    /// About 5 ms
    Medium,

    /// About 8 ms
    Long,

    /// Not a valid IRIG-B delay
    Invalid,
}

impl PulseClass {
    /// Classify a raw delay
    ///
    /// `duration` is nominally in milliseconds. Delays of 1–3
    /// are `Short`, 4–6 are `Medium`, and 7–9 are `Long`.
    /// Anything else, including zero, is `Invalid`.
    ///
    /// ```
    /// use irigb::PulseClass;
    ///
    /// assert_eq!(PulseClass::Short, PulseClass::classify(3));
    /// assert_eq!(PulseClass::Long, PulseClass::classify(8));
    /// assert_eq!(PulseClass::Invalid, PulseClass::classify(10));
    /// ```
    pub fn classify(duration: u32) -> Self {
        match duration {
            1..=3 => Self::Short,
            4..=6 => Self::Medium,
            7..=9 => Self::Long,
            _ => Self::Invalid,
        }
    }

    /// Nominal delay, in milliseconds
    ///
    /// Returns the center of this class's band: 2, 5, or 8.
    /// `Invalid` pulses have no nominal delay and return `None`.
    pub fn nominal_ms(&self) -> Option<u8> {
        match self {
            Self::Short => Some(2),
            Self::Medium => Some(5),
            Self::Long => Some(8),
            Self::Invalid => None,
        }
    }

    /// True if this is a valid IRIG-B delay
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::Invalid
    }

    /// Human-readable name
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl From<u32> for PulseClass {
    fn from(duration: u32) -> Self {
        Self::classify(duration)
    }
}

impl fmt::Display for PulseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw delay
///
/// See [`PulseClass::classify()`].
#[inline]
pub fn classify(duration: u32) -> PulseClass {
    PulseClass::classify(duration)
}

/// One IRIG-B bit, decoded from two successive delays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::EnumIter)]
pub enum FrameSymbol {
    /// Binary zero
    Zero,

    /// Binary one
    One,

    /// Position identifier
    ///
    /// Markers delimit each group of ten bits. Two markers in
    /// a row denote the start of a frame.
    Marker,

    /// Not a valid delay pair
    Invalid,
}

impl FrameSymbol {
    /// Decode a pair of delays
    ///
    /// `lead` is the first delay of the pair and `trail` the
    /// second. Order matters: `(Short, Long)` is a `Zero`, but
    /// `(Long, Short)` is a `Marker`.
    ///
    /// ```
    /// use irigb::{FrameSymbol, PulseClass};
    ///
    /// assert_eq!(
    ///     FrameSymbol::One,
    ///     FrameSymbol::from_pulses(PulseClass::Medium, PulseClass::Medium)
    /// );
    /// assert_eq!(
    ///     FrameSymbol::Invalid,
    ///     FrameSymbol::from_pulses(PulseClass::Medium, PulseClass::Long)
    /// );
    /// ```
    pub fn from_pulses(lead: PulseClass, trail: PulseClass) -> Self {
        match (lead, trail) {
            (PulseClass::Short, PulseClass::Long) => Self::Zero,
            (PulseClass::Medium, PulseClass::Medium) => Self::One,
            (PulseClass::Long, PulseClass::Short) => Self::Marker,
            _ => Self::Invalid,
        }
    }

    /// Nominal delays for this symbol, in milliseconds
    ///
    /// Returns the `(high, low)` delays which encode this symbol.
    /// `Invalid` returns `(0, 0)`, which will never classify
    /// as a valid delay.
    pub fn pulses(&self) -> (u8, u8) {
        match self {
            Self::Zero => (2, 8),
            Self::One => (5, 5),
            Self::Marker => (8, 2),
            Self::Invalid => (0, 0),
        }
    }

    /// Single-character representation
    ///
    /// `'0'`, `'1'`, `'P'` for a marker, or `'?'`.
    pub fn as_char(&self) -> char {
        match self {
            Self::Zero => '0',
            Self::One => '1',
            Self::Marker => 'P',
            Self::Invalid => '?',
        }
    }
}

impl fmt::Display for FrameSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use strum::IntoEnumIterator;

    #[test]
    fn test_classify() {
        for d in [1, 2, 3] {
            assert_eq!(PulseClass::Short, classify(d));
        }
        for d in [4, 5, 6] {
            assert_eq!(PulseClass::Medium, classify(d));
        }
        for d in [7, 8, 9] {
            assert_eq!(PulseClass::Long, classify(d));
        }
        for d in [0, 10, 11, 255, 256, u32::MAX] {
            assert_eq!(PulseClass::Invalid, classify(d));
        }
    }

    #[test]
    fn test_nominal_classifies_to_self() {
        for class in PulseClass::iter() {
            match class.nominal_ms() {
                Some(ms) => assert_eq!(class, PulseClass::from(ms as u32)),
                None => assert!(!class.is_valid()),
            }
        }
    }

    #[test]
    fn test_from_pulses() {
        let mut valid = 0;
        for lead in PulseClass::iter() {
            for trail in PulseClass::iter() {
                let sym = FrameSymbol::from_pulses(lead, trail);
                match (lead, trail) {
                    (PulseClass::Short, PulseClass::Long) => assert_eq!(FrameSymbol::Zero, sym),
                    (PulseClass::Medium, PulseClass::Medium) => assert_eq!(FrameSymbol::One, sym),
                    (PulseClass::Long, PulseClass::Short) => assert_eq!(FrameSymbol::Marker, sym),
                    _ => {
                        assert_eq!(FrameSymbol::Invalid, sym);
                        continue;
                    }
                }
                valid += 1;
            }
        }
        assert_eq!(3, valid);
    }

    #[test]
    fn test_symbol_pulses() {
        for sym in FrameSymbol::iter() {
            let (high, low) = sym.pulses();
            assert_eq!(
                sym,
                FrameSymbol::from_pulses(classify(high as u32), classify(low as u32))
            );
        }
        assert_eq!("01P?", FrameSymbol::iter().map(|s| s.as_char()).collect::<String>());
    }
}
