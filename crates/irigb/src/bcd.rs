//! Binary-coded decimal conversion
//!
//! IRIG-B transmits each decimal digit of the time as its own
//! group of bits. Packed BCD stores one digit per nibble, with
//! the most significant digit in the highest nibble. This is the
//! same layout used by RTC chips like the DS1307, so a decoded
//! value can be written straight to one of them.
//!
//! ```
//! use irigb::{bcd_to_bin8, bin_to_bcd8, bcd_to_bin16, bin_to_bcd16};
//!
//! assert_eq!(0x59, bin_to_bcd8(59));
//! assert_eq!(59, bcd_to_bin8(0x59));
//! assert_eq!(0x0366, bin_to_bcd16(366));
//! assert_eq!(366, bcd_to_bin16(0x0366));
//! ```

/// Pack a two-digit binary value into BCD
///
/// The tens digit lands in the high nibble and the units digit
/// in the low nibble. `bin` should be in the range `0..=99`.
/// Larger values are not rejected, but the high nibble will not
/// hold a meaningful digit.
#[inline]
pub fn bin_to_bcd8(bin: u8) -> u8 {
    ((bin / 10) << 4) | (bin % 10)
}

/// Unpack a two-digit BCD value
///
/// Each nibble is read independently as `high * 10 + low`. Nibbles
/// above 9 are not rejected.
#[inline]
pub fn bcd_to_bin8(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0f)
}

/// Pack a four-digit binary value into BCD
///
/// One decimal digit per nibble, least significant digit in
/// the lowest nibble. `bin` should be in the range `0..=9999`;
/// digits beyond the fourth are dropped.
pub fn bin_to_bcd16(bin: u16) -> u16 {
    let mut bin = bin;
    let mut bcd = 0u16;
    for shift in (0..16).step_by(4) {
        bcd |= (bin % 10) << shift;
        bin /= 10;
    }
    bcd
}

/// Unpack a four-digit BCD value
pub fn bcd_to_bin16(bcd: u16) -> u16 {
    (0..16)
        .step_by(4)
        .rev()
        .fold(0u16, |acc, shift| 10 * acc + ((bcd >> shift) & 0x0f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcd8() {
        assert_eq!(0x00, bin_to_bcd8(0));
        assert_eq!(0x09, bin_to_bcd8(9));
        assert_eq!(0x10, bin_to_bcd8(10));
        assert_eq!(0x24, bin_to_bcd8(24));
        assert_eq!(0x99, bin_to_bcd8(99));

        for b in 0..=99u8 {
            assert_eq!(b, bcd_to_bin8(bin_to_bcd8(b)));
        }

        // out-of-range nibbles are weighted, not rejected
        assert_eq!(15, bcd_to_bin8(0x0f));
        assert_eq!(165, bcd_to_bin8(0xff));
    }

    #[test]
    fn test_bcd16() {
        assert_eq!(0x0001, bin_to_bcd16(1));
        assert_eq!(0x0045, bin_to_bcd16(45));
        assert_eq!(0x0366, bin_to_bcd16(366));
        assert_eq!(0x9999, bin_to_bcd16(9999));

        for d in 1..=366u16 {
            assert_eq!(d, bcd_to_bin16(bin_to_bcd16(d)));
        }

        assert_eq!(16665, bcd_to_bin16(0xffff));
    }
}
