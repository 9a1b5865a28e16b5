//! 256-bit word arithmetic
//!
//! Unsigned operations wrap modulo 2^256. Signed operations reinterpret
//! their operands as two's-complement integers (bit 255 is the sign) and
//! re-encode negative results back to their unsigned bit pattern.
//! Division and modulus by zero yield zero.

use ember_primitives::{Word, U512};

/// Zero word
pub const ZERO: Word = Word::zero();

/// Convert a flag to 1 or 0
pub fn from_bool(flag: bool) -> Word {
    if flag {
        Word::one()
    } else {
        Word::zero()
    }
}

/// Narrow a word to usize if it fits
pub fn to_usize(value: &Word) -> Option<usize> {
    if *value > Word::from(usize::MAX) {
        None
    } else {
        Some(value.low_u64() as usize)
    }
}

/// Check if a value is negative in two's complement
pub fn is_negative(value: &Word) -> bool {
    value.bit(255)
}

/// Two's complement negation: !v + 1
pub fn negate(value: Word) -> Word {
    (!value).overflowing_add(Word::one()).0
}

fn abs(value: Word) -> Word {
    if is_negative(&value) {
        negate(value)
    } else {
        value
    }
}

/// Low 256 bits of a 512-bit intermediate
fn low_half(value: U512) -> Word {
    let mut buf = [0u8; 64];
    value.to_big_endian(&mut buf);
    Word::from_big_endian(&buf[32..])
}

/// a + b mod 2^256
pub fn add(a: Word, b: Word) -> Word {
    a.overflowing_add(b).0
}

/// a - b mod 2^256
pub fn sub(a: Word, b: Word) -> Word {
    a.overflowing_sub(b).0
}

/// a * b mod 2^256
pub fn mul(a: Word, b: Word) -> Word {
    a.overflowing_mul(b).0
}

/// Unsigned division, zero when b is zero
pub fn div(a: Word, b: Word) -> Word {
    if b.is_zero() {
        ZERO
    } else {
        a / b
    }
}

/// Unsigned modulus, zero when b is zero
pub fn rem(a: Word, b: Word) -> Word {
    if b.is_zero() {
        ZERO
    } else {
        a % b
    }
}

/// Signed division truncating toward zero, zero when b is zero.
///
/// `-2^255 / -1` overflows back to `-2^255`.
pub fn sdiv(a: Word, b: Word) -> Word {
    if b.is_zero() {
        return ZERO;
    }
    let quotient = abs(a) / abs(b);
    if is_negative(&a) != is_negative(&b) {
        negate(quotient)
    } else {
        quotient
    }
}

/// Signed modulus taking the sign of the dividend, zero when b is zero
pub fn smod(a: Word, b: Word) -> Word {
    if b.is_zero() {
        return ZERO;
    }
    let remainder = abs(a) % abs(b);
    if is_negative(&a) {
        negate(remainder)
    } else {
        remainder
    }
}

/// (a + b) mod n without losing the carry, zero when n is zero
pub fn addmod(a: Word, b: Word, n: Word) -> Word {
    if n.is_zero() {
        return ZERO;
    }
    let sum = U512::from(a) + U512::from(b);
    low_half(sum % U512::from(n))
}

/// (a * b) mod n over the full 512-bit product, zero when n is zero
pub fn mulmod(a: Word, b: Word, n: Word) -> Word {
    if n.is_zero() {
        return ZERO;
    }
    low_half(a.full_mul(b) % U512::from(n))
}

/// base ^ exponent mod 2^256
pub fn exp(base: Word, exponent: Word) -> Word {
    base.overflowing_pow(exponent).0
}

/// Sign-extend `value` from the byte at index `byte` (0 = least significant)
pub fn signextend(byte: Word, value: Word) -> Word {
    if byte >= Word::from(31u64) {
        return value;
    }
    let sign_bit = byte.low_u64() as usize * 8 + 7;
    let mask = (Word::one() << (sign_bit + 1)) - 1;
    if value.bit(sign_bit) {
        value | !mask
    } else {
        value & mask
    }
}

/// Signed a < b
pub fn slt(a: &Word, b: &Word) -> bool {
    match (is_negative(a), is_negative(b)) {
        (true, false) => true,
        (false, true) => false,
        _ => a < b,
    }
}

/// Signed a > b
pub fn sgt(a: &Word, b: &Word) -> bool {
    slt(b, a)
}

/// Big-endian byte `index` of `value` (0 = most significant), zero past 31
pub fn byte(index: Word, value: Word) -> Word {
    if index >= Word::from(32u64) {
        return ZERO;
    }
    let index = index.low_u64() as usize;
    Word::from(value.byte(31 - index))
}

/// value << shift, zero once shift reaches 256
pub fn shl(shift: Word, value: Word) -> Word {
    if shift >= Word::from(256u64) {
        return ZERO;
    }
    value << (shift.low_u64() as usize)
}

/// Logical value >> shift, zero once shift reaches 256
pub fn shr(shift: Word, value: Word) -> Word {
    if shift >= Word::from(256u64) {
        return ZERO;
    }
    value >> (shift.low_u64() as usize)
}

/// Arithmetic value >> shift, filling with the sign bit
pub fn sar(shift: Word, value: Word) -> Word {
    let negative = is_negative(&value);
    if shift >= Word::from(256u64) {
        return if negative { Word::MAX } else { ZERO };
    }
    let shift = shift.low_u64() as usize;
    if negative {
        !((!value) >> shift)
    } else {
        value >> shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(n: u64) -> Word {
        Word::from(n)
    }

    fn neg(n: u64) -> Word {
        negate(w(n))
    }

    #[test]
    fn test_add_wraps() {
        assert_eq!(add(w(1), w(2)), w(3));
        assert_eq!(add(Word::MAX, w(2)), w(1));
    }

    #[test]
    fn test_sub_wraps() {
        assert_eq!(sub(w(10), w(3)), w(7));
        assert_eq!(sub(w(0), w(1)), Word::MAX);
    }

    #[test]
    fn test_mul_wraps() {
        assert_eq!(mul(w(6), w(7)), w(42));
        assert_eq!(mul(Word::MAX, w(2)), Word::MAX - 1);
    }

    #[test]
    fn test_div_and_rem_by_zero() {
        assert_eq!(div(w(10), w(0)), ZERO);
        assert_eq!(rem(w(10), w(0)), ZERO);
        assert_eq!(sdiv(neg(10), w(0)), ZERO);
        assert_eq!(smod(neg(10), w(0)), ZERO);
    }

    #[test]
    fn test_div_and_rem() {
        assert_eq!(div(w(10), w(3)), w(3));
        assert_eq!(rem(w(10), w(3)), w(1));
    }

    #[test]
    fn test_sdiv() {
        assert_eq!(sdiv(neg(10), neg(2)), w(5));
        assert_eq!(sdiv(neg(10), w(3)), neg(3));
        assert_eq!(sdiv(w(10), neg(3)), neg(3));
        let min = Word::one() << 255;
        assert_eq!(sdiv(min, Word::MAX), min);
    }

    #[test]
    fn test_smod() {
        assert_eq!(smod(neg(8), neg(3)), neg(2));
        assert_eq!(smod(w(8), neg(3)), w(2));
        assert_eq!(smod(neg(8), w(3)), neg(2));
    }

    #[test]
    fn test_addmod_keeps_carry() {
        assert_eq!(addmod(w(10), w(10), w(8)), w(4));
        assert_eq!(addmod(Word::MAX, w(2), w(2)), w(1));
        assert_eq!(addmod(w(1), w(1), w(0)), ZERO);
    }

    #[test]
    fn test_mulmod_full_product() {
        assert_eq!(mulmod(w(10), w(10), w(8)), w(4));
        assert_eq!(mulmod(Word::MAX, Word::MAX, w(12)), w(9));
        assert_eq!(mulmod(w(3), w(3), w(0)), ZERO);
    }

    #[test]
    fn test_exp() {
        assert_eq!(exp(w(10), w(2)), w(100));
        assert_eq!(exp(w(2), w(256)), ZERO);
        assert_eq!(exp(w(0), w(0)), w(1));
    }

    #[test]
    fn test_signextend() {
        assert_eq!(signextend(w(0), w(0xFF)), Word::MAX);
        assert_eq!(signextend(w(0), w(0x7F)), w(0x7F));
        assert_eq!(signextend(w(1), w(0xFF_7F)), Word::MAX - 0x80);
        assert_eq!(signextend(w(31), w(0xFF)), w(0xFF));
        assert_eq!(signextend(Word::MAX, w(0xFF)), w(0xFF));
    }

    #[test]
    fn test_signed_comparison() {
        assert!(slt(&neg(1), &w(0)));
        assert!(!slt(&w(0), &neg(1)));
        assert!(sgt(&w(10), &w(9)));
        assert!(sgt(&neg(1), &neg(2)));
        assert!(!slt(&w(5), &w(5)));
    }

    #[test]
    fn test_byte() {
        let value = w(0xFF) << 248;
        assert_eq!(byte(w(0), value), w(0xFF));
        assert_eq!(byte(w(31), w(0xAB)), w(0xAB));
        assert_eq!(byte(w(32), Word::MAX), ZERO);
    }

    #[test]
    fn test_shifts() {
        assert_eq!(shl(w(1), w(1)), w(2));
        assert_eq!(shl(w(4), Word::MAX), Word::MAX - 0x0F);
        assert_eq!(shl(w(256), w(1)), ZERO);
        assert_eq!(shr(w(1), w(2)), w(1));
        assert_eq!(shr(w(256), Word::MAX), ZERO);
    }

    #[test]
    fn test_sar() {
        assert_eq!(sar(w(1), w(2)), w(1));
        assert_eq!(sar(w(4), neg(16)), neg(1));
        assert_eq!(sar(w(256), neg(1)), Word::MAX);
        assert_eq!(sar(w(300), w(5)), ZERO);
    }

    #[test]
    fn test_usize_conversion() {
        assert_eq!(to_usize(&w(42)), Some(42));
        assert_eq!(to_usize(&Word::MAX), None);
    }
}
