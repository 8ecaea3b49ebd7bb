//! Exact numeric values for query literals.
//!
//! [`Number64`] holds either a 64-bit integer or an IEEE double. Integers are
//! never routed through `f64` when compared or hashed against each other, and
//! mixed comparisons go through an *extended double*: a double carrying the
//! top 53 significant bits of the integer plus a 16-bit field with up to ten
//! further low-order bits. This keeps values such as `0x1FF_FFFF_FFFF_FFFF`
//! distinct from their nearest double.
//!
//! # Examples
//!
//! ```
//! use cosmos_sql::Number64;
//!
//! let five = Number64::from_integer(5);
//! assert_eq!(five, Number64::from_double(5.0));
//! assert!(Number64::from_integer(i64::MAX) > Number64::from_double(9.0e18));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

const SIGN_BIT: u64 = 1 << 63;
const EXPONENT_BIAS: u64 = 1023;
const MANTISSA_BITS: i32 = 52;

/// A number that is either an exact integer or a double.
#[derive(Debug, Clone, Copy)]
pub struct Number64(Repr);

#[derive(Debug, Clone, Copy)]
enum Repr {
    Integer(i64),
    Double(f64),
}

/// Error raised when a fixed-width buffer cannot hold an encoded [`Number64`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingError {
    /// Bytes needed
    pub required: usize,
    /// Bytes available
    pub actual: usize,
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Buffer too small: encoding a number needs {} bytes, got {}",
            self.required, self.actual
        )
    }
}

impl std::error::Error for EncodingError {}

/// Error raised by [`Number64::decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer than [`Number64::SIZE_OF`] bytes
    BufferTooSmall(EncodingError),

    /// Extra precision bits on a double that no wide integer encodes to
    InvalidExtraBits { double_bits: u64, extra_bits: u16 },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::BufferTooSmall(e) => write!(f, "{}", e),
            DecodeError::InvalidExtraBits {
                double_bits,
                extra_bits,
            } => write!(
                f,
                "Invalid extended number: extra bits {:#06x} on double {:#018x}",
                extra_bits, double_bits
            ),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::BufferTooSmall(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EncodingError> for DecodeError {
    fn from(e: EncodingError) -> Self {
        DecodeError::BufferTooSmall(e)
    }
}

impl Number64 {
    /// Width of the binary form written by [`Number64::encode`].
    pub const SIZE_OF: usize = 10;

    pub const MAX_VALUE: Number64 = Number64(Repr::Double(f64::MAX));
    pub const MIN_VALUE: Number64 = Number64(Repr::Double(f64::MIN));

    pub const fn from_integer(value: i64) -> Self {
        Number64(Repr::Integer(value))
    }

    pub const fn from_double(value: f64) -> Self {
        Number64(Repr::Double(value))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self.0, Repr::Integer(_))
    }

    pub fn is_double(&self) -> bool {
        matches!(self.0, Repr::Double(_))
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self.0, Repr::Double(d) if d.is_infinite())
    }

    pub fn is_nan(&self) -> bool {
        matches!(self.0, Repr::Double(d) if d.is_nan())
    }

    /// Returns the value as an integer, truncating doubles toward zero.
    ///
    /// Out-of-range doubles saturate and NaN becomes `0`.
    pub fn to_integer(&self) -> i64 {
        match self.0 {
            Repr::Integer(i) => i,
            Repr::Double(d) => d as i64,
        }
    }

    /// Returns the value as a double; large integers lose precision.
    pub fn to_double(&self) -> f64 {
        match self.0 {
            Repr::Integer(i) => i as f64,
            Repr::Double(d) => d,
        }
    }

    /// Total order over all numbers.
    ///
    /// Two integers compare exactly and two doubles compare like IEEE values,
    /// except that NaN equals NaN and sorts below every other number. Mixed
    /// pairs compare through the extended-double form.
    pub fn compare(&self, other: &Number64) -> Ordering {
        match (self.0, other.0) {
            (Repr::Integer(a), Repr::Integer(b)) => a.cmp(&b),
            (Repr::Double(a), Repr::Double(b)) => compare_doubles(a, b),
            _ => self.extended().compare(&other.extended()),
        }
    }

    /// 32-bit digest derived from the extended-double form.
    ///
    /// An integer and an equal double produce the same digest.
    pub fn hash32(&self) -> u32 {
        let ex = self.extended().normalized();
        let bits = ex.double_value.to_bits();
        (bits as u32) ^ ((bits >> 32) as u32) ^ u32::from(ex.extra_bits)
    }

    /// Writes the 10-byte little-endian extended-double form into `buffer`.
    pub fn encode(&self, buffer: &mut [u8]) -> Result<(), EncodingError> {
        if buffer.len() < Self::SIZE_OF {
            return Err(EncodingError {
                required: Self::SIZE_OF,
                actual: buffer.len(),
            });
        }

        let ex = self.extended();
        buffer[..8].copy_from_slice(&ex.double_value.to_le_bytes());
        buffer[8..Self::SIZE_OF].copy_from_slice(&ex.extra_bits.to_le_bytes());
        Ok(())
    }

    /// Reads a value previously written by [`Number64::encode`].
    ///
    /// Values carrying extra precision bits decode as integers; everything
    /// else decodes as a double that compares equal to the encoded value.
    /// Extra bits are only accepted on doubles in `2^53..2^63` with the low
    /// six bits of the field clear, which is all `encode` ever writes.
    pub fn decode(buffer: &[u8]) -> Result<Number64, DecodeError> {
        if buffer.len() < Self::SIZE_OF {
            return Err(EncodingError {
                required: Self::SIZE_OF,
                actual: buffer.len(),
            }
            .into());
        }

        let mut double_bytes = [0u8; 8];
        double_bytes.copy_from_slice(&buffer[..8]);
        let ex = DoubleEx {
            double_value: f64::from_le_bytes(double_bytes),
            extra_bits: u16::from_le_bytes([buffer[8], buffer[9]]),
        };

        if ex.extra_bits != 0 {
            ex.to_integer()
                .map(Number64::from_integer)
                .ok_or(DecodeError::InvalidExtraBits {
                    double_bits: ex.double_value.to_bits(),
                    extra_bits: ex.extra_bits,
                })
        } else {
            Ok(Number64::from_double(ex.double_value))
        }
    }

    fn extended(&self) -> DoubleEx {
        match self.0 {
            Repr::Integer(i) => DoubleEx::from_integer(i),
            Repr::Double(d) => DoubleEx {
                double_value: d,
                extra_bits: 0,
            },
        }
    }
}

impl PartialEq for Number64 {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Number64 {}

impl PartialOrd for Number64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for Number64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let ex = self.extended().normalized();
        state.write_u64(ex.double_value.to_bits());
        state.write_u16(ex.extra_bits);
    }
}

impl From<i64> for Number64 {
    fn from(value: i64) -> Self {
        Number64::from_integer(value)
    }
}

impl From<f64> for Number64 {
    fn from(value: f64) -> Self {
        Number64::from_double(value)
    }
}

impl fmt::Display for Number64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::Integer(i) => write!(f, "{}", i),
            // Debug gives the shortest text that parses back to the same
            // double and always keeps a fraction or exponent.
            Repr::Double(d) => write!(f, "{:?}", d),
        }
    }
}

fn compare_doubles(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        _ => Ordering::Greater,
    })
}

/// Double plus up to ten bits of extra integer precision.
#[derive(Debug, Clone, Copy)]
struct DoubleEx {
    double_value: f64,
    extra_bits: u16,
}

impl DoubleEx {
    fn from_integer(value: i64) -> Self {
        // |i64::MIN| does not fit in an i64; its double is exact anyway.
        if value == i64::MIN {
            return DoubleEx {
                double_value: value as f64,
                extra_bits: 0,
            };
        }

        let magnitude = value.unsigned_abs();
        let msb = 63 - magnitude.leading_zeros() as i32;
        let lsb = magnitude.trailing_zeros() as i32;

        if msb > MANTISSA_BITS && msb - lsb > MANTISSA_BITS {
            let exponent_bits = (msb as u64 + EXPONENT_BIAS) << 52;
            let mantissa = (magnitude << (62 - msb)) & 0x3FFF_FFFF_FFFF_FFFF;
            let extra_bits = ((mantissa & 0x3FF) << 6) as u16;

            let mut bits = exponent_bits | (mantissa >> 10);
            if value < 0 {
                bits |= SIGN_BIT;
            }

            DoubleEx {
                double_value: f64::from_bits(bits),
                extra_bits,
            }
        } else {
            DoubleEx {
                double_value: value as f64,
                extra_bits: 0,
            }
        }
    }

    /// Rebuilds the integer `from_integer` produced, or `None` when the
    /// pair is not one it can produce.
    fn to_integer(self) -> Option<i64> {
        if self.extra_bits == 0 {
            return Some(self.double_value as i64);
        }
        if self.extra_bits & 0x3F != 0 {
            return None;
        }

        let bits = self.double_value.to_bits();
        let negative = bits & SIGN_BIT != 0;
        let bits = bits & !SIGN_BIT;
        let exponent = (bits >> 52).checked_sub(EXPONENT_BIAS)?;
        if !(MANTISSA_BITS as u64 + 1..=62).contains(&exponent) {
            return None;
        }

        let mut magnitude = ((bits << 10) | 0x4000_0000_0000_0000) & 0x7FFF_FFFF_FFFF_FFFF;
        magnitude |= u64::from(self.extra_bits >> 6);
        magnitude >>= 62 - exponent;

        let magnitude = magnitude as i64;
        Some(if negative { -magnitude } else { magnitude })
    }

    fn compare(&self, other: &DoubleEx) -> Ordering {
        match compare_doubles(self.double_value, other.double_value) {
            Ordering::Equal => {
                let extra = self.extra_bits.cmp(&other.extra_bits);
                if self.double_value > 0.0 {
                    extra
                } else if self.double_value < 0.0 {
                    extra.reverse()
                } else {
                    Ordering::Equal
                }
            }
            ordering => ordering,
        }
    }

    /// Folds `-0.0` into `0.0` and every NaN payload into one, so values
    /// that compare equal also hash equal.
    fn normalized(self) -> Self {
        let double_value = if self.double_value == 0.0 {
            0.0
        } else if self.double_value.is_nan() {
            f64::NAN
        } else {
            self.double_value
        };
        DoubleEx {
            double_value,
            extra_bits: self.extra_bits,
        }
    }
}
