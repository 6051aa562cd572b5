use std::fmt::Debug;

use num_traits::{AsPrimitive, PrimInt, WrappingAdd, WrappingSub};

/// A single tape cell: any fixed-width primitive integer.
///
/// Arithmetic on cells always wraps modulo the width of the type, so the
/// conversions below truncate rather than saturate.
pub trait Cell: PrimInt + WrappingAdd + WrappingSub + Default + Debug + 'static {
    /// Narrow a repeat count to the cell width (mod 2^bits)
    fn from_count(count: usize) -> Self;

    /// Narrow a character code to the cell width
    fn from_code(code: u32) -> Self;

    /// Widen (or truncate) the cell to a character code
    fn to_code(self) -> u32;

    fn from_byte(byte: u8) -> Self;

    fn to_byte(self) -> u8;

    /// Add `count` to the cell, wrapping on overflow
    fn add_count(self, count: usize) -> Self {
        self.wrapping_add(&Self::from_count(count))
    }

    /// Subtract `count` from the cell, wrapping on underflow
    fn sub_count(self, count: usize) -> Self {
        self.wrapping_sub(&Self::from_count(count))
    }

    /// Best effort conversion into a char, invalid code points become U+FFFD
    fn to_char(self) -> char {
        char::from_u32(self.to_code()).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

macro_rules! impl_cell {
    ($($ty: ty),* $(,)?) => {
        $(
            impl Cell for $ty {
                #[inline]
                fn from_count(count: usize) -> Self {
                    count.as_()
                }

                #[inline]
                fn from_code(code: u32) -> Self {
                    code.as_()
                }

                #[inline]
                fn to_code(self) -> u32 {
                    self.as_()
                }

                #[inline]
                fn from_byte(byte: u8) -> Self {
                    byte.as_()
                }

                #[inline]
                fn to_byte(self) -> u8 {
                    self.as_()
                }
            }
        )*
    };
}

impl_cell!(u8, i8, u16, i16, u32, i32, u64, i64, u128, i128, usize, isize);
