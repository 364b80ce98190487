//! Trait bounds shared by the bit-level I/O code.

use num_traits::{CheckedShl, CheckedShr, Zero};
use std::ops::{BitOr, Not};

/// Any integer type that bits can be read out into.
///
/// `CheckedShl`/`CheckedShr` carry the plain shift operators with them, so
/// this bound set is enough for MSB-first accumulation and for sign
/// extension. `i8` is deliberately absent (`u8` does not coerce into it);
/// narrow signed reads go through `i16` or wider.
pub trait BitReadable:
    Copy + CheckedShl + CheckedShr + BitOr<Self, Output = Self> + Not<Output = Self> + Zero + From<u8>
{
}

impl<T> BitReadable for T where
    T: Copy
        + CheckedShl
        + CheckedShr
        + BitOr<Self, Output = Self>
        + Not<Output = Self>
        + Zero
        + From<u8>
{
}
