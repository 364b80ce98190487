//! Internal reader adapter for consuming MIC entropy streams.

use crate::error::{Error, Result};
use crate::traits::BitReadable;
use std::cmp::min;
use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

/// A reader that serves a MIC entropy stream out bit by bit, MSB-first.
///
/// Bytes past the end of the source read as `0x00`. The encoder always pads
/// its output with a 16-bit zero word, so a well-formed stream never
/// *consumes* a synthesized bit — it may only peek at them while
/// prefetching. The reader therefore fails with `EndOfStream` exactly when
/// a consumed bit falls beyond the real data, which is the
/// premature-end-of-stream condition of a truncated file.
pub struct BitReader<R>
where
    R: Read,
{
    /// The data source to read bits from.
    source: R,

    /// Internal buffer of already-read stream data.
    buffer: VecDeque<u8>,

    /// How many bits of the head byte of the buffer have been consumed.
    ///
    /// Always less than eight; wholly consumed bytes are popped eagerly.
    bits_read: usize,

    /// Total number of bits consumed from the stream so far.
    consumed: u64,

    /// Total number of real (non-synthesized) bits buffered so far.
    available: u64,

    /// Whether the source has reported end-of-file.
    exhausted: bool,
}

impl<R> BitReader<R>
where
    R: Read,
{
    /// Wrap a source in a bit reader.
    pub fn from_source(source: R) -> Self {
        Self {
            source,
            buffer: VecDeque::new(),
            bits_read: 0,
            consumed: 0,
            available: 0,
            exhausted: false,
        }
    }

    /// Total number of bits consumed so far.
    ///
    /// The encoder records each plane boundary as a `(byte, bit)` pair; this
    /// counter is the decoder's side of that ledger.
    pub fn consumed_bits(&self) -> u64 {
        self.consumed
    }

    /// Fill the internal buffer with a given number of bytes.
    ///
    /// Bytes beyond the end of the source are synthesized as zero; only
    /// genuine I/O failures become errors.
    fn buffer_bytes(&mut self, bytes_needed: usize) -> Result<()> {
        let mut byte = [0];
        for _ in 0..bytes_needed {
            if !self.exhausted {
                match self.source.read_exact(&mut byte[..]) {
                    Ok(()) => {
                        self.available += 8;
                        self.buffer.push_back(byte[0]);
                        continue;
                    }
                    Err(e) if e.kind() == ErrorKind::UnexpectedEof => self.exhausted = true,
                    Err(e) => return Err(e.into()),
                }
            }
            self.buffer.push_back(0);
        }
        Ok(())
    }

    /// Given a number of needed bits, return how many bytes would have to
    /// be buffered to serve them.
    fn needed_bytes_for_bits(&self, bits_needed: u32) -> usize {
        let bits_buffered = (self.buffer.len() * 8).saturating_sub(self.bits_read);
        let bits_short = (bits_needed as usize).saturating_sub(bits_buffered);

        (bits_short + 7) / 8
    }

    /// Ensure that at least `bits_needed` further bits can be served from
    /// the internal buffer.
    fn ensure_bits(&mut self, bits_needed: u32) -> Result<()> {
        let bytes = self.needed_bytes_for_bits(bits_needed);
        self.buffer_bytes(bytes)
    }

    /// Copy an arbitrary number of bits from the stream out into a type.
    ///
    /// The bits will be returned such that the read-out bits start from the
    /// least significant bit of the returned type, zero-extended.
    ///
    /// This function does not remove bits from the buffer; repeated calls
    /// to `peek_bits` return the same bits, and peeking never triggers the
    /// end-of-stream check.
    ///
    /// The `bits_needed` must not exceed the width of the type.
    pub fn peek_bits<T: BitReadable>(&mut self, mut bits_needed: u32) -> Result<T> {
        if T::zero().checked_shl(bits_needed.saturating_sub(1)).is_none() {
            return Err(Error::InternalCodecError);
        }

        if bits_needed == 0 {
            return Ok(T::zero());
        }

        self.ensure_bits(bits_needed)?;

        let mut accum = T::zero();
        let mut bits_read = self.bits_read;
        for byte in self.buffer.iter() {
            if bits_needed == 0 {
                break;
            }

            let byte = *byte << bits_read;
            let bits_in_byte = 8 - bits_read as u32;
            let bits_to_shift_in = min(bits_in_byte, bits_needed);

            accum = match accum.checked_shl(bits_to_shift_in) {
                Some(shifted) => shifted | byte.checked_shr(8 - bits_to_shift_in).unwrap_or(0).into(),
                None => byte.checked_shr(8 - bits_to_shift_in).unwrap_or(0).into(),
            };

            bits_read = 0;
            bits_needed -= bits_to_shift_in;
        }

        assert_eq!(
            0, bits_needed,
            "return type accumulator should have been filled"
        );

        Ok(accum)
    }

    /// Skip forward a certain number of bits in the stream.
    ///
    /// Fails with `EndOfStream` if the skip consumes bits past the end of
    /// the real stream data.
    pub fn skip_bits(&mut self, bits_to_skip: u32) -> Result<()> {
        self.ensure_bits(bits_to_skip)?;

        self.bits_read += bits_to_skip as usize;
        self.consumed += u64::from(bits_to_skip);
        while self.bits_read >= 8 {
            self.buffer.pop_front();
            self.bits_read -= 8;
        }

        if self.consumed > self.available {
            return Err(Error::EndOfStream);
        }

        Ok(())
    }

    /// Move an arbitrary number of bits from the stream out into a type.
    ///
    /// This always returns an unsigned result, even if you ultimately store
    /// it in a signed type; use `read_signed_bits` for a signed result.
    pub fn read_bits<T: BitReadable>(&mut self, bits_needed: u32) -> Result<T> {
        let r = self.peek_bits(bits_needed)?;
        self.skip_bits(bits_needed)?;

        Ok(r)
    }

    /// Move an arbitrary number of bits from the stream out into a type,
    /// applying sign extension to the result.
    ///
    /// This may be used with signed types directly, or with unsigned types
    /// that are later coerced to the signed equivalent; both produce the
    /// correct two's-complement value.
    pub fn read_signed_bits<T: BitReadable>(&mut self, bits_needed: u32) -> Result<T> {
        debug_assert!(bits_needed > 0);
        let val: T = self.peek_bits(bits_needed)?;

        let sign_bit = val >> (bits_needed - 1);
        let val = if !sign_bit.is_zero() {
            let sign_extension = (!T::zero()).checked_shl(bits_needed);
            val | sign_extension.unwrap_or_else(T::zero)
        } else {
            val
        };

        self.skip_bits(bits_needed)?;

        Ok(val)
    }
}
