//! Transport codec
//!
//! Pure bidirectional conversion between the public config/quality value
//! types and the two transport forms the core speaks: the flat binary
//! wire encoding of the local native path ([`wire`]) and the structured
//! argument types of the offload HAL path ([`hal`]). No I/O, no state,
//! no retries. Malformed input yields an error or `None` and the caller
//! decides what to drop.

pub mod hal;
pub mod wire;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::CodecError;

/// Checked reader over one inbound wire message.
///
/// Every accessor verifies the remaining length first; running off the
/// end of a truncated message is a [`CodecError::Truncated`], never a
/// panic.
pub struct WireReader {
    buf: Bytes,
}

impl WireReader {
    pub fn new(buf: Bytes) -> Self {
        Self { buf }
    }

    fn need(&self, needed: usize) -> Result<(), CodecError> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            Err(CodecError::Truncated {
                needed: needed - remaining,
                remaining,
            })
        } else {
            Ok(())
        }
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub fn get_u8(&mut self) -> Result<u8, CodecError> {
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn get_bool(&mut self) -> Result<bool, CodecError> {
        Ok(self.get_u8()? != 0)
    }

    pub fn get_u16(&mut self) -> Result<u16, CodecError> {
        self.need(2)?;
        Ok(self.buf.get_u16())
    }

    pub fn get_i32(&mut self) -> Result<i32, CodecError> {
        self.need(4)?;
        Ok(self.buf.get_i32())
    }

    pub fn get_i64(&mut self) -> Result<i64, CodecError> {
        self.need(8)?;
        Ok(self.buf.get_i64())
    }

    pub fn get_u64(&mut self) -> Result<u64, CodecError> {
        self.need(8)?;
        Ok(self.buf.get_u64())
    }

    /// Length-prefixed byte run.
    pub fn get_bytes(&mut self) -> Result<Bytes, CodecError> {
        let len = self.get_u16()? as usize;
        self.need(len)?;
        Ok(self.buf.copy_to_bytes(len))
    }

    /// Length-prefixed UTF-8 string.
    pub fn get_string(&mut self, field: &'static str) -> Result<String, CodecError> {
        let raw = self.get_bytes()?;
        String::from_utf8(raw.to_vec()).map_err(|_| CodecError::InvalidUtf8(field))
    }

    /// Count-prefixed list of 32-bit values.
    pub fn get_i32_list(&mut self) -> Result<Vec<i32>, CodecError> {
        let count = self.get_u16()? as usize;
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.get_i32()?);
        }
        Ok(values)
    }

    /// Presence flag for an optional payload that follows.
    pub fn get_present(&mut self) -> Result<bool, CodecError> {
        self.get_bool()
    }
}

/// Writer for one outbound wire message.
pub struct WireWriter {
    buf: BytesMut,
}

impl WireWriter {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
        }
    }

    /// Start a message with its leading 4-byte tag.
    pub fn tagged(tag: i32) -> Self {
        let mut writer = Self::new();
        writer.put_i32(tag);
        writer
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn put_bool(&mut self, value: bool) {
        self.buf.put_u8(value as u8);
    }

    pub fn put_u16(&mut self, value: u16) {
        self.buf.put_u16(value);
    }

    pub fn put_i32(&mut self, value: i32) {
        self.buf.put_i32(value);
    }

    pub fn put_i64(&mut self, value: i64) {
        self.buf.put_i64(value);
    }

    pub fn put_u64(&mut self, value: u64) {
        self.buf.put_u64(value);
    }

    pub fn put_bytes(&mut self, value: &[u8]) {
        self.put_u16(value.len() as u16);
        self.buf.put_slice(value);
    }

    pub fn put_string(&mut self, value: &str) {
        self.put_bytes(value.as_bytes());
    }

    pub fn put_i32_list(&mut self, values: &[i32]) {
        self.put_u16(values.len() as u16);
        for value in values {
            self.buf.put_i32(*value);
        }
    }

    pub fn put_present(&mut self, present: bool) {
        self.put_bool(present);
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_read_is_an_error_not_a_panic() {
        let mut writer = WireWriter::new();
        writer.put_u8(1);
        let mut reader = WireReader::new(writer.into_bytes());
        assert!(reader.get_u8().is_ok());
        assert!(matches!(
            reader.get_i32(),
            Err(CodecError::Truncated { .. })
        ));
    }

    #[test]
    fn primitive_round_trip() {
        let mut writer = WireWriter::tagged(203);
        writer.put_string("cname@host");
        writer.put_i32_list(&[10, 20, 30]);
        writer.put_bool(true);
        writer.put_u64(0xDEAD_BEEF);

        let mut reader = WireReader::new(writer.into_bytes());
        assert_eq!(reader.get_i32().unwrap(), 203);
        assert_eq!(reader.get_string("cname").unwrap(), "cname@host");
        assert_eq!(reader.get_i32_list().unwrap(), vec![10, 20, 30]);
        assert!(reader.get_bool().unwrap());
        assert_eq!(reader.get_u64().unwrap(), 0xDEAD_BEEF);
        assert_eq!(reader.remaining(), 0);
    }
}
