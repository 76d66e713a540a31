//! Length-prefixed little-endian wire codec.
//!
//! Every consensus object in this crate crosses the wire through
//! [`BinaryReader`] and [`BinaryWriter`]. The reader walks a borrowed byte
//! slice with a cursor and refuses to hand out more bytes than the slice
//! holds, so a length prefix claiming absent bytes fails before any
//! allocation. Variable quantities use the 1/3/5/9-byte var-int convention;
//! variable byte strings and arrays are `var_int(length) ∥ payload`, with
//! caller-supplied caps enforced before the payload is materialized.

use crate::errors::{CoreError, CoreResult};

/// Serde adapter for byte strings that travel as Base64 in JSON.
pub(crate) mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let value = String::deserialize(deserializer)?;
        STANDARD.decode(value).map_err(D::Error::custom)
    }
}

/// Objects with a canonical binary encoding.
///
/// Split from [`Decodable`] so the method names stay clear of serde's
/// `serialize`/`deserialize` on types that carry both.
pub trait Encodable {
    fn encode(&self, writer: &mut BinaryWriter);

    fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        self.encode(&mut writer);
        writer.into_bytes()
    }
}

pub trait Decodable: Sized {
    fn decode(reader: &mut BinaryReader<'_>) -> CoreResult<Self>;

    /// Decodes a complete message. Trailing bytes are a format error.
    fn from_bytes(bytes: &[u8]) -> CoreResult<Self> {
        let mut reader = BinaryReader::new(bytes);
        let value = Self::decode(&mut reader)?;
        reader.expect_exhausted()?;
        Ok(value)
    }
}

pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position == self.data.len()
    }

    pub fn expect_exhausted(&self) -> CoreResult<()> {
        if self.is_exhausted() {
            Ok(())
        } else {
            Err(CoreError::Format(format!(
                "{} trailing bytes after message",
                self.remaining()
            )))
        }
    }

    pub fn read_bytes(&mut self, count: usize) -> CoreResult<&'a [u8]> {
        if count > self.remaining() {
            return Err(CoreError::Format(format!(
                "unexpected end of input: need {count} bytes, {} remain",
                self.remaining()
            )));
        }
        let slice = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(slice)
    }

    pub fn read_exact<const N: usize>(&mut self) -> CoreResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> CoreResult<u8> {
        Ok(self.read_exact::<1>()?[0])
    }

    pub fn read_bool(&mut self) -> CoreResult<bool> {
        match self.read_u8()? {
            0x00 => Ok(false),
            0x01 => Ok(true),
            other => Err(CoreError::Format(format!("invalid boolean byte {other:#04x}"))),
        }
    }

    pub fn read_u16(&mut self) -> CoreResult<u16> {
        Ok(u16::from_le_bytes(self.read_exact()?))
    }

    pub fn read_u32(&mut self) -> CoreResult<u32> {
        Ok(u32::from_le_bytes(self.read_exact()?))
    }

    pub fn read_u64(&mut self) -> CoreResult<u64> {
        Ok(u64::from_le_bytes(self.read_exact()?))
    }

    pub fn read_i64(&mut self) -> CoreResult<i64> {
        Ok(i64::from_le_bytes(self.read_exact()?))
    }

    /// Reads a var-int and rejects values above `max`.
    pub fn read_var_int(&mut self, max: u64) -> CoreResult<u64> {
        let value = match self.read_u8()? {
            0xfd => u64::from(self.read_u16()?),
            0xfe => u64::from(self.read_u32()?),
            0xff => self.read_u64()?,
            prefix => u64::from(prefix),
        };
        if value > max {
            return Err(CoreError::Format(format!(
                "variable-length quantity {value} exceeds limit {max}"
            )));
        }
        Ok(value)
    }

    pub fn read_var_bytes(&mut self, max: usize) -> CoreResult<Vec<u8>> {
        let length = self.read_var_int(max as u64)? as usize;
        Ok(self.read_bytes(length)?.to_vec())
    }

    /// Reads `var_int(count) ∥ count × T`, enforcing `max` before any
    /// element is decoded.
    pub fn read_array<T: Decodable>(&mut self, max: usize) -> CoreResult<Vec<T>> {
        let count = self.read_var_int(max as u64)? as usize;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(T::decode(self)?);
        }
        Ok(items)
    }
}

#[derive(Default)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buffer.push(u8::from(value));
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_var_int(&mut self, value: u64) {
        if value < 0xfd {
            self.write_u8(value as u8);
        } else if value <= u64::from(u16::MAX) {
            self.write_u8(0xfd);
            self.write_u16(value as u16);
        } else if value <= u64::from(u32::MAX) {
            self.write_u8(0xfe);
            self.write_u32(value as u32);
        } else {
            self.write_u8(0xff);
            self.write_u64(value);
        }
    }

    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_var_int(bytes.len() as u64);
        self.write_bytes(bytes);
    }

    pub fn write_array<T: Encodable>(&mut self, items: &[T]) {
        self.write_var_int(items.len() as u64);
        for item in items {
            item.encode(self);
        }
    }
}
