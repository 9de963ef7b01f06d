use super::error::ErrorCode;
use std::result;

type Result<T> = result::Result<T, ErrorCode>;

// ceil(32 / 7)
const MAX_U32_LEN: usize = 5;

/// Sequential cursor over an in-memory byte buffer.
///
/// Every read records the offset it started at, so callers can attribute a
/// failure to the first byte of the read that produced it.
#[derive(Debug, Clone)]
pub struct ByteStream<'a> {
    bytes: &'a [u8],
    pos: usize,
    last: usize,
}

impl<'a> ByteStream<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            last: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn last_offset(&self) -> usize {
        self.last
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn remaining(&self) -> &'a [u8] {
        let bytes = self.bytes;
        &bytes[self.pos.min(bytes.len())..]
    }

    pub fn peek_byte(&self) -> Result<u8> {
        self.bytes
            .get(self.pos)
            .copied()
            .ok_or(ErrorCode::UnexpectedEnd)
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        self.last = self.pos;
        let byte = self.peek_byte()?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_expected(&mut self, expected: u8) -> Result<()> {
        let found = self.read_byte()?;
        if found != expected {
            return Err(ErrorCode::UnexpectedByte { expected, found });
        }
        Ok(())
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.last = self.pos;
        let bytes = self.bytes;
        let end = self.pos.checked_add(len).ok_or(ErrorCode::UnexpectedEnd)?;
        let slice = bytes.get(self.pos..end).ok_or(ErrorCode::UnexpectedEnd)?;
        self.pos = end;
        Ok(slice)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.last = self.pos;
        let mut rest = self.remaining();
        let before = rest.len();
        let value = leb128::read::unsigned(&mut rest).map_err(|e| match e {
            leb128::read::Error::IoError(_) => ErrorCode::UnexpectedEnd,
            leb128::read::Error::Overflow => ErrorCode::IntegerTooLong,
        })?;
        let used = before - rest.len();
        if used > MAX_U32_LEN {
            return Err(ErrorCode::IntegerTooLong);
        }
        self.pos += used;
        u32::try_from(value).map_err(|_| ErrorCode::IntegerTooLarge)
    }

    pub fn read_name(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let start = self.last;
        let bytes = self.read_bytes(len)?;
        self.last = start;
        String::from_utf8(bytes.to_vec()).map_err(|_| ErrorCode::MalformedUtf8)
    }
}
