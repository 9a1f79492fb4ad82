//! Bounds-checked little-endian cursor over replay bytes

use super::{Quaternion, Transform, Vector3};
use crate::error::ReplayError;

type Result<T> = std::result::Result<T, ReplayError>;

pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(ReplayError::UnexpectedEof {
                offset: self.pos,
                needed: len,
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    pub(crate) fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    pub(crate) fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.array()?))
    }

    pub(crate) fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.array()?))
    }

    /// Read an `i32` element count, rejecting negative values
    pub(crate) fn read_count(&mut self, what: &'static str) -> Result<usize> {
        let offset = self.pos;
        let count = self.read_i32()?;
        usize::try_from(count).map_err(|_| ReplayError::NegativeCount {
            what,
            count,
            offset,
        })
    }

    /// Length-prefixed UTF-8 string; invalid sequences are replaced
    pub(crate) fn read_string(&mut self) -> Result<String> {
        let len = self.read_count("string byte")?;
        let bytes = self.take(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    pub(crate) fn read_vector3(&mut self) -> Result<Vector3> {
        Ok(Vector3 {
            x: self.read_f32()?,
            y: self.read_f32()?,
            z: self.read_f32()?,
        })
    }

    pub(crate) fn read_quaternion(&mut self) -> Result<Quaternion> {
        Ok(Quaternion {
            x: self.read_f32()?,
            y: self.read_f32()?,
            z: self.read_f32()?,
            w: self.read_f32()?,
        })
    }

    pub(crate) fn read_transform(&mut self) -> Result<Transform> {
        Ok(Transform {
            position: self.read_vector3()?,
            rotation: self.read_quaternion()?,
        })
    }
}
