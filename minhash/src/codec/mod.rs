// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Little-endian byte codecs shared by all sketch images.
//!
//! Images are packed without alignment padding: every field directly follows the previous one.

pub(crate) mod assert;

use std::io;

/// Growable little-endian writer used to build serialized images.
#[derive(Debug, Default)]
pub(crate) struct SketchBytes {
    bytes: Vec<u8>,
}

impl SketchBytes {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_i32_le(&mut self, value: i32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32_le(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64_le(&mut self, value: u64) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Pads the image with zero bytes up to `len`.
    pub fn pad_to(&mut self, len: usize) {
        if self.bytes.len() < len {
            self.bytes.resize(len, 0);
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Little-endian reader over a borrowed serialized image.
#[derive(Debug, Clone)]
pub(crate) struct SketchSlice<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SketchSlice<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    pub fn read_i32_le(&mut self) -> io::Result<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    pub fn read_u32_le(&mut self) -> io::Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_u64_le(&mut self) -> io::Result<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    /// Borrows the next `len` bytes.
    pub fn read_exact(&mut self, len: usize) -> io::Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof));
        }
        let out = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    fn read_array<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let slice = self.read_exact(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let mut out = SketchBytes::with_capacity(32);
        out.write_i32_le(-7);
        out.write_u32_le(0xDEAD_BEEF);
        out.write_u64_le(1 << 32);
        out.write(b"md5");
        out.write_u8(9);
        assert_eq!(out.len(), 4 + 4 + 8 + 3 + 1);

        let bytes = out.into_bytes();
        let mut cursor = SketchSlice::new(&bytes);
        assert_eq!(cursor.read_i32_le().unwrap(), -7);
        assert_eq!(cursor.read_u32_le().unwrap(), 0xDEAD_BEEF);
        assert_eq!(cursor.read_u64_le().unwrap(), 1 << 32);
        assert_eq!(cursor.read_exact(3).unwrap(), b"md5");
        assert_eq!(cursor.read_u8().unwrap(), 9);
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.position(), bytes.len());
    }

    #[test]
    fn test_read_past_end() {
        let bytes = [1u8, 2, 3];
        let mut cursor = SketchSlice::new(&bytes);
        let err = cursor.read_u32_le().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        // a failed read does not consume anything
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_pad_to() {
        let mut out = SketchBytes::default();
        out.write_u8(1);
        out.pad_to(4);
        out.pad_to(2);
        assert_eq!(out.into_bytes(), vec![1, 0, 0, 0]);
    }
}
