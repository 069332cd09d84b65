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

//! Binary image of a [`PartitionedSketch`].
//!
//! ```text
//! [i32 k][i32 P][u8 inner kind][u8 weighting]
//! P x ([inner sketch image][estimator image])
//! ```

use crate::codec::SketchBytes;
use crate::codec::SketchSlice;
use crate::codec::assert::ensure_buffer_fits;
use crate::codec::assert::insufficient_data;
use crate::codec::assert::read_positive_count;
use crate::common::JaccardSketch;
use crate::digest::DigestRegistry;
use crate::digest::DigestSource;
use crate::digest::SharedDigest;
use crate::error::Error;
use crate::hll::HyperLogLog;
use crate::partition::InnerKind;
use crate::partition::InnerSketch;
use crate::partition::Partition;
use crate::partition::PartitionedSketch;
use crate::partition::Weighting;

const HEADER_SIZE: usize = 4 + 4 + 1 + 1;

impl PartitionedSketch<HyperLogLog> {
    /// Returns the number of bytes [`serialize`](Self::serialize) produces.
    ///
    /// # Errors
    ///
    /// Returns a [`SerializeFailed`] error if an estimator cannot be encoded.
    ///
    /// [`SerializeFailed`]: crate::error::ErrorKind::SerializeFailed
    pub fn bytesize(&self) -> Result<usize, Error> {
        self.serialize().map(|bytes| bytes.len())
    }

    /// Serializes the sketch to a new byte vector.
    ///
    /// # Errors
    ///
    /// Returns a [`SerializeFailed`] error if an estimator cannot be encoded.
    ///
    /// [`SerializeFailed`]: crate::error::ErrorKind::SerializeFailed
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        let mut out = SketchBytes::with_capacity(HEADER_SIZE);
        out.write_i32_le(self.num_perm() as i32);
        out.write_i32_le(self.num_partitions() as i32);
        out.write_u8(self.inner_kind().to_byte());
        out.write_u8(self.weighting().to_byte());
        for partition in self.partitions() {
            partition.sketch().write_to(&mut out);
            out.write(&partition.estimator().to_bytes()?);
        }
        Ok(out.into_bytes())
    }

    /// Serializes the sketch into the front of `buf`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an [`InsufficientBuffer`] error if `buf` is shorter than
    /// [`bytesize`](Self::bytesize). Nothing is written in that case.
    ///
    /// [`InsufficientBuffer`]: crate::error::ErrorKind::InsufficientBuffer
    pub fn serialize_into(&self, buf: &mut [u8]) -> Result<usize, Error> {
        let bytes = self.serialize()?;
        ensure_buffer_fits(bytes.len(), buf.len())?;
        buf[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    /// Deserializes a sketch, resolving the digest adapter by name in `registry`.
    ///
    /// # Errors
    ///
    /// Returns a [`MalformedBuffer`] error if the image is truncated or inconsistent, or an
    /// [`UnknownDigest`] error if the adapter is not registered.
    ///
    /// [`MalformedBuffer`]: crate::error::ErrorKind::MalformedBuffer
    /// [`UnknownDigest`]: crate::error::ErrorKind::UnknownDigest
    pub fn deserialize(bytes: &[u8], registry: &DigestRegistry) -> Result<Self, Error> {
        Self::read_from(&mut SketchSlice::new(bytes), DigestSource::Registry(registry))
    }

    /// Deserializes a sketch hashed with `digest`.
    ///
    /// # Errors
    ///
    /// Returns a [`MalformedBuffer`] error if the image is truncated or inconsistent, or a
    /// [`ConfigMismatch`] error if `digest` is not the adapter named in the image.
    ///
    /// [`MalformedBuffer`]: crate::error::ErrorKind::MalformedBuffer
    /// [`ConfigMismatch`]: crate::error::ErrorKind::ConfigMismatch
    pub fn deserialize_with_digest(bytes: &[u8], digest: &SharedDigest) -> Result<Self, Error> {
        Self::read_from(&mut SketchSlice::new(bytes), DigestSource::Fixed(digest))
    }

    fn read_from(cursor: &mut SketchSlice<'_>, source: DigestSource<'_>) -> Result<Self, Error> {
        let num_perm = read_positive_count(cursor, "num_perm")?;
        let num_partitions = read_positive_count(cursor, "num_partitions")?;
        let inner_kind = cursor
            .read_u8()
            .map_err(insufficient_data("inner_kind"))
            .and_then(InnerKind::from_byte)?;
        let weighting = cursor
            .read_u8()
            .map_err(insufficient_data("weighting"))
            .and_then(Weighting::from_byte)?;

        let mut digest: Option<SharedDigest> = None;
        let mut partitions = Vec::with_capacity(num_partitions.min(cursor.remaining()));
        for index in 0..num_partitions {
            let sketch = InnerSketch::read_from(inner_kind, cursor, source)?;
            if sketch.num_perm() != num_perm {
                return Err(Error::deserial("partition num_perm disagrees with header")
                    .with_context("partition", index)
                    .with_context("expected", num_perm)
                    .with_context("actual", sketch.num_perm()));
            }
            match &digest {
                Some(first) if first.name() != sketch.digest_name() => {
                    return Err(Error::deserial("partitions use different digests")
                        .with_context("partition", index)
                        .with_context("expected", first.name())
                        .with_context("actual", sketch.digest_name()));
                }
                Some(_) => {}
                None => digest = Some(sketch.digest().clone()),
            }
            let estimator = HyperLogLog::read_from(cursor)?;
            partitions.push(Partition::new(sketch, estimator));
        }
        let Some(digest) = digest else {
            return Err(Error::deserial("partitioned sketch has no partitions"));
        };

        log::debug!(
            "deserialized partitioned sketch: num_perm={num_perm}, num_partitions={num_partitions}, inner={inner_kind:?}, weighting={weighting:?}, digest={}",
            digest.name()
        );
        Ok(Self::from_parts(
            num_perm,
            digest,
            inner_kind,
            weighting,
            partitions,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let sketch = PartitionedSketch::builder()
            .num_perm(4)
            .num_partitions(2)
            .inner(InnerKind::MinHeap)
            .weighting(Weighting::UnionSize)
            .build();
        let bytes = sketch.serialize().unwrap();
        assert_eq!(bytes.len(), sketch.bytesize().unwrap());
        assert_eq!(&bytes[..4], &4i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &2i32.to_le_bytes());
        assert_eq!(bytes[8], 0);
        assert_eq!(bytes[9], 1);
    }

    #[test]
    fn test_unknown_inner_kind() {
        let mut bytes = PartitionedSketch::builder()
            .num_perm(4)
            .build()
            .serialize()
            .unwrap();
        bytes[8] = 7;
        let err = PartitionedSketch::deserialize(&bytes, &DigestRegistry::with_defaults())
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::MalformedBuffer);
    }
}
