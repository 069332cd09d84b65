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

use std::fmt;
use std::sync::OnceLock;

use crate::codec::SketchBytes;
use crate::codec::SketchSlice;
use crate::codec::assert::ensure_values_fit;
use crate::codec::assert::insufficient_data;
use crate::codec::assert::read_digest_name;
use crate::codec::assert::read_positive_count;
use crate::common::JaccardSketch;
use crate::common::ensure_same_digest;
use crate::common::ensure_same_num_perm;
use crate::digest::DigestRegistry;
use crate::digest::DigestSource;
use crate::digest::SharedDigest;
use crate::digest::default_digest;
use crate::error::Error;
use crate::ophr::EMPTY_VALUE;
use crate::ophr::MIN_SERIALIZED_SIZE;
use crate::ophr::densify::densify;
use crate::ophr::densify::rotation_constant;

/// One-permutation MinHash sketch with rotation densification.
///
/// See [`crate::ophr`] for the scheme.
#[derive(Clone)]
pub struct OphrSketch {
    digest: SharedDigest,
    hash_values: Box<[u64]>,
    rotation: u64,
    dense: OnceLock<Box<[u64]>>,
}

impl OphrSketch {
    /// Creates an empty sketch with `num_perm` buckets, hashing with `sha1`.
    ///
    /// # Panics
    ///
    /// Panics if `num_perm` is zero.
    pub fn new(num_perm: usize) -> Self {
        Self::with_digest(num_perm, default_digest())
    }

    /// Creates an empty sketch with `num_perm` buckets, hashing with `digest`.
    ///
    /// # Panics
    ///
    /// Panics if `num_perm` is zero.
    pub fn with_digest(num_perm: usize, digest: SharedDigest) -> Self {
        assert!(num_perm > 0, "num_perm must be at least 1");
        Self::from_parts(digest, vec![EMPTY_VALUE; num_perm].into_boxed_slice())
    }

    fn from_parts(digest: SharedDigest, hash_values: Box<[u64]>) -> Self {
        Self {
            digest,
            rotation: rotation_constant(hash_values.len()),
            hash_values,
            dense: OnceLock::new(),
        }
    }

    /// Returns the raw bucket minima; empty buckets hold [`EMPTY_VALUE`].
    pub fn raw_hash_values(&self) -> &[u64] {
        &self.hash_values
    }

    /// Returns the densified bucket values.
    ///
    /// Computed on first access and cached until an update changes a bucket.
    pub fn dense_hash_values(&self) -> &[u64] {
        self.dense.get_or_init(|| densify(&self.hash_values, self.rotation))
    }

    /// Returns the rotation constant `floor(MAX_HASH / k) + 1`.
    pub fn rotation_constant(&self) -> u64 {
        self.rotation
    }

    /// Deserializes a sketch, resolving its digest adapter through `registry`.
    ///
    /// # Errors
    ///
    /// Returns a [`MalformedBuffer`] error if the image is truncated or invalid, or an
    /// [`UnknownDigest`] error if the stored adapter name is not registered.
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
    /// Returns a [`MalformedBuffer`] error if the image is truncated or invalid, or a
    /// [`ConfigMismatch`] error if `digest` is not the adapter named in the image.
    ///
    /// [`MalformedBuffer`]: crate::error::ErrorKind::MalformedBuffer
    /// [`ConfigMismatch`]: crate::error::ErrorKind::ConfigMismatch
    pub fn deserialize_with_digest(bytes: &[u8], digest: &SharedDigest) -> Result<Self, Error> {
        Self::read_from(&mut SketchSlice::new(bytes), DigestSource::Fixed(digest))
    }

    fn payload_size(&self) -> usize {
        4 + 4 + self.digest.name().len() + 8 * self.hash_values.len()
    }

    pub(crate) fn write_to(&self, out: &mut SketchBytes) {
        let start = out.len();
        let name = self.digest.name().as_bytes();
        out.write_i32_le(self.hash_values.len() as i32);
        out.write_i32_le(name.len() as i32);
        out.write(name);
        for &value in self.hash_values.iter() {
            out.write_u64_le(value);
        }
        out.pad_to(start + self.bytesize());
    }

    pub(crate) fn read_from(
        cursor: &mut SketchSlice<'_>,
        source: DigestSource<'_>,
    ) -> Result<Self, Error> {
        let start = cursor.position();
        let num_perm = read_positive_count(cursor, "num_perm")?;
        let name = read_digest_name(cursor)?;
        ensure_values_fit(cursor.remaining(), num_perm, 8, "hash_values")?;
        let mut hash_values = Vec::with_capacity(num_perm);
        for bucket in 0..num_perm {
            let value = cursor
                .read_u64_le()
                .map_err(insufficient_data("hash_values"))?;
            let misplaced = value != EMPTY_VALUE
                && (value > EMPTY_VALUE || value % num_perm as u64 != bucket as u64);
            if misplaced {
                return Err(Error::deserial(format!(
                    "hash value {value} cannot occupy bucket {bucket} of {num_perm}"
                )));
            }
            hash_values.push(value);
        }
        // skip the zero tail of images shorter than the minimum size
        let consumed = cursor.position() - start;
        if consumed < MIN_SERIALIZED_SIZE {
            cursor
                .read_exact(MIN_SERIALIZED_SIZE - consumed)
                .map_err(insufficient_data("padding"))?;
        }
        let digest = source.resolve(&name)?;
        log::debug!("decoded OPHR sketch: num_perm={num_perm}, digest={name}");
        Ok(Self::from_parts(digest, hash_values.into_boxed_slice()))
    }
}

impl JaccardSketch for OphrSketch {
    fn update_hash(&mut self, hash: u32) {
        let hash = hash as u64;
        let bucket = (hash % self.hash_values.len() as u64) as usize;
        if hash < self.hash_values[bucket] {
            self.hash_values[bucket] = hash;
            self.dense.take();
        }
    }

    fn is_empty(&self) -> bool {
        self.hash_values.iter().all(|&v| v == EMPTY_VALUE)
    }

    fn num_perm(&self) -> usize {
        self.hash_values.len()
    }

    fn digest(&self) -> &SharedDigest {
        &self.digest
    }

    fn jaccard(&self, other: &Self) -> Result<f64, Error> {
        ensure_same_num_perm(self.num_perm(), other.num_perm())?;
        ensure_same_digest(self.digest_name(), other.digest_name())?;

        let matches = self
            .dense_hash_values()
            .iter()
            .zip(other.dense_hash_values())
            .filter(|(a, b)| a == b)
            .count();
        Ok(matches as f64 / self.num_perm() as f64)
    }

    fn bytesize(&self) -> usize {
        self.payload_size().max(MIN_SERIALIZED_SIZE)
    }

    fn serialize(&self) -> Vec<u8> {
        let mut out = SketchBytes::with_capacity(self.bytesize());
        self.write_to(&mut out);
        out.into_bytes()
    }
}

impl PartialEq for OphrSketch {
    fn eq(&self, other: &Self) -> bool {
        self.digest.name() == other.digest.name() && self.hash_values == other.hash_values
    }
}

impl fmt::Debug for OphrSketch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OphrSketch")
            .field("num_perm", &self.hash_values.len())
            .field("digest", &self.digest.name())
            .field("hash_values", &self.hash_values)
            .finish()
    }
}
