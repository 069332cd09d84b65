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

use std::collections::HashSet;
use std::fmt;

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
use crate::minheap::BoundedUniqueMaxSet;
use crate::minheap::MAX_HASH;

/// Bottom-k MinHash sketch retaining the `k` smallest distinct hash values.
///
/// See [`crate::minheap`] for the estimator.
#[derive(Clone)]
pub struct MinHeapSketch {
    digest: SharedDigest,
    heap: BoundedUniqueMaxSet,
}

impl MinHeapSketch {
    /// Creates an empty sketch retaining `num_perm` values, hashing with `sha1`.
    ///
    /// # Panics
    ///
    /// Panics if `num_perm` is zero.
    pub fn new(num_perm: usize) -> Self {
        Self::with_digest(num_perm, default_digest())
    }

    /// Creates an empty sketch retaining `num_perm` values, hashing with `digest`.
    ///
    /// # Panics
    ///
    /// Panics if `num_perm` is zero.
    pub fn with_digest(num_perm: usize, digest: SharedDigest) -> Self {
        assert!(num_perm > 0, "num_perm must be at least 1");
        Self {
            digest,
            heap: BoundedUniqueMaxSet::new(num_perm),
        }
    }

    /// Returns the retained hash values in ascending order.
    pub fn hash_values(&self) -> Vec<u32> {
        self.heap.sorted_values()
    }

    /// Returns the retained hash values as a set.
    pub fn hash_values_set(&self) -> &HashSet<u32> {
        self.heap.members()
    }

    /// Returns the number of retained hash values.
    pub fn num_retained(&self) -> usize {
        self.heap.len()
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

    pub(crate) fn write_to(&self, out: &mut SketchBytes) {
        let name = self.digest.name().as_bytes();
        out.write_i32_le(self.heap.capacity() as i32);
        out.write_i32_le(name.len() as i32);
        out.write(name);
        for value in self.heap.slots() {
            out.write_u32_le(value);
        }
    }

    pub(crate) fn read_from(
        cursor: &mut SketchSlice<'_>,
        source: DigestSource<'_>,
    ) -> Result<Self, Error> {
        let num_perm = read_positive_count(cursor, "num_perm")?;
        let name = read_digest_name(cursor)?;
        ensure_values_fit(cursor.remaining(), num_perm, 4, "hash_values")?;
        let mut values = Vec::with_capacity(num_perm);
        for _ in 0..num_perm {
            values.push(cursor.read_u32_le().map_err(insufficient_data("hash_values"))?);
        }
        let digest = source.resolve(&name)?;
        let heap = BoundedUniqueMaxSet::from_values(num_perm, values);
        log::debug!(
            "decoded min-heap sketch: num_perm={num_perm}, digest={name}, retained={}",
            heap.len()
        );
        Ok(Self { digest, heap })
    }
}

impl JaccardSketch for MinHeapSketch {
    fn update_hash(&mut self, hash: u32) {
        self.heap.push(hash.min(MAX_HASH));
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn num_perm(&self) -> usize {
        self.heap.capacity()
    }

    fn digest(&self) -> &SharedDigest {
        &self.digest
    }

    fn jaccard(&self, other: &Self) -> Result<f64, Error> {
        ensure_same_num_perm(self.num_perm(), other.num_perm())?;
        ensure_same_digest(self.digest_name(), other.digest_name())?;

        let mine = self.heap.members();
        let theirs = other.heap.members();
        let effective_k = self.num_perm().min(mine.len().max(theirs.len()));
        if effective_k == 0 {
            return Ok(1.0);
        }
        let shared = mine.intersection(theirs).count();
        Ok(shared as f64 / effective_k as f64)
    }

    fn bytesize(&self) -> usize {
        4 + 4 + self.digest.name().len() + 4 * self.heap.capacity()
    }

    fn serialize(&self) -> Vec<u8> {
        let mut out = SketchBytes::with_capacity(self.bytesize());
        self.write_to(&mut out);
        out.into_bytes()
    }
}

impl PartialEq for MinHeapSketch {
    fn eq(&self, other: &Self) -> bool {
        self.digest.name() == other.digest.name()
            && self.heap.capacity() == other.heap.capacity()
            && self.heap.members() == other.heap.members()
    }
}

impl fmt::Debug for MinHeapSketch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinHeapSketch")
            .field("num_perm", &self.heap.capacity())
            .field("digest", &self.digest.name())
            .field("hash_values", &self.heap.sorted_values())
            .finish()
    }
}
