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

//! Capabilities shared by every MinHash sketch variant.

use crate::codec::assert::ensure_buffer_fits;
use crate::digest::SharedDigest;
use crate::error::Error;

/// Number of hash values used by convenience constructors.
pub const DEFAULT_NUM_PERM: usize = 128;

/// A fixed-size summary of a stream that estimates Jaccard similarity.
///
/// Two sketches are comparable only if they are the same variant, hold the same number of
/// hash values and use the same digest adapter.
pub trait JaccardSketch {
    /// Digests `data` and adds the resulting hash value.
    fn update(&mut self, data: impl AsRef<[u8]>) {
        let hash = self.digest().hash32(data.as_ref());
        self.update_hash(hash);
    }

    /// Adds an already digested 32-bit hash value.
    fn update_hash(&mut self, hash: u32);

    /// Returns true if no value has been added.
    fn is_empty(&self) -> bool;

    /// Returns `k`, the number of hash values the sketch retains.
    fn num_perm(&self) -> usize;

    /// Returns the digest adapter used by [`JaccardSketch::update`].
    fn digest(&self) -> &SharedDigest;

    /// Returns the name of the digest adapter.
    fn digest_name(&self) -> &str {
        self.digest().name()
    }

    /// Estimates the Jaccard similarity between the streams summarized by `self` and `other`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigMismatch`] error if the sketches are not comparable.
    ///
    /// [`ConfigMismatch`]: crate::error::ErrorKind::ConfigMismatch
    fn jaccard(&self, other: &Self) -> Result<f64, Error>;

    /// Returns the exact length of the serialized image.
    fn bytesize(&self) -> usize;

    /// Serializes this sketch into a new byte vector of length [`JaccardSketch::bytesize`].
    fn serialize(&self) -> Vec<u8>;

    /// Serializes this sketch into the front of `buf`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an [`InsufficientBuffer`] error, without writing anything, if `buf` is shorter
    /// than [`JaccardSketch::bytesize`].
    ///
    /// [`InsufficientBuffer`]: crate::error::ErrorKind::InsufficientBuffer
    fn serialize_into(&self, buf: &mut [u8]) -> Result<usize, Error> {
        ensure_buffer_fits(self.bytesize(), buf.len())?;
        let bytes = self.serialize();
        buf[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }
}

pub(crate) fn ensure_same_num_perm(mine: usize, theirs: usize) -> Result<(), Error> {
    if mine == theirs {
        Ok(())
    } else {
        Err(Error::num_perm_mismatch(mine, theirs))
    }
}

pub(crate) fn ensure_same_digest(mine: &str, theirs: &str) -> Result<(), Error> {
    if mine == theirs {
        Ok(())
    } else {
        Err(
            Error::config_mismatch("cannot compare sketches built with different digests")
                .with_context("expected", mine)
                .with_context("actual", theirs),
        )
    }
}
