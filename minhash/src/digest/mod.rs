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

//! Named digest adapters.
//!
//! A sketch never hashes elements itself: it asks a [`DigestAdapter`] for a digest and keeps
//! the first four bytes as a little-endian `u32`. The adapter's name travels with the
//! serialized image so a decoder can check that it hashes elements the same way.
//!
//! # Examples
//!
//! ```
//! # use minhash::digest::DigestRegistry;
//! let registry = DigestRegistry::with_defaults();
//! let sha1 = registry.resolve("sha1").unwrap();
//! assert_eq!(sha1.name(), "sha1");
//! let h = sha1.hash32(b"hello");
//! assert_eq!(h, u32::from_le_bytes([0xaa, 0xf4, 0xc6, 0x1d]));
//! ```

mod builtin;
mod registry;

use std::fmt::Debug;
use std::sync::Arc;

use crate::error::Error;

pub use self::builtin::Md5Digest;
pub use self::builtin::Sha1Digest;
pub use self::builtin::Sha256Digest;
pub use self::builtin::Sha384Digest;
pub use self::builtin::Sha512Digest;
pub use self::registry::DigestRegistry;

/// Name of the adapter used when none is configured.
pub const DEFAULT_DIGEST_NAME: &str = "sha1";

/// A named function from bytes to a fixed-width digest.
pub trait DigestAdapter: Debug + Send + Sync {
    /// Identifier stored in serialized sketches.
    fn name(&self) -> &str;

    /// Digests `data`.
    fn digest(&self, data: &[u8]) -> Vec<u8>;

    /// Returns the first four digest bytes as a little-endian `u32`.
    ///
    /// Digests shorter than four bytes are zero-extended.
    fn hash32(&self, data: &[u8]) -> u32 {
        let digest = self.digest(data);
        let mut low = [0u8; 4];
        let n = digest.len().min(4);
        low[..n].copy_from_slice(&digest[..n]);
        u32::from_le_bytes(low)
    }
}

/// Shared handle to a digest adapter.
pub type SharedDigest = Arc<dyn DigestAdapter>;

/// Returns the `sha1` adapter.
pub fn default_digest() -> SharedDigest {
    Arc::new(Sha1Digest)
}

/// Where a decoder obtains the adapter named in a serialized image.
#[derive(Debug, Clone, Copy)]
pub(crate) enum DigestSource<'a> {
    Registry(&'a DigestRegistry),
    Fixed(&'a SharedDigest),
}

impl DigestSource<'_> {
    pub fn resolve(&self, name: &str) -> Result<SharedDigest, Error> {
        match self {
            DigestSource::Registry(registry) => registry.resolve(name),
            DigestSource::Fixed(digest) if digest.name() == name => Ok(Arc::clone(digest)),
            DigestSource::Fixed(digest) => Err(Error::config_mismatch(
                "digest adapter does not match the serialized sketch",
            )
            .with_context("expected", name)
            .with_context("actual", digest.name())),
        }
    }
}
