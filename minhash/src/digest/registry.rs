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

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::digest::DigestAdapter;
use crate::digest::Md5Digest;
use crate::digest::Sha1Digest;
use crate::digest::Sha256Digest;
use crate::digest::Sha384Digest;
use crate::digest::Sha512Digest;
use crate::digest::SharedDigest;
use crate::error::Error;

/// Caller-owned mapping from adapter names to adapters.
///
/// Decoders use a registry to turn the name stored in a serialized image back into a
/// callable digest. Nothing is registered globally; new adapters are added with
/// [`DigestRegistry::register`].
#[derive(Debug, Clone, Default)]
pub struct DigestRegistry {
    adapters: BTreeMap<String, SharedDigest>,
}

impl DigestRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding `sha1`, `sha256`, `sha384`, `sha512` and `md5`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(Sha1Digest));
        registry.register(Arc::new(Sha256Digest));
        registry.register(Arc::new(Sha384Digest));
        registry.register(Arc::new(Sha512Digest));
        registry.register(Arc::new(Md5Digest));
        registry
    }

    /// Registers `adapter` under its own name, returning the adapter it replaced.
    pub fn register(&mut self, adapter: SharedDigest) -> Option<SharedDigest> {
        self.adapters.insert(adapter.name().to_string(), adapter)
    }

    /// Returns the adapter registered under `name`.
    pub fn get(&self, name: &str) -> Option<&SharedDigest> {
        self.adapters.get(name)
    }

    /// Returns the adapter registered under `name`, or an [`UnknownDigest`] error.
    ///
    /// [`UnknownDigest`]: crate::error::ErrorKind::UnknownDigest
    pub fn resolve(&self, name: &str) -> Result<SharedDigest, Error> {
        self.get(name)
            .cloned()
            .ok_or_else(|| Error::unknown_digest(name))
    }

    /// Returns the registered names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.adapters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
