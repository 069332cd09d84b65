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

#![allow(dead_code)]

use std::sync::Arc;

use minhash::digest::DigestAdapter;
use minhash::digest::DigestRegistry;
use minhash::digest::SharedDigest;

/// Digest that echoes its input zero-padded to eight bytes, so `hash32(n.to_le_bytes())`
/// is `n` for any `n` that fits in 32 bits.
#[derive(Debug)]
pub struct FakeDigest;

impl DigestAdapter for FakeDigest {
    fn name(&self) -> &str {
        "fake"
    }

    fn digest(&self, data: &[u8]) -> Vec<u8> {
        let mut out = data.to_vec();
        if out.len() < 8 {
            out.resize(8, 0);
        }
        out
    }
}

pub fn fake_digest() -> SharedDigest {
    Arc::new(FakeDigest)
}

/// Encodes `value` the way test elements are fed to sketches.
pub fn element(value: u64) -> [u8; 8] {
    value.to_le_bytes()
}

pub fn registry_with_fake() -> DigestRegistry {
    let mut registry = DigestRegistry::with_defaults();
    registry.register(fake_digest());
    registry
}
