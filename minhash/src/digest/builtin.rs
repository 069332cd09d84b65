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

use md5::Md5;
use sha1::Digest;
use sha1::Sha1;
use sha2::Sha256;
use sha2::Sha384;
use sha2::Sha512;

use crate::digest::DigestAdapter;

macro_rules! impl_digest_adapter {
    ($adapter:ident, $hasher:ty, $name:literal) => {
        #[doc = concat!("The `", $name, "` digest adapter.")]
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $adapter;

        impl DigestAdapter for $adapter {
            fn name(&self) -> &str {
                $name
            }

            fn digest(&self, data: &[u8]) -> Vec<u8> {
                <$hasher>::digest(data).to_vec()
            }
        }
    };
}

impl_digest_adapter!(Sha1Digest, Sha1, "sha1");
impl_digest_adapter!(Sha256Digest, Sha256, "sha256");
impl_digest_adapter!(Sha384Digest, Sha384, "sha384");
impl_digest_adapter!(Sha512Digest, Sha512, "sha512");
impl_digest_adapter!(Md5Digest, Md5, "md5");
