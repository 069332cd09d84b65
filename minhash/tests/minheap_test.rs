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

mod common;

use common::element;
use common::fake_digest;
use common::registry_with_fake;
use minhash::JaccardSketch;
use minhash::digest::DigestRegistry;
use minhash::error::ErrorKind;
use minhash::minheap::BoundedUniqueMaxSet;
use minhash::minheap::MinHeapSketch;

#[test]
fn test_init() {
    let m1 = MinHeapSketch::new(4);
    let m2 = MinHeapSketch::new(4);
    assert_eq!(m1.hash_values(), m2.hash_values());
    assert_eq!(m1.num_perm(), m2.num_perm());
    assert_eq!(m1.digest_name(), "sha1");
    assert!(m1.is_empty());
}

#[test]
fn test_update() {
    let mut m1 = MinHeapSketch::with_digest(4, fake_digest());
    let m2 = MinHeapSketch::with_digest(4, fake_digest());
    assert_eq!(m1.hash_values(), m2.hash_values());
    m1.update(element(12));
    assert_ne!(m1.hash_values(), m2.hash_values());
    assert_eq!(m1.hash_values(), vec![12]);
    assert!(!m1.is_empty());
}

#[test]
fn test_keeps_smallest_distinct() {
    let mut sketch = MinHeapSketch::with_digest(3, fake_digest());
    for value in [40, 10, 30, 10, 20, 50] {
        sketch.update(element(value));
    }
    assert_eq!(sketch.hash_values(), vec![10, 20, 30]);
    assert_eq!(sketch.num_retained(), 3);
}

#[test]
fn test_jaccard() {
    let mut m1 = MinHeapSketch::with_digest(4, fake_digest());
    let mut m2 = MinHeapSketch::with_digest(4, fake_digest());
    assert_eq!(m1.jaccard(&m2).unwrap(), 1.0);
    m2.update(element(12));
    assert_eq!(m1.jaccard(&m2).unwrap(), 0.0);
    m1.update(element(13));
    assert_eq!(m1.jaccard(&m2).unwrap(), 0.0);
    m1.update(element(12));
    assert_eq!(m1.jaccard(&m2).unwrap(), 0.5);
    m2.update(element(13));
    assert_eq!(m1.jaccard(&m2).unwrap(), 1.0);
}

#[test]
fn test_jaccard_mismatch() {
    let m1 = MinHeapSketch::with_digest(4, fake_digest());
    let m2 = MinHeapSketch::with_digest(8, fake_digest());
    let err = m1.jaccard(&m2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigMismatch);

    let m3 = MinHeapSketch::new(4);
    let err = m1.jaccard(&m3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigMismatch);
}

#[test]
fn test_eq() {
    let mut m1 = MinHeapSketch::with_digest(4, fake_digest());
    let mut m2 = MinHeapSketch::with_digest(4, fake_digest());
    let mut m3 = MinHeapSketch::with_digest(4, fake_digest());
    let mut m4 = MinHeapSketch::with_digest(4, fake_digest());
    m1.update(element(11));
    m2.update(element(12));
    m3.update(element(11));
    m4.update(element(11));
    assert_ne!(m1, m2);
    assert_eq!(m1, m3);
    assert_eq!(m1, m4);

    m1.update(element(12));
    m2.update(element(11));
    assert_eq!(m1, m2);
}

#[test]
fn test_serialization() {
    let registry = DigestRegistry::with_defaults();
    for name in ["sha1", "sha256", "sha512", "md5"] {
        let digest = registry.resolve(name).unwrap();
        let mut sketch = MinHeapSketch::with_digest(4, digest.clone());
        sketch.update("10");

        let mut buf = vec![0u8; sketch.bytesize()];
        assert_eq!(sketch.serialize_into(&mut buf).unwrap(), buf.len());
        let restored = MinHeapSketch::deserialize(&buf, &registry).unwrap();
        assert_eq!(restored.digest_name(), name);
        assert_eq!(restored, sketch);

        let restored = MinHeapSketch::deserialize_with_digest(&buf, &digest).unwrap();
        assert_eq!(restored, sketch);
    }
}

#[test]
fn test_serialization_pads_unused_slots() {
    let mut sketch = MinHeapSketch::with_digest(4, fake_digest());
    sketch.update(element(7));
    let bytes = sketch.serialize();
    assert_eq!(bytes.len(), 8 + "fake".len() + 4 * 4);

    let slots: Vec<u32> = bytes[12..]
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    assert_eq!(slots.iter().filter(|&&v| v == 7).count(), 1);
    assert_eq!(slots.iter().filter(|&&v| v == u32::MAX).count(), 3);

    let restored = MinHeapSketch::deserialize(&bytes, &registry_with_fake()).unwrap();
    assert_eq!(restored.hash_values(), vec![7]);
}

#[test]
fn test_max_set_pop_order() {
    let mut set = BoundedUniqueMaxSet::from_values(4, [3, 9, 1, 9, 5]);
    assert_eq!(set.sorted_values(), vec![1, 3, 5, 9]);
    assert_eq!(set.pop().unwrap(), 9);
    assert_eq!(set.pop().unwrap(), 5);
    assert_eq!(set.pop().unwrap(), 3);
    assert_eq!(set.pop().unwrap(), 1);
    assert_eq!(set.pop().unwrap_err().kind(), ErrorKind::EmptyPop);
}
