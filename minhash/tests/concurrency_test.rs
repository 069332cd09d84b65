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

use std::thread;

use minhash::JaccardSketch;
use minhash::minheap::MinHeapSketch;
use minhash::ophr::OphrSketch;
use minhash::partition::PartitionedSketch;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_sketches_are_send_and_sync() {
    assert_send_sync::<MinHeapSketch>();
    assert_send_sync::<OphrSketch>();
    assert_send_sync::<PartitionedSketch>();
}

#[test]
fn test_parallel_comparisons_against_shared_query() {
    let mut query = PartitionedSketch::builder().num_perm(32).build();
    let mut query_ophr = OphrSketch::new(32);
    for i in 0..300u32 {
        query.update(i.to_le_bytes());
        query_ophr.update(i.to_le_bytes());
    }

    let candidates: Vec<(PartitionedSketch, OphrSketch)> = (0..4u32)
        .map(|c| {
            let mut partitioned = PartitionedSketch::builder().num_perm(32).build();
            let mut ophr = OphrSketch::new(32);
            for i in (c * 100)..(c * 100 + 300) {
                partitioned.update(i.to_le_bytes());
                ophr.update(i.to_le_bytes());
            }
            (partitioned, ophr)
        })
        .collect();

    // the caches of `query` are filled concurrently on first use
    let parallel: Vec<(f64, f64)> = thread::scope(|scope| {
        let handles: Vec<_> = candidates
            .iter()
            .map(|(partitioned, ophr)| {
                let query = &query;
                let query_ophr = &query_ophr;
                scope.spawn(move || {
                    (
                        query.jaccard(partitioned).unwrap(),
                        query_ophr.jaccard(ophr).unwrap(),
                    )
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    let sequential: Vec<(f64, f64)> = candidates
        .iter()
        .map(|(partitioned, ophr)| {
            (
                query.jaccard(partitioned).unwrap(),
                query_ophr.jaccard(ophr).unwrap(),
            )
        })
        .collect();
    assert_eq!(parallel, sequential);
    assert!((parallel[0].0 - 1.0).abs() < 1e-9);
    assert_eq!(parallel[0].1, 1.0);
}
