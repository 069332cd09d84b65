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

use crate::ophr::EMPTY_VALUE;
use crate::ophr::MAX_HASH;

/// Returns the rotation constant for `num_buckets` buckets.
pub(super) fn rotation_constant(num_buckets: usize) -> u64 {
    MAX_HASH / num_buckets as u64 + 1
}

/// Fills every empty bucket from its nearest non-empty successor.
///
/// An empty bucket at circular distance `d` before a non-empty bucket holding `v` becomes
/// `(v + rotation * d) % MAX_HASH`. If every bucket is empty the input is returned as is.
///
/// Walks backwards once from a non-empty bucket, so the cost is `O(k)`.
pub(super) fn densify(buckets: &[u64], rotation: u64) -> Box<[u64]> {
    let mut dense = buckets.to_vec();
    let k = buckets.len();
    let Some(start) = buckets.iter().position(|&v| v != EMPTY_VALUE) else {
        return dense.into_boxed_slice();
    };

    let mut source = buckets[start];
    let mut distance = 0u64;
    for step in 1..k {
        let i = (start + k - step) % k;
        if buckets[i] == EMPTY_VALUE {
            distance += 1;
            dense[i] = (source + rotation * distance) % MAX_HASH;
        } else {
            source = buckets[i];
            distance = 0;
        }
    }
    log::trace!("densified {k} buckets starting at {start}");
    dense.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    // direct forward scan for each empty bucket
    fn densify_by_scan(buckets: &[u64], rotation: u64) -> Vec<u64> {
        let k = buckets.len();
        let mut dense = buckets.to_vec();
        for i in 0..k {
            if buckets[i] != EMPTY_VALUE {
                continue;
            }
            let mut j = (i + 1) % k;
            let mut distance = 1;
            while j != i {
                if buckets[j] != EMPTY_VALUE {
                    dense[i] = (buckets[j] + rotation * distance) % MAX_HASH;
                    break;
                }
                j = (j + 1) % k;
                distance += 1;
            }
        }
        dense
    }

    #[test]
    fn test_rotation_constant() {
        assert_eq!(rotation_constant(4), 1_073_741_824);
        assert_eq!(rotation_constant(1), MAX_HASH + 1);
        assert_eq!(rotation_constant(128), 33_554_432);
    }

    #[test]
    fn test_all_empty_stays_empty() {
        let buckets = vec![EMPTY_VALUE; 8];
        assert_eq!(&*densify(&buckets, rotation_constant(8)), buckets.as_slice());
    }

    #[test]
    fn test_single_value_fills_all() {
        let rotation = rotation_constant(4);
        let buckets = [EMPTY_VALUE, EMPTY_VALUE, EMPTY_VALUE, 12];
        let dense = densify(&buckets, rotation);
        assert_eq!(dense[3], 12);
        assert_eq!(dense[2], 12 + rotation);
        assert_eq!(dense[1], 12 + 2 * rotation);
        assert_eq!(dense[0], (12 + 3 * rotation) % MAX_HASH);
        assert!(dense.iter().all(|&v| v != EMPTY_VALUE));
    }

    #[test]
    fn test_matches_forward_scan() {
        let mut rng = StdRng::seed_from_u64(7);
        for k in [1usize, 2, 3, 7, 16, 64] {
            let rotation = rotation_constant(k);
            for _ in 0..50 {
                let buckets: Vec<u64> = (0..k)
                    .map(|_| {
                        if rng.random_bool(0.3) {
                            rng.random_range(0..=MAX_HASH)
                        } else {
                            EMPTY_VALUE
                        }
                    })
                    .collect();
                assert_eq!(
                    densify(&buckets, rotation).to_vec(),
                    densify_by_scan(&buckets, rotation)
                );
            }
        }
    }
}
