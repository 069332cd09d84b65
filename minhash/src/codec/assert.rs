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

use crate::codec::SketchSlice;
use crate::error::Error;

pub(crate) fn insufficient_data(tag: &'static str) -> impl FnOnce(std::io::Error) -> Error {
    move |_| Error::insufficient_data(tag)
}

/// Reads an `i32` count field and checks that it is strictly positive.
pub(crate) fn read_positive_count(
    cursor: &mut SketchSlice<'_>,
    tag: &'static str,
) -> Result<usize, Error> {
    let value = cursor.read_i32_le().map_err(insufficient_data(tag))?;
    if value > 0 {
        Ok(value as usize)
    } else {
        Err(Error::deserial(format!("{tag} must be positive, got {value}")))
    }
}

/// Reads the `[i32 len][len bytes]` digest adapter name.
pub(crate) fn read_digest_name(cursor: &mut SketchSlice<'_>) -> Result<String, Error> {
    let len = cursor
        .read_i32_le()
        .map_err(insufficient_data("digest_name_len"))?;
    if len < 0 {
        return Err(Error::deserial(format!(
            "digest name length must not be negative, got {len}"
        )));
    }
    let bytes = cursor
        .read_exact(len as usize)
        .map_err(insufficient_data("digest_name"))?;
    match std::str::from_utf8(bytes) {
        Ok(name) => Ok(name.to_string()),
        Err(_) => Err(Error::deserial("digest name is not valid UTF-8")),
    }
}

/// Checks that `remaining` bytes can hold `count` values of `width` bytes each.
pub(crate) fn ensure_values_fit(
    remaining: usize,
    count: usize,
    width: usize,
    tag: &'static str,
) -> Result<(), Error> {
    let needed = count
        .checked_mul(width)
        .ok_or_else(|| Error::deserial(format!("{tag} size overflow")))?;
    if remaining < needed {
        return Err(Error::insufficient_data(tag)
            .with_context("needed", needed)
            .with_context("remaining", remaining));
    }
    Ok(())
}

pub(crate) fn ensure_buffer_fits(required: usize, actual: usize) -> Result<(), Error> {
    if actual < required {
        Err(Error::insufficient_buffer(required, actual))
    } else {
        Ok(())
    }
}
