/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use bytes::Bytes;
use rand::rngs::OsRng;
use rand::RngCore;

/// Fill a new buffer of `size` bytes from the operating system's random source.
pub fn try_random_data(size: usize) -> Result<Bytes, rand::Error> {
    let mut buf = vec![0u8; size];
    OsRng.try_fill_bytes(&mut buf)?;
    Ok(Bytes::from(buf))
}

/// Generate `size` random bytes to use as an upload payload.
///
/// A failing random source is logged and yields an empty buffer, so a benchmark iteration
/// keeps going instead of aborting. Use [`try_random_data`] to observe the failure.
pub fn random_data(size: usize) -> Bytes {
    try_random_data(size).unwrap_or_else(|err| {
        tracing::error!("failed to generate {size} random bytes: {err}");
        Bytes::new()
    })
}
