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

use azblob_core::{Error, Result};
use bytes::{Bytes, BytesMut};
use futures::stream::{self, Stream};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Split a reader into chunks of exactly `chunk_size` bytes, except the last.
///
/// The stream owns the reader and yields nothing for an empty source. A read
/// failure ends the stream with [`azblob_core::ErrorKind::Unexpected`].
pub(crate) fn chunked<R>(reader: R, chunk_size: usize) -> impl Stream<Item = Result<Bytes>>
where
    R: AsyncRead + Unpin + Send,
{
    stream::try_unfold(Some(reader), move |state| next_chunk(state, chunk_size))
}

/// Split in-memory data into chunks of `chunk_size` bytes, except the last.
///
/// Chunks share the buffer of `data`, nothing is copied.
pub(crate) fn split(data: Bytes, chunk_size: usize) -> impl Stream<Item = Result<Bytes>> {
    let len = data.len();
    stream::iter(
        (0..len)
            .step_by(chunk_size)
            .map(move |start| Ok(data.slice(start..len.min(start + chunk_size)))),
    )
}

/// The reader is dropped once it hits EOF so that no more reads happen.
async fn next_chunk<R>(state: Option<R>, chunk_size: usize) -> Result<Option<(Bytes, Option<R>)>>
where
    R: AsyncRead + Unpin + Send,
{
    let Some(mut reader) = state else {
        return Ok(None);
    };

    let mut buf = BytesMut::with_capacity(chunk_size);
    while buf.len() < chunk_size {
        let n = (&mut reader)
            .take((chunk_size - buf.len()) as u64)
            .read_buf(&mut buf)
            .await
            .map_err(|e| Error::unexpected("failed to read upload source").with_source(e))?;
        if n == 0 {
            return Ok((!buf.is_empty()).then(|| (buf.freeze(), None)));
        }
    }

    Ok(Some((buf.freeze(), Some(reader))))
}
