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

use std::path::Path;

use azblob_core::hash::base64_encode;
use azblob_core::{Error, Result};
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use http::{HeaderMap, Method};
use log::debug;
use tokio::io::AsyncRead;

use crate::chunk::{chunked, split};
use crate::client::expect_created;
use crate::{BlobClient, BlockList};

/// Generate a fresh block id: base64 of a random uuid string.
///
/// All ids of one blob must have the same length, which holds since uuid
/// strings are always 36 bytes.
pub fn new_block_id() -> String {
    base64_encode(uuid::Uuid::new_v4().to_string().as_bytes())
}

impl BlobClient {
    /// Upload a local file as block blob named after the file name.
    ///
    /// The file is read through the context's `FileRead`. Any failure to
    /// read it is reported as `NoSuchFile`.
    pub async fn upload_local_blob(&self, path: &str, container: &str) -> Result<()> {
        let Some(name) = Path::new(path).file_name().and_then(|v| v.to_str()) else {
            return Err(Error::no_such_file());
        };

        let data = self.ctx.file_read(path).await.map_err(|e| {
            debug!("failed to read local blob {path}: {e}");
            Error::no_such_file().with_source(e)
        })?;

        self.upload_blob(data, name, container).await
    }

    /// Upload bytes as block blob `container/name`.
    pub async fn upload_blob(
        &self,
        data: impl Into<Bytes>,
        name: &str,
        container: &str,
    ) -> Result<()> {
        let path = format!("{container}/{name}");
        self.upload_chunks(&path, split(data.into(), self.chunk_size))
            .await
    }

    /// Upload everything `reader` yields as block blob `container/name`.
    ///
    /// The source is split into blocks of `chunk_size` bytes staged one by
    /// one, or up to `upload_concurrency` at a time. Blocks are committed in
    /// read order once all of them are staged. The first failure stops the
    /// upload and nothing is committed.
    pub async fn upload_blob_from_reader<R>(
        &self,
        reader: R,
        name: &str,
        container: &str,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin + Send,
    {
        let path = format!("{container}/{name}");
        self.upload_chunks(&path, chunked(reader, self.chunk_size))
            .await
    }

    /// Stage every chunk of `chunks` in order, then commit them as the blob.
    async fn upload_chunks(
        &self,
        path: &str,
        chunks: impl Stream<Item = Result<Bytes>> + Send,
    ) -> Result<()> {
        let ids: Vec<String> = chunks
            .map_ok(|chunk| {
                let id = new_block_id();
                async move {
                    self.stage_block(path, &id, chunk).await?;
                    Ok::<_, Error>(id)
                }
            })
            .try_buffered(self.upload_concurrency)
            .try_collect()
            .await?;

        self.commit_block_list(path, &BlockList::with_latest(ids))
            .await
    }

    /// Stage one uncommitted block of the blob at `path`.
    pub async fn stage_block(&self, path: &str, block_id: &str, chunk: Bytes) -> Result<()> {
        let size = chunk.len();
        let resp = self
            .send(
                Method::PUT,
                path,
                &[("comp", "block"), ("blockid", block_id)],
                HeaderMap::new(),
                Some(chunk),
            )
            .await?;
        expect_created(&resp)?;

        debug!("staged block {block_id} of {path} with {size} bytes");
        Ok(())
    }

    /// Commit a block list, making it the content of the blob at `path`.
    pub async fn commit_block_list(&self, path: &str, block_list: &BlockList) -> Result<()> {
        let body = block_list.to_xml()?;
        let resp = self
            .send(
                Method::PUT,
                path,
                &[("comp", "blocklist")],
                HeaderMap::new(),
                Some(Bytes::from(body)),
            )
            .await?;
        expect_created(&resp)?;

        debug!(
            "committed {} blocks to {path}",
            block_list.latest.len()
        );
        Ok(())
    }
}
