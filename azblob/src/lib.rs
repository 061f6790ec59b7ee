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

//! Azure Blob Storage client: Shared Key signing and chunked block uploads.
//!
//! This crate re-exports [`azblob_core`] and [`azblob_storage`], and with the
//! `default-context` feature offers a [`Context`] wired with tokio file
//! reads, reqwest and the OS environment.
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> azblob::Result<()> {
//! let client = azblob::default_client()?;
//!
//! client.create_container_if_not_exists("photos").await?;
//! client.upload_local_blob("./cat.jpg", "photos").await?;
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use azblob_core::*;
pub use azblob_storage::*;

#[cfg(feature = "default-context")]
pub use azblob_file_read_tokio::TokioFileRead;
#[cfg(feature = "default-context")]
pub use azblob_http_send_reqwest::ReqwestHttpSend;

/// Create a context reading files with tokio, sending requests with reqwest
/// and looking up variables in the OS environment.
#[cfg(feature = "default-context")]
pub fn default_context() -> Context {
    Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
}

/// Create a client on top of [`default_context`] configured from `AZBLOB_*`
/// environment variables.
///
/// # Customization
///
/// Build the config by hand to use anything else:
///
/// ```no_run
/// use azblob::{default_context, BlobClient, Config};
///
/// # fn example() -> azblob::Result<()> {
/// let config = Config::try_from_connection_string("UseDevelopmentStorage=true")?;
/// let client = BlobClient::new(default_context(), config)?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub fn default_client() -> Result<BlobClient> {
    let ctx = default_context();
    let config = Config::default().from_env(&ctx);
    BlobClient::new(ctx, config)
}
