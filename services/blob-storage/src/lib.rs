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

//! Azure Blob Storage client with Shared Key signing and block uploads.
//!
//! This crate provides:
//! - Shared Key and Shared Key Lite request signing
//! - Container existence checks and creation
//! - Chunked block blob uploads committed through a block list
//!
//! # Example
//!
//! ```rust,no_run
//! use azblob_core::{Context, OsEnv, Result};
//! use azblob_file_read_tokio::TokioFileRead;
//! use azblob_http_send_reqwest::ReqwestHttpSend;
//! use azblob_storage::{BlobClient, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     // Reads AZBLOB_ACCOUNT_NAME, AZBLOB_ACCOUNT_KEY and friends.
//!     let config = Config::default().from_env(&ctx);
//!     let client = BlobClient::new(ctx, config)?;
//!
//!     client.create_container_if_not_exists("photos").await?;
//!     client.upload_blob("hello, world", "hello.txt", "photos").await?;
//!     client.upload_local_blob("/tmp/cat.jpg", "photos").await?;
//!
//!     Ok(())
//! }
//! ```

mod constants;

mod config;
pub use config::{Config, Protocol};

mod connection_string;

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::RequestSigner;

mod provide_credential;
pub use provide_credential::*;

mod error;

mod block_list;
pub use block_list::BlockList;

mod chunk;

mod client;
pub use client::BlobClient;

mod upload;
pub use upload::new_block_id;
