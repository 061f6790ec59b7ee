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

use std::fmt::{Debug, Formatter};
use std::str::FromStr;

use azblob_core::utils::Redact;
use azblob_core::{Context, Error, Result};
use log::warn;

use crate::connection_string;
use crate::constants::*;

/// Protocol used to build the default blob endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Protocol {
    /// Plain http, mostly useful against local emulators.
    Http,
    /// https, the default.
    #[default]
    Https,
}

impl Protocol {
    /// The url scheme of this protocol.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            v => Err(Error::config_invalid(format!("invalid protocol: {v}"))),
        }
    }
}

/// Config carries all the configuration for a blob client.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// `account_name` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZBLOB_ACCOUNT_NAME`]
    pub account_name: Option<String>,
    /// `account_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZBLOB_ACCOUNT_KEY`]
    pub account_key: Option<String>,
    /// Sign requests with `SharedKeyLite` instead of `SharedKey`.
    pub is_lite: bool,
    /// Protocol of the derived endpoint, ignored when `endpoint` is set.
    pub protocol: Protocol,
    /// Explicit endpoint like `http://127.0.0.1:10000/devstoreaccount1`.
    ///
    /// If not set, the endpoint is `{protocol}://{account_name}.blob.core.windows.net`.
    pub endpoint: Option<String>,
    /// Max size of every staged block, 5 MiB by default.
    pub chunk_size: usize,
    /// How many blocks may be staged at the same time, 1 by default.
    pub upload_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account_name: None,
            account_key: None,
            is_lite: false,
            protocol: Protocol::default(),
            endpoint: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            upload_concurrency: 1,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("account_name", &self.account_name)
            .field("account_key", &Redact::from(&self.account_key))
            .field("is_lite", &self.is_lite)
            .field("protocol", &self.protocol)
            .field("endpoint", &self.endpoint)
            .field("chunk_size", &self.chunk_size)
            .field("upload_concurrency", &self.upload_concurrency)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    ///
    /// Values already set on the config are overwritten by env values.
    /// Numbers that fail to parse are ignored with a warning.
    ///
    /// The account is read from `AZBLOB_ACCOUNT_NAME` and `AZBLOB_ACCOUNT_KEY`,
    /// falling back to `AZURE_STORAGE_ACCOUNT_NAME` and
    /// `AZURE_STORAGE_ACCOUNT_KEY`, the same way [`crate::EnvCredentialProvider`]
    /// does, so the endpoint and the signing account agree.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx
            .env_var(AZBLOB_ACCOUNT_NAME)
            .or_else(|| ctx.env_var(AZURE_STORAGE_ACCOUNT_NAME))
        {
            self.account_name = Some(v);
        }
        if let Some(v) = ctx
            .env_var(AZBLOB_ACCOUNT_KEY)
            .or_else(|| ctx.env_var(AZURE_STORAGE_ACCOUNT_KEY))
        {
            self.account_key = Some(v);
        }
        if let Some(v) = ctx.env_var(AZBLOB_ENDPOINT) {
            self.endpoint = Some(v);
        }
        if let Some(v) = ctx.env_var(AZBLOB_CHUNK_SIZE) {
            match v.parse() {
                Ok(size) => self.chunk_size = size,
                Err(err) => warn!("ignore invalid {AZBLOB_CHUNK_SIZE} {v:?}: {err}"),
            }
        }
        if let Some(v) = ctx.env_var(AZBLOB_UPLOAD_CONCURRENCY) {
            match v.parse() {
                Ok(n) => self.upload_concurrency = n,
                Err(err) => warn!("ignore invalid {AZBLOB_UPLOAD_CONCURRENCY} {v:?}: {err}"),
            }
        }

        self
    }

    /// Parses an [Azure connection string][1] into a configuration object.
    ///
    /// The connection string doesn't have to specify all required parameters
    /// because the user is still allowed to set them later directly on the object.
    ///
    /// An example of a connection string looks like:
    ///
    /// ```txt
    /// AccountName=mystorageaccount;
    /// AccountKey=Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==;
    /// BlobEndpoint=https://mystorageaccount.blob.core.windows.net
    /// ```
    ///
    /// [1]: https://learn.microsoft.com/en-us/azure/storage/common/storage-configure-connection-string
    pub fn try_from_connection_string(conn_str: &str) -> Result<Self> {
        connection_string::parse(conn_str)
    }

    /// Resolve the endpoint every request is addressed to.
    ///
    /// The trailing `/` of an explicit endpoint is dropped so that paths can
    /// be appended as is.
    pub fn endpoint(&self) -> Result<String> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(endpoint.trim_end_matches('/').to_string());
        }

        match self.account_name.as_deref() {
            Some(name) if !name.is_empty() => Ok(format!(
                "{}://{name}.{BLOB_HOST_SUFFIX}",
                self.protocol.as_str()
            )),
            _ => Err(Error::config_invalid(
                "either endpoint or account_name must be set",
            )),
        }
    }

    /// Check that chunk size and concurrency are usable.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_size > MAX_BLOCK_SIZE {
            return Err(Error::config_invalid(format!(
                "chunk_size must be in (0, {MAX_BLOCK_SIZE}], got {}",
                self.chunk_size
            )));
        }
        if self.upload_concurrency == 0 {
            return Err(Error::config_invalid(
                "upload_concurrency must be at least 1",
            ));
        }

        Ok(())
    }
}
