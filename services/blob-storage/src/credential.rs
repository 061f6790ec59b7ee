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

use azblob_core::hash::{base64_decode, base64_hmac_sha256};
use azblob_core::utils::Redact;
use azblob_core::{Error, Result, SigningCredential};
use std::fmt::{Debug, Formatter};

/// Credential enum for Azure Storage authentication methods.
///
/// Only shared key is supported today. Code outside this module should go
/// through [`Credential::account_name`] and [`Credential::authorization`]
/// rather than matching on variants.
#[derive(Clone)]
#[non_exhaustive]
pub enum Credential {
    /// Shared Key authentication with account name and key
    SharedKey {
        /// Azure storage account name.
        account_name: String,
        /// Azure storage account key, base64 encoded.
        account_key: String,
        /// Sign with the `SharedKeyLite` scheme name.
        is_lite: bool,
    },
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::SharedKey {
                account_name,
                account_key,
                is_lite,
            } => f
                .debug_struct("Credential::SharedKey")
                .field("account_name", &Redact::from(account_name))
                .field("account_key", &Redact::from(account_key))
                .field("is_lite", is_lite)
                .finish(),
        }
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        match self {
            Credential::SharedKey {
                account_name,
                account_key,
                ..
            } => !account_name.is_empty() && !account_key.is_empty(),
        }
    }
}

impl Credential {
    /// Create a new credential with shared key authentication.
    pub fn with_shared_key(account_name: &str, account_key: &str) -> Self {
        Self::SharedKey {
            account_name: account_name.to_string(),
            account_key: account_key.to_string(),
            is_lite: false,
        }
    }

    /// Create a new credential with shared key lite authentication.
    pub fn with_shared_key_lite(account_name: &str, account_key: &str) -> Self {
        Self::SharedKey {
            account_name: account_name.to_string(),
            account_key: account_key.to_string(),
            is_lite: true,
        }
    }

    /// The storage account this credential belongs to.
    pub fn account_name(&self) -> &str {
        match self {
            Credential::SharedKey { account_name, .. } => account_name,
        }
    }

    /// Build the `Authorization` header value for the given string to sign.
    ///
    /// The key is decoded on every call; a malformed key is reported as
    /// [`azblob_core::ErrorKind::ConfigInvalid`].
    pub fn authorization(&self, string_to_sign: &str) -> Result<String> {
        match self {
            Credential::SharedKey {
                account_name,
                account_key,
                is_lite,
            } => {
                let key = base64_decode(account_key).map_err(|e| {
                    Error::config_invalid("account key is not valid base64").with_source(e)
                })?;
                let signature = base64_hmac_sha256(&key, string_to_sign.as_bytes());
                let scheme = if *is_lite { "SharedKeyLite" } else { "SharedKey" };

                Ok(format!("{scheme} {account_name}:{signature}"))
            }
        }
    }
}
