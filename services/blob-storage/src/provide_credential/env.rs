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

use async_trait::async_trait;
use azblob_core::{Context, ProvideCredential, Result};

use crate::constants::*;
use crate::credential::Credential;

/// EnvCredentialProvider loads a shared key from environment variables.
///
/// - account name: `AZBLOB_ACCOUNT_NAME`, then `AZURE_STORAGE_ACCOUNT_NAME`
/// - account key: `AZBLOB_ACCOUNT_KEY`, then `AZURE_STORAGE_ACCOUNT_KEY`
#[derive(Clone, Debug, Default)]
pub struct EnvCredentialProvider {
    is_lite: bool,
}

impl EnvCredentialProvider {
    /// Create a new env provider signing with `SharedKey`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign with `SharedKeyLite` instead.
    pub fn with_lite(mut self, is_lite: bool) -> Self {
        self.is_lite = is_lite;
        self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let Some(account_name) = ctx
            .env_var(AZBLOB_ACCOUNT_NAME)
            .or_else(|| ctx.env_var(AZURE_STORAGE_ACCOUNT_NAME))
        else {
            return Ok(None);
        };
        let Some(account_key) = ctx
            .env_var(AZBLOB_ACCOUNT_KEY)
            .or_else(|| ctx.env_var(AZURE_STORAGE_ACCOUNT_KEY))
        else {
            return Ok(None);
        };

        Ok(Some(if self.is_lite {
            Credential::with_shared_key_lite(&account_name, &account_key)
        } else {
            Credential::with_shared_key(&account_name, &account_key)
        }))
    }
}
