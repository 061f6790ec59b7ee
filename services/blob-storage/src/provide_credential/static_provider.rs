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

use crate::config::Config;
use crate::credential::Credential;

/// StaticCredentialProvider always returns the credential it was built with.
#[derive(Clone, Debug)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    /// Create a provider for a `SharedKey` credential.
    pub fn new_shared_key(account_name: &str, account_key: &str) -> Self {
        Self {
            credential: Credential::with_shared_key(account_name, account_key),
        }
    }

    /// Create a provider for a `SharedKeyLite` credential.
    pub fn new_shared_key_lite(account_name: &str, account_key: &str) -> Self {
        Self {
            credential: Credential::with_shared_key_lite(account_name, account_key),
        }
    }

    /// Build a provider from the account fields of a config.
    ///
    /// Returns `None` unless both account name and key are set.
    pub fn from_config(config: &Config) -> Option<Self> {
        let account_name = config.account_name.as_deref()?;
        let account_key = config.account_key.as_deref()?;

        Some(if config.is_lite {
            Self::new_shared_key_lite(account_name, account_key)
        } else {
            Self::new_shared_key(account_name, account_key)
        })
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _ctx: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}
