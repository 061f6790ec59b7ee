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
use quick_xml::{de, se};
use serde::{Deserialize, Serialize};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Manifest committed by `Put Block List`.
///
/// Only `latest` is filled by uploads. Ids are committed in the order they
/// appear in each list.
///
/// - [Put Block List](https://learn.microsoft.com/en-us/rest/api/storageservices/put-block-list)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename = "BlockList", rename_all = "PascalCase")]
pub struct BlockList {
    /// Ids of already committed blocks to keep.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub committed: Vec<String>,
    /// Ids of staged blocks to commit.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uncommitted: Vec<String>,
    /// Ids to commit from whichever list holds the most recent version.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub latest: Vec<String>,
}

impl BlockList {
    /// Build a block list committing `ids` as latest, in order.
    pub fn with_latest(ids: Vec<String>) -> Self {
        Self {
            latest: ids,
            ..Default::default()
        }
    }

    /// Serialize into the request body of `Put Block List`.
    pub fn to_xml(&self) -> Result<String> {
        let body = se::to_string(self)
            .map_err(|e| Error::unexpected("failed to serialize block list").with_source(e))?;

        Ok(format!("{XML_DECLARATION}{body}"))
    }

    /// Parse a block list document.
    pub fn from_xml(s: &str) -> Result<Self> {
        de::from_str(s).map_err(|e| Error::unexpected("failed to parse block list").with_source(e))
    }
}
