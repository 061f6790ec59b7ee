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

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

// Headers used in azure blob storage.
pub const X_MS_DATE: &str = "x-ms-date";
pub const X_MS_VERSION: &str = "x-ms-version";
pub const X_MS_CLIENT_REQUEST_ID: &str = "x-ms-client-request-id";
pub const X_MS_ERROR_CODE: &str = "x-ms-error-code";
pub const CONTENT_MD5: &str = "content-md5";

/// Service version sent with every request.
pub const AZURE_VERSION: &str = "2023-05-03";

pub const BLOB_HOST_SUFFIX: &str = "blob.core.windows.net";

/// 5 MiB
pub const DEFAULT_CHUNK_SIZE: usize = 5 * 1024 * 1024;
/// Largest block the service accepts for version 2019-12-12 and later.
pub const MAX_BLOCK_SIZE: usize = 4000 * 1024 * 1024;

// Env values used to configure the client.
pub const AZBLOB_ACCOUNT_NAME: &str = "AZBLOB_ACCOUNT_NAME";
pub const AZBLOB_ACCOUNT_KEY: &str = "AZBLOB_ACCOUNT_KEY";
pub const AZBLOB_ENDPOINT: &str = "AZBLOB_ENDPOINT";
pub const AZBLOB_CHUNK_SIZE: &str = "AZBLOB_CHUNK_SIZE";
pub const AZBLOB_UPLOAD_CONCURRENCY: &str = "AZBLOB_UPLOAD_CONCURRENCY";
pub const AZURE_STORAGE_ACCOUNT_NAME: &str = "AZURE_STORAGE_ACCOUNT_NAME";
pub const AZURE_STORAGE_ACCOUNT_KEY: &str = "AZURE_STORAGE_ACCOUNT_KEY";

/// Path segments keep `/` so that `container/dir/blob` stays hierarchical.
pub static PATH_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'/')
    .remove(b'~');
