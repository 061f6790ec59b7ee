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

use std::collections::HashMap;

use azblob_core::{Error, Result};

use crate::config::{Config, Protocol};

// Azurite defaults.
const AZURITE_DEFAULT_STORAGE_ACCOUNT_NAME: &str = "devstoreaccount1";
const AZURITE_DEFAULT_STORAGE_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const AZURITE_DEFAULT_BLOB_URI: &str = "http://127.0.0.1:10000";

/// Parses an [Azure connection string][1] for the blob service.
///
/// Only shared key fields are understood. A `SharedAccessSignature` field is
/// rejected instead of being silently ignored.
///
/// [1]: https://learn.microsoft.com/en-us/azure/storage/common/storage-configure-connection-string
pub(crate) fn parse(conn_str: &str) -> Result<Config> {
    let key_values = parse_into_key_values(conn_str)?;

    if key_values.contains_key("SharedAccessSignature") {
        return Err(Error::config_invalid(
            "shared access signature is not supported, use AccountName and AccountKey",
        ));
    }

    if let Some(config) = collect_development_config(&key_values) {
        return Ok(config);
    }

    let protocol = match key_values.get("DefaultEndpointsProtocol") {
        Some(v) => v.parse::<Protocol>()?,
        None => Protocol::Https,
    };

    Ok(Config {
        account_name: key_values.get("AccountName").cloned(),
        account_key: key_values.get("AccountKey").cloned(),
        endpoint: collect_endpoint(&key_values, protocol),
        protocol,
        ..Default::default()
    })
}

fn parse_into_key_values(conn_str: &str) -> Result<HashMap<String, String>> {
    conn_str
        .trim()
        .replace('\n', "")
        .split(';')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(|field| {
            let (key, value) = field.split_once('=').ok_or_else(|| {
                Error::config_invalid(format!(
                    "invalid connection string, expected '=' in field: {field}"
                ))
            })?;
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

fn collect_development_config(key_values: &HashMap<String, String>) -> Option<Config> {
    if key_values.get("UseDevelopmentStorage").map(String::as_str) != Some("true") {
        return None;
    }

    let account_name = key_values
        .get("AccountName")
        .cloned()
        .unwrap_or_else(|| AZURITE_DEFAULT_STORAGE_ACCOUNT_NAME.to_string());
    let account_key = key_values
        .get("AccountKey")
        .cloned()
        .unwrap_or_else(|| AZURITE_DEFAULT_STORAGE_ACCOUNT_KEY.to_string());
    let proxy_uri = key_values
        .get("DevelopmentStorageProxyUri")
        .map(String::as_str)
        .unwrap_or(AZURITE_DEFAULT_BLOB_URI);

    Some(Config {
        endpoint: Some(format!("{}/{account_name}", proxy_uri.trim_end_matches('/'))),
        account_name: Some(account_name),
        account_key: Some(account_key),
        protocol: Protocol::Http,
        ..Default::default()
    })
}

/// `BlobEndpoint` wins, otherwise the endpoint is built from `AccountName`
/// and `EndpointSuffix` when both exist.
fn collect_endpoint(key_values: &HashMap<String, String>, protocol: Protocol) -> Option<String> {
    if let Some(endpoint) = key_values.get("BlobEndpoint") {
        return Some(endpoint.clone());
    }

    let account_name = key_values.get("AccountName")?;
    let endpoint_suffix = key_values.get("EndpointSuffix")?;
    Some(format!(
        "{}://{account_name}.blob.{endpoint_suffix}",
        protocol.as_str()
    ))
}
