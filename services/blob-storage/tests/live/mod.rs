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

//! Tests against a real account or Azurite.
//!
//! Enabled by `AZBLOB_TEST=on`. The client is configured from the usual
//! `AZBLOB_*` variables, a `.env` file is honored.

use std::env;

use anyhow::Result;
use azblob_core::{Context, ErrorKind, OsEnv};
use azblob_file_read_tokio::TokioFileRead;
use azblob_http_send_reqwest::ReqwestHttpSend;
use azblob_storage::{BlobClient, Config};
use log::warn;

fn init_client() -> Option<BlobClient> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("AZBLOB_TEST").unwrap_or_default() != "on" {
        return None;
    }

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::default().from_env(&ctx);

    Some(BlobClient::new(ctx, config).expect("client must be built from env"))
}

fn test_container() -> String {
    env::var("AZBLOB_TEST_CONTAINER").unwrap_or_else(|_| "azblob-test".to_string())
}

#[tokio::test]
async fn test_container_lifecycle() -> Result<()> {
    let Some(client) = init_client() else {
        warn!("AZBLOB_TEST is not set, skipped");
        return Ok(());
    };
    let container = test_container();

    client.create_container_if_not_exists(&container).await?;
    assert!(client.container_exists(&container).await?);
    assert!(!client.create_container_if_not_exists(&container).await?);

    let err = client.create_container(&container).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceAlreadyExists);

    Ok(())
}

#[tokio::test]
async fn test_container_not_exists() -> Result<()> {
    let Some(client) = init_client() else {
        warn!("AZBLOB_TEST is not set, skipped");
        return Ok(());
    };

    let name = format!("missing-{}", uuid::Uuid::new_v4());
    assert!(!client.container_exists(&name).await?);

    Ok(())
}

#[tokio::test]
async fn test_upload_blob() -> Result<()> {
    let Some(client) = init_client() else {
        warn!("AZBLOB_TEST is not set, skipped");
        return Ok(());
    };
    let container = test_container();
    client.create_container_if_not_exists(&container).await?;

    let data = vec![b'x'; 3 * 1024 * 1024 + 7];
    client
        .upload_blob(data, "dir/special !@#$%^&()_+-=;'.bin", &container)
        .await?;
    client.upload_blob(Vec::new(), "empty.bin", &container).await?;

    Ok(())
}

#[tokio::test]
async fn test_upload_local_blob() -> Result<()> {
    let Some(client) = init_client() else {
        warn!("AZBLOB_TEST is not set, skipped");
        return Ok(());
    };
    let container = test_container();
    client.create_container_if_not_exists(&container).await?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("local.txt");
    std::fs::write(&path, "uploaded from disk")?;
    client
        .upload_local_blob(path.to_str().unwrap_or_default(), &container)
        .await?;

    Ok(())
}

#[tokio::test]
async fn test_wrong_key() -> Result<()> {
    if init_client().is_none() {
        warn!("AZBLOB_TEST is not set, skipped");
        return Ok(());
    }

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config {
        account_key: Some("d3Jvbmcta2V5".to_string()),
        ..Config::default().from_env(&ctx)
    };
    let client = BlobClient::new(ctx, config)?;

    let err = client.container_exists(&test_container()).await.unwrap_err();
    assert!(err.is_remote(), "{err:?}");

    Ok(())
}
