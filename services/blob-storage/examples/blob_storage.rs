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

use anyhow::Result;
use azblob_core::{Context, OsEnv};
use azblob_file_read_tokio::TokioFileRead;
use azblob_http_send_reqwest::ReqwestHttpSend;
use azblob_storage::{BlobClient, Config};

/// Upload a local file into a container.
///
/// ```shell
/// AZBLOB_CONNECTION_STRING="UseDevelopmentStorage=true" \
///     cargo run --example blob_storage -- photos ./cat.jpg
/// ```
///
/// Without `AZBLOB_CONNECTION_STRING`, the client is configured from
/// `AZBLOB_ACCOUNT_NAME`, `AZBLOB_ACCOUNT_KEY` and `AZBLOB_ENDPOINT`.
#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let mut args = std::env::args().skip(1);
    let (Some(container), Some(path)) = (args.next(), args.next()) else {
        eprintln!("usage: blob_storage <container> <file>");
        return Ok(());
    };

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    let config = match ctx.env_var("AZBLOB_CONNECTION_STRING") {
        Some(conn_str) => Config::try_from_connection_string(&conn_str)?,
        None => Config::default(),
    }
    .from_env(&ctx);
    let client = BlobClient::new(ctx, config)?;
    println!("using endpoint {}", client.endpoint());

    if client.create_container_if_not_exists(&container).await? {
        println!("created container {container}");
    }

    match client.upload_local_blob(&path, &container).await {
        Ok(()) => println!("uploaded {path} into {container}"),
        Err(err) => println!("upload failed ({}): {}", err.kind(), err.message()),
    }

    Ok(())
}
