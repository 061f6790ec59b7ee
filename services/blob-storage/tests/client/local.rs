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

use std::io::Write;

use azblob_core::{Context, ErrorKind};
use azblob_file_read_tokio::TokioFileRead;
use azblob_storage::BlobClient;
use http::StatusCode;
use pretty_assertions::assert_eq;

use super::config;
use crate::mock::MockHttpSend;

fn local_client(mock: &MockHttpSend) -> BlobClient {
    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(mock.clone());
    BlobClient::new(ctx, config(4)).unwrap()
}

#[tokio::test]
async fn test_upload_local_blob() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.bin");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(b"0123456789")
        .unwrap();

    let mock = MockHttpSend::always(StatusCode::CREATED);
    local_client(&mock)
        .upload_local_blob(path.to_str().unwrap(), "photos")
        .await
        .unwrap();

    let reqs = mock.requests();
    assert_eq!(reqs.len(), 4);
    assert!(reqs.iter().all(|r| r.uri.path() == "/photos/photo.bin"));

    let content: Vec<u8> = reqs
        .iter()
        .filter(|r| r.is_stage())
        .flat_map(|r| r.body.to_vec())
        .collect();
    assert_eq!(content, b"0123456789");
    assert!(reqs[3].is_commit());
}

#[tokio::test]
async fn test_upload_local_blob_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty");
    std::fs::File::create(&path).unwrap();

    let mock = MockHttpSend::always(StatusCode::CREATED);
    local_client(&mock)
        .upload_local_blob(path.to_str().unwrap(), "photos")
        .await
        .unwrap();

    let reqs = mock.requests();
    assert_eq!(reqs.len(), 1);
    assert!(reqs[0].is_commit());
}

#[tokio::test]
async fn test_upload_local_blob_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.bin");

    let mock = MockHttpSend::always(StatusCode::CREATED);
    let err = local_client(&mock)
        .upload_local_blob(path.to_str().unwrap(), "photos")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NoSuchFile);
    assert_eq!(err.message(), "No file found");
    assert!(!err.is_remote());
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_upload_local_blob_without_file_reader() {
    let mock = MockHttpSend::always(StatusCode::CREATED);
    let client = BlobClient::new(Context::new().with_http_send(mock.clone()), config(4)).unwrap();

    let err = client
        .upload_local_blob("/tmp/photo.bin", "photos")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NoSuchFile);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_upload_local_blob_without_file_name() {
    let mock = MockHttpSend::always(StatusCode::CREATED);

    let err = local_client(&mock)
        .upload_local_blob("/", "photos")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NoSuchFile);
    assert_eq!(mock.requests().len(), 0);
}
