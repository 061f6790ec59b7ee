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

use azblob_core::hash::{base64_decode, base64_hmac_sha256};
use azblob_core::{Context, ErrorKind, StaticEnv};
use azblob_storage::{BlobClient, Config};
use http::{Method, StatusCode};
use pretty_assertions::assert_eq;

use super::{client, config, KEY};
use crate::mock::{response, MockHttpSend};

#[tokio::test]
async fn test_container_exists() {
    let mock = MockHttpSend::always(StatusCode::OK);
    let client = client(&mock, config(4));

    assert!(client.container_exists("photos").await.unwrap());

    let reqs = mock.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].method, Method::HEAD);
    assert_eq!(
        reqs[0].uri.to_string(),
        "https://acct.blob.core.windows.net/photos?restype=container"
    );
}

#[tokio::test]
async fn test_container_not_exists() {
    let mock = MockHttpSend::always(StatusCode::NOT_FOUND);
    let client = client(&mock, config(4));

    assert!(!client.container_exists("photos").await.unwrap());
}

#[tokio::test]
async fn test_container_exists_other_error() {
    let mock = MockHttpSend::new(|_| {
        response(
            StatusCode::FORBIDDEN,
            "<Error><Code>AuthorizationFailure</Code><Message>This request is not authorized.</Message></Error>",
        )
    });
    let client = client(&mock, config(4));

    let err = client.container_exists("photos").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Custom(StatusCode::FORBIDDEN));
    assert_eq!(err.message(), "This request is not authorized.");
    assert_eq!(err.code(), Some("AuthorizationFailure"));
    assert!(err.is_remote());
}

#[tokio::test]
async fn test_invalid_authentication() {
    let mock = MockHttpSend::always(StatusCode::UNAUTHORIZED);
    let client = client(&mock, config(4));

    let err = client.container_exists("photos").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAuthenticationInfo);
    assert_eq!(err.message(), "The key is missing or is invalid");
}

#[tokio::test]
async fn test_create_container() {
    let mock = MockHttpSend::always(StatusCode::CREATED);
    let client = client(&mock, config(4));

    client.create_container("photos").await.unwrap();

    let reqs = mock.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].method, Method::PUT);
    assert_eq!(reqs[0].query("restype").as_deref(), Some("container"));
}

#[tokio::test]
async fn test_create_container_conflict() {
    let mock = MockHttpSend::always(StatusCode::CONFLICT);
    let client = client(&mock, config(4));

    let err = client.create_container("photos").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceAlreadyExists);
    assert_eq!(err.message(), "Resource already exists");
}

#[tokio::test]
async fn test_create_container_not_found_with_message() {
    let mock = MockHttpSend::new(|_| {
        response(
            StatusCode::NOT_FOUND,
            "<Error><Message>X</Message></Error>",
        )
    });
    let client = client(&mock, config(4));

    let err = client.create_container("photos").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
    assert_eq!(err.message(), "X");
}

#[tokio::test]
async fn test_create_container_requires_created() {
    let mock = MockHttpSend::always(StatusCode::OK);
    let client = client(&mock, config(4));

    let err = client.create_container("photos").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Custom(StatusCode::OK));
}

#[tokio::test]
async fn test_create_container_if_not_exists_existing() {
    let mock = MockHttpSend::always(StatusCode::OK);
    let client = client(&mock, config(4));

    assert!(!client.create_container_if_not_exists("photos").await.unwrap());
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn test_create_container_if_not_exists_missing() {
    let mock = MockHttpSend::new(|req| match req.method {
        Method::HEAD => response(StatusCode::NOT_FOUND, ""),
        _ => response(StatusCode::CREATED, ""),
    });
    let client = client(&mock, config(4));

    assert!(client.create_container_if_not_exists("photos").await.unwrap());

    let methods: Vec<Method> = mock.requests().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, vec![Method::HEAD, Method::PUT]);
}

#[tokio::test]
async fn test_create_container_if_not_exists_lost_race() {
    let mock = MockHttpSend::new(|req| match req.method {
        Method::HEAD => response(StatusCode::NOT_FOUND, ""),
        _ => response(StatusCode::CONFLICT, ""),
    });
    let client = client(&mock, config(4));

    assert!(!client.create_container_if_not_exists("photos").await.unwrap());
}

#[tokio::test]
async fn test_baseline_headers_and_signature() {
    let mock = MockHttpSend::always(StatusCode::OK);
    let client = client(&mock, config(4));

    client.container_exists("photos").await.unwrap();
    let req = &mock.requests()[0];

    let request_id = req.header("x-ms-client-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok(), "{request_id}");
    let date = req.header("x-ms-date").unwrap();
    assert!(date.ends_with(" GMT"), "{date}");
    assert_eq!(req.header("x-ms-version"), Some("2023-05-03"));

    // Rebuild the string to sign by hand and check the signature matches.
    let string_to_sign = format!(
        "HEAD\n\n\n\n\n\n\n\n\n\n\n\n\
         x-ms-client-request-id:{request_id}\n\
         x-ms-date:{date}\n\
         x-ms-version:2023-05-03\n\
         /acct/photos\n\
         restype:container"
    );
    let signature = base64_hmac_sha256(&base64_decode(KEY).unwrap(), string_to_sign.as_bytes());
    assert_eq!(
        req.header("authorization"),
        Some(format!("SharedKey acct:{signature}").as_str())
    );
}

#[tokio::test]
async fn test_fresh_request_id_per_call() {
    let mock = MockHttpSend::always(StatusCode::OK);
    let client = client(&mock, config(4));

    client.container_exists("photos").await.unwrap();
    client.container_exists("photos").await.unwrap();

    let reqs = mock.requests();
    assert_ne!(
        reqs[0].header("x-ms-client-request-id"),
        reqs[1].header("x-ms-client-request-id")
    );
}

#[tokio::test]
async fn test_shared_key_lite() {
    let mock = MockHttpSend::always(StatusCode::OK);
    let client = client(
        &mock,
        Config {
            is_lite: true,
            ..config(4)
        },
    );

    client.container_exists("photos").await.unwrap();
    let auth = mock.requests()[0].header("authorization").unwrap().to_string();
    assert!(auth.starts_with("SharedKeyLite acct:"), "{auth}");
}

#[tokio::test]
async fn test_credential_from_env() {
    let mock = MockHttpSend::always(StatusCode::OK);
    let ctx = Context::new()
        .with_http_send(mock.clone())
        .with_env(StaticEnv {
            envs: HashMap::from([
                ("AZBLOB_ACCOUNT_NAME".to_string(), "envacct".to_string()),
                ("AZBLOB_ACCOUNT_KEY".to_string(), KEY.to_string()),
            ]),
        });
    let config = Config::default().from_env(&ctx);
    let client = BlobClient::new(ctx, config).unwrap();

    assert_eq!(client.endpoint(), "https://envacct.blob.core.windows.net");
    client.container_exists("photos").await.unwrap();

    let auth = mock.requests()[0].header("authorization").unwrap().to_string();
    assert!(auth.starts_with("SharedKey envacct:"), "{auth}");
}

#[tokio::test]
async fn test_credential_from_azure_storage_env() {
    let mock = MockHttpSend::always(StatusCode::OK);
    let ctx = Context::new()
        .with_http_send(mock.clone())
        .with_env(StaticEnv {
            envs: HashMap::from([
                ("AZURE_STORAGE_ACCOUNT_NAME".to_string(), "envacct".to_string()),
                ("AZURE_STORAGE_ACCOUNT_KEY".to_string(), KEY.to_string()),
            ]),
        });
    let config = Config::default().from_env(&ctx);
    let client = BlobClient::new(ctx, config).unwrap();

    assert_eq!(client.endpoint(), "https://envacct.blob.core.windows.net");
    client.container_exists("photos").await.unwrap();

    let req = &mock.requests()[0];
    assert_eq!(
        req.uri.to_string(),
        "https://envacct.blob.core.windows.net/photos?restype=container"
    );
    let auth = req.header("authorization").unwrap().to_string();
    assert!(auth.starts_with("SharedKey envacct:"), "{auth}");
}

#[tokio::test]
async fn test_credential_of_other_account() {
    let mock = MockHttpSend::always(StatusCode::OK);
    let ctx = Context::new()
        .with_http_send(mock.clone())
        .with_env(StaticEnv {
            envs: HashMap::from([
                ("AZURE_STORAGE_ACCOUNT_NAME".to_string(), "other".to_string()),
                ("AZURE_STORAGE_ACCOUNT_KEY".to_string(), KEY.to_string()),
            ]),
        });
    let client = BlobClient::new(
        ctx,
        Config {
            account_name: Some("acct".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(client.endpoint(), "https://acct.blob.core.windows.net");

    let err = client.container_exists("photos").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_missing_credential() {
    let mock = MockHttpSend::always(StatusCode::OK);
    let ctx = Context::new().with_http_send(mock.clone());
    let client = BlobClient::new(
        ctx,
        Config {
            account_name: Some("acct".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    let err = client.container_exists("photos").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_invalid_key() {
    let mock = MockHttpSend::always(StatusCode::OK);
    let client = client(
        &mock,
        Config {
            account_key: Some("not base64!".to_string()),
            ..config(4)
        },
    );

    let err = client.container_exists("photos").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(!err.is_remote());
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_transport_failure() {
    let client = BlobClient::new(Context::new(), config(4)).unwrap();

    let err = client.container_exists("photos").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(!err.is_remote());
}

#[tokio::test]
async fn test_development_storage() {
    let mock = MockHttpSend::always(StatusCode::OK);
    let config = Config::try_from_connection_string("UseDevelopmentStorage=true").unwrap();
    let client = client(&mock, config);

    client.container_exists("photos").await.unwrap();

    let req = &mock.requests()[0];
    assert_eq!(
        req.uri.to_string(),
        "http://127.0.0.1:10000/devstoreaccount1/photos?restype=container"
    );
    let auth = req.header("authorization").unwrap();
    assert!(auth.starts_with("SharedKey devstoreaccount1:"), "{auth}");
}

#[test]
fn test_invalid_config() {
    let err = BlobClient::new(Context::new(), config(0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

    let err = BlobClient::new(Context::new(), Config::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

    let err = BlobClient::new(
        Context::new(),
        Config {
            endpoint: Some("not a url".to_string()),
            ..config(4)
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}
