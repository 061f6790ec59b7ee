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

use std::fmt::Write;

use azblob_core::time::{format_http_date, now};
use azblob_core::{Context, Error, ErrorKind, ProvideCredential, Result, Signer, QUERY_ENCODE_SET};
use bytes::Bytes;
use http::header::{self, HeaderMap, HeaderValue};
use http::{Method, Request, Response, StatusCode, Uri};
use log::debug;
use percent_encoding::utf8_percent_encode;

use crate::constants::*;
use crate::error::parse_error;
use crate::provide_credential::{EnvCredentialProvider, StaticCredentialProvider};
use crate::{Config, Credential, RequestSigner};

/// BlobClient talks to one storage account.
///
/// The client holds no mutable state: date, request id and signature are
/// computed for every request, so clones can be used concurrently.
#[derive(Clone, Debug)]
pub struct BlobClient {
    pub(crate) ctx: Context,
    endpoint: String,
    signer: Signer<Credential>,
    pub(crate) chunk_size: usize,
    pub(crate) upload_concurrency: usize,
}

impl BlobClient {
    /// Create a new client from config.
    ///
    /// The credential comes from `account_name` and `account_key` if both are
    /// set, otherwise it is loaded from env on every request.
    pub fn new(ctx: Context, config: Config) -> Result<Self> {
        match StaticCredentialProvider::from_config(&config) {
            Some(provider) => Self::with_credential_provider(ctx, config, provider),
            None => {
                let provider = EnvCredentialProvider::new().with_lite(config.is_lite);
                Self::with_credential_provider(ctx, config, provider)
            }
        }
    }

    /// Create a new client loading credentials from the given provider.
    ///
    /// If `account_name` is configured, credentials of any other account are
    /// refused with `ConfigInvalid` before a request is sent.
    pub fn with_credential_provider(
        ctx: Context,
        config: Config,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Result<Self> {
        config.validate()?;

        let endpoint = config.endpoint()?;
        let uri: Uri = endpoint.parse().map_err(|e| {
            Error::config_invalid(format!("invalid endpoint {endpoint}")).with_source(e)
        })?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(Error::config_invalid(format!(
                "endpoint {endpoint} must have scheme and host"
            )));
        }

        // The endpoint is addressed to the configured account, so the
        // credential must belong to it as well.
        let builder = match &config.account_name {
            Some(name) => RequestSigner::new().with_account_name(name),
            None => RequestSigner::new(),
        };

        Ok(Self {
            signer: Signer::new(ctx.clone(), provider, builder),
            ctx,
            endpoint,
            chunk_size: config.chunk_size,
            upload_concurrency: config.upload_concurrency,
        })
    }

    /// The endpoint all requests are addressed to, without trailing `/`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Check if the container exists.
    ///
    /// A missing container is `Ok(false)`, any other failure is returned as is.
    pub async fn container_exists(&self, container: &str) -> Result<bool> {
        match self
            .send(
                Method::HEAD,
                container,
                &[("restype", "container")],
                HeaderMap::new(),
                None,
            )
            .await
        {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == ErrorKind::ResourceNotFound => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Create the container, failing with `ResourceAlreadyExists` if it exists.
    pub async fn create_container(&self, container: &str) -> Result<()> {
        let resp = self
            .send(
                Method::PUT,
                container,
                &[("restype", "container")],
                HeaderMap::new(),
                None,
            )
            .await?;

        expect_created(&resp)
    }

    /// Create the container unless it exists already.
    ///
    /// Returns `true` if this call created the container. Losing a creation
    /// race against another writer counts as already existing.
    pub async fn create_container_if_not_exists(&self, container: &str) -> Result<bool> {
        if self.container_exists(container).await? {
            return Ok(false);
        }

        match self.create_container(container).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::ResourceAlreadyExists => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Build, sign and send a request against `path` below the endpoint.
    ///
    /// Baseline headers are set first and replaced by any header of the same
    /// name in `headers`. A body always comes with its `Content-Length`.
    /// Responses outside 2xx are translated into errors.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> Result<Response<Bytes>> {
        let mut url = format!(
            "{}/{}",
            self.endpoint,
            utf8_percent_encode(path.trim_start_matches('/'), &PATH_ENCODE_SET)
        );
        for (i, (k, v)) in query.iter().enumerate() {
            write!(
                &mut url,
                "{}{}={}",
                if i == 0 { '?' } else { '&' },
                utf8_percent_encode(k, &QUERY_ENCODE_SET),
                utf8_percent_encode(v, &QUERY_ENCODE_SET)
            )?;
        }

        let content_length = body.as_ref().map(Bytes::len);
        let req = Request::builder()
            .method(method)
            .uri(url)
            .body(body.unwrap_or_default())?;
        let (mut parts, body) = req.into_parts();

        parts.headers.insert(
            X_MS_CLIENT_REQUEST_ID,
            uuid::Uuid::new_v4().to_string().parse()?,
        );
        parts
            .headers
            .insert(X_MS_DATE, format_http_date(now()).parse()?);
        parts
            .headers
            .insert(X_MS_VERSION, HeaderValue::from_static(AZURE_VERSION));
        if let Some(len) = content_length {
            parts
                .headers
                .insert(header::CONTENT_LENGTH, HeaderValue::from(len));
        }
        for name in headers.keys() {
            parts.headers.remove(name);
        }
        for (name, value) in headers.iter() {
            parts.headers.append(name, value.clone());
        }

        self.signer.sign(&mut parts).await?;
        debug!("sending request: {} {}", parts.method, parts.uri);

        let resp = self
            .ctx
            .http_send(Request::from_parts(parts, body))
            .await?;
        if !resp.status().is_success() {
            return Err(parse_error(resp));
        }

        Ok(resp)
    }
}

/// Container creation, staging and commits only count as done on `201 Created`.
pub(crate) fn expect_created(resp: &Response<Bytes>) -> Result<()> {
    match resp.status() {
        StatusCode::CREATED => Ok(()),
        status => {
            let kind = ErrorKind::Custom(status);
            Err(Error::new(kind, kind.default_message()))
        }
    }
}
