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

use crate::constants::*;
use crate::Credential;
use async_trait::async_trait;
use azblob_core::time::{format_http_date, now, DateTime};
use azblob_core::{Context, Error, Result, SignRequest, SigningRequest};
use http::header::{self, HeaderName};
use http::request::Parts;
use http::HeaderValue;
use log::debug;
use std::fmt::Write;

/// Standard headers contributing one line each to the string to sign, in order.
static STANDARD_HEADERS: [HeaderName; 11] = [
    header::CONTENT_ENCODING,
    header::CONTENT_LANGUAGE,
    header::CONTENT_LENGTH,
    HeaderName::from_static(CONTENT_MD5),
    header::CONTENT_TYPE,
    header::DATE,
    header::IF_MODIFIED_SINCE,
    header::IF_MATCH,
    header::IF_NONE_MATCH,
    header::IF_UNMODIFIED_SINCE,
    header::RANGE,
];

/// RequestSigner that implement Azure Storage Shared Key Authorization.
///
/// - [Authorize with Shared Key](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key)
#[derive(Debug)]
pub struct RequestSigner {
    account_name: Option<String>,
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new builder for Azure Storage signer.
    pub fn new() -> Self {
        Self {
            account_name: None,
            time: None,
        }
    }

    /// Only sign with credentials of this account.
    ///
    /// Requests addressed to one account's endpoint can't be authorized by
    /// another account's key, so a mismatch fails with `ConfigInvalid`.
    pub fn with_account_name(mut self, account_name: impl Into<String>) -> Self {
        self.account_name = Some(account_name.into());
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::request_invalid("credential is required"));
        };
        if let Some(expected) = &self.account_name {
            if cred.account_name() != expected {
                return Err(Error::config_invalid(format!(
                    "credential account {} doesn't match configured account {expected}",
                    cred.account_name()
                )));
            }
        }

        let mut ctx = SigningRequest::build(req)?;

        // An `x-ms-date` set by the caller is signed as is.
        if !ctx.headers.contains_key(X_MS_DATE) {
            let date = format_http_date(self.time.unwrap_or_else(now));
            ctx.headers.insert(X_MS_DATE, date.parse()?);
        }

        let string_to_sign = string_to_sign(&ctx, cred.account_name())?;
        ctx.headers.insert(header::AUTHORIZATION, {
            let mut value: HeaderValue = cred.authorization(&string_to_sign)?.parse()?;
            value.set_sensitive(true);
            value
        });

        ctx.apply(req)
    }
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// VERB + "\n" +
/// Content-Encoding + "\n" +
/// Content-Language + "\n" +
/// Content-Length + "\n" +
/// Content-MD5 + "\n" +
/// Content-Type + "\n" +
/// Date + "\n" +
/// If-Modified-Since + "\n" +
/// If-Match + "\n" +
/// If-None-Match + "\n" +
/// If-Unmodified-Since + "\n" +
/// Range + "\n" +
/// CanonicalizedHeaders +
/// CanonicalizedResource;
/// ```
///
/// `Content-Length: 0` is signed as an empty line.
///
/// ## Reference
///
/// - [Blob, Queue, and File Services (Shared Key authorization)](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key)
pub(crate) fn string_to_sign(ctx: &SigningRequest, account_name: &str) -> Result<String> {
    let mut s = String::with_capacity(256);

    writeln!(&mut s, "{}", ctx.method.as_str())?;
    for name in &STANDARD_HEADERS {
        let value = ctx.header_get_or_default(name)?;
        if *name == header::CONTENT_LENGTH && value == "0" {
            writeln!(&mut s)?;
        } else {
            writeln!(&mut s, "{value}")?;
        }
    }
    let headers = canonicalize_header(ctx)?;
    if !headers.is_empty() {
        writeln!(&mut s, "{headers}")?;
    }
    write!(&mut s, "{}", canonicalize_resource(ctx, account_name))?;

    debug!("string to sign: {}", &s);

    Ok(s)
}

/// ## Reference
///
/// - [Constructing the canonicalized headers string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-headers-string)
fn canonicalize_header(ctx: &SigningRequest) -> Result<String> {
    Ok(SigningRequest::header_to_string(
        ctx.header_to_vec_with_prefix("x-ms-")?,
        ":",
        "\n",
    ))
}

/// ## Reference
///
/// - [Constructing the canonicalized resource string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-resource-string)
fn canonicalize_resource(ctx: &SigningRequest, account_name: &str) -> String {
    if ctx.query.is_empty() {
        return format!("/{}{}", account_name, ctx.path);
    }

    format!(
        "/{}{}\n{}",
        account_name,
        ctx.path,
        ctx.query_to_string(":", "\n")
    )
}
