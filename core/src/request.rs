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

use std::collections::BTreeMap;
use std::mem;
use std::str::FromStr;

use http::header::HeaderName;
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::Method;
use http::Uri;
use percent_encoding::percent_decode_str;
use percent_encoding::utf8_percent_encode;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

use crate::{Error, Result};

/// Characters kept verbatim in query values, everything else is percent-encoded.
///
/// Block ids are base64 so `+`, `/` and `=` must never reach the wire raw.
pub static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Signing context for request.
///
/// Built fresh from a request, mutated while signing, then applied back. It
/// is never shared between requests.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, percent-encoded as it appears on the wire.
    pub path: String,
    /// HTTP query parameters, percent-decoded.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            query: paq.query().map(parse_query).unwrap_or_default(),

            // Take the headers out of the request to avoid copy.
            // We will return it back when apply the context.
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        // Return headers back.
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;
        parts.uri = {
            let mut uri_parts = mem::take(&mut parts.uri).into_parts();
            uri_parts.scheme = Some(self.scheme);
            uri_parts.authority = Some(self.authority);
            uri_parts.path_and_query = {
                let mut paq = self.path;
                for (i, (k, v)) in self.query.iter().enumerate() {
                    paq.push(if i == 0 { '?' } else { '&' });
                    paq.extend(utf8_percent_encode(k, &QUERY_ENCODE_SET));
                    paq.push('=');
                    paq.extend(utf8_percent_encode(v, &QUERY_ENCODE_SET));
                }

                Some(PathAndQuery::from_str(&paq)?)
            };
            Uri::from_parts(uri_parts)?
        };

        Ok(())
    }

    /// Convert query into canonical lines.
    ///
    /// Names are lowercased and sorted, repeated names are merged into one
    /// line with their values sorted and joined by `,`. An empty value still
    /// renders the separator.
    ///
    /// ```shell
    /// [(comp, block), (blockid, YQ==)] => "blockid:YQ==\ncomp:block"
    /// ```
    pub fn query_to_string(&self, sep: &str, join: &str) -> String {
        let mut merged: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for (k, v) in &self.query {
            merged.entry(k.to_lowercase()).or_default().push(v);
        }

        let mut s = String::with_capacity(16);
        for (idx, (k, mut values)) in merged.into_iter().enumerate() {
            if idx != 0 {
                s.push_str(join);
            }

            values.sort_unstable();
            s.push_str(&k);
            s.push_str(sep);
            s.push_str(&values.join(","));
        }

        s
    }

    /// Get header value by name.
    ///
    /// Returns empty string if header not found.
    #[inline]
    pub fn header_get_or_default(&self, key: &HeaderName) -> Result<&str> {
        match self.headers.get(key) {
            Some(v) => Ok(v.to_str()?),
            None => Ok(""),
        }
    }

    /// Normalize header value.
    ///
    /// Leading and trailing whitespace is removed and every inner run of
    /// spaces and newlines collapses into a single space.
    pub fn header_value_normalize(v: &str) -> String {
        let mut s = String::with_capacity(v.len());
        let mut in_run = false;
        for c in v.trim().chars() {
            if c == ' ' || c == '\n' {
                if !in_run {
                    s.push(' ');
                }
                in_run = true;
            } else {
                s.push(c);
                in_run = false;
            }
        }

        s
    }

    /// Get headers with given prefix as normalized `(name, value)` pairs.
    ///
    /// Header names are always lowercase in `http`, so the prefix match is
    /// case-insensitive for free. Values of a repeated header are joined by `,`.
    pub fn header_to_vec_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        let mut headers = Vec::new();
        for name in self.headers.keys() {
            if !name.as_str().starts_with(prefix) {
                continue;
            }

            let values = self
                .headers
                .get_all(name)
                .iter()
                .map(|v| v.to_str().map(Self::header_value_normalize))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            headers.push((name.as_str().to_string(), values.join(",")));
        }

        Ok(headers)
    }

    /// Convert sorted headers to string.
    ///
    /// ```shell
    /// [(a, b), (c, d)] => "a:b\nc:d"
    /// ```
    pub fn header_to_string(mut headers: Vec<(String, String)>, sep: &str, join: &str) -> String {
        let mut s = String::with_capacity(16);

        // Sort via header name.
        headers.sort();

        for (idx, (k, v)) in headers.into_iter().enumerate() {
            if idx != 0 {
                s.push_str(join);
            }

            s.push_str(&k);
            s.push_str(sep);
            s.push_str(&v);
        }

        s
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (
                percent_decode_str(k).decode_utf8_lossy().into_owned(),
                percent_decode_str(v).decode_utf8_lossy().into_owned(),
            )
        })
        .collect()
}
