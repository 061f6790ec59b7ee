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

//! Translate non-success responses into [`Error`].

use azblob_core::{Error, ErrorKind, Result};
use bytes::Bytes;
use http::Response;
use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::constants::X_MS_ERROR_CODE;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Build an error from a response the service didn't accept.
///
/// The kind only depends on the status. The message comes from
/// `Error.Message` in the body, or the kind's default message if the body is
/// empty.
pub(crate) fn parse_error(resp: Response<Bytes>) -> Error {
    let (parts, body) = resp.into_parts();
    let status = parts.status;
    let kind = ErrorKind::from_status(status);

    let mut err = if body.is_empty() {
        Error::new(kind, kind.default_message())
    } else {
        match extract_xml_value(&body, "Error.Message") {
            Ok(Some(message)) => Error::new(kind, message),
            Ok(None) => Error::new(
                kind,
                format!("unexpected status code {status}: no error message in response body"),
            ),
            Err(e) => Error::new(kind, format!("unexpected status code {status}: {e}"))
                .with_source(e),
        }
    };

    let code = parts
        .headers
        .get(X_MS_ERROR_CODE)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .or_else(|| {
            if body.is_empty() {
                None
            } else {
                extract_xml_value(&body, "Error.Code").ok().flatten()
            }
        });
    if let Some(code) = code {
        err = err.with_code(code);
    }

    debug!("service responded {status}: {err:?}");
    err
}

/// Extract the text of the element at a dotted path like `Error.Message`.
///
/// The first segment names the root element. Returns `Ok(None)` if the path
/// is absent and an empty string for an empty element. Text and CDATA
/// sections are concatenated.
pub(crate) fn extract_xml_value(body: &[u8], path: &str) -> Result<Option<String>> {
    let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
    let target: Vec<&str> = path.split('.').collect();

    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut value: Option<String> = None;
    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::unexpected("failed to parse xml body").with_source(e))?;
        match event {
            Event::Start(e) => {
                stack.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                if stack == target {
                    value = Some(String::new());
                }
            }
            Event::Empty(e) => {
                stack.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                if stack == target {
                    return Ok(Some(String::new()));
                }
                stack.pop();
            }
            Event::Text(e) => {
                if let Some(v) = value.as_mut() {
                    let text = e
                        .unescape()
                        .map_err(|e| Error::unexpected("failed to unescape xml text").with_source(e))?;
                    v.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some(v) = value.as_mut() {
                    v.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(_) => {
                if value.is_some() {
                    return Ok(value);
                }
                stack.pop();
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}
