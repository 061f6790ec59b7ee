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

use http::StatusCode;
use std::fmt;
use thiserror::Error;

/// The error type for azblob operations
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    code: Option<String>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
///
/// Remote kinds are derived from the response status code only. Local kinds
/// never come from a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The local source could not be read.
    NoSuchFile,

    /// The service rejected the signature or the key (401).
    InvalidAuthenticationInfo,

    /// The addressed container or blob does not exist (404).
    ResourceNotFound,

    /// The addressed container or blob already exists (409).
    ResourceAlreadyExists,

    /// Any other non-success status returned by the service.
    Custom(StatusCode),

    /// Configuration error (missing fields, invalid values, malformed key)
    ConfigInvalid,

    /// Request cannot be built or signed
    RequestInvalid,

    /// Unexpected errors (network, I/O, malformed responses, etc.)
    Unexpected,
}

impl ErrorKind {
    /// Map a non-success response status into an error kind.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ErrorKind::InvalidAuthenticationInfo,
            StatusCode::NOT_FOUND => ErrorKind::ResourceNotFound,
            StatusCode::CONFLICT => ErrorKind::ResourceAlreadyExists,
            status => ErrorKind::Custom(status),
        }
    }

    /// The status code this kind was derived from, if it is a remote kind.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ErrorKind::InvalidAuthenticationInfo => Some(StatusCode::UNAUTHORIZED),
            ErrorKind::ResourceNotFound => Some(StatusCode::NOT_FOUND),
            ErrorKind::ResourceAlreadyExists => Some(StatusCode::CONFLICT),
            ErrorKind::Custom(status) => Some(*status),
            _ => None,
        }
    }

    /// Check if this kind was reported by the remote service.
    pub fn is_remote(&self) -> bool {
        self.status().is_some()
    }

    /// Message used when the service didn't send any body to explain itself.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorKind::NoSuchFile => "No file found",
            ErrorKind::InvalidAuthenticationInfo => "The key is missing or is invalid",
            ErrorKind::ResourceNotFound => "The specific resource is not found",
            ErrorKind::ResourceAlreadyExists => "Resource already exists",
            ErrorKind::Custom(_) => "Unknown error",
            ErrorKind::ConfigInvalid => "invalid configuration",
            ErrorKind::RequestInvalid => "invalid request",
            ErrorKind::Unexpected => "unexpected error",
        }
    }
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach the error code reported by the service, like `ContainerNotFound`.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the error code reported by the service, if any.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Get the response status for remote errors.
    pub fn status(&self) -> Option<StatusCode> {
        self.kind.status()
    }

    /// Check if this error was reported by the remote service.
    pub fn is_remote(&self) -> bool {
        self.kind.is_remote()
    }
}

// Convenience constructors
impl Error {
    /// Create a no such file error with the default message
    pub fn no_such_file() -> Self {
        Self::new(
            ErrorKind::NoSuchFile,
            ErrorKind::NoSuchFile.default_message(),
        )
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NoSuchFile => write!(f, "no such file"),
            ErrorKind::InvalidAuthenticationInfo => write!(f, "invalid authentication info"),
            ErrorKind::ResourceNotFound => write!(f, "resource not found"),
            ErrorKind::ResourceAlreadyExists => write!(f, "resource already exists"),
            ErrorKind::Custom(status) => write!(f, "service error ({status})"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::ToStrError> for Error {
    fn from(err: http::header::ToStrError) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUriParts> for Error {
    fn from(err: http::uri::InvalidUriParts) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
