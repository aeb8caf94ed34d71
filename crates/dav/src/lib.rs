/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use fs::{FileSystem, FsError, acl::PrivilegeManager};
use hyper::StatusCode;

pub mod common;

pub use common::propfind::PropFindRequestHandler;

pub type Result<T> = std::result::Result<T, DavError>;

#[derive(Debug)]
pub enum DavError {
    /// A privilege check denied access to the caller.
    Unauthorized,
    /// A storage accessor failed unexpectedly.
    Fs(FsError),
    /// Terminate with this status and an empty body.
    Code(StatusCode),
}

impl From<FsError> for DavError {
    fn from(err: FsError) -> Self {
        DavError::Fs(err)
    }
}

impl std::fmt::Display for DavError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DavError::Unauthorized => f.write_str("access denied"),
            DavError::Fs(err) => write!(f, "storage failure: {err}"),
            DavError::Code(code) => write!(f, "terminated with status {code}"),
        }
    }
}

impl std::error::Error for DavError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Option<String>,
}

impl HttpResponse {
    pub fn new(status: StatusCode) -> Self {
        HttpResponse { status, body: None }
    }

    pub fn with_xml_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

/// The WebDAV front-end over a storage backend and a privilege manager.
pub struct DavServer<F: FileSystem, A: PrivilegeManager<F::Resource>> {
    pub(crate) store: F,
    pub(crate) acl: A,
    pub(crate) base_uri: String,
}

impl<F: FileSystem, A: PrivilegeManager<F::Resource>> DavServer<F, A> {
    pub fn new(store: F, acl: A) -> Self {
        DavServer {
            store,
            acl,
            base_uri: String::new(),
        }
    }

    /// Absolute URI prefix (scheme and authority) used when building hrefs.
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = base_uri.into();
        self
    }
}
