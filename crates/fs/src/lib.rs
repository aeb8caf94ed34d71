/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::path::DavPath;
use types::{
    dead_property::DeadProperty,
    lock::{Lock, LockKind},
};

pub mod acl;
pub mod memfs;
pub mod path;

pub type Result<T> = std::result::Result<T, FsError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FsError {
    #[error("resource not found")]
    NotFound,
    #[error("access denied")]
    Forbidden,
    #[error("storage failure: {0}")]
    Io(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Directory,
    File,
}

impl ResourceKind {
    pub fn is_directory(&self) -> bool {
        matches!(self, ResourceKind::Directory)
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ResourceKind::File)
    }
}

/// Read-only view of a stored resource. Every accessor may suspend on I/O;
/// callers treat all of them uniformly as asynchronous.
///
/// Implementations hand out cheap clonable handles; `parent()` returns a
/// handle to the containing collection, or `None` at the root.
pub trait Resource: Clone + Send + Sync + 'static {
    fn kind(&self) -> impl Future<Output = Result<ResourceKind>> + Send;

    fn children(&self) -> impl Future<Output = Result<Vec<Self>>> + Send;

    /// Unix timestamp in milliseconds.
    fn creation_date(&self) -> impl Future<Output = Result<i64>> + Send;

    /// Unix timestamp in milliseconds.
    fn last_modified(&self) -> impl Future<Output = Result<i64>> + Send;

    /// Explicitly assigned display name, if any; `web_name` is the fallback.
    fn display_name(&self) -> impl Future<Output = Result<Option<String>>> + Send;

    fn web_name(&self) -> impl Future<Output = Result<String>> + Send;

    fn mime_type(&self, source: bool) -> impl Future<Output = Result<String>> + Send;

    fn size(&self, source: bool) -> impl Future<Output = Result<Option<u64>>> + Send;

    /// Resource-defined properties as a raw tag stream.
    fn properties(&self) -> impl Future<Output = Result<DeadProperty>> + Send;

    /// Lock kinds this resource supports.
    fn available_locks(&self) -> impl Future<Output = Result<Vec<LockKind>>> + Send;

    /// Locks held on exactly this resource, not including ancestors.
    fn locks(&self) -> impl Future<Output = Result<Vec<Lock>>> + Send;

    fn path(&self) -> impl Future<Output = Result<DavPath>> + Send;

    fn parent(&self) -> Option<Self>;
}

pub trait FileSystem: Send + Sync + 'static {
    type Resource: Resource;

    /// Resolves a request path to a resource, or `None` if nothing is stored
    /// under it.
    fn resolve(&self, path: &str) -> impl Future<Output = Result<Option<Self::Resource>>> + Send;
}
