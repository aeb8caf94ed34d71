/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::{
    FileSystem, FsError, Resource, ResourceKind, Result,
    acl::{Privilege, PrivilegeManager},
    path::DavPath,
};
use ahash::{AHashMap, AHashSet};
use std::{
    sync::{Arc, RwLock},
    time::{SystemTime, UNIX_EPOCH},
};
use types::{
    dead_property::{DeadElementTag, DeadProperty, DeadPropertyTag},
    lock::{Lock, LockKind},
};

/// In-memory storage backend: the reference implementation of the
/// `FileSystem` contract and the store behind the test-suite.
#[derive(Clone)]
pub struct MemFs {
    tree: Arc<RwLock<Tree>>,
}

#[derive(Default)]
struct Tree {
    nodes: AHashMap<String, MemNode>,
    locks: AHashMap<String, Vec<Lock>>,
    lock_reads: AHashMap<String, u32>,
}

struct MemNode {
    kind: ResourceKind,
    created: i64,
    modified: i64,
    display_name: Option<String>,
    media_type: Option<String>,
    size: Option<u64>,
    dead_properties: DeadProperty,
    children: Vec<String>,
    available_locks: Vec<LockKind>,
    failing: Option<Accessor>,
}

/// Accessor selector for fault injection via [`MemFs::fail_on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    CreationDate,
    LastModified,
    DisplayName,
    MimeType,
    Size,
    Properties,
    Locks,
    Children,
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

impl MemNode {
    fn new(kind: ResourceKind) -> Self {
        let now = now_millis();
        MemNode {
            kind,
            created: now,
            modified: now,
            display_name: None,
            media_type: None,
            size: None,
            dead_properties: DeadProperty::default(),
            children: Vec::new(),
            available_locks: vec![LockKind::exclusive_write(), LockKind::shared_write()],
            failing: None,
        }
    }

    fn assert_accessor(&self, accessor: Accessor) -> Result<()> {
        if self.failing == Some(accessor) {
            Err(FsError::Io(format!("injected {accessor:?} failure")))
        } else {
            Ok(())
        }
    }
}

impl MemFs {
    pub fn new() -> Self {
        let mut tree = Tree::default();
        tree.nodes
            .insert("/".to_string(), MemNode::new(ResourceKind::Directory));
        MemFs {
            tree: Arc::new(RwLock::new(tree)),
        }
    }

    pub fn create_dir(&self, path: &str) -> Result<()> {
        self.insert(path, MemNode::new(ResourceKind::Directory))
    }

    pub fn create_file(&self, path: &str, size: u64, media_type: &str) -> Result<()> {
        let mut node = MemNode::new(ResourceKind::File);
        node.size = Some(size);
        node.media_type = Some(media_type.to_string());
        self.insert(path, node)
    }

    fn insert(&self, path: &str, node: MemNode) -> Result<()> {
        let path = DavPath::new(path);
        let parent = path.parent().ok_or(FsError::Forbidden)?;
        let mut tree = self.write();
        let parent_node = tree
            .nodes
            .get_mut(parent.as_str())
            .filter(|parent| parent.kind.is_directory())
            .ok_or(FsError::NotFound)?;
        let name = path.name().to_string();
        if !parent_node.children.contains(&name) {
            parent_node.children.push(name);
        }
        tree.nodes.insert(path.as_str().to_string(), node);
        Ok(())
    }

    pub fn set_display_name(&self, path: &str, name: &str) -> Result<()> {
        self.update(path, |node| node.display_name = Some(name.to_string()))
    }

    pub fn set_times(&self, path: &str, created: i64, modified: i64) -> Result<()> {
        self.update(path, |node| {
            node.created = created;
            node.modified = modified;
        })
    }

    pub fn set_available_locks(&self, path: &str, kinds: Vec<LockKind>) -> Result<()> {
        self.update(path, |node| node.available_locks = kinds)
    }

    /// Sets a resource-defined property, replacing any previous value
    /// stored under the same name.
    pub fn add_property(&self, path: &str, tag: DeadElementTag, text: &str) -> Result<()> {
        let values = if !text.is_empty() {
            vec![DeadPropertyTag::Text(text.to_string())]
        } else {
            Vec::new()
        };
        self.update(path, |node| {
            node.dead_properties.remove_element(&tag);
            node.dead_properties.add_element(tag, values);
        })
    }

    pub fn add_lock(&self, path: &str, lock: Lock) -> Result<()> {
        let path = DavPath::new(path);
        let mut tree = self.write();
        if !tree.nodes.contains_key(path.as_str()) {
            return Err(FsError::NotFound);
        }
        tree.locks
            .entry(path.as_str().to_string())
            .or_default()
            .push(lock);
        Ok(())
    }

    /// Makes one accessor of the node at `path` return an I/O error.
    pub fn fail_on(&self, path: &str, accessor: Accessor) -> Result<()> {
        self.update(path, |node| node.failing = Some(accessor))
    }

    /// Number of times the lock table at `path` has been read.
    pub fn lock_reads(&self, path: &str) -> u32 {
        self.read()
            .lock_reads
            .get(DavPath::new(path).as_str())
            .copied()
            .unwrap_or_default()
    }

    fn update(&self, path: &str, update: impl FnOnce(&mut MemNode)) -> Result<()> {
        let path = DavPath::new(path);
        let mut tree = self.write();
        let node = tree.nodes.get_mut(path.as_str()).ok_or(FsError::NotFound)?;
        update(node);
        Ok(())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tree> {
        self.tree.write().unwrap_or_else(|err| err.into_inner())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tree> {
        self.tree.read().unwrap_or_else(|err| err.into_inner())
    }

    fn with_node<T>(&self, path: &DavPath, read: impl FnOnce(&MemNode) -> Result<T>) -> Result<T> {
        self.read()
            .nodes
            .get(path.as_str())
            .ok_or(FsError::NotFound)
            .and_then(read)
    }
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct MemResource {
    fs: MemFs,
    path: DavPath,
}

impl MemResource {
    pub fn dav_path(&self) -> &DavPath {
        &self.path
    }
}

impl Resource for MemResource {
    async fn kind(&self) -> Result<ResourceKind> {
        self.fs.with_node(&self.path, |node| Ok(node.kind))
    }

    async fn children(&self) -> Result<Vec<Self>> {
        self.fs.with_node(&self.path, |node| {
            node.assert_accessor(Accessor::Children)?;
            Ok(node
                .children
                .iter()
                .map(|name| MemResource {
                    fs: self.fs.clone(),
                    path: self.path.child(name),
                })
                .collect())
        })
    }

    async fn creation_date(&self) -> Result<i64> {
        self.fs.with_node(&self.path, |node| {
            node.assert_accessor(Accessor::CreationDate)?;
            Ok(node.created)
        })
    }

    async fn last_modified(&self) -> Result<i64> {
        self.fs.with_node(&self.path, |node| {
            node.assert_accessor(Accessor::LastModified)?;
            Ok(node.modified)
        })
    }

    async fn display_name(&self) -> Result<Option<String>> {
        self.fs.with_node(&self.path, |node| {
            node.assert_accessor(Accessor::DisplayName)?;
            Ok(node.display_name.clone())
        })
    }

    async fn web_name(&self) -> Result<String> {
        Ok(self.path.name().to_string())
    }

    async fn mime_type(&self, _source: bool) -> Result<String> {
        self.fs.with_node(&self.path, |node| {
            node.assert_accessor(Accessor::MimeType)?;
            Ok(node
                .media_type
                .clone()
                .unwrap_or_else(|| "application/octet-stream".to_string()))
        })
    }

    async fn size(&self, _source: bool) -> Result<Option<u64>> {
        self.fs.with_node(&self.path, |node| {
            node.assert_accessor(Accessor::Size)?;
            Ok(node.size)
        })
    }

    async fn properties(&self) -> Result<DeadProperty> {
        self.fs.with_node(&self.path, |node| {
            node.assert_accessor(Accessor::Properties)?;
            Ok(node.dead_properties.clone())
        })
    }

    async fn available_locks(&self) -> Result<Vec<LockKind>> {
        self.fs
            .with_node(&self.path, |node| Ok(node.available_locks.clone()))
    }

    async fn locks(&self) -> Result<Vec<Lock>> {
        let mut tree = self.fs.write();
        tree.nodes
            .get(self.path.as_str())
            .ok_or(FsError::NotFound)?
            .assert_accessor(Accessor::Locks)?;
        *tree
            .lock_reads
            .entry(self.path.as_str().to_string())
            .or_default() += 1;
        Ok(tree
            .locks
            .get(self.path.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn path(&self) -> Result<DavPath> {
        Ok(self.path.clone())
    }

    fn parent(&self) -> Option<Self> {
        self.path.parent().map(|path| MemResource {
            fs: self.fs.clone(),
            path,
        })
    }
}

impl FileSystem for MemFs {
    type Resource = MemResource;

    async fn resolve(&self, path: &str) -> Result<Option<MemResource>> {
        let path = DavPath::new(path);
        if self.read().nodes.contains_key(path.as_str()) {
            Ok(Some(MemResource {
                fs: self.clone(),
                path,
            }))
        } else {
            Ok(None)
        }
    }
}

/// Privilege manager over the in-memory backend: everything is allowed
/// unless explicitly denied for a (path, privilege) pair.
#[derive(Default)]
pub struct MemAcl {
    denied: RwLock<AHashSet<(String, Privilege)>>,
}

impl MemAcl {
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn deny(&self, path: &str, privilege: Privilege) {
        self.denied
            .write()
            .unwrap_or_else(|err| err.into_inner())
            .insert((DavPath::new(path).as_str().to_string(), privilege));
    }

    fn is_denied(&self, path: &DavPath, privilege: Privilege) -> bool {
        self.denied
            .read()
            .unwrap_or_else(|err| err.into_inner())
            .contains(&(path.as_str().to_string(), privilege))
    }
}

impl PrivilegeManager<MemResource> for MemAcl {
    async fn require_privilege(
        &self,
        privilege: Privilege,
        resource: &MemResource,
    ) -> Result<bool> {
        Ok(!self.is_denied(resource.dav_path(), privilege))
    }

    async fn require_privileges(
        &self,
        privileges: &[Privilege],
        resource: &MemResource,
    ) -> Result<bool> {
        Ok(privileges
            .iter()
            .all(|privilege| !self.is_denied(resource.dav_path(), *privilege)))
    }
}
