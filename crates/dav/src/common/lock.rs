/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use ahash::AHashMap;
use dav_proto::schema::property::ActiveLock;
use fs::{
    Resource,
    acl::{Privilege, PrivilegeManager},
    path::DavPath,
};
use futures::future::BoxFuture;
use types::lock::Lock;

/// Per-request memo of lock lookups: path to the locks held on exactly that
/// path. An entry is written once, after the walk above it has completed,
/// and never overwritten within the request.
pub(crate) type LockDiscoveryCache = AHashMap<String, Vec<Lock>>;

/// Walks from `resource` up to the root, collecting each ancestor's own
/// locks. The result holds one entry per path, target first; nothing is
/// merged across levels.
///
/// A denied or failing `CanListLocks` check degrades to an empty result
/// instead of failing the response entry.
pub(crate) fn lock_discovery<'x, R, A>(
    acl: &'x A,
    cache: &'x mut LockDiscoveryCache,
    resource: R,
    path: DavPath,
) -> BoxFuture<'x, crate::Result<Vec<(DavPath, Vec<Lock>)>>>
where
    R: Resource,
    A: PrivilegeManager<R>,
{
    Box::pin(async move {
        if let Some(cached) = cache.get(path.as_str()).cloned() {
            tracing::trace!(path = path.as_str(), "lock discovery cache hit");
            let mut map = match (resource.parent(), path.parent()) {
                (Some(parent), Some(parent_path)) => {
                    lock_discovery(acl, cache, parent, parent_path).await?
                }
                _ => Vec::new(),
            };
            map.insert(0, (path, cached));
            return Ok(map);
        }

        if !acl
            .require_privilege(Privilege::CanListLocks, &resource)
            .await
            .unwrap_or(false)
        {
            return Ok(Vec::new());
        }

        let locks = resource.locks().await?;
        let mut map = match (resource.parent(), path.parent()) {
            (Some(parent), Some(parent_path)) => {
                lock_discovery(acl, cache, parent, parent_path).await?
            }
            _ => Vec::new(),
        };
        cache.insert(path.as_str().to_string(), locks.clone());
        map.insert(0, (path, locks));
        Ok(map)
    })
}

pub(crate) trait ToActiveLock {
    fn to_active_lock(&self, root: String, now: i64) -> ActiveLock;
}

impl ToActiveLock for Lock {
    fn to_active_lock(&self, root: String, now: i64) -> ActiveLock {
        ActiveLock {
            scope: self.kind.scope,
            lock_type: self.kind.lock_type,
            depth_infinity: self.depth_infinity,
            owner: self.owner.clone(),
            timeout: self.remaining_secs(now),
            token: self.token.clone(),
            root,
        }
    }
}
