/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::{Resource, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Privilege {
    CanGetType,
    CanGetChildren,
    CanGetCreationDate,
    CanGetLastModifiedDate,
    CanGetMimeType,
    CanGetSize,
    CanGetWebName,
    CanGetProperties,
    CanGetAvailableLocks,
    CanListLocks,
    CanSource,
}

/// Authorization decisions for the already-authenticated caller. The engine
/// only asks and interprets allow/deny; policy lives behind this trait.
pub trait PrivilegeManager<R: Resource>: Send + Sync + 'static {
    fn require_privilege(
        &self,
        privilege: Privilege,
        resource: &R,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Batched check; allowed only if every named privilege is granted.
    fn require_privileges(
        &self,
        privileges: &[Privilege],
        resource: &R,
    ) -> impl Future<Output = Result<bool>> + Send;
}

impl<R: Resource, T: PrivilegeManager<R>> PrivilegeManager<R> for std::sync::Arc<T> {
    async fn require_privilege(&self, privilege: Privilege, resource: &R) -> Result<bool> {
        self.as_ref().require_privilege(privilege, resource).await
    }

    async fn require_privileges(&self, privileges: &[Privilege], resource: &R) -> Result<bool> {
        self.as_ref().require_privileges(privileges, resource).await
    }
}
