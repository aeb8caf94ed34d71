/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod conditions;
pub mod filter;
pub mod join;
pub mod lock;
pub mod propfind;
pub mod uri;

pub(crate) trait ETag {
    fn etag(&self) -> String;
}

// Entity tags are derived from the last-modified timestamp: same instant,
// same opaque value.
impl ETag for i64 {
    fn etag(&self) -> String {
        format!("\"{:x}\"", self)
    }
}
