/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use std::fmt::Display;

/// Normalized absolute resource path: always starts with `/`, never ends
/// with one except for the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DavPath(String);

impl DavPath {
    pub fn new(path: &str) -> Self {
        let mut normalized = String::with_capacity(path.len() + 1);
        for segment in path.split('/') {
            if !segment.is_empty() && segment != "." {
                normalized.push('/');
                normalized.push_str(segment);
            }
        }
        if normalized.is_empty() {
            normalized.push('/');
        }
        DavPath(normalized)
    }

    pub fn root() -> Self {
        DavPath("/".to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path segment; empty for the root.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    pub fn parent(&self) -> Option<DavPath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(DavPath::root()),
            Some(idx) => Some(DavPath(self.0[..idx].to_string())),
            None => None,
        }
    }

    pub fn child(&self, name: &str) -> DavPath {
        if self.is_root() {
            DavPath(format!("/{name}"))
        } else {
            DavPath(format!("{}/{name}", self.0))
        }
    }
}

impl Display for DavPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
