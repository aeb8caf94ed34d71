/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "test_mode", derive(serde::Serialize, serde::Deserialize))]
pub enum LockScope {
    Exclusive,
    Shared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "test_mode", derive(serde::Serialize, serde::Deserialize))]
pub enum LockType {
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "test_mode", derive(serde::Serialize, serde::Deserialize))]
pub struct LockKind {
    pub scope: LockScope,
    pub lock_type: LockType,
}

// An active lock as observed by the read side. The lock manager owns the
// record; holders of a `Lock` value never mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lock {
    pub token: String,
    pub owner: Option<String>,
    pub kind: LockKind,
    pub depth_infinity: bool,
    pub expires_at: i64,
}

impl LockScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockScope::Exclusive => "exclusive",
            LockScope::Shared => "shared",
        }
    }
}

impl LockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockType::Write => "write",
        }
    }
}

impl LockKind {
    pub fn exclusive_write() -> Self {
        LockKind {
            scope: LockScope::Exclusive,
            lock_type: LockType::Write,
        }
    }

    pub fn shared_write() -> Self {
        LockKind {
            scope: LockScope::Shared,
            lock_type: LockType::Write,
        }
    }
}

impl Lock {
    pub fn remaining_secs(&self, now: i64) -> u64 {
        (self.expires_at.saturating_sub(now) / 1000).max(0) as u64
    }
}
