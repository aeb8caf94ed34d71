/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Display;
use types::{
    dead_property::{DeadElementTag, DeadProperty},
    lock::{LockKind, LockScope, LockType},
};

/// The live WebDAV properties this server computes itself. Everything else
/// is a resource-defined dead property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(serde::Serialize, serde::Deserialize))]
pub enum WebDavProperty {
    CreationDate,
    DisplayName,
    GetContentLength,
    GetContentType,
    GetETag,
    GetLastModified,
    ResourceType,
    LockDiscovery,
    SupportedLock,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(test, serde(tag = "type", content = "data"))]
pub enum DavProperty {
    WebDav(WebDavProperty),
    DeadProperty(DeadElementTag),
}

impl WebDavProperty {
    pub fn parse(value: &[u8]) -> Option<Self> {
        hashify::tiny_map!(value,
            "creationdate" => WebDavProperty::CreationDate,
            "displayname" => WebDavProperty::DisplayName,
            "getcontentlength" => WebDavProperty::GetContentLength,
            "getcontenttype" => WebDavProperty::GetContentType,
            "getetag" => WebDavProperty::GetETag,
            "getlastmodified" => WebDavProperty::GetLastModified,
            "resourcetype" => WebDavProperty::ResourceType,
            "lockdiscovery" => WebDavProperty::LockDiscovery,
            "supportedlock" => WebDavProperty::SupportedLock,
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            WebDavProperty::CreationDate => "creationdate",
            WebDavProperty::DisplayName => "displayname",
            WebDavProperty::GetContentLength => "getcontentlength",
            WebDavProperty::GetContentType => "getcontenttype",
            WebDavProperty::GetETag => "getetag",
            WebDavProperty::GetLastModified => "getlastmodified",
            WebDavProperty::ResourceType => "resourcetype",
            WebDavProperty::LockDiscovery => "lockdiscovery",
            WebDavProperty::SupportedLock => "supportedlock",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(test, serde(tag = "type", content = "data"))]
pub enum DavValue {
    Null,
    String(String),
    Uint64(u64),
    Rfc1123Date(Rfc1123DateTime),
    Rfc3339Date(Rfc3339DateTime),
    ResourceType(Vec<ResourceType>),
    ActiveLocks(Vec<ActiveLock>),
    SupportedLock(SupportedLock),
    DeadProperty(DeadProperty),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(test, derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceType {
    Collection,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(test, derive(serde::Serialize, serde::Deserialize))]
pub struct SupportedLock(pub Vec<LockKind>);

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveLock {
    pub scope: LockScope,
    pub lock_type: LockType,
    pub depth_infinity: bool,
    pub owner: Option<String>,
    pub timeout: u64,
    pub token: String,
    pub root: String,
}

/// RFC 1123 date as used by `getlastmodified`, from unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(test, derive(serde::Serialize, serde::Deserialize))]
pub struct Rfc1123DateTime(pub i64);

/// RFC 3339 date as used by `creationdate`, from unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(test, derive(serde::Serialize, serde::Deserialize))]
pub struct Rfc3339DateTime(pub i64);

impl Display for Rfc1123DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(date) => write!(f, "{}", date.format("%a, %d %b %Y %H:%M:%S GMT")),
            None => Ok(()),
        }
    }
}

impl Display for Rfc3339DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(date) => f.write_str(&date.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => Ok(()),
        }
    }
}

impl From<u64> for DavValue {
    fn from(value: u64) -> Self {
        DavValue::Uint64(value)
    }
}

impl From<Rfc1123DateTime> for DavValue {
    fn from(value: Rfc1123DateTime) -> Self {
        DavValue::Rfc1123Date(value)
    }
}

impl From<Rfc3339DateTime> for DavValue {
    fn from(value: Rfc3339DateTime) -> Self {
        DavValue::Rfc3339Date(value)
    }
}

impl From<Vec<ResourceType>> for DavValue {
    fn from(value: Vec<ResourceType>) -> Self {
        DavValue::ResourceType(value)
    }
}

impl From<String> for DavValue {
    fn from(value: String) -> Self {
        DavValue::String(value)
    }
}

impl From<Vec<ActiveLock>> for DavValue {
    fn from(value: Vec<ActiveLock>) -> Self {
        DavValue::ActiveLocks(value)
    }
}

impl From<SupportedLock> for DavValue {
    fn from(value: SupportedLock) -> Self {
        DavValue::SupportedLock(value)
    }
}

impl From<DeadProperty> for DavValue {
    fn from(value: DeadProperty) -> Self {
        DavValue::DeadProperty(value)
    }
}
