/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::{
    DavError, DavServer, HttpResponse,
    common::{
        ETag,
        conditions::check_preconditions,
        filter::PropertyRule,
        join::{FetchJoin, Settle},
        lock::{LockDiscoveryCache, ToActiveLock, lock_discovery},
        uri::full_uri,
    },
};
use dav_proto::{
    Depth, RequestHeaders,
    parser::{DavParser, tokenizer::Tokenizer},
    schema::{
        property::{
            DavProperty, DavValue, ResourceType, Rfc1123DateTime, Rfc3339DateTime, SupportedLock,
            WebDavProperty,
        },
        request::{DavPropertyValue, PropFind},
        response::{MultiStatus, PropStat, Response},
    },
};
use fs::{
    FileSystem, Resource,
    acl::{Privilege, PrivilegeManager},
    path::DavPath,
};
use futures::{StreamExt, future::BoxFuture, stream::FuturesUnordered};
use hyper::StatusCode;
use tracing::debug;
use types::dead_property::{DeadElementTag, DeadProperty};

pub trait PropFindRequestHandler: Sync + Send {
    fn handle_propfind_request(
        &self,
        headers: &RequestHeaders<'_>,
        body: &[u8],
    ) -> impl Future<Output = crate::Result<HttpResponse>> + Send;
}

// Every read privilege the property fan-out depends on, checked in one
// batched call per response entry.
pub(crate) static PROPFIND_PRIVILEGES: [Privilege; 8] = [
    Privilege::CanGetCreationDate,
    Privilege::CanGetAvailableLocks,
    Privilege::CanGetLastModifiedDate,
    Privilege::CanGetMimeType,
    Privilege::CanGetProperties,
    Privilege::CanGetSize,
    Privilege::CanGetType,
    Privilege::CanGetWebName,
];

/// State shared by every response entry of one request.
pub(crate) struct PropFindData {
    pub lock_discovery: LockDiscoveryCache,
}

impl PropFindData {
    pub fn new() -> Self {
        PropFindData {
            lock_discovery: LockDiscoveryCache::default(),
        }
    }
}

impl<F, A> PropFindRequestHandler for DavServer<F, A>
where
    F: FileSystem,
    A: PrivilegeManager<F::Resource>,
{
    async fn handle_propfind_request(
        &self,
        headers: &RequestHeaders<'_>,
        body: &[u8],
    ) -> crate::Result<HttpResponse> {
        // An empty or unparsable body degrades to an all-properties request.
        let propfind = if body.is_empty() {
            PropFind::default()
        } else {
            PropFind::parse(&mut Tokenizer::new(body)).unwrap_or_default()
        };

        match self.propfind(headers, propfind).await {
            Ok(response) => Ok(response),
            Err(DavError::Unauthorized) => Ok(HttpResponse::new(StatusCode::UNAUTHORIZED)),
            Err(DavError::Code(code)) => Ok(HttpResponse::new(code)),
            Err(DavError::Fs(err)) => {
                debug!(uri = headers.uri, error = %err, "PROPFIND failed");
                Ok(HttpResponse::new(StatusCode::INTERNAL_SERVER_ERROR))
            }
        }
    }
}

impl<F, A> DavServer<F, A>
where
    F: FileSystem,
    A: PrivilegeManager<F::Resource>,
{
    async fn propfind(
        &self,
        headers: &RequestHeaders<'_>,
        propfind: PropFind,
    ) -> crate::Result<HttpResponse> {
        let Some(resource) = self.store.resolve(headers.uri).await? else {
            debug!(uri = headers.uri, "PROPFIND target not found");
            return Ok(HttpResponse::new(StatusCode::NOT_FOUND));
        };

        if let Some(code) = check_preconditions(&resource, headers).await? {
            return Ok(HttpResponse::new(code));
        }

        let kind = resource.kind().await?;
        let mut multistatus = MultiStatus::new(Vec::with_capacity(8));
        let mut data = PropFindData::new();

        if !kind.is_directory() || headers.depth == Depth::Zero {
            self.add_resource_response(resource, &propfind, headers, &mut data, &mut multistatus)
                .await?;
        } else {
            if !self
                .acl
                .require_privilege(Privilege::CanGetChildren, &resource)
                .await?
            {
                return Err(DavError::Unauthorized);
            }

            let children = resource.children().await?;
            debug!(
                uri = headers.uri,
                children = children.len(),
                "PROPFIND with children"
            );
            self.add_resource_response(resource, &propfind, headers, &mut data, &mut multistatus)
                .await?;

            // One level only: the walk never descends past immediate
            // children, and the first failing child aborts it.
            for child in children {
                self.add_resource_response(child, &propfind, headers, &mut data, &mut multistatus)
                    .await?;
            }
        }

        Ok(HttpResponse::new(StatusCode::MULTI_STATUS).with_xml_body(multistatus.to_string()))
    }

    /// Builds one multistatus response entry for `resource`.
    async fn add_resource_response(
        &self,
        resource: F::Resource,
        propfind: &PropFind,
        headers: &RequestHeaders<'_>,
        data: &mut PropFindData,
        multistatus: &mut MultiStatus,
    ) -> crate::Result<()> {
        let mut rule = PropertyRule::new(propfind);

        let allowed = if headers.source {
            let mut privileges = PROPFIND_PRIVILEGES.to_vec();
            privileges.push(Privilege::CanSource);
            self.acl.require_privileges(&privileges, &resource).await?
        } else {
            self.acl
                .require_privileges(&PROPFIND_PRIVILEGES, &resource)
                .await?
        };
        if !allowed {
            return Err(DavError::Unauthorized);
        }

        let kind = resource.kind().await?;

        // The whole output skeleton exists before any fetch is issued, so
        // document order reflects creation order rather than whichever
        // fetch happens to settle first.
        let mut entry = EntrySkeleton::new();
        entry.add_slot(&mut rule, WebDavProperty::GetLastModified);
        entry.add_slot(&mut rule, WebDavProperty::LockDiscovery);
        entry.add_slot(&mut rule, WebDavProperty::SupportedLock);
        entry.add_slot(&mut rule, WebDavProperty::CreationDate);
        entry.add_slot(&mut rule, WebDavProperty::ResourceType);
        entry.add_slot(&mut rule, WebDavProperty::DisplayName);
        entry.add_slot(&mut rule, WebDavProperty::GetETag);
        if kind.is_file() {
            entry.add_slot(&mut rule, WebDavProperty::GetContentLength);
            entry.add_slot(&mut rule, WebDavProperty::GetContentType);
        }
        if kind.is_directory() {
            entry.fill(
                WebDavProperty::ResourceType,
                vec![ResourceType::Collection].into(),
            );
        }

        let mut join = FetchJoin::new();
        let mut fetches: FuturesUnordered<BoxFuture<'_, crate::Result<FetchDone>>> =
            FuturesUnordered::new();
        let source = headers.source;

        if entry.wants_value(WebDavProperty::CreationDate) {
            join.start();
            let resource = resource.clone();
            fetches.push(Box::pin(async move {
                let created = resource.creation_date().await?;
                Ok(FetchDone::fill(
                    WebDavProperty::CreationDate,
                    Rfc3339DateTime(created),
                ))
            }));
        }

        // The path fetch always runs: it produces the entry's href and
        // location, and reports where the lock-discovery walk starts.
        {
            join.start();
            let resource = resource.clone();
            let base_uri = self.base_uri.as_str();
            let is_directory = kind.is_directory();
            let want_locks = entry.wants_value(WebDavProperty::LockDiscovery);
            fetches.push(Box::pin(async move {
                let path = resource.path().await?;
                let uri = full_uri(base_uri, path.as_str());
                let href = if is_directory && !uri.ends_with('/') {
                    format!("{uri}/")
                } else {
                    uri.clone()
                };
                Ok(FetchDone {
                    fills: vec![PropFill::Target {
                        href,
                        location: uri,
                    }],
                    lock_discovery_at: want_locks.then_some(path),
                })
            }));
        }

        if entry.wants_value(WebDavProperty::DisplayName) {
            join.start();
            let resource = resource.clone();
            fetches.push(Box::pin(async move {
                let name = match resource.display_name().await? {
                    Some(name) => name,
                    None => resource.web_name().await?,
                };
                Ok(FetchDone::fill(WebDavProperty::DisplayName, name))
            }));
        }

        if entry.wants_value(WebDavProperty::SupportedLock) {
            join.start();
            let resource = resource.clone();
            fetches.push(Box::pin(async move {
                let kinds = resource.available_locks().await?;
                Ok(FetchDone::fill(
                    WebDavProperty::SupportedLock,
                    SupportedLock(kinds),
                ))
            }));
        }

        // The entity tag derives from the same timestamp read that fills
        // getlastmodified, so both share one fetch.
        let want_etag = entry.wants_value(WebDavProperty::GetETag);
        let want_modified = entry.wants_value(WebDavProperty::GetLastModified);
        if want_etag || want_modified {
            join.start();
            let resource = resource.clone();
            fetches.push(Box::pin(async move {
                let modified = resource.last_modified().await?;
                let mut fills = Vec::with_capacity(2);
                if want_etag {
                    fills.push(PropFill::Slot(
                        WebDavProperty::GetETag,
                        modified.etag().into(),
                    ));
                }
                if want_modified {
                    fills.push(PropFill::Slot(
                        WebDavProperty::GetLastModified,
                        Rfc1123DateTime(modified).into(),
                    ));
                }
                Ok(FetchDone::fills(fills))
            }));
        }

        if kind.is_file() {
            if entry.wants_value(WebDavProperty::GetContentType) {
                join.start();
                let resource = resource.clone();
                fetches.push(Box::pin(async move {
                    let mime_type = resource.mime_type(source).await?;
                    Ok(FetchDone::fill(WebDavProperty::GetContentType, mime_type))
                }));
            }
            if entry.wants_value(WebDavProperty::GetContentLength) {
                join.start();
                let resource = resource.clone();
                fetches.push(Box::pin(async move {
                    let size = resource.size(source).await?;
                    Ok(FetchDone::fill(
                        WebDavProperty::GetContentLength,
                        size.unwrap_or(0),
                    ))
                }));
            }
        }

        // Resource-defined properties are enumerated in one dedicated
        // fetch and land in the same propstat as the live ones.
        {
            join.start();
            let resource = resource.clone();
            fetches.push(Box::pin(async move {
                let properties = resource.properties().await?;
                Ok(FetchDone {
                    fills: vec![PropFill::Custom(properties.to_pairs())],
                    lock_discovery_at: None,
                })
            }));
        }

        // Scheduling is complete; release the join's guard and drain. Once
        // an error is latched, remaining completions still run but their
        // fills are discarded and no follow-up work is scheduled.
        let mut lock_cache = Some(&mut data.lock_discovery);
        let mut state = join.complete(None);
        while state != Settle::Finished {
            let Some(result) = fetches.next().await else {
                break;
            };
            match result {
                Ok(done) => {
                    if !join.has_error() {
                        for fill in done.fills {
                            match fill {
                                PropFill::Slot(property, value) => entry.fill(property, value),
                                PropFill::Target { href, location } => {
                                    entry.href = Some(href);
                                    entry.location = Some(location);
                                }
                                PropFill::Custom(pairs) => {
                                    for (tag, value) in pairs {
                                        let property = DavProperty::DeadProperty(tag);
                                        if rule.must_display(&property) {
                                            if rule.must_display_value(&property) {
                                                entry.custom.push(DavPropertyValue::new(
                                                    property,
                                                    DavValue::DeadProperty(value),
                                                ));
                                            } else {
                                                entry
                                                    .custom
                                                    .push(DavPropertyValue::empty(property));
                                            }
                                        }
                                    }
                                }
                            }
                        }

                        if let Some(path) = done.lock_discovery_at
                            && let Some(cache) = lock_cache.take()
                        {
                            join.start();
                            let resource = resource.clone();
                            let acl = &self.acl;
                            let base_uri = self.base_uri.as_str();
                            fetches.push(Box::pin(async move {
                                let map = lock_discovery(acl, cache, resource, path).await?;
                                let now = chrono::Utc::now().timestamp_millis();
                                let mut locks = Vec::new();
                                for (path, path_locks) in map {
                                    for lock in path_locks {
                                        locks.push(lock.to_active_lock(
                                            full_uri(base_uri, path.as_str()),
                                            now,
                                        ));
                                    }
                                }
                                Ok(FetchDone::fill(WebDavProperty::LockDiscovery, locks))
                            }));
                        }
                    }
                    state = join.complete(None);
                }
                Err(err) => {
                    state = join.complete(Some(err));
                }
            }
        }
        if let Some(err) = join.into_error() {
            return Err(err);
        }

        multistatus.add_response(entry.into_response(headers.uri, rule.into_unmatched()));
        Ok(())
    }
}

struct EntrySkeleton {
    href: Option<String>,
    location: Option<String>,
    slots: Vec<PropSlot>,
    custom: Vec<DavPropertyValue>,
}

struct PropSlot {
    property: WebDavProperty,
    include_value: bool,
    value: DavValue,
}

enum PropFill {
    Slot(WebDavProperty, DavValue),
    Target { href: String, location: String },
    Custom(Vec<(DeadElementTag, DeadProperty)>),
}

struct FetchDone {
    fills: Vec<PropFill>,
    lock_discovery_at: Option<DavPath>,
}

impl FetchDone {
    fn fill(property: WebDavProperty, value: impl Into<DavValue>) -> Self {
        FetchDone {
            fills: vec![PropFill::Slot(property, value.into())],
            lock_discovery_at: None,
        }
    }

    fn fills(fills: Vec<PropFill>) -> Self {
        FetchDone {
            fills,
            lock_discovery_at: None,
        }
    }
}

impl EntrySkeleton {
    fn new() -> Self {
        EntrySkeleton {
            href: None,
            location: None,
            slots: Vec::with_capacity(9),
            custom: Vec::new(),
        }
    }

    fn add_slot(&mut self, rule: &mut PropertyRule, property: WebDavProperty) {
        let name = DavProperty::WebDav(property);
        if rule.must_display(&name) {
            self.slots.push(PropSlot {
                property,
                include_value: rule.must_display_value(&name),
                value: DavValue::Null,
            });
        }
    }

    fn wants_value(&self, property: WebDavProperty) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.property == property && slot.include_value)
    }

    fn fill(&mut self, property: WebDavProperty, value: DavValue) {
        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|slot| slot.property == property && slot.include_value)
        {
            slot.value = value;
        }
    }

    fn into_response(self, fallback_href: &str, unmatched: Vec<DavProperty>) -> Response {
        let mut prop = Vec::with_capacity(self.slots.len() + self.custom.len());
        for slot in self.slots {
            prop.push(DavPropertyValue {
                property: DavProperty::WebDav(slot.property),
                value: slot.value,
            });
        }
        prop.extend(self.custom);

        let mut propstat = vec![PropStat::new_list(prop)];
        if !unmatched.is_empty() {
            propstat.push(
                PropStat::new_list(unmatched.into_iter().map(DavPropertyValue::empty).collect())
                    .with_status(StatusCode::NOT_FOUND),
            );
        }

        let mut response = Response::new_propstat(
            self.href
                .unwrap_or_else(|| fallback_href.to_string()),
            propstat,
        );
        if let Some(location) = self.location {
            response = response.with_location(location);
        }
        response
    }
}
