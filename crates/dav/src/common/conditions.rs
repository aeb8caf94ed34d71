/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::common::ETag;
use dav_proto::RequestHeaders;
use fs::Resource;
use hyper::StatusCode;

/// Evaluates the request's conditional headers against the resource.
/// Returns the status to terminate with on a failed precondition, or `None`
/// when processing may continue.
pub(crate) async fn check_preconditions<R: Resource>(
    resource: &R,
    headers: &RequestHeaders<'_>,
) -> crate::Result<Option<StatusCode>> {
    if !headers.has_conditions() {
        return Ok(None);
    }

    let modified = resource.last_modified().await?;
    let etag = modified.etag();

    if !headers.if_match.is_empty() && !etag_list_matches(&headers.if_match, &etag) {
        return Ok(Some(StatusCode::PRECONDITION_FAILED));
    }
    if let Some(since) = headers.if_unmodified_since
        && modified > since
    {
        return Ok(Some(StatusCode::PRECONDITION_FAILED));
    }
    if !headers.if_none_match.is_empty() && etag_list_matches(&headers.if_none_match, &etag) {
        return Ok(Some(StatusCode::NOT_MODIFIED));
    }
    if let Some(since) = headers.if_modified_since
        && modified <= since
    {
        return Ok(Some(StatusCode::NOT_MODIFIED));
    }

    Ok(None)
}

fn etag_list_matches(list: &[&str], etag: &str) -> bool {
    list.iter().any(|item| *item == "*" || *item == etag)
}
