/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::request::DavPropertyValue;
use hyper::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Href(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(pub StatusCode);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List<T>(pub Vec<T>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropStat {
    pub status: Status,
    pub prop: Vec<DavPropertyValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub href: Href,
    pub location: Option<Href>,
    pub propstat: Vec<PropStat>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiStatus {
    pub response: List<Response>,
}

impl PropStat {
    pub fn new_list(prop: Vec<DavPropertyValue>) -> Self {
        PropStat {
            status: Status(StatusCode::OK),
            prop,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Status(status);
        self
    }
}

impl Response {
    pub fn new_propstat(href: impl Into<String>, propstat: Vec<PropStat>) -> Self {
        Response {
            href: Href(href.into()),
            location: None,
            propstat,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(Href(location.into()));
        self
    }
}

impl MultiStatus {
    pub fn new(response: Vec<Response>) -> Self {
        MultiStatus {
            response: List(response),
        }
    }

    pub fn add_response(&mut self, response: Response) {
        self.response.0.push(response);
    }

    pub fn is_empty(&self) -> bool {
        self.response.0.is_empty()
    }
}
