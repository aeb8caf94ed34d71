/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use dav::{DavServer, HttpResponse, PropFindRequestHandler};
use dav_proto::RequestHeaders;
use fs::memfs::{MemAcl, MemFs};
use hyper::StatusCode;
use quick_xml::{Reader, events::Event};
use std::{sync::Arc, time::Instant};
use types::lock::{Lock, LockKind};

pub mod acl;
pub mod basic;
pub mod lock;

#[test]
fn webdav_tests() {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async {
            let start_time = Instant::now();

            basic::test().await;
            prop::test().await;
            lock::test().await;
            acl::test().await;

            let elapsed = start_time.elapsed();
            println!(
                "Elapsed: {}.{:03}s",
                elapsed.as_secs(),
                elapsed.subsec_millis()
            );
        });
}

pub struct WebDavTest {
    pub fs: MemFs,
    pub acl: Arc<MemAcl>,
    server: DavServer<MemFs, Arc<MemAcl>>,
}

impl WebDavTest {
    pub fn new() -> Self {
        let fs = MemFs::new();
        let acl = Arc::new(MemAcl::allow_all());
        let server = DavServer::new(fs.clone(), acl.clone()).with_base_uri("http://localhost");
        WebDavTest { fs, acl, server }
    }

    pub async fn propfind(&self, uri: &str, body: &str) -> DavResponse {
        self.propfind_with_headers(uri, [], body).await
    }

    pub async fn propfind_with_headers(
        &self,
        uri: &str,
        headers: impl IntoIterator<Item = (&str, &str)>,
        body: &str,
    ) -> DavResponse {
        let mut request_headers = RequestHeaders::new(uri);
        for (name, value) in headers {
            request_headers.parse_header(name, value);
        }
        let response = self
            .server
            .handle_propfind_request(&request_headers, body.as_bytes())
            .await
            .unwrap();
        DavResponse::new(response)
    }

    /// A lock on `path` expiring an hour from now.
    pub fn add_lock(&self, path: &str, token: &str, owner: Option<&str>, kind: LockKind) {
        self.fs
            .add_lock(
                path,
                Lock {
                    token: token.to_string(),
                    owner: owner.map(|owner| owner.to_string()),
                    kind,
                    depth_infinity: true,
                    expires_at: now_millis() + 3_600_000,
                },
            )
            .unwrap();
    }
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

pub struct DavResponse {
    pub status: StatusCode,
    pub body: String,
    // Flattened (dotted element path, text) pairs in document order.
    pub values: Vec<(String, String)>,
}

impl DavResponse {
    fn new(response: HttpResponse) -> Self {
        let body = response.body.unwrap_or_default();
        DavResponse {
            status: response.status,
            values: flatten_xml(&body),
            body,
        }
    }

    pub fn with_status(self, status: StatusCode) -> Self {
        if self.status != status {
            panic!("expected status {status}, got {} : {}", self.status, self.body);
        }
        self
    }

    pub fn with_empty_body(self) -> Self {
        if !self.body.is_empty() {
            panic!("expected empty body, got: {}", self.body);
        }
        self
    }

    pub fn values_of(&self, path: &str) -> Vec<&str> {
        self.values
            .iter()
            .filter(|(item_path, _)| item_path == path)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn with_value(self, path: &str, expected: &str) -> Self {
        let values = self.values_of(path);
        if values != [expected] {
            panic!("expected {expected:?} at {path}, got {values:?} : {}", self.body);
        }
        self
    }

    pub fn with_values<'x>(self, path: &str, expected: impl IntoIterator<Item = &'x str>) -> Self {
        let mut values = self.values_of(path);
        let mut expected = expected.into_iter().collect::<Vec<_>>();
        values.sort_unstable();
        expected.sort_unstable();
        if values != expected {
            panic!("expected {expected:?} at {path}, got {values:?} : {}", self.body);
        }
        self
    }

    pub fn with_any_value(self, path: &str, expected: &str) -> Self {
        if !self.values_of(path).contains(&expected) {
            panic!("expected {expected:?} among values at {path} : {}", self.body);
        }
        self
    }

    pub fn without_path(self, path: &str) -> Self {
        if !self.values_of(path).is_empty() {
            panic!("expected nothing at {path} : {}", self.body);
        }
        self
    }

    pub fn response_count(&self) -> usize {
        self.values
            .iter()
            .filter(|(path, _)| path == "D:multistatus.D:response.D:href")
            .count()
    }
}

fn flatten_xml(body: &str) -> Vec<(String, String)> {
    let mut values = Vec::new();
    if body.is_empty() {
        return values;
    }

    let mut reader = Reader::from_str(body);
    let mut stack: Vec<String> = Vec::new();
    let mut has_content = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => {
                stack.push(String::from_utf8_lossy(element.name().as_ref()).into_owned());
                has_content = false;
            }
            Ok(Event::End(_)) => {
                if !has_content {
                    values.push((stack.join("."), String::new()));
                }
                stack.pop();
                has_content = true;
            }
            Ok(Event::Empty(element)) => {
                let mut path = stack.join(".");
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(&String::from_utf8_lossy(element.name().as_ref()));
                values.push((path, String::new()));
                has_content = true;
            }
            Ok(Event::Text(text)) => {
                let text = text.unescape().unwrap_or_default();
                if !text.trim().is_empty() {
                    values.push((stack.join("."), text.into_owned()));
                    has_content = true;
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => (),
            Err(err) => panic!("invalid response XML: {err} in {body}"),
        }
    }

    values
}
