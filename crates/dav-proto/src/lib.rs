/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod parser;
pub mod requests;
pub mod responses;
pub mod schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Depth {
    #[default]
    None,
    Zero,
    One,
    Infinity,
}

impl Depth {
    pub fn parse(value: &str) -> Self {
        hashify::tiny_map_ignore_case!(value.as_bytes(),
            "0" => Depth::Zero,
            "1" => Depth::One,
            "infinity" => Depth::Infinity,
        )
        .unwrap_or(Depth::None)
    }
}

/// Request metadata the PROPFIND engine consumes: target URI, traversal
/// depth, the source-representation flag, and conditional headers.
#[derive(Debug, Clone, Default)]
pub struct RequestHeaders<'x> {
    pub uri: &'x str,
    pub depth: Depth,
    pub source: bool,
    pub host: Option<&'x str>,
    pub if_match: Vec<&'x str>,
    pub if_none_match: Vec<&'x str>,
    pub if_modified_since: Option<i64>,
    pub if_unmodified_since: Option<i64>,
}

impl<'x> RequestHeaders<'x> {
    pub fn new(uri: &'x str) -> Self {
        RequestHeaders {
            uri,
            ..Default::default()
        }
    }

    /// Folds one HTTP header into the parsed view. Header names are expected
    /// in lowercase, as HTTP/2 and hyper deliver them.
    pub fn parse_header(&mut self, name: &'x str, value: &'x str) {
        hashify::fnc_map!(name.as_bytes(),
            "depth" => {
                self.depth = Depth::parse(value.trim());
            },
            "translate" => {
                // Translate: f selects the raw source representation.
                self.source = value.trim().eq_ignore_ascii_case("f");
            },
            "host" => {
                self.host = Some(value.trim());
            },
            "if-match" => {
                self.if_match = parse_etag_list(value);
            },
            "if-none-match" => {
                self.if_none_match = parse_etag_list(value);
            },
            "if-modified-since" => {
                self.if_modified_since = parse_http_date(value);
            },
            "if-unmodified-since" => {
                self.if_unmodified_since = parse_http_date(value);
            },
            _ => {}
        );
    }

    pub fn has_conditions(&self) -> bool {
        !self.if_match.is_empty()
            || !self.if_none_match.is_empty()
            || self.if_modified_since.is_some()
            || self.if_unmodified_since.is_some()
    }
}

fn parse_etag_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_http_date(value: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|date| date.timestamp_millis())
}
