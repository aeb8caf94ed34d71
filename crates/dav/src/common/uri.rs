/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

// Everything a path segment must escape; '/' stays intact so the encoded
// path keeps its hierarchy.
pub(crate) const DAV_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

pub(crate) fn full_uri(base_uri: &str, path: &str) -> String {
    format!("{base_uri}{}", utf8_percent_encode(path, DAV_PATH))
}
