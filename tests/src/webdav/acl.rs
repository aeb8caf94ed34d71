/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::WebDavTest;
use fs::acl::Privilege;
use hyper::StatusCode;

pub async fn test() {
    println!("Running privilege tests...");
    let test = WebDavTest::new();
    test.fs.create_dir("/share").unwrap();
    test.fs.create_file("/share/a.txt", 7, "text/plain").unwrap();
    test.fs.create_file("/share/b.txt", 7, "text/plain").unwrap();

    // One denied privilege fails the whole batched check: the entry is
    // never finalized and the request answers 401 with no body.
    test.acl.deny("/share/a.txt", Privilege::CanGetSize);
    test.propfind_with_headers("/share/a.txt", [("depth", "0")], "")
        .await
        .with_status(StatusCode::UNAUTHORIZED)
        .with_empty_body();

    // A denied child takes the whole walk down with it.
    test.propfind_with_headers("/share", [("depth", "1")], "")
        .await
        .with_status(StatusCode::UNAUTHORIZED)
        .with_empty_body();

    // Siblings are still reachable directly.
    test.propfind_with_headers("/share/b.txt", [("depth", "0")], "")
        .await
        .with_status(StatusCode::MULTI_STATUS);

    // Denied child enumeration stops the listing before any entry.
    let test = WebDavTest::new();
    test.fs.create_dir("/share").unwrap();
    test.acl.deny("/share", Privilege::CanGetChildren);
    test.propfind_with_headers("/share", [("depth", "1")], "")
        .await
        .with_status(StatusCode::UNAUTHORIZED)
        .with_empty_body();
    // Depth 0 never asks for children.
    test.propfind_with_headers("/share", [("depth", "0")], "")
        .await
        .with_status(StatusCode::MULTI_STATUS);

    // The source privilege only joins the batch when the request targets
    // the source representation.
    let test = WebDavTest::new();
    test.fs.create_file("/page.html", 9, "text/html").unwrap();
    test.acl.deny("/page.html", Privilege::CanSource);
    test.propfind_with_headers("/page.html", [("depth", "0")], "")
        .await
        .with_status(StatusCode::MULTI_STATUS);
    test.propfind_with_headers("/page.html", [("depth", "0"), ("translate", "f")], "")
        .await
        .with_status(StatusCode::UNAUTHORIZED)
        .with_empty_body();
}
