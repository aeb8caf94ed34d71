/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::WebDavTest;
use fs::memfs::Accessor;
use hyper::StatusCode;

pub async fn test() {
    println!("Running basic tests...");
    let test = WebDavTest::new();
    test.fs.create_dir("/docs").unwrap();
    test.fs.create_dir("/docs/sub").unwrap();
    test.fs.create_dir("/docs/sub/deep").unwrap();
    test.fs.create_file("/docs/a.txt", 12, "text/plain").unwrap();
    test.fs
        .set_times("/docs/a.txt", 1_500_000_000_000, 1_700_000_000_000)
        .unwrap();

    // Unknown targets terminate with 404 and no body.
    test.propfind("/nope", "")
        .await
        .with_status(StatusCode::NOT_FOUND)
        .with_empty_body();

    // Depth 0 returns the collection itself; collection hrefs gain a
    // trailing slash while the location keeps the plain URI.
    let response = test
        .propfind_with_headers("/docs", [("depth", "0")], "")
        .await
        .with_status(StatusCode::MULTI_STATUS)
        .with_value("D:multistatus.D:response.D:href", "http://localhost/docs/")
        .with_value(
            "D:multistatus.D:response.D:location.D:href",
            "http://localhost/docs",
        )
        .with_value(
            "D:multistatus.D:response.D:propstat.D:prop.D:resourcetype.D:collection",
            "",
        );
    assert_eq!(response.response_count(), 1);

    // Depth 1 adds exactly the immediate children.
    let response = test
        .propfind_with_headers("/docs", [("depth", "1")], "")
        .await
        .with_status(StatusCode::MULTI_STATUS)
        .with_values(
            "D:multistatus.D:response.D:href",
            [
                "http://localhost/docs/",
                "http://localhost/docs/sub/",
                "http://localhost/docs/a.txt",
            ],
        );
    assert_eq!(response.response_count(), 3);

    // A missing Depth header and Depth: infinity both stay at one level.
    for headers in [Vec::new(), vec![("depth", "infinity")]] {
        test.propfind_with_headers("/docs", headers, "")
            .await
            .with_status(StatusCode::MULTI_STATUS)
            .with_values(
                "D:multistatus.D:response.D:href",
                [
                    "http://localhost/docs/",
                    "http://localhost/docs/sub/",
                    "http://localhost/docs/a.txt",
                ],
            );
    }

    // Files ignore depth.
    let response = test
        .propfind_with_headers("/docs/a.txt", [("depth", "1")], "")
        .await
        .with_status(StatusCode::MULTI_STATUS)
        .with_value(
            "D:multistatus.D:response.D:href",
            "http://localhost/docs/a.txt",
        )
        .with_value(
            "D:multistatus.D:response.D:propstat.D:prop.D:getlastmodified",
            "Tue, 14 Nov 2023 22:13:20 GMT",
        )
        .with_value(
            "D:multistatus.D:response.D:propstat.D:prop.D:getetag",
            "\"18bcfe56800\"",
        );
    assert_eq!(response.response_count(), 1);

    // Conditional headers are evaluated before any multistatus is built.
    test.propfind_with_headers("/docs/a.txt", [("if-match", "\"stale\"")], "")
        .await
        .with_status(StatusCode::PRECONDITION_FAILED)
        .with_empty_body();
    test.propfind_with_headers("/docs/a.txt", [("if-match", "\"18bcfe56800\"")], "")
        .await
        .with_status(StatusCode::MULTI_STATUS);
    test.propfind_with_headers("/docs/a.txt", [("if-none-match", "\"18bcfe56800\"")], "")
        .await
        .with_status(StatusCode::NOT_MODIFIED)
        .with_empty_body();
    test.propfind_with_headers(
        "/docs/a.txt",
        [("if-unmodified-since", "Fri, 14 Jul 2017 02:40:00 GMT")],
        "",
    )
    .await
    .with_status(StatusCode::PRECONDITION_FAILED)
    .with_empty_body();
    test.propfind_with_headers(
        "/docs/a.txt",
        [("if-modified-since", "Fri, 14 Jul 2017 02:40:00 GMT")],
        "",
    )
    .await
    .with_status(StatusCode::MULTI_STATUS);

    // An accessor failure inside one entry's fan-out surfaces as 500.
    test.fs.create_file("/docs/sub/bad.txt", 1, "text/plain").unwrap();
    test.fs.fail_on("/docs/sub/bad.txt", Accessor::LastModified).unwrap();
    test.propfind("/docs/sub/bad.txt", "")
        .await
        .with_status(StatusCode::INTERNAL_SERVER_ERROR)
        .with_empty_body();

    // A failing child aborts the whole walk; no partial multistatus.
    test.propfind_with_headers("/docs/sub", [("depth", "1")], "")
        .await
        .with_status(StatusCode::INTERNAL_SERVER_ERROR)
        .with_empty_body();

    // Failing children enumeration aborts before any entry is written.
    test.fs.create_dir("/broken").unwrap();
    test.fs.fail_on("/broken", Accessor::Children).unwrap();
    test.propfind("/broken", "")
        .await
        .with_status(StatusCode::INTERNAL_SERVER_ERROR)
        .with_empty_body();
}
