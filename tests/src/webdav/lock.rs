/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::WebDavTest;
use fs::acl::Privilege;
use hyper::StatusCode;
use types::lock::LockKind;

const LOCKDISCOVERY: &str = "D:multistatus.D:response.D:propstat.D:prop.D:lockdiscovery";

pub async fn test() {
    println!("Running lock discovery tests...");
    let test = WebDavTest::new();
    test.fs.create_dir("/vault").unwrap();
    test.fs.create_dir("/vault/inner").unwrap();
    test.fs.create_file("/vault/inner/f.txt", 5, "text/plain").unwrap();
    test.fs.create_file("/vault/inner/g.txt", 5, "text/plain").unwrap();
    test.add_lock("/vault", "urn:uuid:lock-vault", Some("jane"), LockKind::exclusive_write());
    test.add_lock(
        "/vault/inner/f.txt",
        "urn:uuid:lock-f",
        None,
        LockKind::shared_write(),
    );

    // Lock discovery reports the resource's own locks and every lock held
    // on the ancestor chain, each under its own lock root.
    test.propfind_with_headers("/vault/inner/f.txt", [("depth", "0")], "")
        .await
        .with_status(StatusCode::MULTI_STATUS)
        .with_values(
            &format!("{LOCKDISCOVERY}.D:activelock.D:locktoken.D:href"),
            ["urn:uuid:lock-f", "urn:uuid:lock-vault"],
        )
        .with_values(
            &format!("{LOCKDISCOVERY}.D:activelock.D:lockroot.D:href"),
            [
                "http://localhost/vault/inner/f.txt",
                "http://localhost/vault",
            ],
        )
        .with_value(&format!("{LOCKDISCOVERY}.D:activelock.D:owner"), "jane")
        .with_values(
            &format!("{LOCKDISCOVERY}.D:activelock.D:depth"),
            ["Infinity", "Infinity"],
        )
        .with_any_value(
            &format!("{LOCKDISCOVERY}.D:activelock.D:lockscope.D:exclusive"),
            "",
        )
        .with_any_value(
            &format!("{LOCKDISCOVERY}.D:activelock.D:lockscope.D:shared"),
            "",
        );

    // Sibling entries inside one request share the ancestor walk: the
    // collection's lock table is read exactly once.
    let test = WebDavTest::new();
    test.fs.create_dir("/vault").unwrap();
    test.fs.create_dir("/vault/inner").unwrap();
    test.fs.create_file("/vault/inner/f.txt", 5, "text/plain").unwrap();
    test.fs.create_file("/vault/inner/g.txt", 5, "text/plain").unwrap();
    test.add_lock("/vault", "urn:uuid:lock-vault", Some("jane"), LockKind::exclusive_write());

    test.propfind_with_headers("/vault/inner", [("depth", "1")], "")
        .await
        .with_status(StatusCode::MULTI_STATUS);
    assert_eq!(test.fs.lock_reads("/vault"), 1);
    assert_eq!(test.fs.lock_reads("/vault/inner"), 1);
    assert_eq!(test.fs.lock_reads("/vault/inner/f.txt"), 1);

    // A second request starts from a fresh cache.
    test.propfind_with_headers("/vault/inner", [("depth", "0")], "")
        .await
        .with_status(StatusCode::MULTI_STATUS);
    assert_eq!(test.fs.lock_reads("/vault"), 2);

    // Without the list-locks privilege the walk degrades to no locks shown,
    // leaving the rest of the entry intact.
    test.acl.deny("/vault/inner/f.txt", Privilege::CanListLocks);
    test.propfind_with_headers("/vault/inner/f.txt", [("depth", "0")], "")
        .await
        .with_status(StatusCode::MULTI_STATUS)
        .with_value(LOCKDISCOVERY, "")
        .with_value(
            "D:multistatus.D:response.D:propstat.D:prop.D:getcontentlength",
            "5",
        );

    // supportedlock reflects what the backend offers.
    test.fs
        .set_available_locks("/vault/inner/g.txt", vec![LockKind::exclusive_write()])
        .unwrap();
    test.propfind_with_headers("/vault/inner/g.txt", [("depth", "0")], "")
        .await
        .with_status(StatusCode::MULTI_STATUS)
        .with_value(
            "D:multistatus.D:response.D:propstat.D:prop.D:supportedlock.D:lockentry.D:lockscope.D:exclusive",
            "",
        )
        .without_path(
            "D:multistatus.D:response.D:propstat.D:prop.D:supportedlock.D:lockentry.D:lockscope.D:shared",
        );
}
