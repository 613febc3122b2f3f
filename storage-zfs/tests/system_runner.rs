// SPDX-License-Identifier: GPL-3.0-only

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;

use storage_zfs::{SystemRunner, Zfs, ZfsError};

/// Write an executable stand-in for `zfs` that logs its arguments
fn fake_zfs(name: &str, body: &str) -> (PathBuf, PathBuf) {
    let dir = std::env::temp_dir().join(format!(
        "storage-zfs-{}-{}",
        name,
        std::process::id()
    ));
    fs::create_dir_all(&dir).unwrap();

    let log = dir.join("calls.log");
    let script = dir.join("zfs");
    fs::write(
        &script,
        format!(
            "#!/bin/sh\necho \"$@\" >> '{}'\n{}\n",
            log.display(),
            body
        ),
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    (script, log)
}

#[test]
fn reads_and_writes_properties_through_binary() {
    let (script, log) = fake_zfs(
        "props",
        "case \"$1\" in\n\
         get) printf 'tank/home\\tmountpoint\\t/home\\tdefault\\ntank/home\\tcreation\\tSun Oct 18 12:35 2026\\t-\\n' ;;\n\
         esac",
    );
    let zfs = Zfs::with_runner(Arc::new(SystemRunner::new(&script)));
    let mut home = zfs.filesystem("tank/home").unwrap();

    assert_eq!(home.mountpoint().unwrap(), "/home");
    assert_eq!(
        home.properties_mut().get("creation").unwrap(),
        "Sun Oct 18 12:35 2026"
    );
    home.set_mountpoint("/export/home").unwrap();
    home.update().unwrap();

    let calls = fs::read_to_string(&log).unwrap();
    assert_eq!(
        calls.lines().collect::<Vec<_>>(),
        vec![
            "get -H -o name,property,value,source all tank/home",
            "set mountpoint=/export/home tank/home",
        ]
    );
    let _ = fs::remove_dir_all(script.parent().unwrap());
}

#[test]
fn nonzero_exit_carries_stderr() {
    let (script, _log) = fake_zfs(
        "fail",
        "echo \"cannot open 'tank/nope': dataset does not exist\" >&2\nexit 1",
    );
    let zfs = Zfs::with_runner(Arc::new(SystemRunner::new(&script)));

    let err = zfs.get_properties("tank/nope").unwrap_err();
    match err {
        ZfsError::CommandFailed { status, stderr, .. } => {
            assert_eq!(status, Some(1));
            assert!(stderr.contains("dataset does not exist"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let _ = fs::remove_dir_all(script.parent().unwrap());
}
