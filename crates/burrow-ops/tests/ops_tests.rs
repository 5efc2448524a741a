use burrow_core::{ConflictPolicy, ExplorerError};
use burrow_ops::{
    DeleteOptions, ListOptions, OperationType, TransferKind, TransferOptions, create_directory, delete,
    list_directory, rename, transfer,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Drop write permission on `dir`. Returns false when the OS ignores it
/// (privileged user), in which case the caller should skip.
#[cfg(unix)]
fn make_read_only(dir: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(dir, fs::Permissions::from_mode(0o500)).unwrap();
    let check = dir.join(".write-check");
    if fs::write(&check, b"").is_ok() {
        fs::remove_file(&check).unwrap();
        restore(dir);
        return false;
    }
    true
}

#[cfg(unix)]
fn restore(dir: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
}

fn names(dir: &Path) -> Vec<String> {
    list_directory(dir, &ListOptions::default())
        .unwrap()
        .into_iter()
        .map(|e| e.name.to_string())
        .collect()
}

#[test]
fn test_listing_groups_and_orders_entries() {
    let temp = TempDir::new().unwrap();
    for file in ["zeta.md", "Alpha.md", "beta.md"] {
        fs::write(temp.path().join(file), b"x").unwrap();
    }
    for dir in ["src", "Docs", "assets"] {
        fs::create_dir(temp.path().join(dir)).unwrap();
    }

    let entries = list_directory(temp.path(), &ListOptions::default()).unwrap();

    let first_file = entries.iter().position(|e| !e.is_directory).unwrap();
    assert!(entries[..first_file].iter().all(|e| e.is_directory));
    assert!(entries[first_file..].iter().all(|e| !e.is_directory));
    assert_eq!(
        names(temp.path()),
        vec!["assets", "Docs", "src", "Alpha.md", "beta.md", "zeta.md"]
    );
    assert!(entries.iter().all(|e| e.path.is_absolute()));
    assert!(entries.iter().filter(|e| e.is_directory).all(|e| e.size == 0));
}

#[test]
fn test_listing_scenario_rename_then_delete() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("b.txt"), b"b").unwrap();
    fs::create_dir(temp.path().join("A")).unwrap();
    assert_eq!(names(temp.path()), vec!["A", "b.txt"]);

    rename(&temp.path().join("b.txt"), "c.txt").unwrap();
    assert_eq!(names(temp.path()), vec!["A", "c.txt"]);

    delete(&temp.path().join("A"), &DeleteOptions::default()).unwrap();
    assert_eq!(names(temp.path()), vec!["c.txt"]);
}

#[test]
fn test_copy_to_other_directory_keeps_original() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("report.pdf");
    let dest = temp.path().join("backup");
    fs::write(&source, b"%PDF-1.7 body").unwrap();
    fs::create_dir(&dest).unwrap();

    let report = transfer(&source, &dest, TransferKind::Copy, &TransferOptions::default()).unwrap();

    assert_eq!(report.operation_type, OperationType::Copy);
    assert_eq!(report.bytes_processed, 13);
    assert_eq!(fs::read(dest.join("report.pdf")).unwrap(), b"%PDF-1.7 body");
    assert!(source.exists());
}

#[test]
fn test_move_to_other_directory_removes_original() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("song.mp3");
    let dest = temp.path().join("music");
    fs::write(&source, b"ID3").unwrap();
    fs::create_dir(&dest).unwrap();

    transfer(&source, &dest, TransferKind::Move, &TransferOptions::default()).unwrap();

    assert!(!source.exists());
    assert_eq!(fs::read(dest.join("song.mp3")).unwrap(), b"ID3");
}

#[test]
fn test_paste_overwrites_same_name() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("notes.txt");
    let dest = temp.path().join("other");
    fs::write(&source, b"new content").unwrap();
    fs::create_dir(&dest).unwrap();
    fs::write(dest.join("notes.txt"), b"old").unwrap();

    transfer(&source, &dest, TransferKind::Copy, &TransferOptions::default()).unwrap();

    assert_eq!(fs::read(dest.join("notes.txt")).unwrap(), b"new content");
    assert_eq!(names(&dest), vec!["notes.txt"]);
}

#[test]
fn test_paste_file_over_directory() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("thing");
    let dest = temp.path().join("dest");
    fs::write(&source, b"file").unwrap();
    fs::create_dir_all(dest.join("thing/nested")).unwrap();

    transfer(&source, &dest, TransferKind::Move, &TransferOptions::default()).unwrap();

    assert!(dest.join("thing").is_file());
    assert_eq!(fs::read(dest.join("thing")).unwrap(), b"file");
}

#[test]
fn test_reject_policy_leaves_both_untouched() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("a.txt");
    let dest = temp.path().join("d");
    fs::write(&source, b"src").unwrap();
    fs::create_dir(&dest).unwrap();
    fs::write(dest.join("a.txt"), b"dst").unwrap();

    let options = TransferOptions {
        conflict_policy: ConflictPolicy::Reject,
        ..Default::default()
    };
    let result = transfer(&source, &dest, TransferKind::Move, &options);

    assert!(matches!(result, Err(ExplorerError::AlreadyExists { .. })));
    assert_eq!(fs::read(&source).unwrap(), b"src");
    assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"dst");
}

#[test]
fn test_auto_rename_policy_keeps_both() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("a.txt");
    let dest = temp.path().join("d");
    fs::write(&source, b"src").unwrap();
    fs::create_dir(&dest).unwrap();
    fs::write(dest.join("a.txt"), b"dst").unwrap();

    let options = TransferOptions {
        conflict_policy: ConflictPolicy::AutoRename,
        ..Default::default()
    };
    transfer(&source, &dest, TransferKind::Copy, &options).unwrap();

    assert_eq!(names(&dest), vec!["a (1).txt", "a.txt"]);
    assert_eq!(fs::read(dest.join("a (1).txt")).unwrap(), b"src");
}

#[test]
fn test_copy_directory_recurses() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("project");
    fs::create_dir_all(source.join("src")).unwrap();
    fs::write(source.join("src/main.rs"), b"fn main() {}").unwrap();
    fs::write(source.join("README"), b"hi").unwrap();
    let dest = temp.path().join("copies");
    fs::create_dir(&dest).unwrap();

    let report = transfer(&source, &dest, TransferKind::Copy, &TransferOptions::default()).unwrap();

    assert_eq!(fs::read(dest.join("project/src/main.rs")).unwrap(), b"fn main() {}");
    assert_eq!(fs::read(dest.join("project/README")).unwrap(), b"hi");
    // project, src, main.rs, README
    assert_eq!(report.items, 4);
    assert_eq!(report.bytes_processed, 14);
    assert!(source.join("src/main.rs").exists());
}

#[test]
fn test_transfer_into_missing_destination() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("a.txt");
    fs::write(&source, b"a").unwrap();

    let result = transfer(
        &source,
        &temp.path().join("nowhere"),
        TransferKind::Copy,
        &TransferOptions::default(),
    );

    assert!(matches!(result, Err(ExplorerError::TransferFailed { .. })));
    assert!(source.exists());
}

#[test]
fn test_create_then_list() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("file"), b"").unwrap();

    create_directory(temp.path(), "zz-dir").unwrap();

    assert_eq!(names(temp.path()), vec!["zz-dir", "file"]);
    assert!(matches!(
        create_directory(temp.path(), "zz-dir"),
        Err(ExplorerError::AlreadyExists { .. })
    ));
}

#[test]
fn test_paste_over_ancestor_of_source_is_refused() {
    let temp = TempDir::new().unwrap();
    let outer = temp.path().join("x");
    let source = outer.join("x");
    fs::create_dir(&outer).unwrap();
    fs::write(&source, b"precious").unwrap();

    for kind in [TransferKind::Copy, TransferKind::Move] {
        let result = transfer(&source, temp.path(), kind, &TransferOptions::default());

        assert!(matches!(result, Err(ExplorerError::TransferFailed { .. })));
        assert_eq!(fs::read(&source).unwrap(), b"precious");
    }
    assert_eq!(names(temp.path()), vec!["x"]);
}

#[test]
fn test_overwrite_leaves_no_staging_behind() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("site");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("index.html"), b"new").unwrap();
    let dest = temp.path().join("public");
    fs::create_dir_all(dest.join("site")).unwrap();
    fs::write(dest.join("site/stale.html"), b"old").unwrap();

    transfer(&source, &dest, TransferKind::Copy, &TransferOptions::default()).unwrap();

    assert_eq!(names(&dest), vec!["site"]);
    assert_eq!(names(&dest.join("site")), vec!["index.html"]);
    assert!(!dest.join(".site.partial").exists());
}

#[cfg(unix)]
#[test]
fn test_failed_overwrite_keeps_existing_target() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let source = temp.path().join("project");
    fs::create_dir(&source).unwrap();
    let secret = source.join("secret");
    fs::write(&secret, b"s").unwrap();
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read(&secret).is_ok() {
        return;
    }
    let dest = temp.path().join("dest");
    fs::create_dir_all(dest.join("project")).unwrap();
    fs::write(dest.join("project/old.txt"), b"old").unwrap();

    let result = transfer(&source, &dest, TransferKind::Copy, &TransferOptions::default());

    assert!(matches!(result, Err(ExplorerError::TransferFailed { .. })));
    assert_eq!(fs::read(dest.join("project/old.txt")).unwrap(), b"old");
    assert_eq!(names(&dest), vec!["project"]);
    assert!(!dest.join(".project.partial").exists());
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o644)).unwrap();
}

#[cfg(unix)]
#[test]
fn test_partial_delete_reports_counts() {
    let temp = TempDir::new().unwrap();
    let tree = temp.path().join("tree");
    let locked = tree.join("locked");
    fs::create_dir_all(&locked).unwrap();
    fs::write(locked.join("inner.txt"), b"i").unwrap();
    fs::write(tree.join("loose.txt"), b"l").unwrap();
    if !make_read_only(&locked) {
        return;
    }

    let result = delete(&tree, &DeleteOptions::default());
    restore(&locked);

    // loose.txt goes; inner.txt, locked and tree stay
    assert!(matches!(
        result,
        Err(ExplorerError::DeleteIncomplete { removed: 1, failed: 3, .. })
    ));
    assert!(!tree.join("loose.txt").exists());
    assert!(locked.join("inner.txt").exists());
}

#[cfg(unix)]
#[test]
fn test_move_out_of_read_only_directory_is_incomplete() {
    let temp = TempDir::new().unwrap();
    let origin = temp.path().join("origin");
    let dest = temp.path().join("dest");
    fs::create_dir(&origin).unwrap();
    fs::create_dir(&dest).unwrap();
    let source = origin.join("a.txt");
    fs::write(&source, b"payload").unwrap();
    if !make_read_only(&origin) {
        return;
    }

    let result = transfer(&source, &dest, TransferKind::Move, &TransferOptions::default());
    restore(&origin);

    assert!(matches!(result, Err(ExplorerError::MoveIncomplete { .. })));
    assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"payload");
    assert!(source.exists());
}

#[cfg(unix)]
#[test]
fn test_incomplete_move_still_replaces_target() {
    let temp = TempDir::new().unwrap();
    let origin = temp.path().join("origin");
    let dest = temp.path().join("dest");
    fs::create_dir(&origin).unwrap();
    fs::create_dir_all(dest.join("a.txt")).unwrap();
    let source = origin.join("a.txt");
    fs::write(&source, b"payload").unwrap();
    if !make_read_only(&origin) {
        return;
    }

    let result = transfer(&source, &dest, TransferKind::Move, &TransferOptions::default());
    restore(&origin);

    match result {
        Err(ExplorerError::MoveIncomplete { to, .. }) => assert_eq!(to, dest.join("a.txt")),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"payload");
    assert!(!dest.join(".a.txt.partial").exists());
}
