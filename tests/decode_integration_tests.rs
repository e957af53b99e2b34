//! End-to-end batch tests through the public library API.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use fndecode::decode::{
    AccessStatus, Destination, NamingStyle, PlacementMode, Resolver, ResolverOptions, SkipReason,
};

/// Temporary `src` directory with a not yet existing `out` directory next to it.
fn setup() -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let src = temp_dir.path().join("src");
    let out = temp_dir.path().join("out");
    fs::create_dir(&src).expect("Failed to create src dir");
    (temp_dir, src, out)
}

fn create_file(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to create file");
    path.to_str().expect("Temp paths are valid UTF-8").to_string()
}

#[test]
fn copies_decoded_file_into_new_directory() {
    let (_temp_dir, src, out) = setup();
    let raw = create_file(&src, "Hello%20World.txt", "hello");

    let summary = Resolver::default()
        .resolve_batch(&[raw], &Destination::Directory(out.clone()), true)
        .expect("batch should run");

    assert!(out.is_dir());
    assert_eq!(summary.processed_count(), 1);
    assert!(summary.skipped.is_empty());
    assert_eq!(summary.placed[0].destination, out.join("Hello World.txt"));
    assert_eq!(summary.placed[0].mode, PlacementMode::Copy);
    assert_eq!(fs::read_to_string(out.join("Hello World.txt")).unwrap(), "hello");
    assert!(src.join("Hello%20World.txt").exists());
}

#[test]
fn existing_name_gets_copy_suffix() {
    let (_temp_dir, src, out) = setup();
    let raw = create_file(&src, "Hello%20World.txt", "new");
    fs::create_dir(&out).unwrap();
    fs::write(out.join("Hello World.txt"), "existing").unwrap();

    let summary = Resolver::default()
        .resolve_batch(&[raw], &Destination::Directory(out.clone()), true)
        .expect("batch should run");

    assert_eq!(summary.processed_count(), 1);
    assert_eq!(summary.placed[0].destination, out.join("Hello World_copy1.txt"));
    assert_eq!(fs::read_to_string(out.join("Hello World.txt")).unwrap(), "existing");
    assert_eq!(fs::read_to_string(out.join("Hello World_copy1.txt")).unwrap(), "new");
}

#[test]
fn existing_name_gets_parenthesized_suffix() {
    let (_temp_dir, src, out) = setup();
    let raw = create_file(&src, "Hello%20World.txt", "new");
    fs::create_dir(&out).unwrap();
    fs::write(out.join("Hello World.txt"), "existing").unwrap();
    fs::write(out.join("Hello World(1).txt"), "existing").unwrap();

    let resolver = Resolver::new(ResolverOptions {
        naming: NamingStyle::Parenthesized,
        ..ResolverOptions::default()
    });
    let summary = resolver
        .resolve_batch(&[raw], &Destination::Directory(out.clone()), true)
        .expect("batch should run");

    assert_eq!(summary.placed[0].destination, out.join("Hello World(2).txt"));
}

#[test]
fn cloud_placeholder_is_skipped() {
    let (_temp_dir, src, out) = setup();
    let stub = create_file(&src, ".Report%20Q1.pdf.icloud", "");
    let real = create_file(&src, "Report%20Q2.pdf", "q2");

    let summary = Resolver::default()
        .resolve_batch(&[stub.clone(), real], &Destination::Directory(out.clone()), true)
        .expect("batch should run");

    assert_eq!(summary.processed_count(), 1);
    assert_eq!(summary.skipped_count(), 1);
    assert_eq!(summary.skipped[0].path, PathBuf::from(&stub));
    assert_eq!(
        summary.skipped[0].reason,
        SkipReason::NotMaterialized(AccessStatus::Placeholder)
    );
    assert!(summary.skipped[0].reason.to_string().starts_with("not materialized"));
    assert!(out.join("Report Q2.pdf").exists());
}

#[test]
fn missing_file_is_skipped_and_batch_continues() {
    let (_temp_dir, src, out) = setup();
    let missing = src.join("gone%20away.txt").to_str().unwrap().to_string();
    let present = create_file(&src, "still%20here.txt", "here");

    let summary = Resolver::default()
        .resolve_batch(&[missing, present], &Destination::Directory(out.clone()), false)
        .expect("batch should run");

    assert_eq!(summary.processed_count(), 1);
    assert_eq!(
        summary.skipped[0].reason,
        SkipReason::NotMaterialized(AccessStatus::NotFound)
    );
    assert!(out.join("still here.txt").exists());
    assert!(!src.join("still%20here.txt").exists());
}

#[cfg(unix)]
#[test]
fn unreadable_file_is_skipped_as_access_denied() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp_dir, src, out) = setup();
    let locked = create_file(&src, "locked%20file.txt", "secret");
    let open = create_file(&src, "open%20file.txt", "open");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read the file regardless of permissions
    if fs::File::open(&locked).is_ok() {
        eprintln!("Skipping access denied check: file is readable by the current user");
        return;
    }

    let summary = Resolver::default()
        .resolve_batch(&[locked.clone(), open], &Destination::Directory(out.clone()), true)
        .expect("batch should run");

    assert_eq!(summary.processed_count(), 1);
    assert_eq!(summary.skipped[0].path, PathBuf::from(&locked));
    assert_eq!(summary.skipped[0].reason, SkipReason::AccessDenied);
    assert_eq!(summary.skipped[0].reason.to_string(), "access denied");
    assert!(out.join("open file.txt").exists());
}

#[test]
fn undecodable_name_is_skipped_and_batch_continues() {
    let (_temp_dir, src, out) = setup();
    let escaping = create_file(&src, "..%2Fsecret.txt", "secret");
    let regular = create_file(&src, "plain%20file.txt", "plain");

    let summary = Resolver::default()
        .resolve_batch(&[escaping.clone(), regular], &Destination::Directory(out.clone()), true)
        .expect("batch should run");

    assert_eq!(summary.processed_count(), 1);
    assert_eq!(summary.skipped_count(), 1);
    assert_eq!(summary.skipped[0].path, PathBuf::from(&escaping));
    assert!(matches!(summary.skipped[0].reason, SkipReason::PlacementFailed(_)));
    assert!(out.join("plain file.txt").exists());
    assert!(!src.join("secret.txt").exists());
}

#[test]
fn same_path_twice_is_processed_once() {
    let (_temp_dir, src, out) = setup();
    let raw = create_file(&src, "twice%21.txt", "once");

    let summary = Resolver::default()
        .resolve_batch(&[raw.clone(), raw], &Destination::Directory(out.clone()), true)
        .expect("batch should run");

    assert_eq!(summary.processed_count(), 1);
    assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
}

#[test]
fn drop_payload_paths_resolve() {
    let (_temp_dir, src, out) = setup();
    let with_space = create_file(&src, "my%20notes.md", "notes");
    let payload = format!("{{{with_space}}}");
    let paths = fndecode::decode::parse_drop_payload(&payload);

    let summary = Resolver::default()
        .resolve_batch(&paths, &Destination::Directory(out.clone()), true)
        .expect("batch should run");

    assert_eq!(summary.processed_count(), 1);
    assert!(out.join("my notes.md").exists());
}

#[test]
fn move_mode_removes_sources() {
    let (_temp_dir, src, out) = setup();
    let first = create_file(&src, "a%26b.txt", "ab");
    let second = create_file(&src, "%ED%95%9C%EA%B8%80.txt", "hangul");

    let summary = Resolver::default()
        .resolve_batch(&[first, second], &Destination::Directory(out.clone()), false)
        .expect("batch should run");

    assert_eq!(summary.processed_count(), 2);
    assert!(summary.placed.iter().all(|p| p.mode == PlacementMode::Move));
    assert!(out.join("a&b.txt").exists());
    assert!(out.join("한글.txt").exists());
    assert_eq!(fs::read_dir(&src).unwrap().count(), 0);
}
