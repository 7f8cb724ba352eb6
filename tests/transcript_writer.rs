// Writer behaviour: directory targets get generated timestamped names,
// file targets are used verbatim, missing directories are created and
// existing files are overwritten.

use std::fs;
use std::path::Path;

use llm_review::transcript::{write_to_md, OutputTarget};
use tempfile::tempdir;

fn sections() -> Vec<String> {
    vec![
        "# AI Code Review\n".to_string(),
        "## Review\n".to_string(),
        "Review body\n".to_string(),
    ]
}

#[test]
fn directory_target_generates_timestamped_name() {
    let dir = tempdir().expect("temp dir");
    let target = dir.path().join("reviews");

    let path = write_to_md(&target, &sections()).expect("write succeeds");

    let name = path.file_name().and_then(|n| n.to_str()).expect("file name");
    assert!(name.starts_with("code-review-"));
    assert!(name.ends_with(".md"));
    assert!(!name.contains(':'));
    assert_eq!(name.len(), "code-review-00000000-000000.md".len());
    assert!(target.is_dir());
    assert_eq!(fs::read_to_string(&path).expect("read back"), sections().join("\n"));
}

#[test]
fn nested_directory_target_is_created() {
    let dir = tempdir().expect("temp dir");
    let target = dir.path().join("a").join("b");

    let path = write_to_md(&target, &sections()).expect("write succeeds");

    assert!(path.starts_with(&target));
    assert!(target.is_dir());
}

#[test]
fn explicit_file_target_is_used_verbatim() {
    let dir = tempdir().expect("temp dir");
    let target = dir.path().join("review.md");

    let path = write_to_md(&target, &sections()).expect("write succeeds");

    assert_eq!(path, target);
    assert_eq!(fs::read_to_string(&target).expect("read back"), sections().join("\n"));
}

#[test]
fn explicit_file_parent_directories_are_created() {
    let dir = tempdir().expect("temp dir");
    let target = dir.path().join("deep").join("nested").join("review.md");

    let path = write_to_md(&target, &sections()).expect("write succeeds");

    assert_eq!(path, target);
    assert!(target.exists());
}

#[test]
fn existing_file_target_is_overwritten() {
    let dir = tempdir().expect("temp dir");
    let target = dir.path().join("review.md");
    fs::write(&target, "stale content").expect("seed file");

    write_to_md(&target, &sections()).expect("write succeeds");

    assert_eq!(fs::read_to_string(&target).expect("read back"), sections().join("\n"));
}

#[test]
fn write_failure_surfaces_the_error() {
    let dir = tempdir().expect("temp dir");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "a plain file").expect("seed blocker");

    // Parent of the target is a regular file, so directory creation fails.
    let target = blocker.join("review.md");
    assert!(write_to_md(&target, &sections()).is_err());
}

#[test]
fn target_shape_is_classified_by_suffix() {
    assert_eq!(
        OutputTarget::from_path(Path::new("reports")),
        OutputTarget::Directory("reports".into())
    );
    assert_eq!(
        OutputTarget::from_path(Path::new(".")),
        OutputTarget::Directory(".".into())
    );
    assert_eq!(
        OutputTarget::from_path(Path::new("report.md")),
        OutputTarget::File("report.md".into())
    );
}
