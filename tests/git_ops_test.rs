//! Integration tests for git synchronization of the data file
//!
//! These tests verify that saves are committed when sync is enabled and that
//! missing remotes never block local work.

use git2::{Repository, Signature, Time};
use hangar_mcp::{GitOps, HangarConfig, HangarServerHandler};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn setup_test_repo() -> (TempDir, Repository) {
    let temp_dir = TempDir::new().unwrap();
    let repo = Repository::init(temp_dir.path()).unwrap();

    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    (temp_dir, repo)
}

fn create_initial_commit(repo: &Repository) {
    let workdir = repo.workdir().unwrap();
    fs::write(workdir.join("README.md"), "hangar data").unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new("README.md")).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

    // Fixed time avoids clock access in CI sandboxes
    let time = Time::new(1_700_000_000, 0);
    let signature = Signature::new("Test User", "test@example.com", &time).unwrap();
    repo.commit(Some("HEAD"), &signature, &signature, "Initial commit", &tree, &[])
        .unwrap();
}

fn data_file(repo: &Repository) -> PathBuf {
    repo.workdir().unwrap().join("hangar.json")
}

fn head_message(repo: &Repository) -> String {
    let head = repo.head().unwrap();
    let commit = repo.find_commit(head.target().unwrap()).unwrap();
    commit.message().unwrap().to_string()
}

#[test]
fn test_git_managed_directory() {
    let (_temp_dir, repo) = setup_test_repo();
    let file_path = data_file(&repo);
    fs::write(&file_path, "{}").unwrap();

    assert!(GitOps::new(&file_path).is_git_managed());
}

#[test]
fn test_pull_without_origin_fails() {
    let (_temp_dir, repo) = setup_test_repo();
    create_initial_commit(&repo);

    let git_ops = GitOps::new(&data_file(&repo));
    assert!(git_ops.pull().is_err());
    assert!(git_ops.push().is_err());
}

#[tokio::test]
async fn test_saves_are_committed_when_sync_enabled() {
    let (_temp_dir, repo) = setup_test_repo();
    create_initial_commit(&repo);
    let file_path = data_file(&repo);

    let config = HangarConfig {
        sync_git: true,
        ..HangarConfig::default()
    };
    // Pull and push fail without an origin; both are only logged
    let handler = HangarServerHandler::new(file_path.to_str().unwrap(), config).unwrap();
    handler
        .handle_add_notification(
            Some("annual".to_string()),
            "Annual inspection".to_string(),
            "Date".to_string(),
            Some("2024-03-15".to_string()),
            Some("Yearly".to_string()),
            None,
            None,
            None,
            None,
            None,
            None,
        )
        .await
        .unwrap();

    assert_eq!(head_message(&repo), "Add notification annual");
    drop(handler);
    assert!(file_path.exists());
}

#[tokio::test]
async fn test_saves_are_not_committed_when_sync_disabled() {
    let (_temp_dir, repo) = setup_test_repo();
    create_initial_commit(&repo);
    let file_path = data_file(&repo);

    let handler =
        HangarServerHandler::new(file_path.to_str().unwrap(), HangarConfig::default()).unwrap();
    handler
        .handle_complete_notification("missing".to_string())
        .await
        .unwrap_err();
    handler
        .handle_import_data(r#"{"version":"1.2","tables":{}}"#.to_string())
        .await
        .unwrap();

    assert_eq!(head_message(&repo), "Initial commit");
    assert!(file_path.exists());
}
