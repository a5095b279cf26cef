use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::tempdir;

use acme_publish::command::{CommandContext, CommandOptions};
use acme_publish::project::Project;
use acme_publish::publish::{add_config, upload_artifact, COMMAND_NAME};
use acme_publish::upload::{HttpUploader, MockUploader, UploadReceipt};

/// Builds a configured project rooted in `dir`, optionally with a built
/// acme.jar present in the archive directory.
fn configured_project(dir: &Path, with_built_jar: bool) -> Project {
    let archive_dir = dir.join("archive");
    fs::create_dir_all(&archive_dir).expect("create archive dir");
    if with_built_jar {
        fs::write(archive_dir.join("acme.jar"), b"jar-bytes").expect("write jar");
    }

    let mut project = Project::new("acme".to_string(), dir.to_path_buf(), archive_dir);
    add_config(&mut project);
    project
}

#[tokio::test]
async fn upload_sends_exact_artifact_descriptor() {
    let tmp = tempdir().unwrap();
    let project = configured_project(tmp.path(), true);
    let expected_jar: PathBuf = tmp.path().join("archive").join("acme.jar");

    let mut uploader = MockUploader::new();
    uploader
        .expect_upload_artifact()
        .times(1)
        .withf(move |req| {
            req.local_file == expected_jar.as_path()
                && req.remote_name == "acme-1.0.jar"
                && req.label == "Featured"
                && req.summary == "acme project"
                && req.account == "bob"
                && req.password == "hunter2"
        })
        .returning(|req| {
            Ok(UploadReceipt {
                remote_name: req.remote_name.to_string(),
                status: 201,
                location: None,
            })
        });

    let receipt = upload_artifact(&project, &uploader, "hunter2")
        .await
        .expect("upload should succeed");
    assert_eq!(receipt.remote_name, "acme-1.0.jar");
    assert_eq!(receipt.status, 201);
}

#[tokio::test]
async fn command_invocation_passes_password_through() {
    let tmp = tempdir().unwrap();
    let project = configured_project(tmp.path(), true);

    let mut uploader = MockUploader::new();
    uploader
        .expect_upload_artifact()
        .times(1)
        .withf(|req| req.password == "secret123" && req.remote_name == "acme-1.0.jar")
        .returning(|req| {
            Ok(UploadReceipt {
                remote_name: req.remote_name.to_string(),
                status: 201,
                location: None,
            })
        });

    let options = CommandOptions::new().set("password", "secret123");
    let ctx = CommandContext {
        project: &project,
        uploader: &uploader,
    };

    project
        .command_store()
        .invoke(COMMAND_NAME, ctx, &options)
        .await
        .expect("command invocation should succeed");
}

#[tokio::test]
async fn command_invocation_without_password_fails_before_upload() {
    let tmp = tempdir().unwrap();
    let project = configured_project(tmp.path(), true);

    let mut uploader = MockUploader::new();
    uploader.expect_upload_artifact().times(0);

    let ctx = CommandContext {
        project: &project,
        uploader: &uploader,
    };

    let err = project
        .command_store()
        .invoke(COMMAND_NAME, ctx, &CommandOptions::new())
        .await
        .expect_err("missing required option must fail the invocation");
    assert!(
        err.to_string().contains("password"),
        "Error should name the missing option, got: {err}"
    );
}

#[tokio::test]
async fn invoking_unknown_command_fails() {
    let tmp = tempdir().unwrap();
    let project = configured_project(tmp.path(), true);

    let mut uploader = MockUploader::new();
    uploader.expect_upload_artifact().times(0);

    let ctx = CommandContext {
        project: &project,
        uploader: &uploader,
    };

    let err = project
        .command_store()
        .invoke("acmedocs", ctx, &CommandOptions::new())
        .await
        .expect_err("unknown command must fail");
    assert!(
        err.to_string().contains("unknown command"),
        "Got: {err}"
    );
}

#[tokio::test]
async fn upload_fails_when_artifact_not_built() {
    let tmp = tempdir().unwrap();
    let project = configured_project(tmp.path(), false);

    let mut uploader = MockUploader::new();
    uploader.expect_upload_artifact().times(0);

    let err = upload_artifact(&project, &uploader, "hunter2")
        .await
        .expect_err("missing artifact must propagate an error");
    assert!(
        err.to_string().contains("no built artifact"),
        "Got: {err}"
    );
}

#[test]
#[serial]
fn http_uploader_targets_hosting_project_files_endpoint() {
    std::env::remove_var("UPLOAD_ENDPOINT");
    let uploader = HttpUploader::for_project("acmeproj");
    assert_eq!(uploader.endpoint(), "https://acmeproj.googlecode.com/files");
}

#[test]
#[serial]
fn http_uploader_endpoint_overridable_via_env() {
    std::env::set_var("UPLOAD_ENDPOINT", "http://127.0.0.1:9099/files");
    let uploader = HttpUploader::for_project("acmeproj");
    assert_eq!(uploader.endpoint(), "http://127.0.0.1:9099/files");
    std::env::remove_var("UPLOAD_ENDPOINT");
}
