//! Packaging and publishing workflow for the acme artifact: configures the
//! project to archive the acme jar and upload it to the hosted code
//! repository, and registers the command that triggers the upload.

use anyhow::{anyhow, Result};
use futures::future::BoxFuture;
use tracing::{debug, error, info};

use crate::archive::ArchiveEntrySpec;
use crate::command::{CommandContext, CommandOptions, CommandStore};
use crate::project::Project;
use crate::upload::{ArtifactUpload, UploadReceipt, Uploader};

/// Hosted code repository project that receives the uploads.
pub const HOSTING_PROJECT: &str = "acmeproj";
/// Classes archive entry holding the acme jar.
pub const ENTRY_NAME: &str = "acme";
/// CLI action that triggers the upload.
pub const COMMAND_NAME: &str = "acmegc";
/// Option carrying the hosting service account secret.
pub const PASSWORD_OPTION: &str = "password";

const COMMAND_RESOURCE_HINT: &str = "16m";
const COMMAND_HELP: &str = "uploads the acme artifact to google code";

const REMOTE_NAME: &str = "acme-1.0.jar";
const LABEL: &str = "Featured";
const SUMMARY: &str = "acme project";
const ACCOUNT: &str = "bob";

/// Adds the acme publishing configuration to the project: the hosting project
/// name, the classes archive entry and the upload command. Idempotent in
/// intent; calling it twice simply re-registers the same configuration.
pub fn add_config(project: &mut Project) {
    project.init_upload(HOSTING_PROJECT);

    // A single classes jar for now. Source and javadoc archives would be
    // further entries on the same feature.
    project
        .archive_mut()
        .classes_mut()
        .add_entry(ArchiveEntrySpec::named(ENTRY_NAME));

    register_upload_command(project.command_store_mut());
}

fn register_upload_command(store: &mut CommandStore) {
    let command = store.add_command(COMMAND_NAME, COMMAND_RESOURCE_HINT, Box::new(run_upload_command));
    command.set_help(COMMAND_HELP);
    command.declare_option(PASSWORD_OPTION, true);
}

fn run_upload_command<'a>(
    ctx: CommandContext<'a>,
    options: &'a CommandOptions,
) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let password = options.value_of(PASSWORD_OPTION)?;
        let receipt = upload_artifact(ctx.project, ctx.uploader, password).await?;
        info!(
            remote_name = %receipt.remote_name,
            status = receipt.status,
            "[PUBLISH] Command upload finished"
        );
        Ok(())
    })
}

/// Uploads the built acme artifact to the hosted code repository, blocking
/// until the transfer completes. Callable in-code or through the registered
/// command. Any failure, including an artifact that has not been built yet,
/// propagates to the caller.
pub async fn upload_artifact(
    project: &Project,
    uploader: &dyn Uploader,
    password: &str,
) -> Result<UploadReceipt> {
    let entry = project.archive().classes().entry(ENTRY_NAME)?;
    let jar = entry.artifact()?;

    info!(
        artifact = %jar.display(),
        remote_name = REMOTE_NAME,
        account = ACCOUNT,
        "[PUBLISH] Uploading acme artifact"
    );
    let receipt = uploader
        .upload_artifact(ArtifactUpload {
            local_file: &jar,
            remote_name: REMOTE_NAME,
            label: LABEL,
            summary: SUMMARY,
            account: ACCOUNT,
            password,
        })
        .await
        .map_err(|e| {
            error!(error = %e, remote_name = REMOTE_NAME, "[PUBLISH] Upload failed");
            anyhow!("upload of '{REMOTE_NAME}' failed: {e}")
        })?;

    match serde_json::to_string_pretty(&receipt) {
        Ok(json) => debug!(json = %json, "[PUBLISH] Upload receipt"),
        Err(e) => error!(error = ?e, "[PUBLISH] Failed to serialize upload receipt"),
    }

    Ok(receipt)
}
