use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::command::{CommandContext, CommandOptions};
use crate::load_config::load_config;
use crate::publish;
use crate::upload::HttpUploader;

/// CLI for acme-publish: package the acme artifact and publish it to the
/// project's hosted code repository.
#[derive(Parser)]
#[clap(
    name = "acme-publish",
    version,
    about = "Package the acme build artifact and upload it to the hosted code repository"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload the acme artifact to google code
    Acmegc {
        /// Path to the YAML project file
        #[clap(long)]
        config: PathBuf,
        /// Password of the hosting service account
        #[clap(long)]
        password: String,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Acmegc { config, password } => {
            let mut project = load_config(config)?;
            publish::add_config(&mut project);

            let hosting_project = project
                .hosting_project()
                .ok_or_else(|| anyhow::anyhow!("no hosting project registered for upload"))?;
            let uploader = HttpUploader::for_project(hosting_project);

            let options = CommandOptions::new().set(publish::PASSWORD_OPTION, password);
            let ctx = CommandContext {
                project: &project,
                uploader: &uploader,
            };

            println!("Upload starting...");
            match project
                .command_store()
                .invoke(publish::COMMAND_NAME, ctx, &options)
                .await
            {
                Ok(()) => {
                    println!("Upload complete.");
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Upload failed: {}", e);
                    Err(e)
                }
            }
        }
    }
}
