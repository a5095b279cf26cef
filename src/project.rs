//! Project model: the configuration state mutated by the config step and read
//! during upload.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::archive::ArchiveFeature;
use crate::command::CommandStore;

/// A build project holding archive, upload and command configuration.
/// Configured once at startup, then read-only for the rest of the process.
#[derive(Debug)]
pub struct Project {
    name: String,
    root_dir: PathBuf,
    hosting_project: Option<String>,
    archive: ArchiveFeature,
    commands: CommandStore,
}

impl Project {
    pub fn new(name: String, root_dir: PathBuf, archive_dir: PathBuf) -> Self {
        info!(
            project = %name,
            root_dir = %root_dir.display(),
            archive_dir = %archive_dir.display(),
            "Created project model"
        );
        Self {
            name,
            root_dir,
            hosting_project: None,
            archive: ArchiveFeature::new(archive_dir),
            commands: CommandStore::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Registers the hosted code repository project that uploads go to. The
    /// name is passed to the hosting service as-is, without format validation.
    pub fn init_upload(&mut self, hosting_project: &str) {
        info!(hosting_project = hosting_project, "Registered hosting project for uploads");
        self.hosting_project = Some(hosting_project.to_string());
    }

    pub fn hosting_project(&self) -> Option<&str> {
        self.hosting_project.as_deref()
    }

    pub fn archive(&self) -> &ArchiveFeature {
        &self.archive
    }

    pub fn archive_mut(&mut self) -> &mut ArchiveFeature {
        &mut self.archive
    }

    pub fn command_store(&self) -> &CommandStore {
        &self.commands
    }

    pub fn command_store_mut(&mut self) -> &mut CommandStore {
        &mut self.commands
    }
}
