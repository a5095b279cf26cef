use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use tracing::{error, info};

use crate::project::Project;

#[derive(Debug, Deserialize)]
struct ProjectFile {
    project: ProjectSection,
    #[serde(default)]
    archive: ArchiveSection,
}

#[derive(Debug, Deserialize)]
struct ProjectSection {
    name: String,
    root_dir: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct ArchiveSection {
    #[serde(default)]
    dir: Option<PathBuf>,
}

/// Loads the static YAML project file and builds the project model from it.
/// The archive directory defaults to `<root_dir>/target/archive` when the
/// file does not name one.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Project> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading project file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Project file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read project file");
            return Err(anyhow::anyhow!(
                "Failed to read project file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let parsed: ProjectFile = match serde_yaml::from_str(&config_content) {
        Ok(parsed) => {
            info!(config_path = ?path_ref, "Parsed project YAML successfully");
            parsed
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse project YAML");
            return Err(anyhow::anyhow!("Failed to parse project YAML: {e}"));
        }
    };

    let archive_dir = parsed
        .archive
        .dir
        .unwrap_or_else(|| parsed.project.root_dir.join("target").join("archive"));

    info!(
        project = %parsed.project.name,
        root_dir = %parsed.project.root_dir.display(),
        archive_dir = %archive_dir.display(),
        "Project file loaded"
    );

    Ok(Project::new(
        parsed.project.name,
        parsed.project.root_dir,
        archive_dir,
    ))
}
