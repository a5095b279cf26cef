//! Archive feature: the registry of packaged build artifacts a project produces.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use tracing::{debug, info};

/// Describes one classes archive entry as an open record. Fields other than
/// the name are owned by the archive builder and stay unset unless a caller
/// has a reason to override them.
#[derive(Debug, Clone, Default)]
pub struct ArchiveEntrySpec {
    /// Base name of the artifact, e.g. "acme" for acme.jar.
    pub name: String,
    /// Optional classifier appended to the artifact file name.
    pub classifier: Option<String>,
    /// Optional manifest file to embed when the archive is built.
    pub manifest: Option<PathBuf>,
    /// Optional include patterns restricting what goes into the archive.
    pub includes: Option<Vec<String>>,
}

impl ArchiveEntrySpec {
    /// An entry with only a name, leaving every builder-owned field unset.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// A registered archive entry, able to resolve its built artifact on disk.
#[derive(Debug)]
pub struct ArchiveEntry {
    spec: ArchiveEntrySpec,
    archive_dir: PathBuf,
}

impl ArchiveEntry {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &ArchiveEntrySpec {
        &self.spec
    }

    /// Path of the built artifact for this entry. Building the archive is the
    /// build's responsibility; this only errors when the file is not there yet.
    pub fn artifact(&self) -> Result<PathBuf> {
        let file_name = match &self.spec.classifier {
            Some(classifier) => format!("{}-{}.jar", self.spec.name, classifier),
            None => format!("{}.jar", self.spec.name),
        };
        let path = self.archive_dir.join(file_name);
        if !path.exists() {
            bail!(
                "archive entry '{}' has no built artifact at {}",
                self.spec.name,
                path.display()
            );
        }
        debug!(artifact = %path.display(), entry = %self.spec.name, "Resolved built artifact");
        Ok(path)
    }
}

/// Sub-feature holding the classes jar entries of a project.
#[derive(Debug)]
pub struct ClassesArchive {
    archive_dir: PathBuf,
    entries: Vec<ArchiveEntry>,
}

impl ClassesArchive {
    fn new(archive_dir: PathBuf) -> Self {
        Self {
            archive_dir,
            entries: Vec::new(),
        }
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// Registers a named entry with the archive feature.
    pub fn add_entry(&mut self, spec: ArchiveEntrySpec) {
        info!(entry = %spec.name, "Registered classes archive entry");
        self.entries.push(ArchiveEntry {
            spec,
            archive_dir: self.archive_dir.clone(),
        });
    }

    /// Looks up a previously registered entry by name.
    pub fn entry(&self, name: &str) -> Result<&ArchiveEntry> {
        self.entries
            .iter()
            .find(|entry| entry.spec.name == name)
            .ok_or_else(|| anyhow!("no classes archive entry named '{name}'"))
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }
}

/// Archive feature of a project. Currently only classes archives; source and
/// javadoc archives would hang off this the same way.
#[derive(Debug)]
pub struct ArchiveFeature {
    classes: ClassesArchive,
}

impl ArchiveFeature {
    pub fn new(archive_dir: PathBuf) -> Self {
        Self {
            classes: ClassesArchive::new(archive_dir),
        }
    }

    pub fn classes(&self) -> &ClassesArchive {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut ClassesArchive {
        &mut self.classes
    }
}
