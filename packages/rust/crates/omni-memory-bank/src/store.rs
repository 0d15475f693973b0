//! Filesystem-backed memory bank.
//!
//! `MemoryBank` is an explicit handle on one project's memory bank: the
//! document directory and the rules document. Engine calls receive the corpus
//! and rules text loaded through it; nothing here is process-global.

use chrono::{Local, NaiveDate};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::DocumentCorpus;
use crate::document::{DocumentType, stamp_last_updated};
use crate::error::{MemoryBankError, Result};
use crate::schema::{build_template_on, extract_schema};
use crate::settings::MemoryBankSettings;

/// Supplier of the documents and rules text fed to the engine.
pub trait CorpusSource {
    /// Current text of every document, keyed by document name.
    ///
    /// # Errors
    ///
    /// Returns an error when the location is missing or unreadable.
    fn load_corpus(&self) -> Result<DocumentCorpus>;

    /// Rules document text, or `None` when there is no rules document.
    ///
    /// # Errors
    ///
    /// Returns an error when the rules document exists but cannot be read.
    fn load_rules(&self) -> Result<Option<String>>;
}

/// Handle on one project's memory bank directory and rules document.
#[derive(Debug, Clone)]
pub struct MemoryBank {
    directory: PathBuf,
    rules_path: PathBuf,
}

impl MemoryBank {
    /// Resolve the memory bank of `project_root` using `settings`.
    #[must_use]
    pub fn open(project_root: &Path, settings: &MemoryBankSettings) -> Self {
        Self {
            directory: project_root.join(settings.directory_name()),
            rules_path: project_root.join(settings.rules_file()),
        }
    }

    /// Document directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Rules document path.
    #[must_use]
    pub fn rules_path(&self) -> &Path {
        &self.rules_path
    }

    /// Whether the document directory exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.directory.is_dir()
    }

    /// Path of the file backing `kind`.
    #[must_use]
    pub fn document_path(&self, kind: DocumentType) -> PathBuf {
        self.directory.join(kind.file_name())
    }

    fn ensure_exists(&self) -> Result<()> {
        if self.exists() {
            Ok(())
        } else {
            Err(MemoryBankError::NotInitialized(self.directory.clone()))
        }
    }

    /// Create the directory and a template for each missing document.
    ///
    /// Existing documents are kept unless `force` is set. Templates follow
    /// the rules document when present, the schema defaults otherwise.
    /// Returns the document types that were written.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory or a document cannot be written.
    pub fn initialize(&self, force: bool) -> Result<Vec<DocumentType>> {
        self.initialize_on(force, Local::now().date_naive())
    }

    /// [`MemoryBank::initialize`] with an explicit template date.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory or a document cannot be written.
    pub fn initialize_on(&self, force: bool, date: NaiveDate) -> Result<Vec<DocumentType>> {
        fs::create_dir_all(&self.directory)
            .map_err(|error| MemoryBankError::io(&self.directory, error))?;
        let rules = self.load_rules()?.unwrap_or_default();

        let mut written: Vec<DocumentType> = Vec::new();
        for kind in DocumentType::ALL {
            let path = self.document_path(kind);
            if path.exists() && !force {
                continue;
            }
            let schema = extract_schema(&rules, kind.as_str());
            let body = build_template_on(&schema, kind.as_str(), date);
            fs::write(&path, body).map_err(|error| MemoryBankError::io(&path, error))?;
            written.push(kind);
        }
        tracing::info!(
            directory = %self.directory.display(),
            written = written.len(),
            "memory bank initialized"
        );
        Ok(written)
    }

    /// Current text of one document.
    ///
    /// # Errors
    ///
    /// Returns an error when the memory bank is missing or the file is unreadable.
    pub fn read_document(&self, kind: DocumentType) -> Result<String> {
        self.ensure_exists()?;
        let path = self.document_path(kind);
        fs::read_to_string(&path).map_err(|error| MemoryBankError::io(&path, error))
    }

    /// Replace one document, stamping today's `Last Updated` date.
    ///
    /// # Errors
    ///
    /// Returns an error when the memory bank is missing or the file cannot be written.
    pub fn update_document(&self, kind: DocumentType, content: &str) -> Result<String> {
        self.update_document_on(kind, content, Local::now().date_naive())
    }

    /// [`MemoryBank::update_document`] with an explicit date. Returns the
    /// text written.
    ///
    /// # Errors
    ///
    /// Returns an error when the memory bank is missing or the file cannot be written.
    pub fn update_document_on(
        &self,
        kind: DocumentType,
        content: &str,
        date: NaiveDate,
    ) -> Result<String> {
        self.ensure_exists()?;
        let path = self.document_path(kind);
        let stamped = stamp_last_updated(content, date);
        fs::write(&path, &stamped).map_err(|error| MemoryBankError::io(&path, error))?;
        tracing::debug!(document = %kind, path = %path.display(), "memory bank document updated");
        Ok(stamped)
    }

    /// Write every document to `target` as pretty JSON. Returns the number
    /// of exported documents.
    ///
    /// # Errors
    ///
    /// Returns an error when loading, serializing or writing fails.
    pub fn export_json(&self, target: &Path) -> Result<usize> {
        let corpus = self.load_corpus()?;
        let payload = json!({
            "exported_at": Local::now().to_rfc3339(),
            "directory": self.directory.display().to_string(),
            "documents": corpus,
        });
        let rendered = serde_json::to_string_pretty(&payload)?;
        if let Some(parent) = target.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|error| MemoryBankError::io(parent, error))?;
        }
        fs::write(target, rendered).map_err(|error| MemoryBankError::io(target, error))?;
        Ok(corpus.len())
    }
}

impl CorpusSource for MemoryBank {
    fn load_corpus(&self) -> Result<DocumentCorpus> {
        self.ensure_exists()?;
        let mut corpus = DocumentCorpus::new();
        for entry in WalkDir::new(&self.directory)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(std::result::Result::ok)
        {
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "md") {
                continue;
            }
            let Some(stem) = path.file_stem().map(|stem| stem.to_string_lossy().to_string())
            else {
                continue;
            };
            let body = fs::read_to_string(path).map_err(|error| MemoryBankError::io(path, error))?;
            corpus.insert(stem, body);
        }
        tracing::debug!(
            directory = %self.directory.display(),
            documents = corpus.len(),
            "memory bank corpus loaded"
        );
        Ok(corpus)
    }

    fn load_rules(&self) -> Result<Option<String>> {
        if !self.rules_path.is_file() {
            tracing::debug!(path = %self.rules_path.display(), "no rules document; using schema defaults");
            return Ok(None);
        }
        fs::read_to_string(&self.rules_path)
            .map(Some)
            .map_err(|error| MemoryBankError::io(&self.rules_path, error))
    }
}
