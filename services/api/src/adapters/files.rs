//! services/api/src/adapters/files.rs
//!
//! Simulated file parsing and export. Implements `FileParsingService` and
//! `ExportService`. Neither looks inside the bytes: the parser only reads the file
//! name, and the exporter renders pseudo-markup with a fabricated URL.

use async_trait::async_trait;
use docgen_core::ports::{ExportService, FileParsingService, PortResult};
use docgen_core::{export, ingest};
use docgen_core::{Document, ExportArtifact, ExportFormat, FileUpload, ParsedFile};
use std::time::Duration;

#[derive(Clone)]
pub struct SimulatedParsingAdapter {
    delay: Duration,
}

impl SimulatedParsingAdapter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl FileParsingService for SimulatedParsingAdapter {
    async fn parse_file(&self, upload: &FileUpload) -> PortResult<ParsedFile> {
        tokio::time::sleep(self.delay).await;

        Ok(ParsedFile {
            title: ingest::title_from_file_name(&upload.file_name),
            content: format!(
                "# Parsed Document: {}\n\nThis content was extracted from the uploaded file...",
                upload.file_name
            ),
        })
    }
}

#[derive(Clone)]
pub struct SimulatedExportAdapter {
    base_url: String,
    delay: Duration,
}

impl SimulatedExportAdapter {
    pub fn new(base_url: String, delay: Duration) -> Self {
        Self { base_url, delay }
    }
}

#[async_trait]
impl ExportService for SimulatedExportAdapter {
    async fn export_document(
        &self,
        document: &Document,
        format: ExportFormat,
    ) -> PortResult<ExportArtifact> {
        tokio::time::sleep(self.delay).await;
        Ok(export::build_artifact(document, format, &self.base_url))
    }
}
