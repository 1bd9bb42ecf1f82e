//! services/api/src/adapters/generation.rs
//!
//! This module contains the simulated content generator.
//! It implements the `GenerationService` port: after a fixed delay it returns
//! canned markdown that quotes the caller's prompt verbatim.

use async_trait::async_trait;
use docgen_core::ports::{GenerationService, PortResult};
use docgen_core::{Document, DocumentType, GeneratedDraft};
use std::time::Duration;

#[derive(Clone)]
pub struct SimulatedGenerationAdapter {
    create_delay: Duration,
    generate_delay: Duration,
}

impl SimulatedGenerationAdapter {
    pub fn new(create_delay: Duration, generate_delay: Duration) -> Self {
        Self {
            create_delay,
            generate_delay,
        }
    }
}

#[async_trait]
impl GenerationService for SimulatedGenerationAdapter {
    async fn draft_document(&self, doc_type: DocumentType, prompt: &str) -> PortResult<GeneratedDraft> {
        tokio::time::sleep(self.create_delay).await;

        let label = doc_type.label();
        Ok(GeneratedDraft {
            title: format!("New {} Document", label),
            content: format!(
                "# {} Document\n\n## Generated from prompt:\n{}\n\n## Table of Contents\n1. Introduction\n2. Requirements\n3. Implementation\n4. Conclusion",
                label, prompt
            ),
        })
    }

    async fn extend_document(&self, _document: &Document, prompt: &str) -> PortResult<String> {
        tokio::time::sleep(self.generate_delay).await;

        Ok(format!(
            "\n\n## AI Generated Section\n\nBased on your prompt: \"{}\"\n\nThis is the AI-generated content that addresses your request...",
            prompt
        ))
    }
}
