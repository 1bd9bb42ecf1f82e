//! crates/docgen_core/src/ingest.rs
//!
//! Rules for files accepted at the upload boundary and for folding their text into
//! a generation prompt. Nothing here parses PDF or Word: bytes are read as text.

use crate::domain::DocumentType;
use crate::error::{StoreError, StoreResult};

/// Reference text beyond this many characters is cut and marked with `...`.
pub const REFERENCE_EXCERPT_CHARS: usize = 2000;

const REFERENCE_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedFormat {
    PlainText,
    Markdown,
    Pdf,
    Word,
}

impl SupportedFormat {
    /// Classifies a file by its extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> StoreResult<Self> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "txt" => Ok(SupportedFormat::PlainText),
            "md" | "markdown" => Ok(SupportedFormat::Markdown),
            "pdf" => Ok(SupportedFormat::Pdf),
            "doc" | "docx" => Ok(SupportedFormat::Word),
            _ => Err(StoreError::UnsupportedFile(format!(
                "'{}' is not a TXT, MD, PDF, DOC or DOCX file",
                file_name
            ))),
        }
    }
}

/// `report.final.docx` -> `report.final`. Names without an extension are kept whole.
pub fn title_from_file_name(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}

/// Renders one uploaded file as a `File: <name>` block, truncated to
/// `REFERENCE_EXCERPT_CHARS` characters.
pub fn reference_excerpt(file_name: &str, bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let mut excerpt: String = text.chars().take(REFERENCE_EXCERPT_CHARS).collect();
    if text.chars().nth(REFERENCE_EXCERPT_CHARS).is_some() {
        excerpt.push_str("...");
    }
    format!("File: {}\n\n{}", file_name, excerpt)
}

/// Joins several excerpts into one reference context.
pub fn reference_context<'a>(excerpts: impl IntoIterator<Item = &'a str>) -> String {
    excerpts
        .into_iter()
        .filter(|e| !e.trim().is_empty())
        .collect::<Vec<_>>()
        .join(REFERENCE_SEPARATOR)
}

/// Wraps the user's request in the instructions sent to the generator.
pub fn compose_prompt(doc_type: DocumentType, prompt: &str, reference_context: Option<&str>) -> String {
    let references = match reference_context.map(str::trim) {
        Some(context) if !context.is_empty() => {
            format!("\n\nReference context from uploaded files:\n{}", context)
        }
        _ => String::new(),
    };
    format!(
        "Create a {kind} document with the following requirements:\n\n{prompt}\n{references}\n\nPlease create a comprehensive, well-structured document that follows best practices for {kind} documents.",
        kind = doc_type.as_str(),
        prompt = prompt.trim(),
        references = references,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allow_listed_extensions_case_insensitively() {
        assert_eq!(SupportedFormat::from_file_name("a.TXT").unwrap(), SupportedFormat::PlainText);
        assert_eq!(SupportedFormat::from_file_name("notes.md").unwrap(), SupportedFormat::Markdown);
        assert_eq!(SupportedFormat::from_file_name("spec.pdf").unwrap(), SupportedFormat::Pdf);
        assert_eq!(SupportedFormat::from_file_name("brief.docx").unwrap(), SupportedFormat::Word);
        assert_eq!(SupportedFormat::from_file_name("old.doc").unwrap(), SupportedFormat::Word);
    }

    #[test]
    fn rejects_other_files() {
        assert!(matches!(
            SupportedFormat::from_file_name("image.png"),
            Err(StoreError::UnsupportedFile(_))
        ));
        assert!(SupportedFormat::from_file_name("README").is_err());
    }

    #[test]
    fn title_strips_only_the_last_extension() {
        assert_eq!(title_from_file_name("report.final.docx"), "report.final");
        assert_eq!(title_from_file_name("README"), "README");
        assert_eq!(title_from_file_name(".env"), ".env");
    }

    #[test]
    fn long_references_are_truncated() {
        let body = "x".repeat(REFERENCE_EXCERPT_CHARS + 10);
        let excerpt = reference_excerpt("big.txt", body.as_bytes());
        assert!(excerpt.starts_with("File: big.txt\n\n"));
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.len(), "File: big.txt\n\n".len() + REFERENCE_EXCERPT_CHARS + 3);

        let short = reference_excerpt("small.txt", b"hello");
        assert!(short.ends_with("hello"));
    }

    #[test]
    fn references_are_joined_with_separators() {
        let joined = reference_context(["a", "", "b"]);
        assert_eq!(joined, "a\n\n---\n\nb");
    }

    #[test]
    fn composed_prompt_embeds_request_and_references() {
        let prompt = compose_prompt(DocumentType::Prd, "fitness app", Some("File: x.md\n\nnotes"));
        assert!(prompt.contains("Create a prd document"));
        assert!(prompt.contains("fitness app"));
        assert!(prompt.contains("Reference context from uploaded files:\nFile: x.md"));

        let bare = compose_prompt(DocumentType::Sop, "onboarding", None);
        assert!(!bare.contains("Reference context"));
    }
}
