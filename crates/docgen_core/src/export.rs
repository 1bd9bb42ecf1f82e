//! crates/docgen_core/src/export.rs
//!
//! Renditions of a document for the export boundary. HTML and Word outputs are
//! the markdown content rendered by comrak; the PDF output is a labelled text
//! rendition, not a real conversion.

use crate::domain::{Document, ExportArtifact, ExportFormat};
use comrak::{markdown_to_html, Options};

/// `Mobile Banking App PRD` -> `mobile-banking-app-prd`. Non-ASCII letters are kept.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "document".to_string()
    } else {
        slug
    }
}

pub fn export_file_name(document: &Document, format: ExportFormat) -> String {
    format!("{}.{}", slugify(&document.title), format.extension())
}

/// Builds the full artifact, with `url` under `base_url`.
pub fn build_artifact(document: &Document, format: ExportFormat, base_url: &str) -> ExportArtifact {
    ExportArtifact {
        url: format!(
            "{}/document-{}.{}",
            base_url.trim_end_matches('/'),
            document.id,
            format.extension()
        ),
        file_name: export_file_name(document, format),
        content_type: format.content_type().to_string(),
        body: render(document, format),
    }
}

pub fn render(document: &Document, format: ExportFormat) -> String {
    match format {
        ExportFormat::Markdown => document.content.clone(),
        ExportFormat::Text => render_text(document),
        ExportFormat::Html => render_html(document, false),
        ExportFormat::Doc => render_html(document, true),
        ExportFormat::Pdf => format!(
            "%PDF-1.4 (text rendition)\n{}\n",
            render_text(document)
        ),
    }
}

fn render_text(document: &Document) -> String {
    let rule = "=".repeat(document.title.chars().count().max(3));
    let body: Vec<&str> = document
        .content
        .lines()
        .map(|line| line.trim_start_matches('#').trim_start())
        .collect();
    format!(
        "{}\n{}\nType: {} | Status: {} | Version: {} | Author: {}\n\n{}",
        document.title,
        rule,
        document.doc_type.display_name(),
        document.status,
        document.version,
        document.author,
        body.join("\n")
    )
}

fn render_html(document: &Document, word: bool) -> String {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    // Raw HTML in the content is shown as text, never passed through.
    options.render.escape = true;

    let body = markdown_to_html(&document.content, &options);

    let html_open = if word {
        "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" xmlns:w=\"urn:schemas-microsoft-com:office:word\">"
    } else {
        "<!DOCTYPE html>\n<html>"
    };
    format!(
        "{}\n<head><meta charset=\"utf-8\"></head>\n<body>\n{}</body>\n</html>\n",
        html_open, body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentType;
    use chrono::Utc;

    fn doc() -> Document {
        Document::new_draft(
            "doc-7".to_string(),
            "Mobile Banking App PRD".to_string(),
            DocumentType::Prd,
            "# Overview\n\nFast <secure> transfers & more".to_string(),
            "Demo User".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Mobile Banking App PRD"), "mobile-banking-app-prd");
        assert_eq!(slugify("  --Hello,  World!  "), "hello-world");
        assert_eq!(slugify("???"), "document");
    }

    #[test]
    fn slugify_keeps_non_ascii_letters() {
        assert_eq!(slugify("Über Plan"), "über-plan");
        assert_eq!(slugify("Café Menü 2"), "café-menü-2");
    }

    #[test]
    fn artifact_url_uses_document_id_and_extension() {
        let artifact = build_artifact(&doc(), ExportFormat::Pdf, "https://example.com/exports/");
        assert_eq!(artifact.url, "https://example.com/exports/document-doc-7.pdf");
        assert_eq!(artifact.file_name, "mobile-banking-app-prd.pdf");
        assert_eq!(artifact.content_type, "application/pdf");
    }

    #[test]
    fn html_escapes_and_maps_headings() {
        let html = render(&doc(), ExportFormat::Html);
        assert!(html.contains("<h1>Overview</h1>"));
        assert!(html.contains("<p>Fast &lt;secure&gt; transfers &amp; more</p>"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn html_renders_lists_and_emphasis() {
        let mut document = doc();
        document.content =
            "## Table of Contents\n1. Introduction\n2. Requirements\n\n- **bold** item".to_string();
        for format in [ExportFormat::Html, ExportFormat::Doc] {
            let html = render(&document, format);
            assert!(html.contains("<h2>Table of Contents</h2>"));
            assert!(html.contains("<ol>"));
            assert!(html.contains("<li>Introduction</li>"));
            assert!(html.contains("<ul>"));
            assert!(html.contains("<strong>bold</strong>"));
        }
    }

    #[test]
    fn word_export_carries_office_namespaces() {
        let doc_markup = render(&doc(), ExportFormat::Doc);
        assert!(doc_markup.contains("urn:schemas-microsoft-com:office:word"));
    }

    #[test]
    fn text_export_strips_heading_markers() {
        let text = render(&doc(), ExportFormat::Text);
        assert!(text.starts_with("Mobile Banking App PRD\n"));
        assert!(text.contains("\nOverview\n"));
        assert!(text.contains("Version: 1"));
    }
}
