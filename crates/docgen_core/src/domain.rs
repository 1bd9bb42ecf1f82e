//! crates/docgen_core/src/domain.rs
//!
//! Defines the core data structures for the document studio.
//! These types carry serde derives because they cross three boundaries: the
//! persisted session profile, the watch-channel snapshots handed to views, and
//! the HTTP surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Builds a time-ordered identifier such as `doc-0190f3c4-...`.
pub fn prefixed_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::now_v7())
}

/// Counts whitespace-separated words, the unit used by the usage counters.
pub fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// Returned by the `FromStr` impls of the closed enumerations below.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

//=========================================================================================
// Users and Sessions
//=========================================================================================

/// Subscription tier. The legacy labels `free` and `pro` are still accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[serde(alias = "free")]
    Basic,
    #[serde(alias = "pro")]
    Paid,
    Enterprise,
}

/// The profile of whoever is logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub plan: Plan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// An authenticated identity. A session cannot exist without a non-empty token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Session {
    pub user: User,
    token: String,
}

impl Session {
    /// Returns `None` when the token is empty or whitespace.
    pub fn new(user: User, token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return None;
        }
        Some(Self { user, token })
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

//=========================================================================================
// Documents
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    Prd,
    Brd,
    Frd,
    TechSpec,
    Rfp,
    Sop,
    TestPlan,
    DeploymentGuide,
}

impl DocumentType {
    pub const ALL: [DocumentType; 8] = [
        DocumentType::Prd,
        DocumentType::Brd,
        DocumentType::Frd,
        DocumentType::TechSpec,
        DocumentType::Rfp,
        DocumentType::Sop,
        DocumentType::TestPlan,
        DocumentType::DeploymentGuide,
    ];

    /// The wire name, e.g. `tech-spec`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Prd => "prd",
            DocumentType::Brd => "brd",
            DocumentType::Frd => "frd",
            DocumentType::TechSpec => "tech-spec",
            DocumentType::Rfp => "rfp",
            DocumentType::Sop => "sop",
            DocumentType::TestPlan => "test-plan",
            DocumentType::DeploymentGuide => "deployment-guide",
        }
    }

    /// Upper-cased wire name used in generated headings, e.g. `TECH-SPEC`.
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::Prd => "Product Requirements Document",
            DocumentType::Brd => "Business Requirements Document",
            DocumentType::Frd => "Functional Requirements Document",
            DocumentType::TechSpec => "Technical Specification",
            DocumentType::Rfp => "Request for Proposal",
            DocumentType::Sop => "Standard Operating Procedure",
            DocumentType::TestPlan => "Test Plan",
            DocumentType::DeploymentGuide => "Deployment Guide",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ParseEnumError {
                kind: "document type",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Draft,
    Review,
    Published,
    Archived,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 4] = [
        DocumentStatus::Draft,
        DocumentStatus::Review,
        DocumentStatus::Published,
        DocumentStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Review => "review",
            DocumentStatus::Published => "published",
            DocumentStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        DocumentStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == wanted)
            .ok_or_else(|| ParseEnumError {
                kind: "document status",
                value: s.to_string(),
            })
    }
}

/// A titled, typed, versioned unit of generated or edited text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub content: String,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: String,
    pub version: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Document {
    /// A fresh draft at version 1.
    pub fn new_draft(
        id: String,
        title: String,
        doc_type: DocumentType,
        content: String,
        author: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            doc_type,
            content,
            status: DocumentStatus::Draft,
            created_at: now,
            updated_at: now,
            author,
            version: 1,
            tags: Vec::new(),
        }
    }

    /// Merges the present fields of `patch`, bumps the version and refreshes
    /// `updated_at`. The timestamp never moves backwards.
    pub fn patched(&self, patch: &DocumentPatch, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        if let Some(title) = &patch.title {
            next.title = title.clone();
        }
        if let Some(content) = &patch.content {
            next.content = content.clone();
        }
        if let Some(doc_type) = patch.doc_type {
            next.doc_type = doc_type;
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(tags) = &patch.tags {
            next.tags = tags.clone();
        }
        next.version = self.version.saturating_add(1);
        next.updated_at = now.max(self.updated_at);
        next
    }
}

/// A partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DocumentPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, rename = "type")]
    pub doc_type: Option<DocumentType>,
    #[serde(default)]
    pub status: Option<DocumentStatus>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Input to `DocumentStore::create`.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub doc_type: Option<DocumentType>,
    pub title: Option<String>,
    pub prompt: String,
    pub author: String,
}

/// Filters for listing documents. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentQuery {
    pub search: Option<String>,
    pub status: Option<DocumentStatus>,
    pub doc_type: Option<DocumentType>,
}

impl DocumentQuery {
    pub fn matches(&self, doc: &Document) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                doc.title.to_lowercase().contains(&needle)
                    || doc.content.to_lowercase().contains(&needle)
            }
        };
        matches_search
            && self.status.map_or(true, |s| doc.status == s)
            && self.doc_type.map_or(true, |t| doc.doc_type == t)
    }
}

//=========================================================================================
// Chat and Usage
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Illustrative counters shown on the dashboard. Not tied to billing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UsageStats {
    pub documents_created: u64,
    pub ai_generations: u64,
    pub words_generated: u64,
    pub hours_saved: u64,
}

//=========================================================================================
// Backend payloads
//=========================================================================================

/// What the generation backend hands back for a new document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDraft {
    pub title: String,
    pub content: String,
}

/// An uploaded file. Only the name drives the simulated parser.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The placeholder produced by the file-parsing backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Text,
    Html,
    Doc,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
            ExportFormat::Html => "html",
            ExportFormat::Doc => "doc",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::Text => "text/plain",
            ExportFormat::Html => "text/html",
            ExportFormat::Doc => "application/msword",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "text" | "txt" => Ok(ExportFormat::Text),
            "html" => Ok(ExportFormat::Html),
            "doc" | "docx" | "word" => Ok(ExportFormat::Doc),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(ParseEnumError {
                kind: "export format",
                value: s.to_string(),
            }),
        }
    }
}

/// A fabricated download. Nothing is really converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ExportArtifact {
    pub url: String,
    pub file_name: String,
    pub content_type: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(now: DateTime<Utc>) -> Document {
        Document::new_draft(
            "doc-1".to_string(),
            "Title".to_string(),
            DocumentType::Prd,
            "Body text".to_string(),
            "Demo User".to_string(),
            now,
        )
    }

    #[test]
    fn new_draft_starts_at_version_one() {
        let doc = sample(Utc::now());
        assert_eq!(doc.version, 1);
        assert_eq!(doc.status, DocumentStatus::Draft);
        assert_eq!(doc.created_at, doc.updated_at);
    }

    #[test]
    fn patched_merges_only_present_fields() {
        let now = Utc::now();
        let doc = sample(now);
        let patch = DocumentPatch {
            title: Some("Renamed".to_string()),
            status: Some(DocumentStatus::Review),
            ..Default::default()
        };
        let next = doc.patched(&patch, now + Duration::seconds(5));
        assert_eq!(next.title, "Renamed");
        assert_eq!(next.status, DocumentStatus::Review);
        assert_eq!(next.content, "Body text");
        assert_eq!(next.version, 2);
        assert_eq!(next.updated_at, now + Duration::seconds(5));
    }

    #[test]
    fn patched_never_moves_updated_at_backwards() {
        let now = Utc::now();
        let doc = sample(now);
        let next = doc.patched(&DocumentPatch::default(), now - Duration::hours(1));
        assert_eq!(next.updated_at, now);
    }

    #[test]
    fn session_requires_a_token() {
        let user = User {
            id: "user-1".to_string(),
            name: "A".to_string(),
            email: "a@example.com".to_string(),
            plan: Plan::Basic,
            avatar: None,
        };
        assert!(Session::new(user.clone(), "  ").is_none());
        let session = Session::new(user, "tok").unwrap();
        assert_eq!(session.token(), "tok");
    }

    #[test]
    fn plan_accepts_legacy_labels() {
        let plan: Plan = serde_json::from_str("\"pro\"").unwrap();
        assert_eq!(plan, Plan::Paid);
        let plan: Plan = serde_json::from_str("\"free\"").unwrap();
        assert_eq!(plan, Plan::Basic);
        assert_eq!(serde_json::to_string(&Plan::Basic).unwrap(), "\"basic\"");
    }

    #[test]
    fn document_type_parses_wire_names() {
        assert_eq!("tech-spec".parse::<DocumentType>().unwrap(), DocumentType::TechSpec);
        assert_eq!(" PRD ".parse::<DocumentType>().unwrap(), DocumentType::Prd);
        assert!("memo".parse::<DocumentType>().is_err());
        assert_eq!(DocumentType::DeploymentGuide.label(), "DEPLOYMENT-GUIDE");
    }

    #[test]
    fn query_filters_by_search_status_and_type() {
        let doc = sample(Utc::now());
        assert!(DocumentQuery::default().matches(&doc));
        let q = DocumentQuery {
            search: Some("BODY".to_string()),
            ..Default::default()
        };
        assert!(q.matches(&doc));
        let q = DocumentQuery {
            status: Some(DocumentStatus::Published),
            ..Default::default()
        };
        assert!(!q.matches(&doc));
        let q = DocumentQuery {
            doc_type: Some(DocumentType::Brd),
            ..Default::default()
        };
        assert!(!q.matches(&doc));
    }

    #[test]
    fn export_format_aliases() {
        assert_eq!("docx".parse::<ExportFormat>().unwrap(), ExportFormat::Doc);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert!("odt".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn word_count_splits_on_whitespace() {
        assert_eq!(word_count("one  two\nthree"), 3);
        assert_eq!(word_count(""), 0);
    }
}
