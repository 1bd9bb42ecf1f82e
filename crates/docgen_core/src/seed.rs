//! Demo data loaded into a fresh document store.

use crate::domain::{Document, DocumentStatus, DocumentType, UsageStats};
use chrono::{DateTime, TimeZone, Utc};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}

pub fn demo_documents() -> Vec<Document> {
    vec![
        Document {
            id: "doc-1".to_string(),
            title: "Mobile Banking App PRD".to_string(),
            doc_type: DocumentType::Prd,
            content: "# Product Requirements Document\n\n## Overview\nThis document outlines the requirements for a new mobile banking application...".to_string(),
            status: DocumentStatus::Published,
            created_at: at(2025, 1, 15, 10, 0),
            updated_at: at(2025, 1, 15, 14, 30),
            author: "Demo User".to_string(),
            version: 2,
            tags: tags(&["banking", "mobile", "fintech"]),
        },
        Document {
            id: "doc-2".to_string(),
            title: "API Integration BRD".to_string(),
            doc_type: DocumentType::Brd,
            content: "# Business Requirements Document\n\n## Executive Summary\nThis document defines the business requirements for API integration...".to_string(),
            status: DocumentStatus::Review,
            created_at: at(2025, 1, 14, 9, 15),
            updated_at: at(2025, 1, 14, 16, 45),
            author: "Demo User".to_string(),
            version: 1,
            tags: tags(&["api", "integration", "backend"]),
        },
        Document {
            id: "doc-3".to_string(),
            title: "User Authentication Tech Spec".to_string(),
            doc_type: DocumentType::TechSpec,
            content: "# Technical Specification\n\n## Architecture Overview\nThis specification covers the technical implementation of user authentication...".to_string(),
            status: DocumentStatus::Draft,
            created_at: at(2025, 1, 13, 11, 30),
            updated_at: at(2025, 1, 13, 11, 30),
            author: "Demo User".to_string(),
            version: 1,
            tags: tags(&["authentication", "security", "backend"]),
        },
    ]
}

pub fn demo_usage() -> UsageStats {
    UsageStats {
        documents_created: 12,
        ai_generations: 48,
        words_generated: 15420,
        hours_saved: 24,
    }
}
