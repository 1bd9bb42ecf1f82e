//! crates/docgen_core/src/analytics.rs
//!
//! Aggregates shown on the dashboard and analytics views.

use crate::document_state::DocumentState;
use crate::domain::{Document, DocumentStatus, DocumentType, Plan, UsageStats};
use serde::Serialize;
use std::collections::BTreeMap;

/// How many documents the dashboard lists as "recent".
pub const RECENT_DOCUMENTS: usize = 5;

/// Reported limits per plan. `None` means unlimited. Nothing enforces these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PlanQuota {
    pub generations: Option<u64>,
    pub documents: Option<u64>,
}

impl PlanQuota {
    pub fn for_plan(plan: Plan) -> Self {
        match plan {
            Plan::Basic => PlanQuota {
                generations: Some(100),
                documents: Some(50),
            },
            Plan::Paid => PlanQuota {
                generations: Some(1000),
                documents: Some(500),
            },
            Plan::Enterprise => PlanQuota {
                generations: None,
                documents: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct QuotaUsage {
    pub plan: Plan,
    pub generations_used: u64,
    pub generations_limit: Option<u64>,
    pub documents_used: u64,
    pub documents_limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Analytics {
    pub total_documents: usize,
    pub by_type: BTreeMap<DocumentType, usize>,
    pub by_status: BTreeMap<DocumentStatus, usize>,
    pub recent: Vec<Document>,
    pub usage: UsageStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<QuotaUsage>,
}

/// Summarizes `state`. Quota usage is only reported when a plan is known.
pub fn summarize(state: &DocumentState, plan: Option<Plan>) -> Analytics {
    let mut by_type = BTreeMap::new();
    let mut by_status = BTreeMap::new();
    for doc in &state.documents {
        *by_type.entry(doc.doc_type).or_insert(0) += 1;
        *by_status.entry(doc.status).or_insert(0) += 1;
    }

    let quota = plan.map(|plan| {
        let limits = PlanQuota::for_plan(plan);
        QuotaUsage {
            plan,
            generations_used: state.usage_stats.ai_generations,
            generations_limit: limits.generations,
            documents_used: state.documents.len() as u64,
            documents_limit: limits.documents,
        }
    });

    Analytics {
        total_documents: state.documents.len(),
        by_type,
        by_status,
        recent: state.documents.iter().take(RECENT_DOCUMENTS).cloned().collect(),
        usage: state.usage_stats,
        quota,
    }
}
