//! Typed query filters for the document store
//!
//! The store boundary takes a small, closed set of operators (equals,
//! in-set, or-of-filters) instead of opaque nested maps, so the
//! facade/store contract stays stable and testable.

use crate::models::Memory;
use std::collections::HashSet;
use uuid::Uuid;

/// A single filter condition. A query holds a conjunction of these.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Document belongs to the organization.
    OrganizationEquals(Uuid),
    /// Document id is in the set. An empty set matches nothing.
    IdIn(HashSet<Uuid>),
    /// Document type tag equals the value.
    TypeEquals(String),
    /// Document carries at least one of the tags.
    TagIn(Vec<String>),
    /// Document public-visibility flag equals the value.
    IsPublic(bool),
    /// Logical OR: at least one inner condition matches.
    AnyOf(Vec<Condition>),
}

impl Condition {
    /// Evaluate the condition against a document.
    pub fn matches(&self, memory: &Memory) -> bool {
        match self {
            Condition::OrganizationEquals(org) => memory.organization_id == *org,
            Condition::IdIn(ids) => ids.contains(&memory.id),
            Condition::TypeEquals(type_tag) => memory.memory_type == *type_tag,
            Condition::TagIn(tags) => tags.iter().any(|tag| memory.tags.contains(tag)),
            Condition::IsPublic(flag) => memory.is_public == *flag,
            Condition::AnyOf(inner) => inner.iter().any(|condition| condition.matches(memory)),
        }
    }
}

/// Query against the document store: a conjunction of conditions plus an
/// optional free-text match and a result window.
#[derive(Debug, Clone)]
pub struct DocumentQuery {
    conditions: Vec<Condition>,
    pub text: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl DocumentQuery {
    /// Start a query scoped to one organization. Every store query is
    /// organization-scoped; there is no constructor without one.
    pub fn for_organization(organization_id: Uuid) -> Self {
        Self {
            conditions: vec![Condition::OrganizationEquals(organization_id)],
            text: None,
            limit: None,
            offset: 0,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Evaluate all conditions (conjunction) against a document. The
    /// free-text match is evaluated separately by the store.
    pub fn matches(&self, memory: &Memory) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.matches(memory))
    }
}
