use crate::models::Memory;
use crate::storage::{DocumentQuery, DocumentStore, StorageResult};
use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

/// In-memory document store for testing and development.
pub struct InMemoryDocumentStore {
    documents: DashMap<Uuid, Memory>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn matching(&self, query: &DocumentQuery) -> Vec<Memory> {
        let text = query.text.as_ref().map(|t| t.to_lowercase());

        let mut results: Vec<Memory> = self
            .documents
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .filter(|entry| match &text {
                Some(needle) => {
                    let memory = entry.value();
                    memory.title.to_lowercase().contains(needle)
                        || memory.content.to_lowercase().contains(needle)
                }
                None => true,
            })
            .map(|entry| entry.value().clone())
            .collect();

        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        results
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(&self, memory: Memory) -> StorageResult<()> {
        self.documents.insert(memory.id, memory);
        Ok(())
    }

    async fn fetch(&self, organization_id: Uuid, id: Uuid) -> StorageResult<Option<Memory>> {
        Ok(self
            .documents
            .get(&id)
            .filter(|entry| entry.value().organization_id == organization_id)
            .map(|entry| entry.value().clone()))
    }

    async fn update(&self, memory: Memory) -> StorageResult<()> {
        self.documents.insert(memory.id, memory);
        Ok(())
    }

    async fn remove(&self, organization_id: Uuid, id: Uuid) -> StorageResult<bool> {
        let removed = self
            .documents
            .remove_if(&id, |_, memory| memory.organization_id == organization_id);
        Ok(removed.is_some())
    }

    async fn query(&self, query: &DocumentQuery) -> StorageResult<Vec<Memory>> {
        let results = self.matching(query);

        let offset = query.offset as usize;
        let windowed: Vec<Memory> = match query.limit {
            Some(limit) => results.into_iter().skip(offset).take(limit as usize).collect(),
            None => results.into_iter().skip(offset).collect(),
        };

        Ok(windowed)
    }

    async fn count(&self, query: &DocumentQuery) -> StorageResult<u64> {
        Ok(self.matching(query).len() as u64)
    }
}
