//! Service layer sitting between handlers and external collaborators

pub mod memory_service;

pub use memory_service::{ListMemoriesInput, MemoryService, MEMORY_RESOURCE_TYPE};
