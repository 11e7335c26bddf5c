use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryResult, PaginatedResult};

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // create an entity
    async fn create(&self, entity: &Entity) -> LibraryResult<usize>;

    // get an entity, None when nothing is stored under the id
    async fn get(&self, id: &str) -> LibraryResult<Option<Entity>>;

    // delete an entity, deleting a missing id is not an error
    async fn delete(&self, id: &str) -> LibraryResult<usize>;

    // scan a page of entities
    async fn scan(&self, page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<Entity>>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    DynamoDB,
    LocalDynamoDB,
    Memory,
}
