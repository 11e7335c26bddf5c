pub mod service;

use async_trait::async_trait;
use crate::books::domain::model::BookChanges;
use crate::books::dto::BookDto;
use crate::core::library::LibraryResult;

#[async_trait]
pub(crate) trait CatalogService: Sync + Send {
    async fn list_books(&self) -> LibraryResult<Vec<BookDto>>;
    async fn add_book(&self, changes: &BookChanges) -> LibraryResult<BookDto>;
    async fn remove_book(&self, id: &str) -> LibraryResult<()>;
    async fn update_book(&self, id: &str, changes: &BookChanges) -> LibraryResult<()>;
    async fn find_book_by_id(&self, id: &str) -> LibraryResult<Option<BookDto>>;
}
