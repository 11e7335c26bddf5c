use std::collections::BTreeMap;
use std::ops::Bound;
use async_trait::async_trait;
use tokio::sync::RwLock;
use crate::books::domain::model::{BookChanges, BookEntity};
use crate::books::repository::BookRepository;
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;

// MemoryBookRepository keeps books in process, used for local runs and tests
#[derive(Debug, Default)]
pub struct MemoryBookRepository {
    books: RwLock<BTreeMap<String, BookEntity>>,
}

impl MemoryBookRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<BookEntity> for MemoryBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let mut books = self.books.write().await;
        if books.contains_key(&entity.id()) {
            return Err(LibraryError::database(
                format!("book already exists {}", entity.book_id).as_str(), None, false));
        }
        books.insert(entity.id(), entity.clone());
        Ok(1)
    }

    async fn get(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        Ok(self.books.read().await.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        Ok(self.books.write().await.remove(id).map_or(0, |_| 1))
    }

    async fn scan(&self, page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let books = self.books.read().await;
        let start = page.map_or(Bound::Unbounded, |p| Bound::Excluded(p.to_string()));
        let mut remaining = books.range((start, Bound::Unbounded)).map(|(_, b)| b);
        let records: Vec<BookEntity> = remaining.by_ref().take(page_size).cloned().collect();
        let next_page = match (remaining.next(), records.last()) {
            (Some(_), Some(last)) => Some(last.book_id.to_string()),
            _ => None,
        };
        Ok(PaginatedResult::new(page, page_size, next_page, records))
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn update(&self, id: &str, changes: &BookChanges) -> LibraryResult<usize> {
        let mut books = self.books.write().await;
        match books.get_mut(id) {
            Some(book) => {
                changes.apply(book);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
