pub mod ddb_book_repository;
pub mod memory_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::{BookChanges, BookEntity};
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;

#[async_trait]
pub(crate) trait BookRepository: Repository<BookEntity> {
    // writes the changed fields of an existing book, returns 0 when the id is unknown
    async fn update(&self, id: &str, changes: &BookChanges) -> LibraryResult<usize>;

    // loads every book, newest first
    async fn find_all(&self, page_size: usize) -> LibraryResult<Vec<BookEntity>> {
        let mut books = vec![];
        let mut next_page: Option<String> = None;
        loop {
            let res = self.scan(next_page.as_deref(), page_size.max(1)).await?;
            books.extend(res.records);
            next_page = res.next_page;
            if next_page.is_none() {
                break;
            }
        }
        books.sort_by(|a, b| b.book_id.cmp(&a.book_id));
        Ok(books)
    }
}
