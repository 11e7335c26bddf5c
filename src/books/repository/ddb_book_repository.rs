use std::cmp;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;

use crate::books::domain::model::{BookChanges, BookEntity};
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::ddb::{date_attribute, date_value, float_attribute, parse_item, string_attribute, to_page, to_start_key, Item};

pub(crate) const BOOK_KEY: &str = "book_id";

// DynamoDB stops a scan page at 1MB whatever the limit
const MAX_SCAN_LIMIT: usize = 500;

#[derive(Debug)]
pub struct DDBBookRepository {
    client: Client,
    table_name: String,
}

impl DDBBookRepository {
    pub(crate) fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }

    fn key(id: &str) -> AttributeValue {
        AttributeValue::S(id.to_string())
    }
}

#[async_trait]
impl Repository<BookEntity> for DDBBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let item = parse_item(serde_json::to_value(entity)?)?;
        self.client
            .put_item()
            .table_name(self.table_name.as_str())
            .condition_expression("attribute_not_exists(book_id)")
            .set_item(Some(item))
            .send()
            .await?;
        Ok(1)
    }

    async fn get(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        let res = self.client
            .get_item()
            .table_name(self.table_name.as_str())
            .consistent_read(true)
            .key(BOOK_KEY, Self::key(id))
            .send()
            .await?;
        Ok(res.item().map(to_book))
    }

    // unconditional, a missing item is not an error
    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.client
            .delete_item()
            .table_name(self.table_name.as_str())
            .key(BOOK_KEY, Self::key(id))
            .send()
            .await?;
        Ok(1)
    }

    async fn scan(&self, page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let res = self.client
            .scan()
            .table_name(self.table_name.as_str())
            .set_exclusive_start_key(to_start_key(BOOK_KEY, page))
            .limit(cmp::min(page_size, MAX_SCAN_LIMIT) as i32)
            .send()
            .await?;
        let records = res.items().unwrap_or_default().iter().map(to_book).collect();
        Ok(to_page(BOOK_KEY, page, page_size, res.last_evaluated_key(), records))
    }
}

#[async_trait]
impl BookRepository for DDBBookRepository {
    // Note year and file are reserved words per https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/ReservedWords.html
    async fn update(&self, id: &str, changes: &BookChanges) -> LibraryResult<usize> {
        let mut assignments = vec!["#title = :title", "#author = :author", "#price = :price", "#year = :year", "updated_at = :updated_at"];
        let mut request = self.client
            .update_item()
            .table_name(self.table_name.as_str())
            .key(BOOK_KEY, Self::key(id))
            .condition_expression("attribute_exists(book_id)")
            .expression_attribute_names("#title", "title")
            .expression_attribute_names("#author", "author")
            .expression_attribute_names("#price", "price")
            .expression_attribute_names("#year", "year")
            .expression_attribute_values(":title", AttributeValue::S(changes.title.to_string()))
            .expression_attribute_values(":author", AttributeValue::S(changes.author.to_string()))
            .expression_attribute_values(":price", AttributeValue::N(changes.price.to_string()))
            .expression_attribute_values(":year", AttributeValue::S(changes.year.to_string()))
            .expression_attribute_values(":updated_at", date_value(Utc::now().naive_utc()));
        // without a new upload the stored file reference is not touched
        if let Some(file) = &changes.file {
            assignments.push("#file = :file");
            request = request
                .expression_attribute_names("#file", "file")
                .expression_attribute_values(":file", AttributeValue::S(file.to_string()));
        }

        match request.update_expression(format!("SET {}", assignments.join(", "))).send().await {
            Ok(_) => Ok(1),
            Err(SdkError::ServiceError(ctx)) if ctx.err().is_conditional_check_failed_exception() => Ok(0),
            Err(err) => Err(LibraryError::from(err)),
        }
    }
}

fn to_book(item: &Item) -> BookEntity {
    let text = |name: &str| string_attribute(item, name).unwrap_or_default();
    let now = Utc::now().naive_utc();
    BookEntity {
        book_id: text("book_id"),
        title: text("title"),
        author: text("author"),
        price: float_attribute(item, "price").unwrap_or_default(),
        year: text("year"),
        file: text("file"),
        created_at: date_attribute(item, "created_at").unwrap_or(now),
        updated_at: date_attribute(item, "updated_at").unwrap_or(now),
    }
}
