use std::collections::HashMap;
use std::fmt::Debug;
use std::time::Duration;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::{AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType, TableStatus};
use chrono::NaiveDateTime;
use serde_json::Value;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::RepositoryStore;
use crate::utils::date::DATE_FMT;

pub(crate) type Item = HashMap<String, AttributeValue>;

const LOCAL_ENDPOINT: &str = "http://localhost:8000";
const TABLE_STATUS_POLLS: usize = 30;

// creates an on-demand table keyed by a single string hash key and waits until it is usable
pub(crate) async fn create_table(client: &Client, table_name: &str, pk: &str) -> LibraryResult<()> {
    client
        .create_table()
        .table_name(table_name)
        .key_schema(KeySchemaElement::builder()
            .attribute_name(pk)
            .key_type(KeyType::Hash)
            .build())
        .attribute_definitions(AttributeDefinition::builder()
            .attribute_name(pk)
            .attribute_type(ScalarAttributeType::S)
            .build())
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .map_err(LibraryError::from)?;
    wait_while_table_is(client, table_name, TableStatus::Creating).await;
    Ok(())
}

pub(crate) async fn delete_table(client: &Client, table_name: &str) -> LibraryResult<()> {
    client.delete_table().table_name(table_name).send().await.map_err(LibraryError::from)?;
    wait_while_table_is(client, table_name, TableStatus::Deleting).await;
    Ok(())
}

async fn wait_while_table_is(client: &Client, table_name: &str, transient: TableStatus) {
    for _ in 0..TABLE_STATUS_POLLS {
        match table_status(client, table_name).await {
            Ok(status) if status != transient => return,
            // a deleted table no longer describes
            Err(_) if transient == TableStatus::Deleting => return,
            _ => tokio::time::sleep(Duration::from_secs(1)).await,
        }
    }
}

async fn table_status(client: &Client, table_name: &str) -> LibraryResult<TableStatus> {
    let out = client.describe_table().table_name(table_name).send().await.map_err(LibraryError::from)?;
    out.table()
        .and_then(|table| table.table_status())
        .cloned()
        .ok_or_else(|| LibraryError::runtime(format!("table {} has no status", table_name).as_str(), None))
}

// converts a serialized entity into a DynamoDB item
pub(crate) fn parse_item(value: Value) -> Result<Item, String> {
    match value_to_item(value) {
        AttributeValue::M(map) => Ok(map),
        other => Err(format!("expected an object but got {:?}", other)),
    }
}

fn value_to_item(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(a) => AttributeValue::L(a.into_iter().map(value_to_item).collect()),
        Value::Object(o) => AttributeValue::M(o.into_iter().map(|(k, v)| (k, value_to_item(v))).collect()),
    }
}

pub(crate) fn string_attribute(item: &Item, name: &str) -> Option<String> {
    item.get(name).and_then(|v| v.as_s().ok()).cloned()
}

pub(crate) fn float_attribute(item: &Item, name: &str) -> Option<f64> {
    item.get(name).and_then(|v| v.as_n().ok()).and_then(|n| n.parse::<f64>().ok())
}

pub(crate) fn date_attribute(item: &Item, name: &str) -> Option<NaiveDateTime> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .and_then(|s| NaiveDateTime::parse_from_str(s, DATE_FMT).ok())
}

pub(crate) fn date_value(date: NaiveDateTime) -> AttributeValue {
    AttributeValue::S(date.format(DATE_FMT).to_string())
}

// page tokens are the hash key of the last item returned, matching the in-memory store
pub(crate) fn to_start_key(pk: &str, page: Option<&str>) -> Option<Item> {
    page.map(|id| HashMap::from([(pk.to_string(), AttributeValue::S(id.to_string()))]))
}

pub(crate) fn to_page<T>(pk: &str, page: Option<&str>, page_size: usize,
                         last_evaluated_key: Option<&Item>, records: Vec<T>) -> PaginatedResult<T> {
    let next_page = last_evaluated_key.and_then(|key| string_attribute(key, pk));
    PaginatedResult::new(page, page_size, next_page, records)
}

pub(crate) async fn build_db_client(config: &Configuration) -> Client {
    match config.store {
        RepositoryStore::LocalDynamoDB => {
            // See https://docs.aws.amazon.com/sdk-for-rust/latest/dg/dynamodb-local.html
            let endpoint = config.ddb_endpoint.clone().unwrap_or_else(|| LOCAL_ENDPOINT.to_string());
            let local = aws_sdk_dynamodb::Config::builder()
                .region(Region::new("local"))
                .credentials_provider(Credentials::new("AKIDLOCAL", "localsecret", None, None, "faked"))
                .endpoint_url(endpoint)
                .build();
            Client::from_conf(local)
        }
        _ => Client::new(&aws_config::load_from_env().await),
    }
}

impl<E: Debug> From<SdkError<E>> for LibraryError {
    fn from(err: SdkError<E>) -> Self {
        let (retryable, reason) = classify_sdk_error(&err);
        LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
    }
}

fn classify_sdk_error<E>(err: &SdkError<E>) -> (bool, Option<String>) {
    match err {
        SdkError::ConstructionFailure(_) => (false, Some("ConstructionFailure".to_string())),
        SdkError::TimeoutError(_) => (true, Some("TimeoutError".to_string())),
        SdkError::DispatchFailure(_) => (true, Some("DispatchFailure".to_string())),
        SdkError::ResponseError(_) => (true, Some("ResponseError".to_string())),
        SdkError::ServiceError(ctx) => {
            let http = ctx.raw().http();
            let retryable = http.status().is_server_error() || has_exceeded_limit(http.body().bytes());
            (retryable, Some(http.status().to_string()))
        }
        _ => (true, Some("Unknown".to_string())),
    }
}

// throughput errors read "...exceeded..." in the body
fn has_exceeded_limit(body: Option<&[u8]>) -> bool {
    body.map_or(false, |b| b.windows(8).any(|w| w.eq_ignore_ascii_case(b"exceeded")))
}
