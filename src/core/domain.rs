use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;

// the only writable directory inside the Lambda runtime
const LAMBDA_WRITABLE_DIR: &str = "/tmp";

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable : Sync + Send {
    fn id(&self) -> String;
}

// Configuration abstracts config options for the catalog service. It is built once at
// startup and handed to every factory.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub store: RepositoryStore,
    pub books_table: String,
    pub ddb_endpoint: Option<String>,
    // filesystem directory that receives uploaded images
    pub upload_dir: String,
    // web path under which upload_dir is served
    pub upload_prefix: String,
    // shared secret accepted by the token authenticator, nobody is logged in without it
    pub auth_token: Option<String>,
    pub max_upload_bytes: usize,
    pub page_size: usize,
    pub dev_mode: bool,
}

impl Configuration {
    pub fn new(store: RepositoryStore) -> Self {
        Configuration {
            store,
            books_table: "books".to_string(),
            ddb_endpoint: Some("http://localhost:8000".to_string()),
            upload_dir: "public/images/uploads".to_string(),
            upload_prefix: "/images/uploads".to_string(),
            auth_token: None,
            max_upload_bytes: 10 * 1024 * 1024,
            page_size: 100,
            dev_mode: false,
        }
    }

    // loads defaults, then config/catalog.*, then CATALOG_* environment variables
    pub fn load() -> LibraryResult<Self> {
        let _ = dotenvy::dotenv();
        let defaults = Configuration::new(RepositoryStore::Memory);
        let config = config::Config::builder()
            .set_default("store", "Memory")?
            .set_default("books_table", defaults.books_table)?
            .set_default("upload_dir", defaults.upload_dir)?
            .set_default("upload_prefix", defaults.upload_prefix)?
            .set_default("max_upload_bytes", defaults.max_upload_bytes as u64)?
            .set_default("page_size", defaults.page_size as u64)?
            .set_default("dev_mode", defaults.dev_mode)?
            .add_source(config::File::with_name("config/catalog").required(false))
            .add_source(config::Environment::with_prefix("CATALOG").try_parsing(true))
            .build()?;
        let mut config: Configuration = config.try_deserialize()?;
        config.upload_dir = writable_upload_dir(config.dev_mode, config.upload_dir.as_str());
        Ok(config)
    }
}

// outside dev mode the working directory is read-only, so relative upload dirs are rooted
// under /tmp. Absolute dirs (CATALOG_UPLOAD_DIR) are used as configured.
pub(crate) fn writable_upload_dir(dev_mode: bool, upload_dir: &str) -> String {
    if dev_mode || Path::new(upload_dir).is_absolute() {
        return upload_dir.to_string();
    }
    Path::new(LAMBDA_WRITABLE_DIR).join(upload_dir).to_string_lossy().to_string()
}
