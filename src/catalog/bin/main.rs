include!("../../lib.rs");
use std::sync::Arc;
use lambda_http::{run, Body, Error};
use crate::catalog::controller::catalog_router;
use crate::catalog::factory;
use crate::core::auth::TokenAuthenticator;
use crate::core::controller::AppState;
use crate::core::domain::Configuration;
use crate::uploads::DiskUploadHandler;
use crate::utils::logs::setup_tracing;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let config = Configuration::load().map_err(|err| err.to_string())?;
    if config.dev_mode {
        std::env::set_var("AWS_LAMBDA_FUNCTION_NAME", "_");
        std::env::set_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "4096");
        std::env::set_var("AWS_LAMBDA_FUNCTION_VERSION", "1");
        std::env::set_var("AWS_LAMBDA_RUNTIME_API", "http://[::]:9000/.rt");
    }
    tracing::info!("starting catalog with {:?} store", config.store);

    let catalog = Arc::from(factory::create_catalog_service(&config).await);
    let uploads = Arc::new(DiskUploadHandler::new(config.upload_dir.as_str(), config.upload_prefix.as_str()));
    let auth = Arc::new(TokenAuthenticator::new(config.auth_token.clone()));
    let state = AppState::new(config, catalog, uploads, auth);

    run(catalog_router::<Body>(state)).await
}
