// installs the JSON subscriber used by the catalog binary, the Lambda runtime adds timestamps
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // ANSI color codes show up as garbage in CloudWatch logs.
        .with_ansi(false)
        .without_time()
        .json()
        .init();
}
