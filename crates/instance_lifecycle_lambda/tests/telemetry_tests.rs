use instance_lifecycle_lambda::telemetry::init_logging;

#[test]
fn init_logging_installs_the_global_subscriber() {
    assert!(!tracing::dispatcher::has_been_set());

    init_logging();

    assert!(tracing::dispatcher::has_been_set());
    tracing::info!(instance_id = "i-1", "logging ready");
}
