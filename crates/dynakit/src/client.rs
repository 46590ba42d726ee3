//! AWS SDK client setup and the process-wide shared client.

use aws_sdk_dynamodb::Client;
use tokio::sync::OnceCell;

use crate::config::ClientConfig;

static CLIENT: OnceCell<Client> = OnceCell::const_new();

/// Creates a DynamoDB client with the given configuration.
pub async fn create_client(config: &ClientConfig) -> Client {
    let mut sdk_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
    }

    let sdk_config = sdk_config_loader.load().await;
    Client::new(&sdk_config)
}

/// Returns the shared client, creating it on the first call.
///
/// Concurrent first callers wait on a single initialization. Once created the
/// client lives for the rest of the process, and `config` is ignored by every
/// later call.
pub async fn connect(config: &ClientConfig) -> &'static Client {
    CLIENT
        .get_or_init(|| async {
            tracing::info!(endpoint = %config.target_display(), "Creating DynamoDB client");
            create_client(config).await
        })
        .await
}
