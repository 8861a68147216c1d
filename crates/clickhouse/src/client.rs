//! ClickHouse client wrapper.

use crate::config::ClickHouseConfig;
use clickhouse::Client;
use tracing::info;

/// ClickHouse client bound to the configured database.
#[derive(Clone)]
pub struct ClickHouseClient {
    inner: Client,
    config: ClickHouseConfig,
}

impl ClickHouseClient {
    pub fn new(config: ClickHouseConfig) -> Self {
        let inner = base_client(&config)
            .with_database(&config.database)
            // Deletes return only after the mutation is applied.
            .with_option("mutations_sync", "1");

        info!(
            url = %config.url,
            database = %config.database,
            "Created ClickHouse client"
        );

        Self { inner, config }
    }

    /// Client without a default database, for `CREATE DATABASE`.
    pub fn server(&self) -> Client {
        base_client(&self.config)
    }

    pub fn inner(&self) -> &Client {
        &self.inner
    }

    pub fn config(&self) -> &ClickHouseConfig {
        &self.config
    }
}

fn base_client(config: &ClickHouseConfig) -> Client {
    let mut client = Client::default().with_url(&config.url);

    if let Some(ref user) = config.username {
        client = client.with_user(user);
    }

    if let Some(ref pass) = config.password {
        client = client.with_password(pass);
    }

    client
}
