use crate::adapter::clickhouse::row::UsageRow;
use crate::adapter::clickhouse::schema::ColumnSchema;
use crate::domain::LogEvent;
use crate::error::SinkError;
use crate::port::Sink;
use clickhouse::Client;
use std::time::Duration;

// ClickHouse inserter configuration constants
const INSERTER_SEND_TIMEOUT: Duration = Duration::from_secs(10);
const INSERTER_END_TIMEOUT: Duration = Duration::from_secs(10);
const INSERTER_MAX_BYTES: u64 = 50_000_000;
const INSERTER_MAX_ROWS: u64 = 1000;

/// Structured usage sink writing one row per event.
///
/// Each write runs through a fresh inserter that is ended before the write
/// returns, so `Ok` means the row reached the server and nothing lingers in
/// a buffer the sink would drop on shutdown.
pub struct ClickHouseSink {
    client: Client,
    table: String,
    schema: ColumnSchema,
}

impl ClickHouseSink {
    #[must_use]
    pub fn new(client: Client, table: String, schema: ColumnSchema) -> Self {
        Self {
            client,
            table,
            schema,
        }
    }

    /// Create a configured inserter for the usage table
    fn create_inserter(
        &self,
    ) -> Result<clickhouse::inserter::Inserter<UsageRow>, clickhouse::error::Error> {
        Ok(self
            .client
            .inserter::<UsageRow>(&self.table)?
            .with_timeouts(Some(INSERTER_SEND_TIMEOUT), Some(INSERTER_END_TIMEOUT))
            .with_max_bytes(INSERTER_MAX_BYTES)
            .with_max_rows(INSERTER_MAX_ROWS))
    }

    /// Creates the usage table from the declared column schema if it does
    /// not exist yet.
    pub async fn ensure_table(&self) -> Result<(), SinkError> {
        let ddl = self.schema.create_table_ddl(&self.table);
        self.client.query(&ddl).execute().await?;
        Ok(())
    }
}

impl Sink for ClickHouseSink {
    fn write(
        &self,
        event: LogEvent,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), SinkError>> + Send + '_>>
    {
        Box::pin(async move {
            let row = UsageRow::from_event(&event, &self.schema);
            let mut inserter = self.create_inserter()?;
            inserter.write(&row)?;
            inserter.end().await?;
            Ok(())
        })
    }
}
