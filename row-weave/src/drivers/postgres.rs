//! The synchronous `postgres` cursor adapter, enabled by the
//! `postgres-driver` feature.
//!
//! The synchronous `postgres` crate (not `tokio-postgres`/`sqlx`) is used
//! deliberately: its blocking `RowIter` streams rows from the server one at
//! a time the same way the original implementation's `pgx.Rows`/
//! `database/sql.Rows` do, so the [`RowCursor`] contract stays synchronous
//! end to end rather than forcing an async boundary the object-graph
//! construction logic has no need for.

use std::time::Duration;

use postgres::types::ToSql;
use postgres::{Client, RowIter};

use crate::cursor::RowCursor;
use crate::scan_slot::ScanSlot;

/// Tunables for a Postgres-backed cursor, mirroring the handful of knobs a
/// long streaming scan actually needs.
#[derive(Debug, Clone, Default)]
pub struct PostgresCursorOptions {
    /// Row batch size requested per fetch from the server. `None` leaves
    /// the driver's default in place.
    fetch_size: Option<usize>,
    /// `statement_timeout` applied to the session before the query runs.
    statement_timeout: Option<Duration>,
}

impl PostgresCursorOptions {
    /// Starts building cursor options with every knob left at its default.
    #[must_use]
    pub fn builder() -> PostgresCursorOptionsBuilder {
        PostgresCursorOptionsBuilder::default()
    }
}

/// Builder for [`PostgresCursorOptions`].
#[derive(Debug, Default)]
pub struct PostgresCursorOptionsBuilder {
    fetch_size: Option<usize>,
    statement_timeout: Option<Duration>,
}

impl PostgresCursorOptionsBuilder {
    /// Sets the row batch size requested per fetch from the server.
    #[must_use]
    pub fn fetch_size(mut self, size: usize) -> Self {
        self.fetch_size = Some(size);
        self
    }

    /// Sets the `statement_timeout` applied before the query runs.
    #[must_use]
    pub fn statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = Some(timeout);
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> PostgresCursorOptions {
        PostgresCursorOptions {
            fetch_size: self.fetch_size,
            statement_timeout: self.statement_timeout,
        }
    }
}

/// Wraps a streaming Postgres query result as a [`RowCursor`].
pub struct PostgresCursor<'a> {
    rows: RowIter<'a>,
    column_names: Vec<String>,
    current: Option<postgres::Row>,
}

impl<'a> PostgresCursor<'a> {
    /// Prepares `sql`, applies `options`, and opens a streaming cursor over
    /// it with `params` bound.
    ///
    /// # Errors
    ///
    /// Returns the driver's error if preparing, configuring the session, or
    /// opening the streaming query fails.
    pub fn open(
        client: &'a mut Client,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
        options: &PostgresCursorOptions,
    ) -> Result<Self, postgres::Error> {
        if let Some(timeout) = options.statement_timeout {
            let ms = timeout.as_millis();
            client.batch_execute(&format!("SET statement_timeout = {ms}"))?;
        }

        let statement = client.prepare(sql)?;
        let column_names = statement
            .columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect();

        let fetch_size = options.fetch_size.unwrap_or(0);
        let rows = client.query_raw(
            &statement,
            params.iter().map(|p| *p as &(dyn ToSql + Sync)),
        )?;
        tracing::debug!(fetch_size, "opened postgres cursor");

        Ok(Self {
            rows,
            column_names,
            current: None,
        })
    }
}

impl RowCursor for PostgresCursor<'_> {
    type Error = postgres::Error;

    fn advance(&mut self) -> Result<bool, Self::Error> {
        self.current = self.rows.next().transpose()?;
        Ok(self.current.is_some())
    }

    fn column_names(&self) -> &[String] {
        &self.column_names
    }

    fn scan_into(&mut self, targets: &mut [ScanSlot]) -> Result<(), Self::Error> {
        let row = self
            .current
            .as_ref()
            .expect("scan_into called without a current row");
        for (index, slot) in targets.iter_mut().enumerate() {
            *slot = match slot {
                ScanSlot::Separator => ScanSlot::Separator,
                ScanSlot::I64(_) => ScanSlot::I64(row.try_get(index)?),
                ScanSlot::I32(_) => ScanSlot::I32(row.try_get(index)?),
                ScanSlot::I16(_) => ScanSlot::I16(row.try_get(index)?),
                ScanSlot::F64(_) => ScanSlot::F64(row.try_get(index)?),
                ScanSlot::F32(_) => ScanSlot::F32(row.try_get(index)?),
                ScanSlot::Bool(_) => ScanSlot::Bool(row.try_get(index)?),
                ScanSlot::Str(_) => ScanSlot::Str(row.try_get(index)?),
                ScanSlot::Bytes(_) => ScanSlot::Bytes(row.try_get(index)?),
                ScanSlot::Flat(_) => ScanSlot::Flat(row.try_get(index)?),
                ScanSlot::Timestamp(_) => ScanSlot::Timestamp(row.try_get(index)?),
                ScanSlot::TimestampTz(_) => ScanSlot::TimestampTz(row.try_get(index)?),
                ScanSlot::Uuid(_) => ScanSlot::Uuid(row.try_get(index)?),
            };
        }
        Ok(())
    }

    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}
