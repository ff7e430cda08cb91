//! Read-only provider over the fitness record database.
//!
//! Reads the tables the collector writes:
//! - `StepsRecords(time INTEGER unix seconds, steps REAL)`
//! - `HeartRateRecords(time INTEGER unix seconds, heartRate REAL)`
//! - `WeightRecords(date DATE, weight REAL)`
//!
//! The database is opened read-only; creating or migrating tables is the
//! collector's job.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use rusqlite::{params, Connection, OpenFlags};

use super::{DataProvider, ProviderError};
use crate::models::{local_midnight, DayWindow, HourlySteps, Metric, Sample};

const HOUR_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed [`DataProvider`].
pub struct SqliteProvider {
    conn: Mutex<Connection>,
}

impl SqliteProvider {
    /// Open an existing database read-only.
    pub fn open(path: &Path) -> Result<Self, ProviderError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| ProviderError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already-open connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, ProviderError> {
        self.conn
            .lock()
            .map_err(|_| ProviderError::Unavailable("connection lock poisoned".to_string()))
    }

    fn heart_rate(
        &self,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Vec<Sample>, ProviderError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT time, heartRate FROM HeartRateRecords
             WHERE time >= ?1 AND time < ?2
             ORDER BY time ASC",
        )?;
        let rows = stmt.query_map(params![start.timestamp(), end.timestamp()], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut samples = Vec::new();
        for row in rows {
            let (secs, value) = row?;
            let timestamp = Local
                .timestamp_opt(secs, 0)
                .single()
                .ok_or_else(|| ProviderError::Malformed {
                    field: "HeartRateRecords.time",
                    value: secs.to_string(),
                })?;
            samples.push(Sample::new(timestamp, value));
        }
        Ok(samples)
    }

    fn weight(
        &self,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Vec<Sample>, ProviderError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT date(date) AS day, weight FROM WeightRecords
             WHERE date(date) >= ?1 AND date(date) < ?2
             ORDER BY day ASC",
        )?;
        let from = start.date_naive().format(DATE_FORMAT).to_string();
        let to = end.date_naive().format(DATE_FORMAT).to_string();
        let rows = stmt.query_map(params![from, to], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut samples = Vec::new();
        for row in rows {
            let (day, value) = row?;
            let date = NaiveDate::parse_from_str(&day, DATE_FORMAT).map_err(|_| {
                ProviderError::Malformed {
                    field: "WeightRecords.date",
                    value: day.clone(),
                }
            })?;
            samples.push(Sample::new(local_midnight(date), value));
        }
        Ok(samples)
    }
}

impl DataProvider for SqliteProvider {
    fn query_hourly_steps(
        &self,
        day_start: i32,
        day_end: i32,
    ) -> Result<Vec<HourlySteps>, ProviderError> {
        self.query_hourly_steps_on(Local::now().date_naive(), day_start, day_end)
    }

    fn query_hourly_steps_on(
        &self,
        today: NaiveDate,
        day_start: i32,
        day_end: i32,
    ) -> Result<Vec<HourlySteps>, ProviderError> {
        let (start, end) = DayWindow::new(day_start, day_end).bounds(today);
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT strftime('%Y-%m-%d %H:00:00', time, 'unixepoch', 'localtime') AS hour,
                    SUM(steps) AS step_sum
             FROM StepsRecords
             WHERE time >= ?1 AND time < ?2
             GROUP BY hour
             ORDER BY hour ASC",
        )?;
        let rows = stmt.query_map(params![start.timestamp(), end.timestamp()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut hours = Vec::new();
        for row in rows {
            let (hour, steps) = row?;
            let hour = NaiveDateTime::parse_from_str(&hour, HOUR_FORMAT).map_err(|_| {
                ProviderError::Malformed {
                    field: "StepsRecords.time",
                    value: hour.clone(),
                }
            })?;
            hours.push(HourlySteps { hour, steps });
        }
        Ok(hours)
    }

    fn query_raw_series(
        &self,
        metric: Metric,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Vec<Sample>, ProviderError> {
        match metric {
            Metric::HeartRate => self.heart_rate(start, end),
            Metric::Weight => self.weight(start, end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::local_at;
    use chrono::Timelike;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 12).unwrap()
    }

    fn at(date: NaiveDate, hour: u32, minute: u32) -> i64 {
        local_at(date.and_hms_opt(hour, minute, 0).unwrap()).timestamp()
    }

    /// Tables as the collector creates them.
    fn create_tables(conn: &Connection) {
        conn.execute_batch(
            "CREATE TABLE StepsRecords (time INTEGER PRIMARY KEY, steps REAL);
             CREATE TABLE HeartRateRecords (time INTEGER PRIMARY KEY, heartRate REAL);
             CREATE TABLE WeightRecords (id INTEGER PRIMARY KEY, date DATE, weight REAL);",
        )
        .unwrap();
    }

    fn fixture() -> SqliteProvider {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn);
        SqliteProvider::from_connection(conn)
    }

    fn insert_steps(provider: &SqliteProvider, time: i64, steps: f64) {
        provider
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO StepsRecords (time, steps) VALUES (?1, ?2)",
                params![time, steps],
            )
            .unwrap();
    }

    // ── Hourly steps ──────────────────────────────────────────────

    #[test]
    fn hourly_steps_groups_by_local_hour() {
        let p = fixture();
        insert_steps(&p, at(today(), 9, 5), 100.0);
        insert_steps(&p, at(today(), 9, 40), 50.0);
        insert_steps(&p, at(today(), 14, 0), 300.0);

        let rows = p.query_hourly_steps_on(today(), 0, 1).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].hour.hour(), 9);
        assert_eq!(rows[0].steps, 150.0);
        assert_eq!(rows[1].hour.hour(), 14);
        assert_eq!(rows[1].steps, 300.0);
    }

    #[test]
    fn hourly_steps_respects_day_window() {
        let p = fixture();
        let yesterday = today().pred_opt().unwrap();
        insert_steps(&p, at(yesterday, 23, 30), 70.0);
        insert_steps(&p, at(today(), 0, 10), 20.0);

        let rows = p.query_hourly_steps_on(today(), -1, 0).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].hour.date(), yesterday);
        assert_eq!(rows[0].steps, 70.0);

        let rows = p.query_hourly_steps_on(today(), 0, 1).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].steps, 20.0);
    }

    #[test]
    fn hourly_steps_empty_day() {
        let p = fixture();
        assert!(p.query_hourly_steps_on(today(), -5, -4).unwrap().is_empty());
    }

    #[test]
    fn steps_request_resolves_against_its_own_day() {
        use crate::provider::fetch::execute;
        use crate::provider::{FetchRequest, Payload, Query};
        use crate::ui::ZoneId;

        let p = fixture();
        let yesterday = today().pred_opt().unwrap();
        insert_steps(&p, at(yesterday, 22, 0), 80.0);
        insert_steps(&p, at(today(), 1, 0), 5.0);

        // Issued just before midnight, answered after it.
        let reply = execute(
            &p,
            FetchRequest {
                target: ZoneId::Steps,
                generation: 1,
                query: Query::HourlySteps {
                    today: yesterday,
                    day_start: 0,
                    day_end: 1,
                },
            },
        );
        let Ok(Payload::Hourly(rows)) = reply.result else {
            panic!("expected hourly rows");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].hour.date(), yesterday);
        assert_eq!(rows[0].steps, 80.0);
    }

    // ── Raw series ────────────────────────────────────────────────

    #[test]
    fn heart_rate_in_range_sorted() {
        let p = fixture();
        {
            let conn = p.lock().unwrap();
            for (h, bpm) in [(12, 80.0), (8, 62.0), (20, 101.0)] {
                conn.execute(
                    "INSERT INTO HeartRateRecords (time, heartRate) VALUES (?1, ?2)",
                    params![at(today(), h, 0), bpm],
                )
                .unwrap();
            }
            conn.execute(
                "INSERT INTO HeartRateRecords (time, heartRate) VALUES (?1, ?2)",
                params![at(today().succ_opt().unwrap(), 1, 0), 55.0],
            )
            .unwrap();
        }

        let (start, end) = DayWindow::default().bounds(today());
        let samples = p.query_raw_series(Metric::HeartRate, start, end).unwrap();
        let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![62.0, 80.0, 101.0]);
    }

    #[test]
    fn weight_by_date() {
        let p = fixture();
        {
            let conn = p.lock().unwrap();
            for (d, w) in [("2024-01-05", 161.2), ("2024-02-01", 159.8), ("2023-12-30", 163.0)] {
                conn.execute(
                    "INSERT INTO WeightRecords (date, weight) VALUES (?1, ?2)",
                    params![d, w],
                )
                .unwrap();
            }
        }

        let start = local_midnight(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let end = local_midnight(today());
        let samples = p.query_raw_series(Metric::Weight, start, end).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(
            samples[0].timestamp.date_naive(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
        assert_eq!(samples[1].value, 159.8);
    }

    #[test]
    fn unparseable_weight_dates_are_skipped() {
        let p = fixture();
        p.lock()
            .unwrap()
            .execute(
                "INSERT INTO WeightRecords (date, weight) VALUES ('not a date', 1.0)",
                [],
            )
            .unwrap();
        // date('not a date') is NULL and never satisfies the range filter.
        let start = local_midnight(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
        let end = local_midnight(today());
        let samples = p.query_raw_series(Metric::Weight, start, end).unwrap();
        assert!(samples.is_empty());
    }

    // ── Opening ───────────────────────────────────────────────────

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = SqliteProvider::open(&dir.path().join("absent.db"))
            .err()
            .expect("read-only open of a missing file must fail");
        assert!(matches!(err, ProviderError::Open { .. }));
    }

    #[test]
    fn open_existing_file_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.db");
        {
            let conn = Connection::open(&path).unwrap();
            create_tables(&conn);
            conn.execute(
                "INSERT INTO StepsRecords (time, steps) VALUES (?1, ?2)",
                params![at(today(), 10, 0), 42.0],
            )
            .unwrap();
        }

        let p = SqliteProvider::open(&path).unwrap();
        let rows = p.query_hourly_steps_on(today(), 0, 1).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].steps, 42.0);

        let write = p.lock().unwrap().execute("DELETE FROM StepsRecords", []);
        assert!(write.is_err());
    }

    #[test]
    fn missing_table_is_query_error() {
        let p = SqliteProvider::from_connection(Connection::open_in_memory().unwrap());
        let err = p.query_hourly_steps_on(today(), 0, 1).unwrap_err();
        assert!(matches!(err, ProviderError::Query(_)));
    }
}
