// src/repositories/statistics_repository.rs

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::statistics::{StatisticsSnapshot, StatisticsType};
use crate::error::{AppError, AppResult};

pub trait StatisticsRepository: Send + Sync {
    /// Store `snapshot` as the only snapshot of its kind
    fn save_snapshot(&self, snapshot: &StatisticsSnapshot) -> AppResult<()>;
    fn latest_snapshot(&self, kind: StatisticsType) -> AppResult<Option<StatisticsSnapshot>>;
}

pub struct SqliteStatisticsRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteStatisticsRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_snapshot(row: &Row) -> Result<StatisticsSnapshot, rusqlite::Error> {
        let id_str: String = row.get("id")?;
        let id = Uuid::parse_str(&id_str)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let kind_raw: String = row.get("kind")?;
        let kind = kind_raw
            .parse::<StatisticsType>()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let value_json: String = row.get("value")?;
        let value = serde_json::from_str(&value_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let generated_at = DateTime::parse_from_rfc3339(&row.get::<_, String>("generated_at")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(StatisticsSnapshot {
            id,
            kind,
            value,
            generated_at,
        })
    }
}

impl StatisticsRepository for SqliteStatisticsRepository {
    fn save_snapshot(&self, snap: &StatisticsSnapshot) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let value_json = serde_json::to_string(&snap.value)?;

        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM statistics_snapshots WHERE kind = ?1",
            params![snap.kind.to_string()],
        )?;
        tx.execute(
            "INSERT INTO statistics_snapshots (id, kind, value, generated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                snap.id.to_string(),
                snap.kind.to_string(),
                value_json,
                snap.generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn latest_snapshot(&self, kind: StatisticsType) -> AppResult<Option<StatisticsSnapshot>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, kind, value, generated_at FROM statistics_snapshots
             WHERE kind = ?1 ORDER BY generated_at DESC LIMIT 1",
        )?;

        match stmt.query_row(params![kind.to_string()], Self::row_to_snapshot) {
            Ok(snap) => Ok(Some(snap)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use serde_json::json;

    fn count_rows(pool: &ConnectionPool) -> i64 {
        pool.get()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM statistics_snapshots", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_latest_snapshot_per_kind() {
        let repo = SqliteStatisticsRepository::new(test_pool());
        assert!(repo.latest_snapshot(StatisticsType::Summary).unwrap().is_none());

        let first = StatisticsSnapshot::new(StatisticsType::Summary, json!({"total": 1}));
        let second = StatisticsSnapshot::new(StatisticsType::Summary, json!({"total": 2}));
        let reading = StatisticsSnapshot::new(StatisticsType::Reading, json!({"days": 3}));

        repo.save_snapshot(&first).unwrap();
        repo.save_snapshot(&second).unwrap();
        repo.save_snapshot(&reading).unwrap();

        let latest = repo.latest_snapshot(StatisticsType::Summary).unwrap().unwrap();
        assert_eq!(latest.id, second.id);
        assert_eq!(latest.value["total"], 2);

        let latest_reading = repo.latest_snapshot(StatisticsType::Reading).unwrap().unwrap();
        assert_eq!(latest_reading.kind, StatisticsType::Reading);
    }

    #[test]
    fn test_keeps_one_row_per_kind() {
        let pool = test_pool();
        let repo = SqliteStatisticsRepository::new(Arc::clone(&pool));

        for total in 0..50 {
            let snap = StatisticsSnapshot::new(StatisticsType::Summary, json!({ "total": total }));
            repo.save_snapshot(&snap).unwrap();
        }
        repo.save_snapshot(&StatisticsSnapshot::new(StatisticsType::Reading, json!({})))
            .unwrap();

        assert_eq!(count_rows(&pool), 2);
        let latest = repo.latest_snapshot(StatisticsType::Summary).unwrap().unwrap();
        assert_eq!(latest.value["total"], 49);
    }
}
