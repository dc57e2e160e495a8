use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::SpecialistStore;
use crate::db::{open_database, open_memory_database, StoreError};
use crate::models::*;

const SELECT_COLUMNS: &str = "SELECT id, full_name, specialty, registration_number,
     weekly_schedule, active, created_at, updated_at
     FROM specialists";

/// `SpecialistStore` backed by a single SQLite connection.
///
/// Registration uniqueness is enforced by a `UNIQUE` column constraint, so
/// concurrent inserts with the same number cannot both succeed.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self::new(open_database(path)?))
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self::new(open_memory_database()?))
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl SpecialistStore for SqliteStore {
    fn list(&self, active: bool, order: &ListOrder) -> Result<Vec<Specialist>, StoreError> {
        // Column and direction come from whitelisted enums, never from input.
        let sql = format!(
            "{SELECT_COLUMNS} WHERE active = ?1 ORDER BY {} {}, id ASC",
            order.field.column(),
            order.direction.sql(),
        );
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![active as i32], specialist_row_from_rusqlite)?;

        let mut specialists = Vec::new();
        for row in rows {
            specialists.push(specialist_from_row(row?)?);
        }
        Ok(specialists)
    }

    fn get(&self, id: &Uuid) -> Result<Option<Specialist>, StoreError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id.to_string()],
                specialist_row_from_rusqlite,
            )
            .optional()?;
        row.map(specialist_from_row).transpose()
    }

    fn registration_exists(
        &self,
        registration_number: &str,
        excluding: Option<&Uuid>,
    ) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM specialists
             WHERE registration_number = ?1 AND (?2 IS NULL OR id != ?2)",
            params![registration_number, excluding.map(|id| id.to_string())],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn insert(&self, new: NewSpecialist) -> Result<Specialist, StoreError> {
        let now = now();
        let specialist = Specialist {
            id: Uuid::new_v4(),
            full_name: new.full_name,
            specialty: new.specialty,
            registration_number: new.registration_number,
            weekly_schedule: new.weekly_schedule,
            active: true,
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO specialists (id, full_name, specialty, registration_number,
             weekly_schedule, active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                specialist.id.to_string(),
                specialist.full_name,
                specialist.specialty,
                specialist.registration_number,
                encode_schedule(&specialist.weekly_schedule)?,
                specialist.active as i32,
                encode_timestamp(&specialist.created_at),
                encode_timestamp(&specialist.updated_at),
            ],
        )
        .map_err(|e| map_unique_violation(e, &specialist.registration_number))?;

        Ok(specialist)
    }

    fn update(&self, specialist: &Specialist) -> Result<Option<Specialist>, StoreError> {
        let mut updated = specialist.clone();
        updated.updated_at = now();

        // `active` and `created_at` belong to the stored row, not the caller's copy.
        let conn = self.conn()?;
        let stored = conn
            .query_row(
                "UPDATE specialists SET full_name = ?2, specialty = ?3,
                 registration_number = ?4, weekly_schedule = ?5, updated_at = ?6
                 WHERE id = ?1
                 RETURNING active, created_at",
                params![
                    updated.id.to_string(),
                    updated.full_name,
                    updated.specialty,
                    updated.registration_number,
                    encode_schedule(&updated.weekly_schedule)?,
                    encode_timestamp(&updated.updated_at),
                ],
                |row| Ok((row.get::<_, i32>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()
            .map_err(|e| map_unique_violation(e, &updated.registration_number))?;

        let Some((active, created_at)) = stored else {
            return Ok(None);
        };
        updated.active = active != 0;
        updated.created_at = decode_timestamp(&created_at).map_err(|e| StoreError::CorruptRow {
            id: updated.id.to_string(),
            reason: format!("created_at: {e}"),
        })?;
        Ok(Some(updated))
    }

    fn set_active(&self, id: &Uuid, active: bool) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE specialists SET active = ?2, updated_at = ?3 WHERE id = ?1",
            params![id.to_string(), active as i32, encode_timestamp(&now())],
        )?;
        Ok(changed > 0)
    }

    fn delete(&self, id: &Uuid) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM specialists WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(changed > 0)
    }
}

// ═══════════════════════════════════════════
// Row mapping
// ═══════════════════════════════════════════

type SpecialistRow = (String, String, String, String, String, i32, String, String);

fn specialist_row_from_rusqlite(row: &Row<'_>) -> rusqlite::Result<SpecialistRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn specialist_from_row(row: SpecialistRow) -> Result<Specialist, StoreError> {
    let (id, full_name, specialty, registration_number, schedule, active, created, updated) = row;
    let corrupt = |reason: String| StoreError::CorruptRow {
        id: id.clone(),
        reason,
    };

    Ok(Specialist {
        id: Uuid::parse_str(&id).map_err(|e| corrupt(format!("id: {e}")))?,
        full_name,
        specialty,
        registration_number,
        weekly_schedule: serde_json::from_str(&schedule)
            .map_err(|e| corrupt(format!("weekly_schedule: {e}")))?,
        active: active != 0,
        created_at: decode_timestamp(&created).map_err(|e| corrupt(format!("created_at: {e}")))?,
        updated_at: decode_timestamp(&updated).map_err(|e| corrupt(format!("updated_at: {e}")))?,
    })
}

/// Timestamps are stored at microsecond precision with a fixed-width
/// format so that text ordering matches time ordering.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

fn encode_schedule(schedule: &WeeklySchedule) -> Result<String, StoreError> {
    serde_json::to_string(schedule).map_err(|e| StoreError::CorruptRow {
        id: String::new(),
        reason: format!("weekly_schedule: {e}"),
    })
}

fn map_unique_violation(err: rusqlite::Error, registration_number: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::DuplicateRegistration(registration_number.to_string())
        }
        _ => StoreError::Sqlite(err),
    }
}
