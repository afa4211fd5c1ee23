use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::model::attendance::AttendanceRecord;
use crate::model::employee::Employee;
use crate::model::location::AuthorizedLocation;

/// Storage port consumed by the ledger and query layer. Everything the
/// attendance core needs from persistence, nothing more; handlers and
/// tests inject a concrete implementation instead of reaching for a
/// global connection.
pub trait AttendanceStore {
    fn find_employee(
        &self,
        employee_id: &str,
    ) -> impl Future<Output = sqlx::Result<Option<Employee>>> + Send;

    fn insert_employee(
        &self,
        employee_id: &str,
        name: &str,
        email: &str,
        face_descriptor: Option<&str>,
        now: NaiveDateTime,
    ) -> impl Future<Output = sqlx::Result<Employee>> + Send;

    fn list_employees(&self) -> impl Future<Output = sqlx::Result<Vec<Employee>>> + Send;

    fn update_face_descriptor(
        &self,
        employee_pk: i64,
        descriptor: &str,
    ) -> impl Future<Output = sqlx::Result<()>> + Send;

    fn list_zones(&self) -> impl Future<Output = sqlx::Result<Vec<AuthorizedLocation>>> + Send;

    fn insert_zone(
        &self,
        location_name: &str,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
        now: NaiveDateTime,
    ) -> impl Future<Output = sqlx::Result<AuthorizedLocation>> + Send;

    /// Atomic compare-and-insert for a clock-in. Creates the record only if
    /// no record with a clock-in at or after `day_start` exists for the slot;
    /// returns the new record id, or `None` when the slot is already taken.
    /// Two concurrent clock-ins for one slot can never both succeed.
    fn insert_clock_in(
        &self,
        employee_pk: i64,
        session_type: &str,
        clock_in_time: NaiveDateTime,
        latitude: f64,
        longitude: f64,
        day_start: NaiveDateTime,
    ) -> impl Future<Output = sqlx::Result<Option<i64>>> + Send;

    /// Most recent record for the slot with a clock-in at or after
    /// `day_start` and no clock-out yet.
    fn find_open_record(
        &self,
        employee_pk: i64,
        session_type: &str,
        day_start: NaiveDateTime,
    ) -> impl Future<Output = sqlx::Result<Option<AttendanceRecord>>> + Send;

    /// Writes the clock-out fields, guarded by `clock_out_time IS NULL` so
    /// two concurrent clock-outs can never both apply. Returns whether the
    /// update landed.
    fn close_record(
        &self,
        record_id: i64,
        clock_out_time: NaiveDateTime,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = sqlx::Result<bool>> + Send;

    /// Record for the slot with a clock-in at or after `day_start`,
    /// regardless of whether it has been closed.
    fn find_record_for_day(
        &self,
        employee_pk: i64,
        session_type: &str,
        day_start: NaiveDateTime,
    ) -> impl Future<Output = sqlx::Result<Option<AttendanceRecord>>> + Send;

    fn records_for_employee(
        &self,
        employee_pk: i64,
        limit: i64,
    ) -> impl Future<Output = sqlx::Result<Vec<AttendanceRecord>>> + Send;

    fn all_records(
        &self,
        limit: i64,
    ) -> impl Future<Output = sqlx::Result<Vec<AttendanceRecord>>> + Send;
}

/// SQLite-backed store. Cheap to clone, one per worker.
#[derive(Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl AttendanceStore for SqlStore {
    async fn find_employee(&self, employee_id: &str) -> sqlx::Result<Option<Employee>> {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE employee_id = ?")
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert_employee(
        &self,
        employee_id: &str,
        name: &str,
        email: &str,
        face_descriptor: Option<&str>,
        now: NaiveDateTime,
    ) -> sqlx::Result<Employee> {
        sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (employee_id, name, email, face_descriptor, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(employee_id)
        .bind(name)
        .bind(email)
        .bind(face_descriptor)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_employees(&self) -> sqlx::Result<Vec<Employee>> {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    async fn update_face_descriptor(
        &self,
        employee_pk: i64,
        descriptor: &str,
    ) -> sqlx::Result<()> {
        sqlx::query("UPDATE employees SET face_descriptor = ? WHERE id = ?")
            .bind(descriptor)
            .bind(employee_pk)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_zones(&self) -> sqlx::Result<Vec<AuthorizedLocation>> {
        sqlx::query_as::<_, AuthorizedLocation>("SELECT * FROM authorized_locations ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    async fn insert_zone(
        &self,
        location_name: &str,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
        now: NaiveDateTime,
    ) -> sqlx::Result<AuthorizedLocation> {
        sqlx::query_as::<_, AuthorizedLocation>(
            r#"
            INSERT INTO authorized_locations (location_name, latitude, longitude, radius_meters, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(location_name)
        .bind(latitude)
        .bind(longitude)
        .bind(radius_meters)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    async fn insert_clock_in(
        &self,
        employee_pk: i64,
        session_type: &str,
        clock_in_time: NaiveDateTime,
        latitude: f64,
        longitude: f64,
        day_start: NaiveDateTime,
    ) -> sqlx::Result<Option<i64>> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_records
                (employee_id, session_type, clock_in_time,
                 clock_in_latitude, clock_in_longitude, created_at)
            SELECT ?, ?, ?, ?, ?, ?
            WHERE NOT EXISTS (
                SELECT 1 FROM attendance_records
                WHERE employee_id = ?
                  AND session_type = ?
                  AND clock_in_time >= ?
            )
            "#,
        )
        .bind(employee_pk)
        .bind(session_type)
        .bind(clock_in_time)
        .bind(latitude)
        .bind(longitude)
        .bind(clock_in_time)
        .bind(employee_pk)
        .bind(session_type)
        .bind(day_start)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(None)
        } else {
            Ok(Some(result.last_insert_rowid()))
        }
    }

    async fn find_open_record(
        &self,
        employee_pk: i64,
        session_type: &str,
        day_start: NaiveDateTime,
    ) -> sqlx::Result<Option<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT * FROM attendance_records
            WHERE employee_id = ?
              AND session_type = ?
              AND clock_in_time >= ?
              AND clock_out_time IS NULL
            ORDER BY clock_in_time DESC
            LIMIT 1
            "#,
        )
        .bind(employee_pk)
        .bind(session_type)
        .bind(day_start)
        .fetch_optional(&self.pool)
        .await
    }

    async fn close_record(
        &self,
        record_id: i64,
        clock_out_time: NaiveDateTime,
        latitude: f64,
        longitude: f64,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE attendance_records
            SET clock_out_time = ?, clock_out_latitude = ?, clock_out_longitude = ?
            WHERE id = ? AND clock_out_time IS NULL
            "#,
        )
        .bind(clock_out_time)
        .bind(latitude)
        .bind(longitude)
        .bind(record_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_record_for_day(
        &self,
        employee_pk: i64,
        session_type: &str,
        day_start: NaiveDateTime,
    ) -> sqlx::Result<Option<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT * FROM attendance_records
            WHERE employee_id = ?
              AND session_type = ?
              AND clock_in_time >= ?
            ORDER BY clock_in_time DESC
            LIMIT 1
            "#,
        )
        .bind(employee_pk)
        .bind(session_type)
        .bind(day_start)
        .fetch_optional(&self.pool)
        .await
    }

    async fn records_for_employee(
        &self,
        employee_pk: i64,
        limit: i64,
    ) -> sqlx::Result<Vec<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT * FROM attendance_records
            WHERE employee_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(employee_pk)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn all_records(&self, limit: i64) -> sqlx::Result<Vec<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT * FROM attendance_records
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
