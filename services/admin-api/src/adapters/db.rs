//! services/admin-api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `AdminDatabase` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::NaiveDate;
use connectia_core::domain::{
    Course, CourseScope, CourseStatus, CourseSummary, NewUser, Page, User, UserCourse,
    UserSummary, UserUpdate,
};
use connectia_core::ports::{AdminDatabase, PortError, PortResult};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::str::FromStr;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `AdminDatabase` port.
///
/// Every statement executes against the shared bounded pool; a connection is
/// checked out per statement and returned on every exit path, success or not.
#[derive(Clone)]
pub struct PgAdminStore {
    pool: PgPool,
}

impl PgAdminStore {
    /// Creates a new `PgAdminStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// Error Mapping
//=========================================================================================

/// Translates a driver error into the port taxonomy. A missing row becomes
/// `NotFound`, a unique-index rejection `Duplicate`, a foreign-key rejection
/// `Integrity`; everything else is `Unexpected`.
fn map_db_err(err: sqlx::Error, what: &str) -> PortError {
    match &err {
        sqlx::Error::RowNotFound => return PortError::NotFound(what.to_string()),
        sqlx::Error::Database(db_err) => {
            if db_err.is_unique_violation() {
                return PortError::Duplicate(format!("{} already exists", what));
            }
            if db_err.is_foreign_key_violation() {
                return PortError::Integrity(what.to_string());
            }
        }
        _ => {}
    }
    PortError::Unexpected(err.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id_usuario: i64,
    nm_usuario: String,
    ds_email: String,
    id_carreira: i64,
    tp_plano: String,
    t_con_carreira_id_area: i64,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id_usuario: self.id_usuario,
            nm_usuario: self.nm_usuario,
            ds_email: self.ds_email,
            id_carreira: self.id_carreira,
            tp_plano: self.tp_plano,
            t_con_carreira_id_area: self.t_con_carreira_id_area,
        }
    }
}

#[derive(FromRow)]
struct CourseRecord {
    id_curso: i64,
    nm_curso: String,
    ds_curso: Option<String>,
    id_carreira: Option<i64>,
    tp_conteudo: Option<String>,
    dt_inicio: Option<NaiveDate>,
    sts_curso: String,
    id_usuario: Option<i64>,
    id_area: Option<i64>,
}
impl CourseRecord {
    fn to_domain(self) -> PortResult<Course> {
        Ok(Course {
            id_curso: self.id_curso,
            nm_curso: self.nm_curso,
            ds_curso: self.ds_curso,
            id_carreira: self.id_carreira,
            tp_conteudo: self.tp_conteudo,
            dt_inicio: self.dt_inicio,
            sts_curso: parse_status(&self.sts_curso)?,
            id_usuario: self.id_usuario,
            id_area: self.id_area,
        })
    }
}

#[derive(FromRow)]
struct UserSummaryRecord {
    id_usuario: i64,
    nm_usuario: String,
    ds_email: String,
    tp_plano: String,
    id_carreira: i64,
}
impl UserSummaryRecord {
    fn to_domain(self) -> UserSummary {
        UserSummary {
            id_usuario: self.id_usuario,
            nm_usuario: self.nm_usuario,
            ds_email: self.ds_email,
            tp_plano: self.tp_plano,
            id_carreira: self.id_carreira,
        }
    }
}

#[derive(FromRow)]
struct CourseSummaryRecord {
    id_curso: i64,
    nm_curso: String,
    ds_curso: Option<String>,
    id_carreira: Option<i64>,
    id_area: Option<i64>,
    sts_curso: String,
}
impl CourseSummaryRecord {
    fn to_domain(self) -> PortResult<CourseSummary> {
        Ok(CourseSummary {
            id_curso: self.id_curso,
            nm_curso: self.nm_curso,
            ds_curso: self.ds_curso,
            id_carreira: self.id_carreira,
            id_area: self.id_area,
            sts_curso: parse_status(&self.sts_curso)?,
        })
    }
}

#[derive(FromRow)]
struct UserCourseRecord {
    id_curso: i64,
    nm_curso: String,
    ds_curso: Option<String>,
    sts_curso: String,
    dt_inicio: Option<NaiveDate>,
    id_area: Option<i64>,
    id_carreira: Option<i64>,
}
impl UserCourseRecord {
    fn to_domain(self) -> PortResult<UserCourse> {
        Ok(UserCourse {
            id_curso: self.id_curso,
            nm_curso: self.nm_curso,
            ds_curso: self.ds_curso,
            sts_curso: parse_status(&self.sts_curso)?,
            dt_inicio: self.dt_inicio,
            id_area: self.id_area,
            id_carreira: self.id_carreira,
        })
    }
}

/// A stored status outside {C,N,E} means the row predates the CHECK
/// constraint or was tampered with; surface it as an internal fault.
fn parse_status(raw: &str) -> PortResult<CourseStatus> {
    CourseStatus::from_str(raw)
        .map_err(|e| PortError::Unexpected(format!("corrupt sts_curso column: {}", e)))
}

//=========================================================================================
// Dynamic UPDATE Assembly
//=========================================================================================

/// Appends `column = $n` pairs to the builder for every whitelisted field
/// present in `changes`, returning how many were applied. Values are always
/// bound, never interpolated.
fn push_user_changes(qb: &mut QueryBuilder<'_, Postgres>, changes: &UserUpdate) -> usize {
    let mut parts = qb.separated(", ");
    let mut applied = 0;
    if let Some(v) = &changes.nm_usuario {
        parts.push("nm_usuario = ");
        parts.push_bind_unseparated(v.clone());
        applied += 1;
    }
    if let Some(v) = &changes.ds_email {
        parts.push("ds_email = ");
        parts.push_bind_unseparated(v.clone());
        applied += 1;
    }
    if let Some(v) = &changes.ds_senha {
        parts.push("ds_senha = ");
        parts.push_bind_unseparated(v.clone());
        applied += 1;
    }
    if let Some(v) = changes.id_carreira {
        parts.push("id_carreira = ");
        parts.push_bind_unseparated(v);
        applied += 1;
    }
    if let Some(v) = &changes.tp_plano {
        parts.push("tp_plano = ");
        parts.push_bind_unseparated(v.clone());
        applied += 1;
    }
    if let Some(v) = changes.t_con_carreira_id_area {
        parts.push("t_con_carreira_id_area = ");
        parts.push_bind_unseparated(v);
        applied += 1;
    }
    applied
}

//=========================================================================================
// `AdminDatabase` Trait Implementation
//=========================================================================================

#[async_trait]
impl AdminDatabase for PgAdminStore {
    async fn list_users(&self, page: Page) -> PortResult<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(
            "SELECT id_usuario, nm_usuario, ds_email, id_carreira, tp_plano, t_con_carreira_id_area \
             FROM t_con_usuario ORDER BY id_usuario LIMIT $1 OFFSET $2",
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "users"))?;

        Ok(records.into_iter().map(UserRecord::to_domain).collect())
    }

    async fn get_user(&self, id_usuario: i64) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id_usuario, nm_usuario, ds_email, id_carreira, tp_plano, t_con_carreira_id_area \
             FROM t_con_usuario WHERE id_usuario = $1",
        )
        .bind(id_usuario)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err(e, &format!("User {} not found", id_usuario)))?;

        Ok(record.to_domain())
    }

    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        let missing = new_user.missing_fields();
        if !missing.is_empty() {
            return Err(PortError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        // Uniqueness is checked by a read first so the caller gets a clear
        // message; the unique index on ds_email is the backstop under
        // concurrent creates.
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM t_con_usuario WHERE ds_email = $1",
        )
        .bind(&new_user.ds_email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "users"))?;
        if existing > 0 {
            return Err(PortError::Duplicate(format!(
                "email {} is already registered",
                new_user.ds_email
            )));
        }

        // The id is still max+1 as observed by callers, but computed inside
        // the INSERT itself so there is no read-then-insert window.
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO t_con_usuario \
             (id_usuario, nm_usuario, ds_email, ds_senha, id_carreira, tp_plano, t_con_carreira_id_area) \
             SELECT COALESCE(MAX(id_usuario), 0) + 1, $1, $2, $3, $4, $5, $6 FROM t_con_usuario \
             RETURNING id_usuario, nm_usuario, ds_email, id_carreira, tp_plano, t_con_carreira_id_area",
        )
        .bind(&new_user.nm_usuario)
        .bind(&new_user.ds_email)
        .bind(&new_user.ds_senha)
        .bind(new_user.id_carreira)
        .bind(&new_user.tp_plano)
        .bind(new_user.t_con_carreira_id_area)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err(e, &format!("email {}", new_user.ds_email)))?;

        Ok(record.to_domain())
    }

    async fn update_user(&self, id_usuario: i64, changes: UserUpdate) -> PortResult<User> {
        if changes.is_empty() {
            return Err(PortError::Validation(
                "no updatable field supplied".to_string(),
            ));
        }

        let mut qb = QueryBuilder::new("UPDATE t_con_usuario SET ");
        push_user_changes(&mut qb, &changes);
        qb.push(" WHERE id_usuario = ");
        qb.push_bind(id_usuario);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_err(e, &format!("email for user {}", id_usuario)))?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "User {} not found",
                id_usuario
            )));
        }

        self.get_user(id_usuario).await
    }

    async fn delete_user(&self, id_usuario: i64) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM t_con_usuario WHERE id_usuario = $1")
            .bind(id_usuario)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_err(e, &format!("user {}", id_usuario)))?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "User {} not found",
                id_usuario
            )));
        }
        Ok(())
    }

    async fn list_courses(&self, page: Page) -> PortResult<Vec<Course>> {
        let records = sqlx::query_as::<_, CourseRecord>(
            "SELECT id_curso, nm_curso, ds_curso, id_carreira, tp_conteudo, dt_inicio, sts_curso, id_usuario, id_area \
             FROM t_con_cursos ORDER BY id_curso LIMIT $1 OFFSET $2",
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "courses"))?;

        records.into_iter().map(CourseRecord::to_domain).collect()
    }

    async fn get_course(&self, id_curso: i64, scope: Option<CourseScope>) -> PortResult<Course> {
        let not_found = format!("Course {} not found", id_curso);
        let record = match scope {
            Some(scope) => {
                sqlx::query_as::<_, CourseRecord>(
                    "SELECT id_curso, nm_curso, ds_curso, id_carreira, tp_conteudo, dt_inicio, sts_curso, id_usuario, id_area \
                     FROM t_con_cursos WHERE id_curso = $1 AND id_carreira = $2 AND id_area = $3",
                )
                .bind(id_curso)
                .bind(scope.id_carreira)
                .bind(scope.id_area)
                .fetch_one(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, CourseRecord>(
                    "SELECT id_curso, nm_curso, ds_curso, id_carreira, tp_conteudo, dt_inicio, sts_curso, id_usuario, id_area \
                     FROM t_con_cursos WHERE id_curso = $1",
                )
                .bind(id_curso)
                .fetch_one(&self.pool)
                .await
            }
        }
        .map_err(|e| map_db_err(e, &not_found))?;

        record.to_domain()
    }

    async fn update_course_status(
        &self,
        id_curso: i64,
        status: CourseStatus,
        scope: Option<CourseScope>,
    ) -> PortResult<Course> {
        let result = match scope {
            Some(scope) => {
                sqlx::query(
                    "UPDATE t_con_cursos SET sts_curso = $1 \
                     WHERE id_curso = $2 AND id_carreira = $3 AND id_area = $4",
                )
                .bind(status.as_str())
                .bind(id_curso)
                .bind(scope.id_carreira)
                .bind(scope.id_area)
                .execute(&self.pool)
                .await
            }
            None => {
                sqlx::query("UPDATE t_con_cursos SET sts_curso = $1 WHERE id_curso = $2")
                    .bind(status.as_str())
                    .bind(id_curso)
                    .execute(&self.pool)
                    .await
            }
        }
        .map_err(|e| map_db_err(e, &format!("course {}", id_curso)))?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Course {} not found",
                id_curso
            )));
        }

        self.get_course(id_curso, scope).await
    }

    async fn users_by_career(&self, id_carreira: i64) -> PortResult<Vec<UserSummary>> {
        let records = sqlx::query_as::<_, UserSummaryRecord>(
            "SELECT id_usuario, nm_usuario, ds_email, tp_plano, id_carreira \
             FROM t_con_usuario WHERE id_carreira = $1 ORDER BY id_usuario",
        )
        .bind(id_carreira)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "users by career"))?;

        Ok(records
            .into_iter()
            .map(UserSummaryRecord::to_domain)
            .collect())
    }

    async fn courses_by_status(&self, status: CourseStatus) -> PortResult<Vec<CourseSummary>> {
        let records = sqlx::query_as::<_, CourseSummaryRecord>(
            "SELECT id_curso, nm_curso, ds_curso, id_carreira, id_area, sts_curso \
             FROM t_con_cursos WHERE sts_curso = $1 ORDER BY id_curso",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "courses by status"))?;

        records
            .into_iter()
            .map(CourseSummaryRecord::to_domain)
            .collect()
    }

    async fn courses_by_user(&self, id_usuario: i64) -> PortResult<Vec<UserCourse>> {
        let records = sqlx::query_as::<_, UserCourseRecord>(
            "SELECT id_curso, nm_curso, ds_curso, sts_curso, dt_inicio, id_area, id_carreira \
             FROM t_con_cursos WHERE id_usuario = $1 ORDER BY dt_inicio NULLS LAST",
        )
        .bind(id_usuario)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "courses by user"))?;

        records
            .into_iter()
            .map(UserCourseRecord::to_domain)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_builder_emits_only_supplied_fields() {
        let changes = UserUpdate {
            nm_usuario: Some("Ana".to_string()),
            tp_plano: Some("BASIC".to_string()),
            ..UserUpdate::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE t_con_usuario SET ");
        let applied = push_user_changes(&mut qb, &changes);
        assert_eq!(applied, 2);
        assert_eq!(
            qb.sql(),
            "UPDATE t_con_usuario SET nm_usuario = $1, tp_plano = $2"
        );
    }

    #[test]
    fn update_builder_applies_nothing_for_empty_changes() {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE t_con_usuario SET ");
        let applied = push_user_changes(&mut qb, &UserUpdate::default());
        assert_eq!(applied, 0);
        assert_eq!(qb.sql(), "UPDATE t_con_usuario SET ");
    }

    #[test]
    fn update_builder_covers_the_full_whitelist() {
        let changes = UserUpdate {
            nm_usuario: Some("Ana".to_string()),
            ds_email: Some("ana@x.com".to_string()),
            ds_senha: Some("secret".to_string()),
            id_carreira: Some(2),
            tp_plano: Some("PREMIUM".to_string()),
            t_con_carreira_id_area: Some(7),
        };
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE t_con_usuario SET ");
        let applied = push_user_changes(&mut qb, &changes);
        assert_eq!(applied, 6);
        assert_eq!(
            qb.sql(),
            "UPDATE t_con_usuario SET nm_usuario = $1, ds_email = $2, ds_senha = $3, \
             id_carreira = $4, tp_plano = $5, t_con_carreira_id_area = $6"
        );
    }

    #[test]
    fn corrupt_status_maps_to_unexpected() {
        let err = parse_status("Z").unwrap_err();
        assert!(matches!(err, PortError::Unexpected(_)));
    }
}
