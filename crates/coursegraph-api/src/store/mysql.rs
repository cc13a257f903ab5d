use async_trait::async_trait;
use coursegraph_core::{
    ConcurrentEdge, Course, CourseCode, CourseGraphError, CourseStore, DatabaseConfig,
    InstructorGradeRecord, PrerequisiteEdge, RawConcurrentRow, RawCourseRow, RawGradeRow,
    RawPrerequisiteRow, RawValue, Result,
};
use secrecy::ExposeSecret;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlSslMode};
use sqlx::FromRow;
use std::time::Duration;
use tracing::{debug, error, info};

// Numeric columns are selected as text so every value goes through the same
// strict parse regardless of the declared column type.

const COURSE_COLUMNS: &str = r#"
    SELECT course_code,
           course_name,
           CAST(credit_hours AS CHAR) AS credit_hours
    FROM Course_Information"#;

const GRADE_COLUMNS: &str = r#"
    SELECT Course_Code AS course_code,
           Instructor AS instructor,
           CAST(Percentage_As AS CHAR) AS percentage_a,
           CAST(Percentage_Bs AS CHAR) AS percentage_b,
           CAST(Percentage_Cs AS CHAR) AS percentage_c,
           CAST(Percentage_Ds AS CHAR) AS percentage_d,
           CAST(Percentage_Fs AS CHAR) AS percentage_f,
           CAST(Total_Students AS CHAR) AS total_students
    FROM course_gpa_by_instructor
    WHERE Total_Students > 0"#;

#[derive(Debug, FromRow)]
struct CourseRow {
    course_code: String,
    course_name: String,
    credit_hours: Option<String>,
}

impl From<CourseRow> for RawCourseRow {
    fn from(row: CourseRow) -> Self {
        Self {
            course_code: row.course_code,
            course_name: row.course_name,
            credit_hours: row.credit_hours.map(RawValue::Text),
        }
    }
}

#[derive(Debug, FromRow)]
struct GradeRow {
    course_code: String,
    instructor: Option<String>,
    percentage_a: Option<String>,
    percentage_b: Option<String>,
    percentage_c: Option<String>,
    percentage_d: Option<String>,
    percentage_f: Option<String>,
    total_students: Option<String>,
}

impl From<GradeRow> for RawGradeRow {
    fn from(row: GradeRow) -> Self {
        Self {
            course_code: row.course_code,
            instructor: row.instructor,
            percentage_a: row.percentage_a.map(RawValue::Text),
            percentage_b: row.percentage_b.map(RawValue::Text),
            percentage_c: row.percentage_c.map(RawValue::Text),
            percentage_d: row.percentage_d.map(RawValue::Text),
            percentage_f: row.percentage_f.map(RawValue::Text),
            total_students: row.total_students.map(RawValue::Text),
        }
    }
}

#[derive(Debug, FromRow)]
struct PrerequisiteRow {
    course_code: String,
    prerequisite_course_code: String,
    requirement_group_id: Option<String>,
}

impl From<PrerequisiteRow> for RawPrerequisiteRow {
    fn from(row: PrerequisiteRow) -> Self {
        Self {
            course_code: row.course_code,
            prerequisite_course_code: row.prerequisite_course_code,
            requirement_group_id: row.requirement_group_id.map(RawValue::Text),
        }
    }
}

#[derive(Debug, FromRow)]
struct ConcurrentRow {
    course_code: String,
    concurrent_enrollment_course_code: String,
}

impl From<ConcurrentRow> for RawConcurrentRow {
    fn from(row: ConcurrentRow) -> Self {
        Self {
            course_code: row.course_code,
            concurrent_enrollment_course_code: row.concurrent_enrollment_course_code,
        }
    }
}

/// Catalog store over a bounded MySQL connection pool.
#[derive(Clone)]
pub struct MySqlCourseStore {
    pool: MySqlPool,
}

impl std::fmt::Debug for MySqlCourseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlCourseStore")
            .field("size", &self.pool.size())
            .field("idle", &self.pool.num_idle())
            .finish()
    }
}

impl MySqlCourseStore {
    /// Build the pool. Connections are opened on first use, so an unreachable
    /// server surfaces per request instead of aborting startup.
    pub fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.name)
            .username(&config.user)
            .ssl_mode(if config.ssl {
                MySqlSslMode::Required
            } else {
                MySqlSslMode::Disabled
            });
        if let Some(password) = config.password.as_ref() {
            options = options.password(password.expose_secret());
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_lazy_with(options);

        info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            max_connections = config.max_connections,
            ssl = config.ssl,
            "MySQL pool configured"
        );
        Ok(Self { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl CourseStore for MySqlCourseStore {
    async fn list_courses(&self) -> Result<Vec<Course>> {
        let sql = format!("{COURSE_COLUMNS} ORDER BY course_code");
        let rows = sqlx::query_as::<_, CourseRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!(rows = rows.len(), "fetched courses");
        rows.into_iter()
            .map(|row| Course::try_from(RawCourseRow::from(row)))
            .collect()
    }

    async fn find_course(&self, code: &CourseCode) -> Result<Option<Course>> {
        let sql = format!("{COURSE_COLUMNS} WHERE course_code = ?");
        let row = sqlx::query_as::<_, CourseRow>(&sql)
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.map(|row| Course::try_from(RawCourseRow::from(row)))
            .transpose()
    }

    async fn grade_records(&self, code: Option<&CourseCode>) -> Result<Vec<InstructorGradeRecord>> {
        let rows = match code {
            Some(code) => {
                let sql = format!("{GRADE_COLUMNS} AND Course_Code = ? ORDER BY Instructor");
                sqlx::query_as::<_, GradeRow>(&sql)
                    .bind(code.as_str())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!("{GRADE_COLUMNS} ORDER BY Course_Code, Instructor");
                sqlx::query_as::<_, GradeRow>(&sql)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(map_sqlx_error)?;
        debug!(rows = rows.len(), course = ?code.map(CourseCode::as_str), "fetched grade rows");
        rows.into_iter()
            .map(|row| InstructorGradeRecord::try_from(RawGradeRow::from(row)))
            .collect()
    }

    async fn prerequisites(&self, code: &CourseCode) -> Result<Vec<PrerequisiteEdge>> {
        let rows = sqlx::query_as::<_, PrerequisiteRow>(
            r#"
            SELECT course_code,
                   prerequisite_course_code,
                   CAST(requirement_group_id AS CHAR) AS requirement_group_id
            FROM Prerequisite
            WHERE course_code = ?"#,
        )
        .bind(code.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        rows.into_iter()
            .map(|row| PrerequisiteEdge::try_from(RawPrerequisiteRow::from(row)))
            .collect()
    }

    async fn concurrent_enrollment(&self, code: &CourseCode) -> Result<Vec<ConcurrentEdge>> {
        let rows = sqlx::query_as::<_, ConcurrentRow>(
            r#"
            SELECT course_code, concurrent_enrollment_course_code
            FROM Concurrent_Enrollment
            WHERE course_code = ?
            ORDER BY concurrent_enrollment_course_code"#,
        )
        .bind(code.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        rows.into_iter()
            .map(|row| ConcurrentEdge::try_from(RawConcurrentRow::from(row)))
            .collect()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn close(&self) {
        info!("Closing MySQL pool");
        self.pool.close().await;
    }
}

fn map_sqlx_error(err: sqlx::Error) -> CourseGraphError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => {
            error!("catalog store unavailable: {}", err);
            CourseGraphError::StoreUnavailable(err.to_string())
        }
        other => {
            error!("catalog query failed: {}", other);
            CourseGraphError::Database(other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_columns_become_raw_text() {
        let raw = RawGradeRow::from(GradeRow {
            course_code: "CS101".into(),
            instructor: Some("Smith, Jane".into()),
            percentage_a: Some("80.00".into()),
            percentage_b: Some("15.00".into()),
            percentage_c: Some("5.00".into()),
            percentage_d: Some("0.00".into()),
            percentage_f: None,
            total_students: Some("50".into()),
        });
        assert_eq!(raw.percentage_a, Some(RawValue::Text("80.00".into())));
        assert_eq!(raw.percentage_f, None);

        let record = InstructorGradeRecord::try_from(raw).unwrap();
        assert_eq!(record.total_students, Some(50));
        assert_eq!(record.distribution.gpa(), None);
    }

    #[test]
    fn pool_errors_mean_unavailable() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            CourseGraphError::StoreUnavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            CourseGraphError::Database(_)
        ));
    }

    #[tokio::test]
    async fn unreachable_server_is_unavailable() {
        let config = DatabaseConfig {
            host: "127.0.0.1".into(),
            port: 1,
            name: "catalog".into(),
            ssl: false,
            connect_timeout_secs: 1,
            ..DatabaseConfig::default()
        };
        let store = MySqlCourseStore::connect(&config).unwrap();
        let err = store.ping().await.unwrap_err();
        assert!(matches!(err, CourseGraphError::StoreUnavailable(_)), "{err}");
        store.close().await;
    }
}
