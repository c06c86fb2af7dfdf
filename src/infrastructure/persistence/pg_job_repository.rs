use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{
    ArtifactValue, ArtifactWrite, Artifacts, InputSnapshot, Job, JobId, JobStatus,
    OrganizationId, OwnerId, StepEvent, StepName, StepStatus,
};

const SELECT_JOB: &str = r#"
    SELECT id, owner_id, organization_id, status, current_step, steps, input, artifacts,
           errors, created_at, updated_at, completed_at
    FROM jobs
"#;

/// Postgres-backed job store. Writers lock the job's row for the duration of
/// their transaction.
pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn lock_job(
        tx: &mut Transaction<'_, Postgres>,
        id: JobId,
    ) -> Result<Job, RepositoryError> {
        let row = sqlx::query_as::<_, JobRow>(&format!("{SELECT_JOB} WHERE id = $1 FOR UPDATE"))
            .bind(id.as_uuid())
            .fetch_optional(&mut **tx)
            .await
            .map_err(query_failed)?;

        row.ok_or_else(|| RepositoryError::NotFound(format!("job {}", id)))?
            .try_into()
    }

    async fn save(tx: &mut Transaction<'_, Postgres>, job: &Job) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE jobs
            SET status = $1, current_step = $2, steps = $3, artifacts = $4, errors = $5,
                updated_at = $6, completed_at = $7
            WHERE id = $8
            "#,
        )
        .bind(job.status.as_str())
        .bind(job.current_step.map(|s| s.as_str()))
        .bind(Json(&job.steps))
        .bind(Json(&job.artifacts))
        .bind(Json(&job.errors))
        .bind(job.updated_at)
        .bind(job.completed_at)
        .bind(job.id.as_uuid())
        .execute(&mut **tx)
        .await
        .map_err(query_failed)?;

        Ok(())
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO jobs (id, owner_id, organization_id, status, current_step, steps, input,
                              artifacts, errors, created_at, updated_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(job.id.as_uuid())
        .bind(job.owner_id.as_str())
        .bind(job.organization_id.as_str())
        .bind(job.status.as_str())
        .bind(job.current_step.map(|s| s.as_str()))
        .bind(Json(&job.steps))
        .bind(Json(&job.input))
        .bind(Json(&job.artifacts))
        .bind(Json(&job.errors))
        .bind(job.created_at)
        .bind(job.updated_at)
        .bind(job.completed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::ConstraintViolation(db.message().to_string())
            }
            _ => query_failed(e),
        })?;

        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let row = sqlx::query_as::<_, JobRow>(&format!("{SELECT_JOB} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_failed)?;

        row.map(Job::try_from).transpose()
    }

    #[instrument(skip(self, events), fields(job_id = %id, events = events.len()))]
    async fn apply_transition(
        &self,
        id: JobId,
        events: &[StepEvent],
    ) -> Result<Job, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(query_failed)?;
        let job = Self::lock_job(&mut tx, id).await?;
        let next = job.apply_all(events)?;
        Self::save(&mut tx, &next).await?;
        tx.commit().await.map_err(query_failed)?;
        Ok(next)
    }

    #[instrument(skip(self, value), fields(job_id = %id, artifact = %value.name()))]
    async fn set_artifact(&self, id: JobId, value: ArtifactValue) -> Result<Job, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(query_failed)?;
        let mut job = Self::lock_job(&mut tx, id).await?;
        let name = value.name();

        if job.set_artifact(value) == ArtifactWrite::AlreadySet {
            tracing::warn!(artifact = %name, "Artifact already set; keeping existing value");
            return Ok(job);
        }

        Self::save(&mut tx, &job).await?;
        tx.commit().await.map_err(query_failed)?;
        Ok(job)
    }

    #[instrument(skip(self), fields(status = %status))]
    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<Job>, RepositoryError> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "{SELECT_JOB} WHERE status = $1 ORDER BY created_at DESC"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        rows.into_iter().map(Job::try_from).collect()
    }
}

#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    owner_id: String,
    organization_id: String,
    status: String,
    current_step: Option<String>,
    steps: Json<Vec<StepStatus>>,
    input: Json<InputSnapshot>,
    artifacts: Json<Artifacts>,
    errors: Json<Vec<String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<JobRow> for Job {
    type Error = RepositoryError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<JobStatus>()
            .map_err(RepositoryError::CorruptRecord)?;
        let current_step = row
            .current_step
            .map(|s| s.parse::<StepName>())
            .transpose()
            .map_err(RepositoryError::CorruptRecord)?;

        Ok(Job {
            id: JobId::from_uuid(row.id),
            owner_id: OwnerId::new(row.owner_id),
            organization_id: OrganizationId::new(row.organization_id),
            status,
            current_step,
            steps: row.steps.0,
            input: row.input.0,
            artifacts: row.artifacts.0,
            errors: row.errors.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
            completed_at: row.completed_at,
        })
    }
}

fn query_failed(e: sqlx::Error) -> RepositoryError {
    RepositoryError::QueryFailed(e.to_string())
}
