//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling using deadpool-postgres, plus a thin
//! repository wrapper (DbClient) over the accounts/tasks/comments tables.
//! All statements are parameterized; no SQL is built from request data.

use crate::error::{ApiError, ApiResult};
use crate::types::{CreateTaskRequest, UpdateTaskRequest};
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use std::collections::BTreeMap;
use std::time::Duration;
use taskhub_core::{Account, AccountId, Comment, CommentId, Task, TaskBrief, TaskId, TaskStatus};
use tokio_postgres::{NoTls, Row};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Connection timeout
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "taskhub".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("TASKHUB_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("TASKHUB_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("TASKHUB_DB_NAME").unwrap_or_else(|_| "taskhub".to_string()),
            user: std::env::var("TASKHUB_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("TASKHUB_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("TASKHUB_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("TASKHUB_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// DATABASE CLIENT WRAPPER
// ============================================================================

/// Database client that wraps a connection pool and provides
/// repository-style operations over accounts, tasks, and comments.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

impl DbClient {
    /// Create a new database client with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new database client from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get the current pool size for observability.
    pub fn pool_size(&self) -> usize {
        let status = self.pool.status();
        status.size
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> ApiResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// Liveness check used by the health endpoint.
    pub async fn ping(&self) -> ApiResult<()> {
        let conn = self.get_conn().await?;
        conn.query_one("SELECT 1", &[]).await?;
        Ok(())
    }

    // ========================================================================
    // ACCOUNT OPERATIONS
    // ========================================================================

    /// Create an account. Used by bootstrap tooling and DB-backed tests;
    /// signup/session handling lives outside this slice.
    pub async fn account_create(&self, email: &str) -> ApiResult<Account> {
        let conn = self.get_conn().await?;

        let row = conn
            .query_one(
                "INSERT INTO accounts (account_id, email, created_at) \
                 VALUES (gen_random_uuid(), $1, now()) \
                 RETURNING account_id, email, created_at",
                &[&email],
            )
            .await?;

        Ok(Account {
            account_id: row.get(0),
            email: row.get(1),
            created_at: row.get(2),
        })
    }

    /// Look up an account's email.
    pub async fn account_email(&self, account_id: AccountId) -> ApiResult<Option<String>> {
        let conn = self.get_conn().await?;

        let row = conn
            .query_opt(
                "SELECT email FROM accounts WHERE account_id = $1",
                &[&account_id],
            )
            .await?;

        Ok(row.map(|r| r.get(0)))
    }

    // ========================================================================
    // TASK OPERATIONS
    // ========================================================================

    /// Create a new task owned by the given account.
    pub async fn task_create(
        &self,
        req: &CreateTaskRequest,
        account_id: AccountId,
    ) -> ApiResult<Task> {
        let conn = self.get_conn().await?;

        let status = req.status.unwrap_or(TaskStatus::Pending);
        let row = conn
            .query_one(
                "INSERT INTO tasks \
                 (task_id, account_id, title, description, status, created_at, updated_at, active) \
                 VALUES (gen_random_uuid(), $1, $2, $3, $4, now(), now(), TRUE) \
                 RETURNING task_id, account_id, title, description, status, created_at, \
                 updated_at, active",
                &[&account_id, &req.title, &req.description, &status.as_str()],
            )
            .await?;

        task_from_row(&row)
    }

    /// Get an active task by id, scoped to the owning account.
    pub async fn task_get(&self, task_id: TaskId, account_id: AccountId) -> ApiResult<Option<Task>> {
        let conn = self.get_conn().await?;

        let row = conn
            .query_opt(
                "SELECT task_id, account_id, title, description, status, created_at, updated_at, \
                 active \
                 FROM tasks \
                 WHERE task_id = $1 AND account_id = $2 AND active = TRUE",
                &[&task_id, &account_id],
            )
            .await?;

        row.as_ref().map(task_from_row).transpose()
    }

    /// List active tasks for an account, most recent first.
    pub async fn task_list(&self, account_id: AccountId) -> ApiResult<Vec<Task>> {
        let conn = self.get_conn().await?;

        let rows = conn
            .query(
                "SELECT task_id, account_id, title, description, status, created_at, updated_at, \
                 active \
                 FROM tasks \
                 WHERE account_id = $1 AND active = TRUE \
                 ORDER BY created_at DESC",
                &[&account_id],
            )
            .await?;

        rows.iter().map(task_from_row).collect()
    }

    /// Update a task's title/description/status. Returns None when the id
    /// doesn't match an active task owned by the account.
    pub async fn task_update(
        &self,
        task_id: TaskId,
        account_id: AccountId,
        req: &UpdateTaskRequest,
    ) -> ApiResult<Option<Task>> {
        let conn = self.get_conn().await?;

        let status = req.status.map(|s| s.as_str());
        let row = conn
            .query_opt(
                "UPDATE tasks SET \
                 title = COALESCE($3, title), \
                 description = COALESCE($4, description), \
                 status = COALESCE($5, status), \
                 updated_at = now() \
                 WHERE task_id = $1 AND account_id = $2 AND active = TRUE \
                 RETURNING task_id, account_id, title, description, status, created_at, \
                 updated_at, active",
                &[&task_id, &account_id, &req.title, &req.description, &status],
            )
            .await?;

        row.as_ref().map(task_from_row).transpose()
    }

    /// Soft-delete a task. Idempotent: returns false when nothing matched.
    pub async fn task_delete(&self, task_id: TaskId, account_id: AccountId) -> ApiResult<bool> {
        let conn = self.get_conn().await?;

        let affected = conn
            .execute(
                "UPDATE tasks SET active = FALSE \
                 WHERE task_id = $1 AND account_id = $2 AND active = TRUE",
                &[&task_id, &account_id],
            )
            .await?;

        Ok(affected > 0)
    }

    // ========================================================================
    // CONTEXT AGGREGATION OPERATIONS
    // ========================================================================

    /// Group-by-status count over an account's active tasks.
    pub async fn task_status_histogram(
        &self,
        account_id: AccountId,
    ) -> ApiResult<BTreeMap<String, i64>> {
        let conn = self.get_conn().await?;

        let rows = conn
            .query(
                "SELECT status, COUNT(*) FROM tasks \
                 WHERE account_id = $1 AND active = TRUE \
                 GROUP BY status",
                &[&account_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| (row.get::<_, String>(0), row.get::<_, i64>(1)))
            .collect())
    }

    /// The most recently created active tasks, projected for the snapshot.
    pub async fn task_recent(
        &self,
        account_id: AccountId,
        limit: i64,
    ) -> ApiResult<Vec<TaskBrief>> {
        let conn = self.get_conn().await?;

        let rows = conn
            .query(
                "SELECT title, description, status FROM tasks \
                 WHERE account_id = $1 AND active = TRUE \
                 ORDER BY created_at DESC \
                 LIMIT $2",
                &[&account_id, &limit],
            )
            .await?;

        rows.iter()
            .map(|row| {
                Ok(TaskBrief {
                    title: row.get(0),
                    description: row.get(1),
                    status: parse_status(row.get(2))?,
                })
            })
            .collect()
    }

    // ========================================================================
    // COMMENT OPERATIONS
    // ========================================================================

    /// Create a comment on a task.
    pub async fn comment_create(
        &self,
        task_id: TaskId,
        account_id: AccountId,
        content: &str,
    ) -> ApiResult<Comment> {
        let conn = self.get_conn().await?;

        let row = conn
            .query_one(
                "INSERT INTO comments \
                 (comment_id, task_id, account_id, content, created_at, updated_at) \
                 VALUES (gen_random_uuid(), $1, $2, $3, now(), now()) \
                 RETURNING comment_id, task_id, account_id, content, created_at, updated_at",
                &[&task_id, &account_id, &content],
            )
            .await?;

        Ok(comment_from_row(&row))
    }

    /// List comments for a task, most recent first.
    pub async fn comment_list(
        &self,
        task_id: TaskId,
        account_id: AccountId,
    ) -> ApiResult<Vec<Comment>> {
        let conn = self.get_conn().await?;

        let rows = conn
            .query(
                "SELECT comment_id, task_id, account_id, content, created_at, updated_at \
                 FROM comments \
                 WHERE task_id = $1 AND account_id = $2 \
                 ORDER BY created_at DESC",
                &[&task_id, &account_id],
            )
            .await?;

        Ok(rows.iter().map(comment_from_row).collect())
    }

    /// Update a comment's content. The full (comment, task, account) triple
    /// must match an existing row; returns None otherwise.
    pub async fn comment_update(
        &self,
        comment_id: CommentId,
        task_id: TaskId,
        account_id: AccountId,
        content: &str,
    ) -> ApiResult<Option<Comment>> {
        let conn = self.get_conn().await?;

        let row = conn
            .query_opt(
                "UPDATE comments SET content = $4, updated_at = now() \
                 WHERE comment_id = $1 AND task_id = $2 AND account_id = $3 \
                 RETURNING comment_id, task_id, account_id, content, created_at, updated_at",
                &[&comment_id, &task_id, &account_id, &content],
            )
            .await?;

        Ok(row.as_ref().map(comment_from_row))
    }

    /// Delete a comment. Idempotent: deleting a missing id is not an error.
    pub async fn comment_delete(
        &self,
        comment_id: CommentId,
        task_id: TaskId,
        account_id: AccountId,
    ) -> ApiResult<bool> {
        let conn = self.get_conn().await?;

        let affected = conn
            .execute(
                "DELETE FROM comments \
                 WHERE comment_id = $1 AND task_id = $2 AND account_id = $3",
                &[&comment_id, &task_id, &account_id],
            )
            .await?;

        Ok(affected > 0)
    }
}

// ============================================================================
// ROW MAPPING
// ============================================================================

fn parse_status(raw: &str) -> ApiResult<TaskStatus> {
    raw.parse()
        .map_err(|e: String| ApiError::internal_error(format!("Corrupt task status: {}", e)))
}

fn task_from_row(row: &Row) -> ApiResult<Task> {
    Ok(Task {
        task_id: row.get(0),
        account_id: row.get(1),
        title: row.get(2),
        description: row.get(3),
        status: parse_status(row.get(4))?,
        created_at: row.get(5),
        updated_at: row.get(6),
        active: row.get(7),
    })
}

fn comment_from_row(row: &Row) -> Comment {
    Comment {
        comment_id: row.get(0),
        task_id: row.get(1),
        account_id: row.get(2),
        content: row.get(3),
        created_at: row.get(4),
        updated_at: row.get(5),
    }
}
