use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

use super::{SharedConfig, Store};
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Maps a unique/primary-key violation onto the ordinary Conflict outcome;
/// the constraint is the backstop for check-then-insert races.
fn map_conflict(e: rusqlite::Error) -> Error {
    match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::Conflict
        }
        e => Error::from(e),
    }
}

fn column_kind(idx: usize, v: i64) -> rusqlite::Result<ConfigKind> {
    ConfigKind::try_from(v)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

fn column_format(idx: usize, v: i64) -> rusqlite::Result<ConfigFormat> {
    ConfigFormat::try_from(v)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

const USER_COLUMNS: &str = "id, username, email, password_hash, nickname, bio, created_at";

fn user_from_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        nickname: row.get(4)?,
        bio: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

const CONFIG_COLUMNS: &str =
    "id, owner_id, kind, name, content, format, remark, created_at, modified_at, deleted";

fn config_from_row(row: &rusqlite::Row) -> rusqlite::Result<Config> {
    Ok(Config {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        kind: column_kind(2, row.get(2)?)?,
        name: row.get(3)?,
        content: row.get(4)?,
        format: column_format(5, row.get(5)?)?,
        remark: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
        modified_at: parse_datetime(&row.get::<_, String>(8)?),
        deleted: row.get(9)?,
    })
}

const PLAN_COLUMNS: &str = "id, owner_id, name, remark, created_at, modified_at, deleted";

fn plan_from_row(row: &rusqlite::Row) -> rusqlite::Result<Plan> {
    Ok(Plan {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        remark: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
        modified_at: parse_datetime(&row.get::<_, String>(5)?),
        deleted: row.get(6)?,
    })
}

fn share_summary_from_row(row: &rusqlite::Row) -> rusqlite::Result<ShareSummary> {
    Ok(ShareSummary {
        id: row.get(0)?,
        remark: row.get(1)?,
        created_at: parse_datetime(&row.get::<_, String>(2)?),
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        nickname: &str,
    ) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO users (username, email, password_hash, nickname, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                username,
                email,
                password_hash,
                nickname,
                format_datetime(&Utc::now()),
            ],
        )
        .map_err(map_conflict)?;
        Ok(conn.last_insert_rowid())
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            params![username],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    // Config operations

    fn create_config(
        &self,
        owner_id: i64,
        kind: ConfigKind,
        name: &str,
        content: &str,
        format: ConfigFormat,
        remark: &str,
    ) -> Result<i64> {
        let now = format_datetime(&Utc::now());
        let conn = self.conn();
        conn.execute(
            "INSERT INTO configs (owner_id, kind, name, content, format, remark, created_at, modified_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                owner_id,
                i64::from(kind),
                name,
                content,
                i64::from(format),
                remark,
                now,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_config(&self, id: i64) -> Result<Option<Config>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {CONFIG_COLUMNS} FROM configs WHERE id = ?1"),
            params![id],
            config_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn config_owner(&self, id: i64) -> Result<Option<i64>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT owner_id FROM configs WHERE id = ?1 AND deleted = 0",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_configs(
        &self,
        owner_id: i64,
        sort: SortBy,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Config>> {
        let conn = self.conn();
        // sort column comes from the SortBy whitelist, never from the client
        let mut stmt = conn.prepare(&format!(
            "SELECT {CONFIG_COLUMNS} FROM configs
             WHERE owner_id = ?1 AND deleted = 0
             ORDER BY {} LIMIT ?3 OFFSET ?2",
            sort.column()
        ))?;

        let rows = stmt.query_map(params![owner_id, offset, limit], config_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_config(
        &self,
        id: i64,
        name: &str,
        content: &str,
        format: ConfigFormat,
        remark: &str,
    ) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE configs SET name = ?1, content = ?2, format = ?3, remark = ?4, modified_at = ?5
             WHERE id = ?6 AND deleted = 0",
            params![
                name,
                content,
                i64::from(format),
                remark,
                format_datetime(&Utc::now()),
                id
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn soft_delete_config(&self, id: i64) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE configs SET deleted = 1, modified_at = ?1 WHERE id = ?2 AND deleted = 0",
            params![format_datetime(&Utc::now()), id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Config share operations

    fn create_config_share(&self, config_id: i64, remark: &str) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO config_shares (config_id, remark, created_at) VALUES (?1, ?2, ?3)",
            params![config_id, remark, format_datetime(&Utc::now())],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_config_share(&self, id: i64) -> Result<Option<ConfigShare>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, config_id, remark, created_at, deleted FROM config_shares WHERE id = ?1",
            params![id],
            |row| {
                Ok(ConfigShare {
                    id: row.get(0)?,
                    config_id: row.get(1)?,
                    remark: row.get(2)?,
                    created_at: parse_datetime(&row.get::<_, String>(3)?),
                    deleted: row.get(4)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn config_share_owner(&self, id: i64) -> Result<Option<i64>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT c.owner_id FROM configs c
             JOIN config_shares s ON c.id = s.config_id
             WHERE s.id = ?1 AND s.deleted = 0 AND c.deleted = 0",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_config_share_remark(&self, id: i64, remark: &str) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE config_shares SET remark = ?1 WHERE id = ?2 AND deleted = 0",
            params![remark, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn soft_delete_config_share(&self, id: i64) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE config_shares SET deleted = 1 WHERE id = ?1 AND deleted = 0",
            params![id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn list_config_shares(&self, config_id: i64) -> Result<Vec<ShareSummary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, remark, created_at FROM config_shares
             WHERE config_id = ?1 AND deleted = 0 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![config_id], share_summary_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Plan operations

    fn create_plan(&self, owner_id: i64, name: &str, remark: &str) -> Result<i64> {
        let now = format_datetime(&Utc::now());
        let conn = self.conn();
        conn.execute(
            "INSERT INTO plans (owner_id, name, remark, created_at, modified_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![owner_id, name, remark, now],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_plan(&self, id: i64) -> Result<Option<Plan>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = ?1"),
            params![id],
            plan_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn plan_owner(&self, id: i64) -> Result<Option<i64>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT owner_id FROM plans WHERE id = ?1 AND deleted = 0",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_plans(
        &self,
        owner_id: i64,
        sort: SortBy,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Plan>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans
             WHERE owner_id = ?1 AND deleted = 0
             ORDER BY {} LIMIT ?3 OFFSET ?2",
            sort.column()
        ))?;

        let rows = stmt.query_map(params![owner_id, offset, limit], plan_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_plan(&self, id: i64, name: &str, remark: &str) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE plans SET name = ?1, remark = ?2, modified_at = ?3 WHERE id = ?4 AND deleted = 0",
            params![name, remark, format_datetime(&Utc::now()), id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn soft_delete_plan(&self, id: i64) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE plans SET deleted = 1, modified_at = ?1 WHERE id = ?2 AND deleted = 0",
            params![format_datetime(&Utc::now()), id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Plan membership

    fn add_plan_config_relation(&self, plan_id: i64, config_id: i64) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO plan_config_relations (plan_id, config_id) VALUES (?1, ?2)",
            params![plan_id, config_id],
        )
        .map_err(map_conflict)?;
        tx.execute(
            "UPDATE plans SET modified_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), plan_id],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn remove_plan_config_relation(&self, plan_id: i64, config_id: i64) -> Result<bool> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let rows = tx.execute(
            "DELETE FROM plan_config_relations WHERE plan_id = ?1 AND config_id = ?2",
            params![plan_id, config_id],
        )?;
        if rows > 0 {
            tx.execute(
                "UPDATE plans SET modified_at = ?1 WHERE id = ?2",
                params![format_datetime(&Utc::now()), plan_id],
            )?;
        }

        tx.commit()?;
        Ok(rows > 0)
    }

    fn add_plan_share_relation(&self, plan_id: i64, config_share_id: i64) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO plan_config_share_relations (plan_id, config_share_id) VALUES (?1, ?2)",
            params![plan_id, config_share_id],
        )
        .map_err(map_conflict)?;
        tx.execute(
            "UPDATE plans SET modified_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), plan_id],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn remove_plan_share_relation(&self, plan_id: i64, config_share_id: i64) -> Result<bool> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let rows = tx.execute(
            "DELETE FROM plan_config_share_relations WHERE plan_id = ?1 AND config_share_id = ?2",
            params![plan_id, config_share_id],
        )?;
        if rows > 0 {
            tx.execute(
                "UPDATE plans SET modified_at = ?1 WHERE id = ?2",
                params![format_datetime(&Utc::now()), plan_id],
            )?;
        }

        tx.commit()?;
        Ok(rows > 0)
    }

    fn list_plan_direct_configs(&self, plan_id: i64) -> Result<Vec<Config>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {CONFIG_COLUMNS} FROM configs
             WHERE deleted = 0 AND id IN (
                 SELECT config_id FROM plan_config_relations WHERE plan_id = ?1
             )
             ORDER BY id"
        ))?;

        let rows = stmt.query_map(params![plan_id], config_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_plan_shared_configs(&self, plan_id: i64) -> Result<Vec<SharedConfig>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT s.id, c.id, c.owner_id, c.kind, c.name, c.content, c.format, c.remark,
                    c.created_at, c.modified_at, c.deleted
             FROM configs c
             JOIN config_shares s ON c.id = s.config_id
             WHERE c.deleted = 0 AND s.deleted = 0 AND s.id IN (
                 SELECT config_share_id FROM plan_config_share_relations WHERE plan_id = ?1
             )
             ORDER BY s.id",
        )?;

        let rows = stmt.query_map(params![plan_id], |row| {
            Ok(SharedConfig {
                share_id: row.get(0)?,
                config: Config {
                    id: row.get(1)?,
                    owner_id: row.get(2)?,
                    kind: column_kind(3, row.get(3)?)?,
                    name: row.get(4)?,
                    content: row.get(5)?,
                    format: column_format(6, row.get(6)?)?,
                    remark: row.get(7)?,
                    created_at: parse_datetime(&row.get::<_, String>(8)?),
                    modified_at: parse_datetime(&row.get::<_, String>(9)?),
                    deleted: row.get(10)?,
                },
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Plan share operations

    fn create_plan_share(&self, plan_id: i64, remark: &str) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO plan_shares (plan_id, remark, created_at) VALUES (?1, ?2, ?3)",
            params![plan_id, remark, format_datetime(&Utc::now())],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_plan_share(&self, id: i64) -> Result<Option<PlanShare>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, plan_id, remark, created_at, deleted FROM plan_shares WHERE id = ?1",
            params![id],
            |row| {
                Ok(PlanShare {
                    id: row.get(0)?,
                    plan_id: row.get(1)?,
                    remark: row.get(2)?,
                    created_at: parse_datetime(&row.get::<_, String>(3)?),
                    deleted: row.get(4)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn plan_share_owner(&self, id: i64) -> Result<Option<i64>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT p.owner_id FROM plans p
             JOIN plan_shares s ON p.id = s.plan_id
             WHERE s.id = ?1 AND s.deleted = 0 AND p.deleted = 0",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_plan_share_remark(&self, id: i64, remark: &str) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE plan_shares SET remark = ?1 WHERE id = ?2 AND deleted = 0",
            params![remark, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn soft_delete_plan_share(&self, id: i64) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE plan_shares SET deleted = 1 WHERE id = ?1 AND deleted = 0",
            params![id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn list_plan_shares(&self, plan_id: i64) -> Result<Vec<ShareSummary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, remark, created_at FROM plan_shares
             WHERE plan_id = ?1 AND deleted = 0 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![plan_id], share_summary_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Session token operations

    fn replace_login_token(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM login_tokens WHERE user_id = ?1",
            params![user_id],
        )?;
        tx.execute(
            "INSERT INTO login_tokens (user_id, token, expires_at) VALUES (?1, ?2, ?3)",
            params![user_id, token, format_datetime(&expires_at)],
        )
        .map_err(map_conflict)?;

        tx.commit()?;
        Ok(())
    }

    fn get_login_token(&self, token: &str) -> Result<Option<LoginToken>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, user_id, token, expires_at FROM login_tokens WHERE token = ?1",
            params![token],
            |row| {
                Ok(LoginToken {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    token: row.get(2)?,
                    expires_at: parse_datetime(&row.get::<_, String>(3)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn delete_login_token(&self, token: &str) -> Result<()> {
        self.conn()
            .execute("DELETE FROM login_tokens WHERE token = ?1", params![token])?;
        Ok(())
    }

    fn purge_expired_login_tokens(&self, now: DateTime<Utc>) -> Result<usize> {
        let rows = self.conn().execute(
            "DELETE FROM login_tokens WHERE expires_at < ?1",
            params![format_datetime(&now)],
        )?;
        Ok(rows)
    }

    // Plan token operations

    fn create_plan_token(&self, plan_id: i64, token: &str, cap: i64) -> Result<()> {
        let mut conn = self.conn();
        // Immediate transaction: the count and the insert must see the same
        // state, or two issuers at cap-1 would both succeed.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let count: i64 = tx.query_row(
            "SELECT COUNT(*) FROM plan_tokens WHERE plan_id = ?1",
            params![plan_id],
            |row| row.get(0),
        )?;
        if count >= cap {
            return Err(Error::LimitExceeded);
        }

        tx.execute(
            "INSERT INTO plan_tokens (plan_id, token, created_at) VALUES (?1, ?2, ?3)",
            params![plan_id, token, format_datetime(&Utc::now())],
        )
        .map_err(map_conflict)?;

        tx.commit()?;
        Ok(())
    }

    fn get_plan_token(&self, token: &str) -> Result<Option<PlanToken>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, plan_id, token, created_at FROM plan_tokens WHERE token = ?1",
            params![token],
            |row| {
                Ok(PlanToken {
                    id: row.get(0)?,
                    plan_id: row.get(1)?,
                    token: row.get(2)?,
                    created_at: parse_datetime(&row.get::<_, String>(3)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn resolve_plan_token(&self, token: &str) -> Result<Option<i64>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT p.id FROM plans p
             JOIN plan_tokens t ON p.id = t.plan_id
             WHERE t.token = ?1 AND p.deleted = 0",
            params![token],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
    }

    fn delete_plan_token(&self, token: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM plan_tokens WHERE token = ?1", params![token])?;
        Ok(rows > 0)
    }

    fn list_plan_tokens(&self, plan_id: i64) -> Result<Vec<PlanToken>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, plan_id, token, created_at FROM plan_tokens
             WHERE plan_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![plan_id], |row| {
            Ok(PlanToken {
                id: row.get(0)?,
                plan_id: row.get(1)?,
                token: row.get(2)?,
                created_at: parse_datetime(&row.get::<_, String>(3)?),
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Favorite operations

    fn add_favorite_config(&self, user_id: i64, config_share_id: i64) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO user_favorite_configs (user_id, config_share_id, created_at)
                 VALUES (?1, ?2, ?3)",
                params![user_id, config_share_id, format_datetime(&Utc::now())],
            )
            .map_err(map_conflict)?;
        Ok(())
    }

    fn remove_favorite_config(&self, user_id: i64, config_share_id: i64) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM user_favorite_configs WHERE user_id = ?1 AND config_share_id = ?2",
            params![user_id, config_share_id],
        )?;
        Ok(rows > 0)
    }

    fn list_favorite_configs(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<FavoriteConfigSummary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT s.id, f.created_at, c.name, c.remark, c.kind, c.format,
                    c.created_at, c.modified_at
             FROM configs c
             JOIN config_shares s ON c.id = s.config_id
             JOIN user_favorite_configs f ON s.id = f.config_share_id
             WHERE c.deleted = 0 AND s.deleted = 0 AND f.user_id = ?1
             ORDER BY s.id LIMIT ?3 OFFSET ?2",
        )?;

        let rows = stmt.query_map(params![user_id, offset, limit], |row| {
            Ok(FavoriteConfigSummary {
                share_id: row.get(0)?,
                favored_at: parse_datetime(&row.get::<_, String>(1)?),
                name: row.get(2)?,
                remark: row.get(3)?,
                kind: column_kind(4, row.get(4)?)?,
                format: column_format(5, row.get(5)?)?,
                created_at: parse_datetime(&row.get::<_, String>(6)?),
                modified_at: parse_datetime(&row.get::<_, String>(7)?),
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn add_favorite_plan(&self, user_id: i64, plan_share_id: i64) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO user_favorite_plans (user_id, plan_share_id, created_at)
                 VALUES (?1, ?2, ?3)",
                params![user_id, plan_share_id, format_datetime(&Utc::now())],
            )
            .map_err(map_conflict)?;
        Ok(())
    }

    fn remove_favorite_plan(&self, user_id: i64, plan_share_id: i64) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM user_favorite_plans WHERE user_id = ?1 AND plan_share_id = ?2",
            params![user_id, plan_share_id],
        )?;
        Ok(rows > 0)
    }

    fn list_favorite_plans(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<FavoritePlanSummary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT s.id, f.created_at, p.name, p.remark, p.created_at, p.modified_at
             FROM plans p
             JOIN plan_shares s ON p.id = s.plan_id
             JOIN user_favorite_plans f ON s.id = f.plan_share_id
             WHERE p.deleted = 0 AND s.deleted = 0 AND f.user_id = ?1
             ORDER BY s.id LIMIT ?3 OFFSET ?2",
        )?;

        let rows = stmt.query_map(params![user_id, offset, limit], |row| {
            Ok(FavoritePlanSummary {
                share_id: row.get(0)?,
                favored_at: parse_datetime(&row.get::<_, String>(1)?),
                name: row.get(2)?,
                remark: row.get(3)?,
                created_at: parse_datetime(&row.get::<_, String>(4)?),
                modified_at: parse_datetime(&row.get::<_, String>(5)?),
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}
