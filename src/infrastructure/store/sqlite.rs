//! SQLite 存储实现
//!
//! 使用 SQLite 作为后端，适合需要在重启后保留数据的场景。
//! 与内存存储一致，不对记录做唯一性约束，插入顺序由 rowid 保持。

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use tracing::info;

use crate::core::store::{RoleStore, UserStore};
use crate::domain::{Permission, Role, SeedData, User, UserStatus};
use crate::errors::{HrmsError, Result};

/// 当前表结构版本（写入 `PRAGMA user_version`）
const SCHEMA_VERSION: i32 = 1;

/// SQLite 存储
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    seed: Arc<SeedData>,
}

impl SqliteStore {
    /// 打开（或创建）数据库文件
    ///
    /// 全新数据库会写入种子数据；已有数据库保持原样
    pub fn new<P: AsRef<Path>>(db_path: P, seed: SeedData) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn, seed)
    }

    /// 创建内存数据库（用于测试）
    pub fn new_in_memory(seed: SeedData) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, seed)
    }

    fn from_connection(conn: Connection, seed: SeedData) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            seed: Arc::new(seed),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// 初始化数据库表结构
    fn init_schema(&self) -> Result<()> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| HrmsError::Storage(format!("Failed to acquire database lock: {}", e)))?;

        let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version >= SCHEMA_VERSION {
            return Ok(());
        }

        conn.execute_batch(
            "
            -- 角色表（id 不设主键，与内存存储一样允许重复）
            CREATE TABLE IF NOT EXISTS roles (
                id TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                permissions TEXT NOT NULL,
                is_default BOOLEAN NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            -- 用户表
            CREATE TABLE IF NOT EXISTS users (
                id TEXT NOT NULL,
                email TEXT NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                avatar TEXT,
                role_id TEXT NOT NULL,
                status TEXT NOT NULL,
                department TEXT,
                designation TEXT,
                employee_id TEXT,
                phone TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_roles_id ON roles(id);
            CREATE INDEX IF NOT EXISTS idx_users_id ON users(id);
            CREATE INDEX IF NOT EXISTS idx_users_role ON users(role_id);
            ",
        )?;

        let tx = conn.transaction()?;
        write_roles(&tx, &self.seed.roles)?;
        write_users(&tx, &self.seed.users)?;
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        tx.commit()?;

        info!(
            "Initialized SQLite schema v{} with {} roles and {} users",
            SCHEMA_VERSION,
            self.seed.roles.len(),
            self.seed.users.len()
        );
        Ok(())
    }

    /// 在阻塞线程池中执行数据库操作
    async fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(|e| {
                HrmsError::Storage(format!("Failed to acquire database lock: {}", e))
            })?;
            f(&mut conn)
        })
        .await
        .map_err(|e| HrmsError::Storage(format!("Task failed: {}", e)))?
    }
}

fn write_roles(conn: &Connection, roles: &[Role]) -> Result<()> {
    conn.execute("DELETE FROM roles", [])?;
    let mut stmt = conn.prepare(
        "INSERT INTO roles (id, name, description, permissions, is_default, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for role in roles {
        let permissions = serde_json::to_string(&role.permissions)?;
        stmt.execute(params![
            &role.id,
            &role.name,
            &role.description,
            permissions,
            role.is_default,
            role.created_at,
            role.updated_at,
        ])?;
    }
    Ok(())
}

fn write_users(conn: &Connection, users: &[User]) -> Result<()> {
    conn.execute("DELETE FROM users", [])?;
    let mut stmt = conn.prepare(
        "INSERT INTO users (
            id, email, first_name, last_name, avatar, role_id, status,
            department, designation, employee_id, phone, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    )?;
    for user in users {
        stmt.execute(params![
            &user.id,
            &user.email,
            &user.first_name,
            &user.last_name,
            &user.avatar,
            &user.role_id,
            user.status.as_str(),
            &user.department,
            &user.designation,
            &user.employee_id,
            &user.phone,
            user.created_at,
            user.updated_at,
        ])?;
    }
    Ok(())
}

const ROLE_COLUMNS: &str =
    "id, name, description, permissions, is_default, created_at, updated_at";

const USER_COLUMNS: &str = "id, email, first_name, last_name, avatar, role_id, status, \
     department, designation, employee_id, phone, created_at, updated_at";

fn role_from_row(row: &Row<'_>) -> rusqlite::Result<Role> {
    let permissions: String = row.get(3)?;
    let permissions: Vec<Permission> = serde_json::from_str(&permissions).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Role {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        permissions,
        is_default: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let status: String = row.get(6)?;
    let status: UserStatus = status.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, e.into())
    })?;

    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        avatar: row.get(4)?,
        role_id: row.get(5)?,
        status,
        department: row.get(7)?,
        designation: row.get(8)?,
        employee_id: row.get(9)?,
        phone: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

#[async_trait]
impl RoleStore for SqliteStore {
    async fn list_roles(&self) -> Result<Vec<Role>> {
        self.execute(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {} FROM roles ORDER BY rowid", ROLE_COLUMNS))?;
            let roles = stmt
                .query_map([], role_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(roles)
        })
        .await
    }

    async fn replace_roles(&self, roles: Vec<Role>) -> Result<()> {
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            write_roles(&tx, &roles)?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn reset_roles(&self) -> Result<()> {
        let seed = self.seed.clone();
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            write_roles(&tx, &seed.roles)?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    fn seeded_default_role_ids(&self) -> Vec<String> {
        self.seed.default_role_ids()
    }

    async fn find_role(&self, id: &str) -> Result<Option<Role>> {
        let id = id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM roles WHERE id = ?1 ORDER BY rowid LIMIT 1",
                ROLE_COLUMNS
            ))?;
            let mut rows = stmt.query_map([id], role_from_row)?;
            Ok(rows.next().transpose()?)
        })
        .await
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        self.execute(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {} FROM users ORDER BY rowid", USER_COLUMNS))?;
            let users = stmt
                .query_map([], user_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(users)
        })
        .await
    }

    async fn replace_users(&self, users: Vec<User>) -> Result<()> {
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            write_users(&tx, &users)?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn reset_users(&self) -> Result<()> {
        let seed = self.seed.clone();
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            write_users(&tx, &seed.users)?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>> {
        let id = id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM users WHERE id = ?1 ORDER BY rowid LIMIT 1",
                USER_COLUMNS
            ))?;
            let mut rows = stmt.query_map([id], user_from_row)?;
            Ok(rows.next().transpose()?)
        })
        .await
    }
}
