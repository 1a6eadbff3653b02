use super::db::{last_insert_id, with_transaction, Db};
use crate::libs::config::Config;
use crate::libs::error::StoreError;
use crate::libs::password::PasswordService;
use crate::libs::user::{User, UserProfile};
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

const USER_COLUMNS: &str = "id, full_name, cpf, email, job_title, login, profile";
const INSERT_USER: &str = "INSERT INTO users (full_name, cpf, email, job_title, login, password, profile) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const UPDATE_USER: &str = "UPDATE users SET full_name = ?2, cpf = ?3, email = ?4, job_title = ?5, login = ?6, profile = ?7 WHERE id = ?1";
const UPDATE_PASSWORD: &str = "UPDATE users SET password = ?2 WHERE id = ?1";
const DELETE_USER: &str = "DELETE FROM users WHERE id = ?1";
const SELECT_PASSWORD_BY_LOGIN: &str = "SELECT id, password FROM users WHERE login = ?1";

pub struct Users {
    conn: Connection,
    hash_cost: u32,
}

impl Users {
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        let db = Db::connect(&config.database)?;
        Ok(Self::from_db(db).with_hash_cost(config.security.effective_cost()))
    }

    pub fn from_db(db: Db) -> Self {
        Self {
            conn: db.conn,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    fn map_row(row: &Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            full_name: row.get(1)?,
            cpf: row.get(2)?,
            email: row.get(3)?,
            job_title: row.get(4)?,
            login: row.get(5)?,
            profile: row.get(6)?,
        })
    }

    /// Stores a new user with a bcrypt hash of `password`. Returns the new id.
    pub fn create(&mut self, user: &User, password: &str) -> Result<i32> {
        let hash = PasswordService::hash(password, self.hash_cost)?;
        let id = with_transaction(&mut self.conn, |tx| {
            tx.execute(
                INSERT_USER,
                params![user.full_name, user.cpf, user.email, user.job_title, user.login, hash, user.profile],
            )?;
            last_insert_id(tx)
        })?;
        debug!(user_id = id, login = %user.login, "user created");
        Ok(id)
    }

    pub fn update(&mut self, user: &User) -> Result<()> {
        let id = user.id.ok_or(StoreError::NotFound { entity: "user", id: 0 })?;
        let affected = self
            .conn
            .execute(
                UPDATE_USER,
                params![id, user.full_name, user.cpf, user.email, user.job_title, user.login, user.profile],
            )
            .map_err(StoreError::from)?;
        if affected == 0 {
            return Err(StoreError::NotFound { entity: "user", id }.into());
        }
        Ok(())
    }

    pub fn set_password(&mut self, id: i32, password: &str) -> Result<()> {
        let hash = PasswordService::hash(password, self.hash_cost)?;
        let affected = self.conn.execute(UPDATE_PASSWORD, params![id, hash])?;
        if affected == 0 {
            return Err(StoreError::NotFound { entity: "user", id }.into());
        }
        Ok(())
    }

    /// Memberships of the user are removed with it.
    pub fn delete(&mut self, id: i32) -> Result<()> {
        let affected = self.conn.execute(DELETE_USER, params![id]).map_err(StoreError::from)?;
        if affected == 0 {
            return Err(StoreError::NotFound { entity: "user", id }.into());
        }
        Ok(())
    }

    /// Returns the user when `password` matches the stored hash.
    pub fn authenticate(&mut self, login: &str, password: &str) -> Result<Option<User>> {
        let stored: Option<(i32, String)> = self
            .conn
            .query_row(SELECT_PASSWORD_BY_LOGIN, params![login], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?;

        match stored {
            Some((id, hash)) if PasswordService::verify(password, &hash) => self.get_by_id(id),
            _ => Ok(None),
        }
    }

    pub fn get_by_id(&mut self, id: i32) -> Result<Option<User>> {
        self.conn
            .query_row(&format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS), params![id], Self::map_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn get_by_login(&mut self, login: &str) -> Result<Option<User>> {
        self.conn
            .query_row(&format!("SELECT {} FROM users WHERE login = ?1", USER_COLUMNS), params![login], Self::map_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn list(&mut self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(&format!("SELECT {} FROM users ORDER BY full_name", USER_COLUMNS))?;
        let users = stmt.query_map([], Self::map_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    /// Users allowed to lead projects.
    pub fn managers(&mut self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM users WHERE profile IN (?1, ?2) ORDER BY full_name",
            USER_COLUMNS
        ))?;
        let users = stmt
            .query_map(params![UserProfile::Administrator, UserProfile::Manager], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }
}
