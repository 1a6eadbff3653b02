use super::db::{last_insert_id, with_transaction, Db};
use crate::libs::error::StoreError;
use crate::libs::task::{Task, TaskFilter, TaskStatus};
use anyhow::Result;
use chrono::{Days, NaiveDate};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const TASK_COLUMNS: &str = "id, title, description, project_id, responsible_id, status, planned_start_date, planned_end_date, actual_start_date, actual_end_date";
const INSERT_TASK: &str = "INSERT INTO tasks (title, description, project_id, responsible_id, status, planned_start_date, planned_end_date, actual_start_date, actual_end_date) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
const UPDATE_TASK: &str = "UPDATE tasks SET title = ?2, description = ?3, project_id = ?4, responsible_id = ?5, status = ?6, planned_start_date = ?7, planned_end_date = ?8, actual_start_date = ?9, actual_end_date = ?10 WHERE id = ?1";
const UPDATE_STATUS: &str = "UPDATE tasks SET status = ?2 WHERE id = ?1";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const ORDER_BY_DUE: &str = "ORDER BY planned_end_date, id";

/// Deadline window of the "upcoming and overdue" list.
pub const UPCOMING_WINDOW_DAYS: u64 = 7;

pub struct Tasks {
    pub conn: Connection,
}

impl Tasks {
    pub fn new() -> Result<Tasks> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn from_db(db: Db) -> Self {
        Tasks { conn: db.conn }
    }

    fn map_row(row: &Row) -> rusqlite::Result<Task> {
        Ok(Task {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            project_id: row.get(3)?,
            responsible_id: row.get(4)?,
            status: row.get(5)?,
            planned_start_date: row.get(6)?,
            planned_end_date: row.get(7)?,
            actual_start_date: row.get(8)?,
            actual_end_date: row.get(9)?,
        })
    }

    pub fn insert(&mut self, task: &Task) -> Result<i32> {
        let id = with_transaction(&mut self.conn, |tx| {
            tx.execute(
                INSERT_TASK,
                params![
                    task.title,
                    task.description,
                    task.project_id,
                    task.responsible_id,
                    task.status,
                    task.planned_start_date,
                    task.planned_end_date,
                    task.actual_start_date,
                    task.actual_end_date
                ],
            )?;
            last_insert_id(tx)
        })?;
        Ok(id)
    }

    pub fn update(&mut self, task: &Task) -> Result<()> {
        let id = task.id.ok_or(StoreError::NotFound { entity: "task", id: 0 })?;
        let affected = self
            .conn
            .execute(
                UPDATE_TASK,
                params![
                    id,
                    task.title,
                    task.description,
                    task.project_id,
                    task.responsible_id,
                    task.status,
                    task.planned_start_date,
                    task.planned_end_date,
                    task.actual_start_date,
                    task.actual_end_date
                ],
            )
            .map_err(StoreError::from)?;
        if affected == 0 {
            return Err(StoreError::NotFound { entity: "task", id }.into());
        }
        Ok(())
    }

    pub fn set_status(&mut self, id: i32, status: TaskStatus) -> Result<()> {
        let affected = self.conn.execute(UPDATE_STATUS, params![id, status])?;
        if affected == 0 {
            return Err(StoreError::NotFound { entity: "task", id }.into());
        }
        Ok(())
    }

    pub fn delete(&mut self, id: i32) -> Result<usize> {
        Ok(self.conn.execute(DELETE_TASK, params![id])?)
    }

    pub fn get_by_id(&mut self, id: i32) -> Result<Option<Task>> {
        self.conn
            .query_row(&format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS), params![id], Self::map_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn fetch(&mut self, filter: TaskFilter) -> Result<Vec<Task>> {
        let (condition, params): (&str, Vec<Box<dyn rusqlite::ToSql>>) = match filter {
            TaskFilter::All => ("", vec![]),
            TaskFilter::ByProject(id) => ("WHERE project_id = ?1", vec![Box::new(id)]),
            TaskFilter::ByStatus(status) => ("WHERE status = ?1", vec![Box::new(status)]),
            TaskFilter::ByResponsible(id) => ("WHERE responsible_id = ?1", vec![Box::new(id)]),
        };

        let mut stmt = self.conn.prepare(&format!("SELECT {} FROM tasks {} {}", TASK_COLUMNS, condition, ORDER_BY_DUE))?;
        let tasks = stmt
            .query_map(params_from_iter(params.iter()), Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    /// Tasks not yet completed whose planned end is on or before
    /// `today + UPCOMING_WINDOW_DAYS`, overdue ones included, soonest first.
    pub fn upcoming_and_overdue(&mut self, today: NaiveDate) -> Result<Vec<Task>> {
        let horizon = today.checked_add_days(Days::new(UPCOMING_WINDOW_DAYS)).unwrap_or(NaiveDate::MAX);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM tasks WHERE status != ?1 AND planned_end_date <= ?2 {}",
            TASK_COLUMNS, ORDER_BY_DUE
        ))?;
        let tasks = stmt
            .query_map(params![TaskStatus::Completed, horizon], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }
}
