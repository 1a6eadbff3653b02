use super::error::UnknownVariant;
use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Completed];

    pub fn code(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDENTE",
            TaskStatus::InProgress => "EM_EXECUCAO",
            TaskStatus::Completed => "CONCLUIDA",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in progress",
            TaskStatus::Completed => "completed",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "pendente" | "pending" => Ok(TaskStatus::Pending),
            "em_execucao" | "in_progress" => Ok(TaskStatus::InProgress),
            "concluida" | "completed" | "done" => Ok(TaskStatus::Completed),
            _ => Err(UnknownVariant::new("task status", s)),
        }
    }
}

impl ToSql for TaskStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for TaskStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub project_id: i32,
    pub responsible_id: i32,
    pub status: TaskStatus,
    pub planned_start_date: NaiveDate,
    pub planned_end_date: NaiveDate,
    pub actual_start_date: Option<NaiveDate>,
    pub actual_end_date: Option<NaiveDate>,
}

impl Task {
    pub fn new(title: &str, project_id: i32, responsible_id: i32, planned_start_date: NaiveDate, planned_end_date: NaiveDate) -> Self {
        Task {
            id: None,
            title: title.to_string(),
            description: None,
            project_id,
            responsible_id,
            status: TaskStatus::Pending,
            planned_start_date,
            planned_end_date,
            actual_start_date: None,
            actual_end_date: None,
        }
    }

    /// Not completed and due strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Completed && self.planned_end_date < today
    }
}

#[derive(Debug, Clone)]
pub enum TaskFilter {
    All,
    ByProject(i32),
    ByStatus(TaskStatus),
    ByResponsible(i32),
}
