use super::error::UnknownVariant;
use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn code(&self) -> &'static str {
        match self {
            ProjectStatus::Planned => "PLANEJADO",
            ProjectStatus::InProgress => "EM_ANDAMENTO",
            ProjectStatus::Completed => "CONCLUIDO",
            ProjectStatus::Cancelled => "CANCELADO",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProjectStatus::Planned => "planned",
            ProjectStatus::InProgress => "in progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for ProjectStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "planejado" | "planned" => Ok(ProjectStatus::Planned),
            "em_andamento" | "in_progress" => Ok(ProjectStatus::InProgress),
            "concluido" | "completed" => Ok(ProjectStatus::Completed),
            "cancelado" | "cancelled" => Ok(ProjectStatus::Cancelled),
            _ => Err(UnknownVariant::new("project status", s)),
        }
    }
}

impl ToSql for ProjectStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for ProjectStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub planned_end_date: NaiveDate,
    pub status: ProjectStatus,
    pub manager_id: i32,
}

impl Project {
    pub fn new(name: &str, start_date: NaiveDate, planned_end_date: NaiveDate, manager_id: i32) -> Self {
        Project {
            id: None,
            name: name.to_string(),
            description: None,
            start_date,
            planned_end_date,
            status: ProjectStatus::Planned,
            manager_id,
        }
    }
}
