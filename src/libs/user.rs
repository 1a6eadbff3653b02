use super::error::UnknownVariant;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access profile of a user. Stored by its database code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserProfile {
    Administrator,
    Manager,
    Collaborator,
}

impl UserProfile {
    pub const ALL: [UserProfile; 3] = [UserProfile::Administrator, UserProfile::Manager, UserProfile::Collaborator];

    pub fn code(&self) -> &'static str {
        match self {
            UserProfile::Administrator => "ADMINISTRADOR",
            UserProfile::Manager => "GERENTE",
            UserProfile::Collaborator => "COLABORADOR",
        }
    }

    /// Administrators and managers may lead projects.
    pub fn can_manage(&self) -> bool {
        matches!(self, UserProfile::Administrator | UserProfile::Manager)
    }
}

impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UserProfile::Administrator => "administrator",
            UserProfile::Manager => "manager",
            UserProfile::Collaborator => "collaborator",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for UserProfile {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "administrador" | "administrator" | "admin" => Ok(UserProfile::Administrator),
            "gerente" | "manager" => Ok(UserProfile::Manager),
            "colaborador" | "collaborator" => Ok(UserProfile::Collaborator),
            _ => Err(UnknownVariant::new("user profile", s)),
        }
    }
}

impl ToSql for UserProfile {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for UserProfile {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A person who can log in and belong to teams.
///
/// The password hash is never loaded into this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i32>,
    pub full_name: String,
    pub cpf: String,
    pub email: String,
    pub job_title: Option<String>,
    pub login: String,
    pub profile: UserProfile,
}

impl User {
    pub fn new(full_name: &str, cpf: &str, email: &str, login: &str, profile: UserProfile) -> Self {
        User {
            id: None,
            full_name: full_name.to_string(),
            cpf: cpf.to_string(),
            email: email.to_string(),
            job_title: None,
            login: login.to_string(),
            profile,
        }
    }

    pub fn with_job_title(mut self, job_title: &str) -> Self {
        self.job_title = Some(job_title.to_string());
        self
    }
}
