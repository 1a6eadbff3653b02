use super::db::{last_insert_id, with_transaction, Db};
use crate::libs::error::StoreError;
use crate::libs::project::Project;
use crate::libs::team::Team;
use anyhow::Result;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

const PROJECT_COLUMNS: &str = "id, name, description, start_date, planned_end_date, status, manager_id";
const INSERT_PROJECT: &str = "INSERT INTO projects (name, description, start_date, planned_end_date, status, manager_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const UPDATE_PROJECT: &str = "UPDATE projects SET name = ?2, description = ?3, start_date = ?4, planned_end_date = ?5, status = ?6, manager_id = ?7 WHERE id = ?1";
const DELETE_PROJECT: &str = "DELETE FROM projects WHERE id = ?1";
const INSERT_PROJECT_TEAM: &str = "INSERT INTO project_teams (project_id, team_id) VALUES (?1, ?2)";
const DELETE_PROJECT_TEAM: &str = "DELETE FROM project_teams WHERE project_id = ?1 AND team_id = ?2";
const SELECT_PROJECT_TEAMS: &str = "
    SELECT t.id, t.name, t.description FROM teams t
    JOIN project_teams pt ON t.id = pt.team_id
    WHERE pt.project_id = ?1
    ORDER BY t.name
";

pub struct Projects {
    conn: Connection,
}

impl Projects {
    pub fn new() -> Result<Self> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn from_db(db: Db) -> Self {
        Self { conn: db.conn }
    }

    fn map_row(row: &Row) -> rusqlite::Result<Project> {
        Ok(Project {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            start_date: row.get(3)?,
            planned_end_date: row.get(4)?,
            status: row.get(5)?,
            manager_id: row.get(6)?,
        })
    }

    pub fn create(&mut self, project: &Project) -> Result<i32> {
        let id = with_transaction(&mut self.conn, |tx| {
            tx.execute(
                INSERT_PROJECT,
                params![
                    project.name,
                    project.description,
                    project.start_date,
                    project.planned_end_date,
                    project.status,
                    project.manager_id
                ],
            )?;
            last_insert_id(tx)
        })?;
        Ok(id)
    }

    pub fn update(&mut self, project: &Project) -> Result<()> {
        let id = project.id.ok_or(StoreError::NotFound { entity: "project", id: 0 })?;
        let affected = self
            .conn
            .execute(
                UPDATE_PROJECT,
                params![
                    id,
                    project.name,
                    project.description,
                    project.start_date,
                    project.planned_end_date,
                    project.status,
                    project.manager_id
                ],
            )
            .map_err(StoreError::from)?;
        if affected == 0 {
            return Err(StoreError::NotFound { entity: "project", id }.into());
        }
        Ok(())
    }

    /// Tasks and team allocations of the project are removed with it.
    pub fn delete(&mut self, id: i32) -> Result<()> {
        let affected = self.conn.execute(DELETE_PROJECT, params![id]).map_err(StoreError::from)?;
        if affected == 0 {
            return Err(StoreError::NotFound { entity: "project", id }.into());
        }
        Ok(())
    }

    pub fn get_by_id(&mut self, id: i32) -> Result<Option<Project>> {
        self.conn
            .query_row(&format!("SELECT {} FROM projects WHERE id = ?1", PROJECT_COLUMNS), params![id], Self::map_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn list(&mut self) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!("SELECT {} FROM projects ORDER BY name", PROJECT_COLUMNS))?;
        let projects = stmt.query_map([], Self::map_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(projects)
    }

    /// Allocates a team to a project.
    ///
    /// Returns `false` when the team was already allocated.
    pub fn assign_team(&mut self, project_id: i32, team_id: i32) -> Result<bool> {
        match self.conn.execute(INSERT_PROJECT_TEAM, params![project_id, team_id]) {
            Ok(_) => Ok(true),
            Err(e) if is_duplicate(&e) => Ok(false),
            Err(e) => Err(StoreError::from(e).into()),
        }
    }

    pub fn unassign_team(&mut self, project_id: i32, team_id: i32) -> Result<bool> {
        let affected = self.conn.execute(DELETE_PROJECT_TEAM, params![project_id, team_id])?;
        Ok(affected > 0)
    }

    pub fn teams(&mut self, project_id: i32) -> Result<Vec<Team>> {
        let mut stmt = self.conn.prepare(SELECT_PROJECT_TEAMS)?;
        let teams = stmt
            .query_map(params![project_id], |row| {
                Ok(Team {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(teams)
    }
}

fn is_duplicate(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        }
        _ => false,
    }
}
