//! Teams and their membership.
//!
//! A team's member set is never edited row by row. Callers stage changes in a
//! [`MemberSelection`] and hand the complete target set to
//! [`Teams::reconcile_members`], which replaces the stored set in a single
//! transaction: delete every membership row of the team, then insert one row
//! per target member. Any failure rolls the whole transaction back, so the
//! stored set is either the full target or exactly what it was before.
//!
//! Concurrent reconciliations of the same team are not coordinated beyond
//! SQLite's own locking. Writers are serialized at `BEGIN IMMEDIATE`, so the
//! last one to commit wins; a writer that cannot get the lock within the busy
//! timeout fails with [`StoreError::Transient`].

use super::db::{last_insert_id, with_transaction, Db};
use crate::libs::error::StoreError;
use crate::libs::team::{MemberSelection, Team};
use crate::libs::user::User;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::collections::BTreeSet;
use tracing::{debug, info};

const INSERT_TEAM: &str = "INSERT INTO teams (name, description) VALUES (?1, ?2)";
const UPDATE_TEAM: &str = "UPDATE teams SET name = ?2, description = ?3 WHERE id = ?1";
const DELETE_TEAM: &str = "DELETE FROM teams WHERE id = ?1";
const SELECT_TEAMS: &str = "SELECT id, name, description FROM teams ORDER BY name";
const SELECT_TEAM_BY_ID: &str = "SELECT id, name, description FROM teams WHERE id = ?1";
const DELETE_TEAM_MEMBERS: &str = "DELETE FROM team_members WHERE team_id = ?1";
const INSERT_TEAM_MEMBER: &str = "INSERT INTO team_members (team_id, user_id) VALUES (?1, ?2)";
const SELECT_MEMBER_IDS: &str = "SELECT user_id FROM team_members WHERE team_id = ?1 ORDER BY user_id";
const SELECT_MEMBERS: &str = "
    SELECT u.id, u.full_name, u.cpf, u.email, u.job_title, u.login, u.profile
    FROM users u
    JOIN team_members tm ON u.id = tm.user_id
    WHERE tm.team_id = ?1
    ORDER BY u.full_name
";

pub struct Teams {
    conn: Connection,
}

impl Teams {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn from_db(db: Db) -> Self {
        Self { conn: db.conn }
    }

    /// Creates a team with no members.
    pub fn create(&mut self, team: &Team) -> Result<i32, StoreError> {
        self.create_with_members(team, std::iter::empty())
    }

    /// Inserts the team row and its initial members in one transaction.
    ///
    /// Returns the generated team id. Nothing is stored if any member insert
    /// fails.
    pub fn create_with_members<I>(&mut self, team: &Team, member_ids: I) -> Result<i32, StoreError>
    where
        I: IntoIterator<Item = i32>,
    {
        let target = target_set(member_ids);

        let team_id = with_transaction(&mut self.conn, |tx| {
            tx.execute(INSERT_TEAM, params![team.name, team.description])?;
            let team_id = last_insert_id(tx)?;
            insert_members(tx, team_id, &target)?;
            Ok(team_id)
        })?;

        info!(team_id, members = target.len(), "team created");
        Ok(team_id)
    }

    /// Updates name and description only; membership is left untouched.
    pub fn update(&mut self, team: &Team) -> Result<(), StoreError> {
        let team_id = existing_id(team.id)?;
        let affected = self.conn.execute(UPDATE_TEAM, params![team_id, team.name, team.description])?;
        if affected == 0 {
            return Err(StoreError::NotFound { entity: "team", id: team_id });
        }
        Ok(())
    }

    /// Updates the team row and replaces its members in one transaction.
    pub fn update_with_members<I>(&mut self, team: &Team, member_ids: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = i32>,
    {
        let team_id = existing_id(team.id)?;
        let target = target_set(member_ids);

        with_transaction(&mut self.conn, |tx| {
            let affected = tx.execute(UPDATE_TEAM, params![team_id, team.name, team.description])?;
            if affected == 0 {
                return Err(StoreError::NotFound { entity: "team", id: team_id });
            }
            replace_members(tx, team_id, &target)
        })?;

        info!(team_id, members = target.len(), "team updated");
        Ok(())
    }

    /// Makes the stored member set of `team_id` equal to `member_ids`.
    ///
    /// Duplicates collapse and order is irrelevant. An empty target removes
    /// every member. Existence of the team is not checked; with no team row
    /// an empty target is a no-op and any member insert fails the foreign key.
    /// Returns the number of members stored.
    pub fn reconcile_members<I>(&mut self, team_id: i32, member_ids: I) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = i32>,
    {
        let team_id = existing_id(Some(team_id))?;
        let target = target_set(member_ids);

        with_transaction(&mut self.conn, |tx| replace_members(tx, team_id, &target))?;

        info!(team_id, members = target.len(), "team membership reconciled");
        Ok(target.len())
    }

    /// Deletes the team; its memberships and project allocations cascade.
    pub fn delete(&mut self, id: i32) -> Result<(), StoreError> {
        let affected = self.conn.execute(DELETE_TEAM, params![id])?;
        if affected == 0 {
            return Err(StoreError::NotFound { entity: "team", id });
        }
        Ok(())
    }

    pub fn get_by_id(&mut self, id: i32) -> Result<Option<Team>, StoreError> {
        self.conn
            .query_row(SELECT_TEAM_BY_ID, params![id], |row| {
                Ok(Team {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                })
            })
            .optional()
            .map_err(Into::into)
    }

    pub fn list(&mut self) -> Result<Vec<Team>, StoreError> {
        let mut stmt = self.conn.prepare(SELECT_TEAMS)?;
        let team_iter = stmt.query_map([], |row| {
            Ok(Team {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
            })
        })?;

        let mut teams = Vec::new();
        for team in team_iter {
            teams.push(team?);
        }
        Ok(teams)
    }

    /// Stored member ids in ascending order.
    pub fn member_ids(&mut self, team_id: i32) -> Result<Vec<i32>, StoreError> {
        let mut stmt = self.conn.prepare(SELECT_MEMBER_IDS)?;
        let ids = stmt.query_map(params![team_id], |row| row.get(0))?.collect::<rusqlite::Result<Vec<i32>>>()?;
        Ok(ids)
    }

    pub fn members(&mut self, team_id: i32) -> Result<Vec<User>, StoreError> {
        let mut stmt = self.conn.prepare(SELECT_MEMBERS)?;
        let users = stmt
            .query_map(params![team_id], |row| {
                Ok(User {
                    id: row.get(0)?,
                    full_name: row.get(1)?,
                    cpf: row.get(2)?,
                    email: row.get(3)?,
                    job_title: row.get(4)?,
                    login: row.get(5)?,
                    profile: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    /// Staging seeded with the currently stored members.
    pub fn selection(&mut self, team_id: i32) -> Result<MemberSelection, StoreError> {
        Ok(self.member_ids(team_id)?.into_iter().collect())
    }
}

fn existing_id(id: Option<i32>) -> Result<i32, StoreError> {
    match id {
        Some(id) if id > 0 => Ok(id),
        Some(id) => Err(StoreError::InvalidTeam(id)),
        None => Err(StoreError::InvalidTeam(0)),
    }
}

fn target_set<I: IntoIterator<Item = i32>>(member_ids: I) -> BTreeSet<i32> {
    member_ids.into_iter().collect()
}

/// Delete first, then insert: rows of dropped members must go and the
/// re-inserted rows must not collide with the old ones.
fn replace_members(tx: &Transaction, team_id: i32, target: &BTreeSet<i32>) -> Result<(), StoreError> {
    let removed = tx.execute(DELETE_TEAM_MEMBERS, params![team_id])?;
    debug!(team_id, removed, "cleared team members");
    insert_members(tx, team_id, target)
}

fn insert_members(tx: &Transaction, team_id: i32, target: &BTreeSet<i32>) -> Result<(), StoreError> {
    if target.is_empty() {
        return Ok(());
    }

    let mut stmt = tx.prepare_cached(INSERT_TEAM_MEMBER)?;
    for user_id in target {
        stmt.execute(params![team_id, user_id])?;
    }
    debug!(team_id, inserted = target.len(), "inserted team members");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_set_collapses_duplicates() {
        let target = target_set(vec![4, 2, 4, 3, 2]);
        assert_eq!(target.into_iter().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn non_positive_ids_are_rejected() {
        assert!(matches!(existing_id(None), Err(StoreError::InvalidTeam(0))));
        assert!(matches!(existing_id(Some(-3)), Err(StoreError::InvalidTeam(-3))));
        assert_eq!(existing_id(Some(7)).unwrap(), 7);
    }
}
