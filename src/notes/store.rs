//! Note Storage
//! Mission: Persist notes, always scoped to the owning user

use crate::db::{is_foreign_key_violation, Database};
use crate::notes::models::Note;
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, info};
use uuid::Uuid;

const NOTE_COLUMNS: &str = "id, user_id, title, body, created_at, updated_at";

pub struct NoteStore {
    db: Database,
}

impl NoteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a note owned by `user_id`. Returns `None` if that user no longer exists.
    pub fn create_note(&self, user_id: &Uuid, title: &str, body: &str) -> Result<Option<Note>> {
        let now = timestamp();
        let note = Note {
            id: Uuid::new_v4(),
            user_id: *user_id,
            title: title.to_string(),
            body: body.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };

        let inserted = self.db.with_conn(|conn| {
            let result = conn.execute(
                "INSERT INTO notes (id, user_id, title, body, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    note.id.to_string(),
                    note.user_id.to_string(),
                    note.title,
                    note.body,
                    note.created_at,
                    note.updated_at,
                ],
            );
            match result {
                Ok(_) => Ok(true),
                Err(e) if is_foreign_key_violation(&e) => Ok(false),
                Err(e) => Err(e).context("Failed to insert note"),
            }
        })?;

        if !inserted {
            return Ok(None);
        }

        info!("Created note {} for user {}", note.id, note.user_id);
        Ok(Some(note))
    }

    /// All notes owned by `user_id`, newest first
    pub fn list_notes(&self, user_id: &Uuid) -> Result<Vec<Note>> {
        self.db.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM notes WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC",
                NOTE_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let notes = stmt
                .query_map(params![user_id.to_string()], note_from_row)?
                .collect::<Result<Vec<_>, _>>()
                .context("Failed to list notes")?;

            debug!("Listed {} notes for user {}", notes.len(), user_id);
            Ok(notes)
        })
    }

    pub fn get_note(&self, user_id: &Uuid, note_id: &Uuid) -> Result<Option<Note>> {
        self.db.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM notes WHERE id = ?1 AND user_id = ?2",
                NOTE_COLUMNS
            );
            let note = conn
                .query_row(
                    &sql,
                    params![note_id.to_string(), user_id.to_string()],
                    note_from_row,
                )
                .optional()
                .context("Failed to fetch note")?;
            Ok(note)
        })
    }

    /// Apply a partial update. Returns `None` if the note does not exist for this user.
    pub fn update_note(
        &self,
        user_id: &Uuid,
        note_id: &Uuid,
        title: Option<&str>,
        body: Option<&str>,
    ) -> Result<Option<Note>> {
        self.db.with_conn(|conn| {
            let sql = format!(
                "UPDATE notes
                 SET title = COALESCE(?3, title),
                     body = COALESCE(?4, body),
                     updated_at = ?5
                 WHERE id = ?1 AND user_id = ?2
                 RETURNING {}",
                NOTE_COLUMNS
            );
            let note = conn
                .query_row(
                    &sql,
                    params![
                        note_id.to_string(),
                        user_id.to_string(),
                        title,
                        body,
                        timestamp(),
                    ],
                    note_from_row,
                )
                .optional()
                .context("Failed to update note")?;
            Ok(note)
        })
    }

    /// Returns `false` if the note does not exist for this user
    pub fn delete_note(&self, user_id: &Uuid, note_id: &Uuid) -> Result<bool> {
        let rows_affected = self.db.with_conn(|conn| {
            conn.execute(
                "DELETE FROM notes WHERE id = ?1 AND user_id = ?2",
                params![note_id.to_string(), user_id.to_string()],
            )
            .context("Failed to delete note")
        })?;

        if rows_affected > 0 {
            info!("Deleted note {} for user {}", note_id, user_id);
        }
        Ok(rows_affected > 0)
    }
}

// Fixed-width so lexical order matches chronological order
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_uuid(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: parse_uuid(row, 0)?,
        user_id: parse_uuid(row, 1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserStore;
    use tempfile::NamedTempFile;

    struct Fixture {
        notes: NoteStore,
        alice: Uuid,
        bob: Uuid,
        _temp: NamedTempFile,
    }

    fn fixture() -> Fixture {
        let temp = NamedTempFile::new().unwrap();
        let db = Database::open(temp.path().to_str().unwrap()).unwrap();
        let users = UserStore::new(db.clone(), 4).unwrap();
        let alice = users
            .create_user("Alice", "alice@example.com", "pass")
            .unwrap()
            .unwrap()
            .id;
        let bob = users
            .create_user("Bob", "bob@example.com", "pass")
            .unwrap()
            .unwrap()
            .id;
        Fixture {
            notes: NoteStore::new(db),
            alice,
            bob,
            _temp: temp,
        }
    }

    #[test]
    fn test_create_and_list_scoped_to_owner() {
        let f = fixture();
        let first = f
            .notes
            .create_note(&f.alice, "First", "one")
            .unwrap()
            .unwrap();
        let second = f
            .notes
            .create_note(&f.alice, "Second", "two")
            .unwrap()
            .unwrap();
        f.notes.create_note(&f.bob, "Bob's", "private").unwrap();

        let listed = f.notes.list_notes(&f.alice).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id); // newest first
        assert_eq!(listed[1].id, first.id);
        assert!(listed.iter().all(|n| n.user_id == f.alice));
    }

    #[test]
    fn test_create_for_unknown_user_returns_none() {
        let f = fixture();
        assert!(f
            .notes
            .create_note(&Uuid::new_v4(), "Orphan", "")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_get_respects_ownership() {
        let f = fixture();
        let note = f
            .notes
            .create_note(&f.alice, "Mine", "body")
            .unwrap()
            .unwrap();

        assert_eq!(f.notes.get_note(&f.alice, &note.id).unwrap(), Some(note.clone()));
        assert!(f.notes.get_note(&f.bob, &note.id).unwrap().is_none());
    }

    #[test]
    fn test_partial_update() {
        let f = fixture();
        let note = f
            .notes
            .create_note(&f.alice, "Title", "Body")
            .unwrap()
            .unwrap();

        let updated = f
            .notes
            .update_note(&f.alice, &note.id, None, Some("New body"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Title");
        assert_eq!(updated.body, "New body");
        assert_eq!(updated.created_at, note.created_at);
        assert!(updated.updated_at >= note.updated_at);

        // Other users cannot touch it
        assert!(f
            .notes
            .update_note(&f.bob, &note.id, Some("Hijacked"), None)
            .unwrap()
            .is_none());
        assert_eq!(
            f.notes.get_note(&f.alice, &note.id).unwrap().unwrap().title,
            "Title"
        );
    }

    #[test]
    fn test_delete() {
        let f = fixture();
        let note = f
            .notes
            .create_note(&f.alice, "Doomed", "")
            .unwrap()
            .unwrap();

        assert!(!f.notes.delete_note(&f.bob, &note.id).unwrap());
        assert!(f.notes.delete_note(&f.alice, &note.id).unwrap());
        assert!(!f.notes.delete_note(&f.alice, &note.id).unwrap());
        assert!(f.notes.list_notes(&f.alice).unwrap().is_empty());
    }
}
