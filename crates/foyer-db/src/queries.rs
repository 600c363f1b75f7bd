use crate::Database;
use crate::models::{ChatEntryRow, ContactMessageRow, FriendRequestRow};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

/// Outcome of a status update. The check and the write happen inside one
/// `with_conn` closure, so the decision is made against current state.
#[derive(Debug)]
pub enum StatusUpdate {
    Updated(FriendRequestRow),
    /// No request with that id.
    Missing,
    /// The request was already approved or rejected.
    AlreadyDecided,
}

impl Database {
    // -- Friend requests --

    pub fn insert_friend_request(
        &self,
        name: &str,
        description: &str,
        avatar_url: Option<&str>,
    ) -> Result<FriendRequestRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO friend_requests (name, description, avatar_url) VALUES (?1, ?2, ?3)",
                rusqlite::params![name, description, avatar_url],
            )?;
            let id = conn.last_insert_rowid();
            query_friend_request(conn, id)?.ok_or_else(|| anyhow!("inserted request {} vanished", id))
        })
    }

    pub fn list_friend_requests(&self) -> Result<Vec<FriendRequestRow>> {
        self.with_conn(query_friend_requests)
    }

    pub fn set_request_status(&self, id: i64, status: &str) -> Result<StatusUpdate> {
        self.with_conn(|conn| {
            let current: Option<String> = conn
                .query_row(
                    "SELECT status FROM friend_requests WHERE id = ?1",
                    [id],
                    |row| row.get(0),
                )
                .optional()?;

            let Some(current) = current else {
                return Ok(StatusUpdate::Missing);
            };
            if current != "pending" {
                return Ok(StatusUpdate::AlreadyDecided);
            }

            conn.execute(
                "UPDATE friend_requests SET status = ?1 WHERE id = ?2",
                rusqlite::params![status, id],
            )?;
            let row = query_friend_request(conn, id)?
                .ok_or_else(|| anyhow!("updated request {} vanished", id))?;
            Ok(StatusUpdate::Updated(row))
        })
    }

    /// Returns false if no row had that id.
    pub fn delete_friend_request(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM friend_requests WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    // -- Contact messages --

    pub fn insert_contact_message(
        &self,
        name: &str,
        email: Option<&str>,
        message: &str,
    ) -> Result<ContactMessageRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (name, email, message) VALUES (?1, ?2, ?3)",
                rusqlite::params![name, email, message],
            )?;
            let id = conn.last_insert_rowid();
            query_contact_message(conn, id)?.ok_or_else(|| anyhow!("inserted message {} vanished", id))
        })
    }

    pub fn list_contact_messages(&self) -> Result<Vec<ContactMessageRow>> {
        self.with_conn(query_contact_messages)
    }

    /// Free toggle in both directions. Returns None if the id is absent.
    pub fn set_message_read(&self, id: i64, is_read: bool) -> Result<Option<ContactMessageRow>> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE messages SET is_read = ?1 WHERE id = ?2",
                rusqlite::params![is_read, id],
            )?;
            if updated == 0 {
                return Ok(None);
            }
            query_contact_message(conn, id)
        })
    }

    pub fn delete_contact_message(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM messages WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    // -- Chat --

    pub fn insert_chat_entry(
        &self,
        sender: &str,
        name: Option<&str>,
        message: &str,
    ) -> Result<ChatEntryRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO chat_messages (sender, name, message) VALUES (?1, ?2, ?3)",
                rusqlite::params![sender, name, message],
            )?;
            let id = conn.last_insert_rowid();
            query_chat_entry(conn, id)?.ok_or_else(|| anyhow!("inserted chat entry {} vanished", id))
        })
    }

    pub fn list_chat_entries(&self) -> Result<Vec<ChatEntryRow>> {
        self.with_conn(query_chat_entries)
    }
}

fn query_friend_request(conn: &Connection, id: i64) -> Result<Option<FriendRequestRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, avatar_url, status, created_at
         FROM friend_requests WHERE id = ?1",
    )?;

    let row = stmt.query_row([id], map_friend_request).optional()?;
    Ok(row)
}

fn query_friend_requests(conn: &Connection) -> Result<Vec<FriendRequestRow>> {
    // Newest first; id breaks ties within SQLite's one-second timestamps.
    let mut stmt = conn.prepare(
        "SELECT id, name, description, avatar_url, status, created_at
         FROM friend_requests
         ORDER BY created_at DESC, id DESC",
    )?;

    let rows = stmt
        .query_map([], map_friend_request)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn map_friend_request(row: &rusqlite::Row<'_>) -> rusqlite::Result<FriendRequestRow> {
    Ok(FriendRequestRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        avatar_url: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn query_contact_message(conn: &Connection, id: i64) -> Result<Option<ContactMessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, message, is_read, created_at
         FROM messages WHERE id = ?1",
    )?;

    let row = stmt.query_row([id], map_contact_message).optional()?;
    Ok(row)
}

fn query_contact_messages(conn: &Connection) -> Result<Vec<ContactMessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, message, is_read, created_at
         FROM messages
         ORDER BY created_at DESC, id DESC",
    )?;

    let rows = stmt
        .query_map([], map_contact_message)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn map_contact_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<ContactMessageRow> {
    Ok(ContactMessageRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        message: row.get(3)?,
        is_read: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn query_chat_entry(conn: &Connection, id: i64) -> Result<Option<ChatEntryRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, sender, name, message, created_at
         FROM chat_messages WHERE id = ?1",
    )?;

    let row = stmt.query_row([id], map_chat_entry).optional()?;
    Ok(row)
}

fn query_chat_entries(conn: &Connection) -> Result<Vec<ChatEntryRow>> {
    // Transcript order: oldest first, insertion order within a tied second.
    let mut stmt = conn.prepare(
        "SELECT id, sender, name, message, created_at
         FROM chat_messages
         ORDER BY created_at ASC, id ASC",
    )?;

    let rows = stmt
        .query_map([], map_chat_entry)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn map_chat_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatEntryRow> {
    Ok(ChatEntryRow {
        id: row.get(0)?,
        sender: row.get(1)?,
        name: row.get(2)?,
        message: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
