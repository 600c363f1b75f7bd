/// Database row types — these map directly to SQLite rows.
/// Distinct from the foyer-types API models to keep the DB layer independent;
/// timestamps stay as the raw SQLite text until the API layer parses them.

#[derive(Debug, Clone)]
pub struct FriendRequestRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub avatar_url: Option<String>,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct ContactMessageRow {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct ChatEntryRow {
    pub id: i64,
    pub sender: String,
    pub name: Option<String>,
    pub message: String,
    pub created_at: String,
}
