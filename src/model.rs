use chrono::{DateTime, Utc};

/// A single shared recipe.
#[derive(Debug, Clone)]
pub struct Recipe {
    /// Assigned by the store on creation; never changes afterwards.
    pub id: i64,
    /// Unique across all recipes, at most 100 characters.
    pub title: String,
    pub description: String,
    /// At most 50 characters. Not editable after creation.
    pub author: String,
    /// Creation time in UTC; never modified.
    pub date_posted: DateTime<Utc>,
}
