//! Task comment model
//!
//! Comments are append-only notes on a task; they are removed only when their
//! task is deleted.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE task_comments (
//!     id TEXT PRIMARY KEY,
//!     task_id TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
//!     content TEXT NOT NULL,
//!     author_email TEXT NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Comment row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID
    pub id: String,

    /// Task the comment is attached to
    pub task_id: String,

    /// Comment body
    pub content: String,

    /// Author address (free text)
    pub author_email: String,

    /// When the comment was posted
    pub created_at: DateTime<Utc>,
}

/// Input for posting a comment
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateComment {
    /// Target task
    pub task_id: String,

    /// Comment body
    #[validate(length(min = 1))]
    pub content: String,

    /// Author address
    #[validate(email)]
    pub author_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_comment_validation() {
        let valid = CreateComment {
            task_id: "t1".to_string(),
            content: "Looks good".to_string(),
            author_email: "reviewer@demo.com".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty = CreateComment {
            content: String::new(),
            ..valid.clone()
        };
        assert!(empty.validate().is_err());

        let bad_author = CreateComment {
            author_email: "reviewer".to_string(),
            ..valid
        };
        assert!(bad_author.validate().is_err());
    }
}
