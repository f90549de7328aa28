//! Organization model
//!
//! Organizations are the tenants of Taskboard. Every project (and through it
//! every task and comment) belongs to exactly one organization, and requests
//! pick their organization by slug.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE organizations (
//!     id TEXT PRIMARY KEY,
//!     name VARCHAR(100) NOT NULL,
//!     slug VARCHAR(50) NOT NULL UNIQUE,
//!     contact_email TEXT NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Fixed id of the demo organization seeded at startup
pub const DEMO_ORGANIZATION_ID: &str = "demo-org-id";

/// Slug of the demo organization, also the default tenant
pub const DEMO_ORGANIZATION_SLUG: &str = "demo-org";

/// Organization (tenant) row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    /// Unique organization ID
    pub id: String,

    /// Display name
    pub name: String,

    /// Unique URL-safe key used to select the tenant
    pub slug: String,

    /// Contact address for the organization
    pub contact_email: String,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an organization
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrganization {
    /// Explicit id; a fresh one is generated when absent
    pub id: Option<String>,

    /// Display name
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Tenant slug (lowercase letters, digits and dashes)
    #[validate(length(min = 1, max = 50), custom(function = "validate_slug"))]
    pub slug: String,

    /// Contact address
    #[validate(email)]
    pub contact_email: String,
}

impl CreateOrganization {
    /// The demo tenant every fresh database starts with
    pub fn demo() -> Self {
        Self {
            id: Some(DEMO_ORGANIZATION_ID.to_string()),
            name: "Demo Organization".to_string(),
            slug: DEMO_ORGANIZATION_SLUG.to_string(),
            contact_email: "admin@demo.com".to_string(),
        }
    }
}

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let valid = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if valid && !slug.starts_with('-') && !slug.ends_with('-') {
        Ok(())
    } else {
        Err(ValidationError::new("slug"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_organization_is_valid() {
        let demo = CreateOrganization::demo();
        assert!(demo.validate().is_ok());
        assert_eq!(demo.slug, DEMO_ORGANIZATION_SLUG);
    }

    #[test]
    fn test_slug_rules() {
        assert!(validate_slug("tech-startup").is_ok());
        assert!(validate_slug("org2").is_ok());
        assert!(validate_slug("Tech").is_err());
        assert!(validate_slug("-lead").is_err());
        assert!(validate_slug("has space").is_err());
    }

    #[test]
    fn test_invalid_contact_email_rejected() {
        let input = CreateOrganization {
            contact_email: "not-an-email".to_string(),
            ..CreateOrganization::demo()
        };
        assert!(input.validate().is_err());
    }
}
