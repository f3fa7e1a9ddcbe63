//! Partial updates: merge a JSON object into a stored record.
//!
//! Only the fields named in the patch change; every other field keeps its
//! stored value. Fields outside the resource's writable set are rejected so a
//! patch can never touch keys, ownership or timestamps.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

pub const PROFILE_FIELDS: &[&str] = &["email", "full_name", "role", "avatar_url"];

pub const SITE_SETTINGS_FIELDS: &[&str] = &[
    "hero_title",
    "hero_subtitle",
    "hero_description",
    "about_title",
    "about_description",
    "years_experience",
    "projects_count",
    "satisfaction_rate",
    "ai_integrations",
    "contact_email",
    "contact_phone",
    "social_github",
    "social_linkedin",
    "social_telegram",
];

pub const PROJECT_FIELDS: &[&str] = &[
    "title",
    "description",
    "category",
    "tags",
    "image_url",
    "live_url",
    "github_url",
    "featured",
    "sort_order",
    "is_published",
];

pub const POST_FIELDS: &[&str] = &[
    "title",
    "slug",
    "excerpt",
    "content",
    "image_url",
    "status",
    "tags",
    "meta_title",
    "meta_description",
    "published_at",
];

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("No fields to update")]
    Empty,

    #[error("Field '{0}' cannot be updated")]
    UnknownField(String),

    #[error("Invalid value: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Apply `patch` to `record`, allowing only the columns in `writable`.
pub fn apply_patch<T>(record: &T, patch: &Map<String, Value>, writable: &[&str]) -> Result<T, PatchError>
where
    T: Serialize + DeserializeOwned,
{
    if patch.is_empty() {
        return Err(PatchError::Empty);
    }
    if let Some(field) = patch.keys().find(|k| !writable.contains(&k.as_str())) {
        return Err(PatchError::UnknownField(field.clone()));
    }

    let mut current = match serde_json::to_value(record)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in patch {
        current.insert(key.clone(), value.clone());
    }

    Ok(serde_json::from_value(Value::Object(current))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{PortfolioProject, ProjectCategory};
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn project() -> PortfolioProject {
        let now = Utc::now();
        PortfolioProject {
            id: Uuid::new_v4(),
            title: "Shop".to_string(),
            description: "An online shop".to_string(),
            category: ProjectCategory::Ecommerce,
            tags: vec!["rust".to_string()],
            image_url: None,
            live_url: Some("https://shop.example.com".to_string()),
            github_url: None,
            featured: false,
            sort_order: 3,
            is_published: true,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_patch_changes_only_named_fields() {
        let before = project();
        let after = apply_patch(
            &before,
            &as_map(json!({"title": "Store", "featured": true})),
            PROJECT_FIELDS,
        )
        .unwrap();

        assert_eq!(after.title, "Store");
        assert!(after.featured);
        assert_eq!(after.id, before.id);
        assert_eq!(after.description, before.description);
        assert_eq!(after.live_url, before.live_url);
        assert_eq!(after.sort_order, before.sort_order);
    }

    #[test]
    fn test_patch_can_clear_nullable_field() {
        let after = apply_patch(&project(), &as_map(json!({"live_url": null})), PROJECT_FIELDS)
            .unwrap();
        assert!(after.live_url.is_none());
    }

    #[test]
    fn test_empty_patch_is_rejected() {
        let err = apply_patch(&project(), &Map::new(), PROJECT_FIELDS).unwrap_err();
        assert!(matches!(err, PatchError::Empty));
    }

    #[test]
    fn test_patch_cannot_touch_key() {
        let err = apply_patch(
            &project(),
            &as_map(json!({"id": Uuid::new_v4()})),
            PROJECT_FIELDS,
        )
        .unwrap_err();
        assert!(matches!(err, PatchError::UnknownField(f) if f == "id"));
    }

    #[test]
    fn test_patch_with_wrong_type_is_invalid() {
        let err = apply_patch(
            &project(),
            &as_map(json!({"category": "furniture"})),
            PROJECT_FIELDS,
        )
        .unwrap_err();
        assert!(matches!(err, PatchError::Invalid(_)));
    }
}
