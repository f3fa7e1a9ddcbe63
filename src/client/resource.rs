//! Endpoint resolution: which REST path serves which logical table.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ApiError;
use crate::db::models::{BlogPost, PortfolioProject, Profile, SiteSettings};

/// The logical tables the API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Profiles,
    SiteSettings,
    PortfolioProjects,
    BlogPosts,
}

/// Which variant of a collection to read. Only projects and posts have a
/// distinct admin listing; the others resolve to the same path either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    Public,
    Admin,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Profiles,
        Resource::SiteSettings,
        Resource::PortfolioProjects,
        Resource::BlogPosts,
    ];

    /// Logical table name, as used by the database.
    pub fn table_name(self) -> &'static str {
        match self {
            Resource::Profiles => "profiles",
            Resource::SiteSettings => "site_settings",
            Resource::PortfolioProjects => "portfolio_projects",
            Resource::BlogPosts => "blog_posts",
        }
    }

    /// Column that identifies a row in item paths.
    pub fn key_column(self) -> &'static str {
        match self {
            Resource::Profiles => "user_id",
            _ => "id",
        }
    }

    pub fn collection_path(self, access: Access) -> &'static str {
        match (self, access) {
            (Resource::Profiles, _) => "/profiles",
            (Resource::SiteSettings, _) => "/site-settings",
            (Resource::PortfolioProjects, Access::Public) => "/portfolio-projects",
            (Resource::PortfolioProjects, Access::Admin) => "/admin/portfolio-projects",
            (Resource::BlogPosts, Access::Public) => "/blog-posts",
            (Resource::BlogPosts, Access::Admin) => "/admin/blog-posts",
        }
    }

    /// Path for PATCH / DELETE of one row. Writes always go to the admin
    /// variant where one exists.
    pub fn item_path(self, key: &str) -> String {
        format!("{}/{}", self.collection_path(Access::Admin), key)
    }

    /// Path for POST, if the resource accepts inserts at all.
    pub fn insert_path(self) -> Result<&'static str, ApiError> {
        match self {
            Resource::PortfolioProjects | Resource::BlogPosts => {
                Ok(self.collection_path(Access::Admin))
            }
            Resource::Profiles | Resource::SiteSettings => Err(ApiError::Unsupported {
                operation: "insert",
                resource: self.table_name(),
            }),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for Resource {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.table_name() == s)
            .ok_or_else(|| ApiError::UnknownResource(s.to_string()))
    }
}

/// A record type served by one [`Resource`].
pub trait Record: Serialize + DeserializeOwned + Send {
    const RESOURCE: Resource;
}

impl Record for Profile {
    const RESOURCE: Resource = Resource::Profiles;
}

impl Record for SiteSettings {
    const RESOURCE: Resource = Resource::SiteSettings;
}

impl Record for PortfolioProject {
    const RESOURCE: Resource = Resource::PortfolioProjects;
}

impl Record for BlogPost {
    const RESOURCE: Resource = Resource::BlogPosts;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_paths() {
        assert_eq!(Resource::Profiles.collection_path(Access::Public), "/profiles");
        assert_eq!(Resource::Profiles.collection_path(Access::Admin), "/profiles");
        assert_eq!(
            Resource::SiteSettings.collection_path(Access::Admin),
            "/site-settings"
        );
        assert_eq!(
            Resource::PortfolioProjects.collection_path(Access::Public),
            "/portfolio-projects"
        );
        assert_eq!(
            Resource::PortfolioProjects.collection_path(Access::Admin),
            "/admin/portfolio-projects"
        );
        assert_eq!(Resource::BlogPosts.collection_path(Access::Public), "/blog-posts");
        assert_eq!(
            Resource::BlogPosts.collection_path(Access::Admin),
            "/admin/blog-posts"
        );
    }

    #[test]
    fn test_item_paths_use_admin_variant() {
        assert_eq!(Resource::Profiles.item_path("u1"), "/profiles/u1");
        assert_eq!(Resource::SiteSettings.item_path("s1"), "/site-settings/s1");
        assert_eq!(
            Resource::PortfolioProjects.item_path("p1"),
            "/admin/portfolio-projects/p1"
        );
        assert_eq!(Resource::BlogPosts.item_path("b1"), "/admin/blog-posts/b1");
    }

    #[test]
    fn test_insert_only_for_projects_and_posts() {
        assert_eq!(
            Resource::BlogPosts.insert_path().unwrap(),
            "/admin/blog-posts"
        );
        assert!(matches!(
            Resource::Profiles.insert_path(),
            Err(ApiError::Unsupported { resource: "profiles", .. })
        ));
    }

    #[test]
    fn test_parse_logical_names() {
        for resource in Resource::ALL {
            assert_eq!(resource.table_name().parse::<Resource>().unwrap(), resource);
        }
        let err = "users".parse::<Resource>().unwrap_err();
        assert!(matches!(err, ApiError::UnknownResource(name) if name == "users"));
    }

    #[test]
    fn test_key_columns() {
        assert_eq!(Resource::Profiles.key_column(), "user_id");
        assert_eq!(Resource::BlogPosts.key_column(), "id");
    }
}
