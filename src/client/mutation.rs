use reqwest::Method;
use serde_json::{Map, Value};

use super::error::ApiResult;
use super::resource::Resource;

/// A single write. Updates and deletes address one row by its key
/// (`user_id` for profiles, `id` for everything else).
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Insert {
        resource: Resource,
        record: Value,
    },
    Update {
        resource: Resource,
        key: String,
        patch: Map<String, Value>,
    },
    Delete {
        resource: Resource,
        key: String,
    },
}

impl Mutation {
    pub fn resource(&self) -> Resource {
        match self {
            Mutation::Insert { resource, .. }
            | Mutation::Update { resource, .. }
            | Mutation::Delete { resource, .. } => *resource,
        }
    }

    /// Method, path and body for the request. Fails before any I/O when the
    /// resource has no route for this write.
    pub(crate) fn request(&self) -> ApiResult<(Method, String, Option<Value>)> {
        match self {
            Mutation::Insert { resource, record } => Ok((
                Method::POST,
                resource.insert_path()?.to_string(),
                Some(record.clone()),
            )),
            Mutation::Update {
                resource,
                key,
                patch,
            } => Ok((
                Method::PATCH,
                resource.item_path(key),
                Some(Value::Object(patch.clone())),
            )),
            Mutation::Delete { resource, key } => {
                Ok((Method::DELETE, resource.item_path(key), None))
            }
        }
    }
}
