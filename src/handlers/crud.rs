//! A small create/read/update/delete API over an [`EntityStore`].
//!
//! Routes below the mount prefix:
//!
//! | Request                         | Result                                   |
//! |---------------------------------|------------------------------------------|
//! | `POST <mount>/<Entity>`         | 201, `{"id":N}`                          |
//! | `GET <mount>/<Entity>/<id>`     | 200, stored JSON                         |
//! | `GET <mount>/<Entity>`          | 200, sorted id list (`name`/`tag` filter)|
//! | `PUT <mount>/<Entity>/<id>`     | 200, new JSON                            |
//! | `DELETE <mount>/<Entity>/<id>`  | 200                                      |

use std::sync::Arc;

use serde_json::{Value, json};

use crate::handlers::Handler;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode};
use crate::store::{EntityStore, StoreError};

/// Query parameters that filter a listing by a JSON string field.
const LIST_FILTERS: &[&str] = &["name", "tag"];

pub struct CrudHandler {
    mount: String,
    store: Arc<dyn EntityStore>,
}

/// `<Entity>[/<id>]` parsed from the part of the path after the mount prefix.
#[derive(Debug, PartialEq, Eq)]
struct Target<'a> {
    entity: &'a str,
    id: Option<&'a str>,
}

impl CrudHandler {
    pub fn new(mount: impl Into<String>, store: Arc<dyn EntityStore>) -> Self {
        Self {
            mount: mount.into(),
            store,
        }
    }

    fn parse_target<'a>(&self, path: &'a str) -> Option<Target<'a>> {
        let rest = path.strip_prefix(self.mount.as_str())?;
        let rest = rest.strip_prefix('/').unwrap_or(rest);

        let (entity, id) = match rest.split_once('/') {
            None => (rest, None),
            Some((_, id)) if id.contains('/') => return None,
            Some((entity, "")) => (entity, None),
            Some((entity, id)) => (entity, Some(id)),
        };

        if entity.is_empty() {
            return None;
        }
        Some(Target { entity, id })
    }

    fn create(&self, entity: &str, request: &Request) -> Response {
        match self.store.create(entity, request.body.clone()) {
            Ok(id) => {
                // Allocated ids are always numeric.
                let id: Value = id.parse::<u64>().map(Value::from).unwrap_or(Value::String(id));
                Response::json(StatusCode::Created, json!({ "id": id }).to_string())
            }
            Err(e) => storage_failure("Failed to store entity", &e),
        }
    }

    fn read(&self, entity: &str, id: &str) -> Response {
        match self.store.read(entity, id) {
            Ok(data) => Response::json(StatusCode::Ok, data),
            Err(StoreError::NotFound { .. }) => entity_not_found(),
            Err(e) => storage_failure("Failed to read entity", &e),
        }
    }

    fn update(&self, entity: &str, id: &str, request: &Request) -> Response {
        if !self.store.exists(entity, id) {
            return entity_not_found();
        }
        match self.store.write(entity, id, request.body.clone()) {
            Ok(()) => Response::json(StatusCode::Ok, request.body.clone()),
            Err(e) => storage_failure("Failed to update entity", &e),
        }
    }

    fn delete(&self, entity: &str, id: &str) -> Response {
        match self.store.delete(entity, id) {
            Ok(()) => Response::text(StatusCode::Ok, "Entity deleted successfully"),
            Err(StoreError::NotFound { .. }) => entity_not_found(),
            Err(e) => storage_failure("Failed to delete entity", &e),
        }
    }

    fn list(&self, entity: &str, request: &Request) -> Response {
        let filters: Vec<(&str, &str)> = LIST_FILTERS
            .iter()
            .filter_map(|field| request.query_param(field).map(|value| (*field, value)))
            .collect();

        let ids: Vec<String> = self
            .store
            .list_ids(entity)
            .into_iter()
            .filter(|id| {
                if filters.is_empty() {
                    return true;
                }
                let Ok(data) = self.store.read(entity, id) else {
                    return false;
                };
                filters
                    .iter()
                    .all(|(field, value)| string_field(&data, field).contains(value))
            })
            .collect();

        Response::json(StatusCode::Ok, json!(ids).to_string())
    }
}

impl Handler for CrudHandler {
    fn handle(&self, request: &Request) -> Response {
        let Some(target) = self.parse_target(&request.base_path) else {
            return Response::bad_request("Invalid CRUD path");
        };

        match (&request.method, target.id) {
            (Method::POST, None) => self.create(target.entity, request),
            (Method::POST, Some(_)) => Response::bad_request("POST must not include ID in path"),
            (Method::GET, Some(id)) => self.read(target.entity, id),
            (Method::GET, None) => self.list(target.entity, request),
            (Method::PUT, Some(id)) => self.update(target.entity, id, request),
            (Method::PUT, None) => Response::bad_request("PUT must include ID in path"),
            (Method::DELETE, Some(id)) => self.delete(target.entity, id),
            (Method::DELETE, None) => Response::bad_request("DELETE must include ID in path"),
            (Method::Other(_), _) => {
                Response::text(StatusCode::NotImplemented, "CRUD method not implemented yet")
            }
        }
    }

    fn name(&self) -> &'static str {
        "CrudHandler"
    }
}

fn entity_not_found() -> Response {
    Response::with_content(StatusCode::NotFound, "text/html", "Entity not found")
}

fn storage_failure(what: &str, error: &StoreError) -> Response {
    Response::internal_error(&format!("{}: {}", what, error))
}

/// Value of a top-level JSON string field, or "" when absent or not a string.
fn string_field(data: &[u8], field: &str) -> String {
    serde_json::from_slice::<Value>(data)
        .ok()
        .and_then(|v| v.get(field).and_then(Value::as_str).map(str::to_string))
        .unwrap_or_default()
}
