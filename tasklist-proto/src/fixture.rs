//! Canned records served by the mock REST endpoint.
//!
//! The endpoint performs no persistence: every response is built from the
//! constants in this module regardless of the request.

use serde::{Deserialize, Serialize};

/// A to-do record in the REST representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRecord {
    /// Record identifier.
    pub id: String,
    /// Task text.
    pub todo: String,
    /// Completion flag.
    pub is_completed: bool,
    /// RFC 3339 creation time.
    pub created_at: String,
}

/// A fixture record echoed back with a status string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoAck {
    /// The echoed record.
    #[serde(flatten)]
    pub record: TodoRecord,
    /// Human-readable outcome, e.g. `Created Successfully`.
    #[serde(rename = "Response")]
    pub response: String,
}

/// Status string returned for POST.
pub const CREATED: &str = "Created Successfully";

/// Status string returned for PUT.
pub const UPDATED: &str = "Updated Successfully";

/// Status string returned for DELETE.
pub const DELETED: &str = "Deleted Successfully";

/// The fixed list returned for GET.
#[must_use]
pub fn todo_list() -> Vec<TodoRecord> {
    vec![
        TodoRecord {
            id: "1".to_string(),
            todo: "First todo".to_string(),
            is_completed: false,
            created_at: "2023-05-27T10:00:00Z".to_string(),
        },
        TodoRecord {
            id: "2".to_string(),
            todo: "Second todo".to_string(),
            is_completed: true,
            created_at: "2023-05-27T11:00:00Z".to_string(),
        },
    ]
}

/// The first fixture record tagged with `response`.
#[must_use]
pub fn ack(response: &str) -> TodoAck {
    TodoAck {
        record: TodoRecord {
            id: "1".to_string(),
            todo: "First todo".to_string(),
            is_completed: false,
            created_at: "2023-05-27T10:00:00Z".to_string(),
        },
        response: response.to_string(),
    }
}
