//! The `/api/todo` resource.
//!
//! GET lists two fixture records. POST and PUT accept a record body and
//! DELETE accepts an `id` query parameter; all three ignore their input and
//! echo the first fixture record tagged with a status string. Methods with
//! no handler get the router's default 405.

use axum::{Json, Router, body::Bytes, extract::Query, routing::get};
use serde::Deserialize;

use tasklist_proto::fixture::{self, TodoAck, TodoRecord};

/// Path of the to-do resource.
pub const TODO_PATH: &str = "/api/todo";

/// Request body accepted by POST and PUT. Every field is optional and unused.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TodoBody {
    /// Record identifier.
    pub id: Option<String>,
    /// Task text.
    pub todo: Option<String>,
    /// Completion flag.
    pub is_completed: Option<bool>,
    /// Creation time.
    pub created_at: Option<String>,
}

/// Query accepted by DELETE.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    /// Record identifier (unused).
    pub id: Option<String>,
}

/// Build the router serving the fixture resource.
pub fn router() -> Router {
    Router::new().route(
        TODO_PATH,
        get(list_todos)
            .post(create_todo)
            .put(update_todo)
            .delete(delete_todo),
    )
}

async fn list_todos() -> Json<Vec<TodoRecord>> {
    tracing::debug!("GET {TODO_PATH}");
    Json(fixture::todo_list())
}

async fn create_todo(body: Bytes) -> Json<TodoAck> {
    tracing::debug!(body = ?parse_body(&body), "POST {TODO_PATH}");
    Json(fixture::ack(fixture::CREATED))
}

async fn update_todo(body: Bytes) -> Json<TodoAck> {
    tracing::debug!(body = ?parse_body(&body), "PUT {TODO_PATH}");
    Json(fixture::ack(fixture::UPDATED))
}

async fn delete_todo(Query(query): Query<DeleteQuery>) -> Json<TodoAck> {
    tracing::debug!(id = ?query.id, "DELETE {TODO_PATH}");
    Json(fixture::ack(fixture::DELETED))
}

/// Best-effort decode of a record body, for logging only.
fn parse_body(body: &[u8]) -> Option<TodoBody> {
    serde_json::from_slice(body).ok()
}

/// Starts the fixture server on the given address.
///
/// Returns the bound address (useful when binding to port 0) and a handle
/// to the server task.
///
/// # Errors
///
/// Returns an error if the address cannot be bound.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router()).await {
            tracing::error!(error = %e, "api server error");
        }
    });

    Ok((bound_addr, handle))
}
