//! Order Note Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, schemas::TaggedNoteResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct NotesResponse {
    /// Admin and customer notes, newest first
    pub notes: Vec<TaggedNoteResponse>,
}

/// Order Note Index Handler
#[endpoint(
    tags("orders"),
    summary = "List Order Notes",
    responses(
        (status_code = StatusCode::OK, description = "Notes found"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<NotesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let notes = state
        .app
        .orders
        .list_notes(order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(NotesResponse {
        notes: notes.into_iter().map(Into::into).collect(),
    }))
}
