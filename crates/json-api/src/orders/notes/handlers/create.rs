//! Create Order Note Handler

use std::sync::Arc;

use bazaar::orders::NoteKind;
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::domain::orders::data::NewNote;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, schemas::TaggedNoteResponse},
    state::State,
};

/// Create Order Note Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateNoteRequest {
    pub text: String,

    /// `admin` or `customer`
    #[serde(rename = "type")]
    pub kind: String,

    /// Author; defaults to the note type
    #[serde(default)]
    pub created_by: Option<String>,
}

impl CreateNoteRequest {
    fn into_new_note(self) -> Result<NewNote, StatusError> {
        let kind = self.kind.parse::<NoteKind>().or_400()?;

        Ok(NewNote {
            kind,
            text: self.text,
            created_by: self
                .created_by
                .filter(|author| !author.trim().is_empty())
                .unwrap_or_else(|| kind.as_str().to_string()),
        })
    }
}

/// Note Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct NoteCreatedResponse {
    pub note: TaggedNoteResponse,
}

/// Create Order Note Handler
///
/// Appends a note to the order's admin or customer list.
#[endpoint(
    tags("orders"),
    summary = "Add Order Note",
    responses(
        (status_code = StatusCode::CREATED, description = "Note added"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<CreateNoteRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<NoteCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let note = json.into_inner().into_new_note()?;

    let created = state
        .app
        .orders
        .add_note(order.into_inner().into(), note)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(NoteCreatedResponse {
        note: created.into(),
    }))
}
