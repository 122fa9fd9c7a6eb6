//! Order Notes Repository

use bazaar::orders::{Note, NoteKind, TaggedNote};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Postgres, Row, Transaction, postgres::PgRow, query};
use uuid::Uuid;

use crate::domain::orders::records::OrderUuid;

const LIST_NOTES_SQL: &str = include_str!("../sql/list_notes.sql");
const LIST_NOTES_FOR_ORDERS_SQL: &str = include_str!("../sql/list_notes_for_orders.sql");
const CREATE_NOTE_SQL: &str = include_str!("../sql/create_note.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgNotesRepository;

impl PgNotesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Notes for one order in the order they were written.
    pub(crate) async fn list_notes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<TaggedNote>, sqlx::Error> {
        let rows = query(LIST_NOTES_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        rows.iter()
            .map(|row| decode_note(row).map(|(_, note)| note))
            .collect()
    }

    /// Notes for several orders, each paired with its order.
    pub(crate) async fn list_notes_for_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<(OrderUuid, TaggedNote)>, sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().map(|order| order.into_uuid()).collect();

        let rows = query(LIST_NOTES_FOR_ORDERS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        rows.iter().map(decode_note).collect()
    }

    pub(crate) async fn create_note(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        kind: NoteKind,
        note: &Note,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_NOTE_SQL)
            .bind(Uuid::now_v7())
            .bind(order.into_uuid())
            .bind(kind.as_str())
            .bind(note.text.as_str())
            .bind(note.created_by.as_str())
            .bind(SqlxTimestamp::from(note.created_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

fn decode_note(row: &PgRow) -> Result<(OrderUuid, TaggedNote), sqlx::Error> {
    let kind = row
        .try_get::<String, _>("kind")?
        .parse::<NoteKind>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "kind".to_string(),
            source: Box::new(e),
        })?;

    let note = Note {
        text: row.try_get("text")?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
    };

    Ok((
        OrderUuid::from_uuid(row.try_get("order_uuid")?),
        TaggedNote { kind, note },
    ))
}
