//! The submission record store.
//!
//! The backing table is the only owner of submission state. Every operation
//! re-reads the whole table, so nothing is cached between calls. Updates are
//! read-modify-write cycles with no cross-call locking: two concurrent
//! updates of the same row race and the later point write wins.

use std::sync::Arc;

use commission_storage::{Row, RowPosition, StorageError, TabularStore};
use serde_json::Value;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::clock::{format_timestamp, Clock};
use crate::codec::{self, Column};
use crate::error::CommissionError;
use crate::intake::IntakePayload;
use crate::status::Status;
use crate::submission::{yes_no, Submission};

/// Partial update applied by an administrator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionUpdate {
    /// Requested status. Equal to the current status means "leave it".
    pub status: Option<Status>,
    pub reviewed_by: Option<String>,
    /// Replaces the stored notes whenever present.
    pub internal_notes: Option<String>,
}

impl SubmissionUpdate {
    /// Read an update request body. Unknown status strings and non-string
    /// values are ignored rather than rejected.
    pub fn from_json(body: &Value) -> Self {
        let text = |field: &str| body.get(field).and_then(Value::as_str).map(str::to_string);
        SubmissionUpdate {
            status: body.get("status").and_then(Value::as_str).and_then(Status::parse),
            reviewed_by: text("reviewedBy"),
            internal_notes: text("internalNotes"),
        }
    }
}

pub struct SubmissionStore {
    table: Arc<dyn TabularStore>,
    clock: Arc<dyn Clock>,
}

impl SubmissionStore {
    pub fn new(table: Arc<dyn TabularStore>, clock: Arc<dyn Clock>) -> Self {
        Self { table, clock }
    }

    /// Every submission in table order, optionally restricted to one status.
    pub async fn list(&self, filter: Option<Status>) -> Result<Vec<Submission>, CommissionError> {
        let rows = self.data_rows().await?;
        Ok(rows
            .iter()
            .enumerate()
            .map(|(i, cells)| codec::decode(cells, RowPosition::from_data_index(i)))
            .filter(|s| filter.map_or(true, |status| s.status == status))
            .collect())
    }

    /// Locate a submission by identity, including `legacy-<row>` identities.
    pub async fn find(&self, id: &str) -> Result<(Submission, RowPosition), CommissionError> {
        let (position, cells) = self.locate(id).await?;
        Ok((codec::decode(&cells, position), position))
    }

    /// Apply a partial update to one submission and write its row back.
    ///
    /// A rejected status change writes nothing. When the merged row equals
    /// the stored one no write is issued.
    pub async fn update(
        &self,
        id: &str,
        update: SubmissionUpdate,
    ) -> Result<Submission, CommissionError> {
        let (position, stored) = self.locate(id).await?;
        let current = codec::decode(&stored, position);
        let original = codec::padded(&stored);
        let mut cells = original.clone();

        if let Some(target) = update.status.filter(|t| *t != current.status) {
            if !current.status.can_transition_to(target) {
                warn!(id, from = %current.status, to = %target, "rejected status transition");
                return Err(CommissionError::invalid_transition(current.status, target));
            }
            let now = format_timestamp(self.clock.now());
            set(&mut cells, Column::Status, target.as_str());
            match target {
                Status::Reviewed => set(&mut cells, Column::ReviewedAt, &now),
                Status::Closed => {
                    set(&mut cells, Column::ClosedAt, &now);
                    set(&mut cells, Column::CompletedOn, &now);
                }
                Status::New => {}
            }
            if let Some(by) = &update.reviewed_by {
                set(&mut cells, Column::ReviewedBy, by);
            }
        }

        if let Some(by) = &update.reviewed_by {
            if codec::cell(&cells, Column::ReviewedBy).is_empty() {
                set(&mut cells, Column::ReviewedBy, by);
            }
        }
        if let Some(notes) = &update.internal_notes {
            set(&mut cells, Column::InternalNotes, notes);
        }

        if cells == original {
            debug!(id, row = %position, "update changes nothing, skipping write");
        } else {
            self.table
                .write_row(&codec::row_range(position), cells.clone())
                .await
                .map_err(|e| backend_failure("writing submission row", e))?;
            debug!(id, row = %position, "wrote submission row");
        }

        Ok(codec::decode(&cells, position))
    }

    /// Store a validated intake payload as a new `new` submission.
    pub async fn create(&self, payload: IntakePayload) -> Result<Submission, CommissionError> {
        let submission = Submission {
            id: Uuid::new_v4().to_string(),
            created_at: format_timestamp(self.clock.now()),
            job_name: payload.job_name,
            site_address: payload.site_address,
            contact_name: payload.contact_name,
            contact_email: payload.contact_email,
            contact_phone: payload.contact_phone,
            drawing_link: payload.drawing_link,
            programming_narrative: payload.programming_narrative,
            fixtures_operable: yes_no(payload.fixtures_operable).to_string(),
            wiring_notes: payload.wiring_notes,
            dmx_access_available: yes_no(payload.dmx_access_available).to_string(),
            additional_notes: payload.additional_notes,
            purchase_order: payload.purchase_order,
            status: Status::New,
            ..Submission::default()
        };

        self.table
            .append_row(codec::encode(&submission))
            .await
            .map_err(|e| backend_failure("appending submission", e))?;
        debug!(id = %submission.id, "appended submission");
        Ok(submission)
    }

    /// All rows after the header.
    async fn data_rows(&self) -> Result<Vec<Row>, CommissionError> {
        let mut rows = self
            .table
            .read_range(&codec::table_range())
            .await
            .map_err(|e| backend_failure("reading submissions", e))?;
        if rows.is_empty() {
            return Ok(rows);
        }
        rows.remove(0);
        Ok(rows)
    }

    async fn locate(&self, id: &str) -> Result<(RowPosition, Row), CommissionError> {
        let not_found = || CommissionError::NotFound { id: id.to_string() };
        if id.trim().is_empty() {
            return Err(not_found());
        }
        self.data_rows()
            .await?
            .into_iter()
            .enumerate()
            .map(|(i, cells)| (RowPosition::from_data_index(i), cells))
            .find(|(position, cells)| match codec::cell(cells, Column::SubmissionId) {
                "" => codec::legacy_id(*position) == id,
                stored => stored == id,
            })
            .ok_or_else(not_found)
    }
}

fn set(cells: &mut Row, column: Column, value: &str) {
    cells[column.index()] = value.to_string();
}

fn backend_failure(operation: &str, err: StorageError) -> CommissionError {
    error!(error = %err, "{operation} failed");
    CommissionError::Backend(err)
}
