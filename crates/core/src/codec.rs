//! Row codec: the fixed 21-column layout of the submissions table.
//!
//! Row 1 of the table is the header; data starts at row 2. The column order
//! below is a wire contract with the backing table and must not change.
//!
//! | Idx | Column                | Idx | Column          |
//! |-----|-----------------------|-----|-----------------|
//! | 0   | submissionId          | 11  | dmxAccessAvailable |
//! | 1   | timestamp             | 12  | additionalNotes |
//! | 2   | jobName               | 13  | status          |
//! | 3   | siteAddress           | 14  | reviewedBy      |
//! | 4   | contactName           | 15  | reviewedAt      |
//! | 5   | contactEmail          | 16  | closedAt        |
//! | 6   | contactPhone          | 17  | internalNotes   |
//! | 7   | drawingLink           | 18  | purchaseOrder   |
//! | 8   | programmingNarrative  | 19  | scheduledOn     |
//! | 9   | fixturesOperable      | 20  | completedOn     |
//! | 10  | wiringNotes           |     |                 |

use commission_storage::{CellRange, Row, RowPosition};

use crate::status::Status;
use crate::submission::Submission;

/// Number of columns in the layout (`A` through `U`).
pub const COLUMN_COUNT: usize = 21;

/// Prefix of identities synthesized for rows with an empty id cell.
pub const LEGACY_ID_PREFIX: &str = "legacy-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    SubmissionId,
    Timestamp,
    JobName,
    SiteAddress,
    ContactName,
    ContactEmail,
    ContactPhone,
    DrawingLink,
    ProgrammingNarrative,
    FixturesOperable,
    WiringNotes,
    DmxAccessAvailable,
    AdditionalNotes,
    Status,
    ReviewedBy,
    ReviewedAt,
    ClosedAt,
    InternalNotes,
    PurchaseOrder,
    ScheduledOn,
    CompletedOn,
}

impl Column {
    /// Columns in table order.
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::SubmissionId,
        Column::Timestamp,
        Column::JobName,
        Column::SiteAddress,
        Column::ContactName,
        Column::ContactEmail,
        Column::ContactPhone,
        Column::DrawingLink,
        Column::ProgrammingNarrative,
        Column::FixturesOperable,
        Column::WiringNotes,
        Column::DmxAccessAvailable,
        Column::AdditionalNotes,
        Column::Status,
        Column::ReviewedBy,
        Column::ReviewedAt,
        Column::ClosedAt,
        Column::InternalNotes,
        Column::PurchaseOrder,
        Column::ScheduledOn,
        Column::CompletedOn,
    ];

    /// Zero-based cell index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Text of this column's header cell.
    pub fn header(self) -> &'static str {
        match self {
            Column::SubmissionId => "Submission ID",
            Column::Timestamp => "Timestamp",
            Column::JobName => "Job name",
            Column::SiteAddress => "Site address",
            Column::ContactName => "Contact name",
            Column::ContactEmail => "Contact email",
            Column::ContactPhone => "Contact phone",
            Column::DrawingLink => "Drawing link",
            Column::ProgrammingNarrative => "Programming narrative",
            Column::FixturesOperable => "Fixtures operable",
            Column::WiringNotes => "Wiring notes",
            Column::DmxAccessAvailable => "DMX access available",
            Column::AdditionalNotes => "Additional notes",
            Column::Status => "Status",
            Column::ReviewedBy => "Reviewed By",
            Column::ReviewedAt => "Reviewed At",
            Column::ClosedAt => "Closed At",
            Column::InternalNotes => "Internal Notes",
            Column::PurchaseOrder => "Purchase Order",
            Column::ScheduledOn => "Scheduled On",
            Column::CompletedOn => "Completed On",
        }
    }
}

/// The header row, for setting up a fresh table.
pub fn header_row() -> Row {
    Column::ALL.iter().map(|c| c.header().to_string()).collect()
}

/// All rows, columns `A:U`.
pub fn table_range() -> CellRange {
    CellRange::leading(COLUMN_COUNT)
}

/// Columns `A:U` of one row.
pub fn row_range(position: RowPosition) -> CellRange {
    table_range().at_row(position)
}

/// Identity synthesized for a row whose id cell is empty.
pub fn legacy_id(position: RowPosition) -> String {
    format!("{LEGACY_ID_PREFIX}{position}")
}

/// Trimmed text of `column`, or empty when the row is shorter.
pub fn cell(cells: &[String], column: Column) -> &str {
    cells.get(column.index()).map_or("", |c| c.trim())
}

/// Decode one data row. Never fails: missing cells are empty, an unknown
/// status is `new`, and an empty id becomes `legacy-<position>`.
pub fn decode(cells: &[String], position: RowPosition) -> Submission {
    let get = |column: Column| cell(cells, column).to_string();

    let id = match cell(cells, Column::SubmissionId) {
        "" => legacy_id(position),
        id => id.to_string(),
    };

    Submission {
        id,
        created_at: get(Column::Timestamp),
        job_name: get(Column::JobName),
        site_address: get(Column::SiteAddress),
        contact_name: get(Column::ContactName),
        contact_email: get(Column::ContactEmail),
        contact_phone: get(Column::ContactPhone),
        drawing_link: get(Column::DrawingLink),
        programming_narrative: get(Column::ProgrammingNarrative),
        fixtures_operable: get(Column::FixturesOperable),
        wiring_notes: get(Column::WiringNotes),
        dmx_access_available: get(Column::DmxAccessAvailable),
        additional_notes: get(Column::AdditionalNotes),
        status: Status::parse(cell(cells, Column::Status)).unwrap_or_default(),
        reviewed_by: get(Column::ReviewedBy),
        reviewed_at: get(Column::ReviewedAt),
        closed_at: get(Column::ClosedAt),
        internal_notes: get(Column::InternalNotes),
        purchase_order: get(Column::PurchaseOrder),
        scheduled_on: get(Column::ScheduledOn),
        completed_on: get(Column::CompletedOn),
    }
}

/// Encode a submission into a full-width row in column order.
pub fn encode(submission: &Submission) -> Row {
    let mut cells = vec![String::new(); COLUMN_COUNT];
    let mut set = |column: Column, value: &str| cells[column.index()] = value.to_string();

    set(Column::SubmissionId, &submission.id);
    set(Column::Timestamp, &submission.created_at);
    set(Column::JobName, &submission.job_name);
    set(Column::SiteAddress, &submission.site_address);
    set(Column::ContactName, &submission.contact_name);
    set(Column::ContactEmail, &submission.contact_email);
    set(Column::ContactPhone, &submission.contact_phone);
    set(Column::DrawingLink, &submission.drawing_link);
    set(Column::ProgrammingNarrative, &submission.programming_narrative);
    set(Column::FixturesOperable, &submission.fixtures_operable);
    set(Column::WiringNotes, &submission.wiring_notes);
    set(Column::DmxAccessAvailable, &submission.dmx_access_available);
    set(Column::AdditionalNotes, &submission.additional_notes);
    set(Column::Status, submission.status.as_str());
    set(Column::ReviewedBy, &submission.reviewed_by);
    set(Column::ReviewedAt, &submission.reviewed_at);
    set(Column::ClosedAt, &submission.closed_at);
    set(Column::InternalNotes, &submission.internal_notes);
    set(Column::PurchaseOrder, &submission.purchase_order);
    set(Column::ScheduledOn, &submission.scheduled_on);
    set(Column::CompletedOn, &submission.completed_on);

    cells
}

/// Copy `cells` padded with empty strings to the full layout width.
///
/// Cells past the last column are dropped; writes only address `A:U`.
pub fn padded(cells: &[String]) -> Row {
    let mut row: Row = cells.iter().take(COLUMN_COUNT).cloned().collect();
    row.resize(COLUMN_COUNT, String::new());
    row
}
