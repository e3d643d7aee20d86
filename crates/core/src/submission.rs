use serde::{Deserialize, Serialize};

use crate::status::Status;

/// One commissioning request, as decoded from a table row.
///
/// Every field except `status` is the trimmed cell text; absent cells are
/// empty strings. Yes/No answers stay as the strings `"Yes"` / `"No"`.
/// Serialized field names match the column names of the table layout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Stable identity: a UUID, or `legacy-<row>` for rows written before
    /// identities were assigned.
    #[serde(rename = "submissionId")]
    pub id: String,
    /// When the intake form was accepted.
    #[serde(rename = "timestamp")]
    pub created_at: String,
    pub job_name: String,
    pub site_address: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub drawing_link: String,
    pub programming_narrative: String,
    pub fixtures_operable: String,
    pub wiring_notes: String,
    pub dmx_access_available: String,
    pub additional_notes: String,
    pub status: Status,
    pub reviewed_by: String,
    pub reviewed_at: String,
    pub closed_at: String,
    pub internal_notes: String,
    pub purchase_order: String,
    pub scheduled_on: String,
    pub completed_on: String,
}

impl Submission {
    /// Whether the identity was synthesized from the row position.
    pub fn is_legacy(&self) -> bool {
        self.id.starts_with(crate::codec::LEGACY_ID_PREFIX)
    }
}

/// Cell text for a yes/no answer.
pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}
