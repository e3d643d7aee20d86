//! Validation of public intake payloads.

use serde_json::Value;

use crate::error::CommissionError;

/// Fields that must be present as non-blank strings, in check order.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "jobName",
    "siteAddress",
    "purchaseOrder",
    "contactName",
    "contactEmail",
    "contactPhone",
];

/// A validated new-submission request. All text is trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntakePayload {
    pub job_name: String,
    pub site_address: String,
    pub purchase_order: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub drawing_link: String,
    pub programming_narrative: String,
    pub fixtures_operable: bool,
    pub wiring_notes: String,
    pub dmx_access_available: bool,
    pub additional_notes: String,
}

impl IntakePayload {
    /// Validate a decoded JSON body.
    ///
    /// Required fields are checked in [`REQUIRED_FIELDS`] order and the first
    /// failure is reported. Optional text fields that are not strings are
    /// treated as absent; a non-boolean `dmxAccessAvailable` is `false`.
    pub fn from_json(body: &Value) -> Result<Self, CommissionError> {
        let required = |field: &str| -> Result<String, CommissionError> {
            match body.get(field).and_then(Value::as_str).map(str::trim) {
                Some(value) if !value.is_empty() => Ok(value.to_string()),
                _ => Err(CommissionError::required(field)),
            }
        };
        let optional = |field: &str| -> String {
            body.get(field)
                .and_then(Value::as_str)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        let job_name = required("jobName")?;
        let site_address = required("siteAddress")?;
        let purchase_order = required("purchaseOrder")?;
        let contact_name = required("contactName")?;
        let contact_email = required("contactEmail")?;
        let contact_phone = required("contactPhone")?;

        let fixtures_operable = match body.get("fixturesOperable").and_then(Value::as_str) {
            Some("yes") => true,
            Some("no") => false,
            _ => {
                return Err(CommissionError::Validation {
                    field: "fixturesOperable".to_string(),
                    message: "Field \"fixturesOperable\" must be \"yes\" or \"no\".".to_string(),
                })
            }
        };

        Ok(IntakePayload {
            job_name,
            site_address,
            purchase_order,
            contact_name,
            contact_email,
            contact_phone,
            drawing_link: optional("drawingLink"),
            programming_narrative: optional("programmingNarrative"),
            fixtures_operable,
            wiring_notes: optional("wiringNotes"),
            dmx_access_available: body
                .get("dmxAccessAvailable")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            additional_notes: optional("additionalNotes"),
        })
    }
}
