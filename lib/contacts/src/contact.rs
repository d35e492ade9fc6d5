//! The contact entity and its input types.
//!
//! A contact is uniquely keyed by phone number. The phone is immutable
//! once created; the remaining fields are mutable one-by-one through
//! the update operation. Wire field names (`companyName`, `meetingTs`)
//! are preserved for compatibility with the model's function-calling
//! layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A contact record.
///
/// Either fully absent from the store or fully populated at creation;
/// `meeting_ts` may be rewritten independently afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Phone number, the primary key. Immutable once created.
    pub phone: String,
    /// Contact name.
    pub name: String,
    /// Email address.
    pub mail: String,
    /// Company the contact works for.
    #[serde(rename = "companyName")]
    pub company_name: String,
    /// Requested meeting time as a string-encoded timestamp.
    #[serde(rename = "meetingTs")]
    pub meeting_ts: String,
}

impl Contact {
    /// Formats the contact as the summary card read back to the user.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Contact found:\nName: {}\nPhone: {}\nEmail: {}\nCompany: {}\nMeeting Time: {}",
            self.name, self.phone, self.mail, self.company_name, self.meeting_ts
        )
    }
}

/// Input for creating a contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContact {
    /// Phone number (primary key).
    pub phone: String,
    /// Contact name.
    pub name: String,
    /// Email address.
    pub mail: String,
    /// Company name.
    #[serde(rename = "companyName")]
    pub company_name: String,
    /// Requested meeting time.
    #[serde(rename = "meetingTs", default)]
    pub meeting_ts: String,
}

impl NewContact {
    /// Validates the creation input.
    ///
    /// Phone, name, mail, and company must all be non-empty; the
    /// meeting time may be empty until scheduling.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the missing fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        for (field, value) in [
            ("phone", &self.phone),
            ("name", &self.name),
            ("mail", &self.mail),
            ("companyName", &self.company_name),
        ] {
            if value.trim().is_empty() {
                missing.push(field);
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    /// Converts the validated input into a contact record.
    #[must_use]
    pub fn into_contact(self) -> Contact {
        Contact {
            phone: self.phone,
            name: self.name,
            mail: self.mail,
            company_name: self.company_name,
            meeting_ts: self.meeting_ts,
        }
    }
}

/// Required creation fields that were empty or missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Names of the missing fields, in wire-name form.
    pub missing: Vec<&'static str>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required fields: {}", self.missing.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// A partial update to a contact.
///
/// Only the fixed allowed field set is representable here; unknown keys
/// in the model's arguments are silently dropped at deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactUpdate {
    /// New name, if provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New email address, if provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    /// New company name, if provided.
    #[serde(rename = "companyName", default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// New meeting time, if provided.
    #[serde(rename = "meetingTs", default, skip_serializing_if = "Option::is_none")]
    pub meeting_ts: Option<String>,
}

impl ContactUpdate {
    /// Returns true if no recognized fields were provided.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.mail.is_none()
            && self.company_name.is_none()
            && self.meeting_ts.is_none()
    }

    /// Applies the update to a contact in place.
    pub fn apply_to(&self, contact: &mut Contact) {
        if let Some(name) = &self.name {
            contact.name = name.clone();
        }
        if let Some(mail) = &self.mail {
            contact.mail = mail.clone();
        }
        if let Some(company) = &self.company_name {
            contact.company_name = company.clone();
        }
        if let Some(ts) = &self.meeting_ts {
            contact.meeting_ts = ts.clone();
        }
    }
}
