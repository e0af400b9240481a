//! Schedule-a-viewing lead form. The form is local UI state, independent
//! of the chat transport; submitting hands the payload to the lead sink
//! and flips to a thank-you confirmation.

use crate::leads::LeadSubmission;
use serde::{Deserialize, Serialize};

/// Optional context the assistant supplies with the tool call.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ViewingSeed {
    #[serde(default)]
    pub neighbourhood: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    Editing,
    Submitting,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Contact,
    Note,
}

/// Local state for one rendered viewing form.
#[derive(Debug, Clone)]
pub struct ViewingForm {
    pub seed: ViewingSeed,
    pub phase: FormPhase,
    pub name: String,
    pub contact: String,
    pub note: String,
    pub active_field: FormField,
    /// Human-readable failure text, shown inline when phase is Failed.
    pub error: Option<String>,
}

impl ViewingForm {
    pub fn new(seed: ViewingSeed) -> Self {
        Self {
            seed,
            phase: FormPhase::Editing,
            name: String::new(),
            contact: String::new(),
            note: String::new(),
            active_field: FormField::Name,
            error: None,
        }
    }

    pub fn next_field(&mut self) {
        self.active_field = match self.active_field {
            FormField::Name => FormField::Contact,
            FormField::Contact => FormField::Note,
            FormField::Note => FormField::Name,
        };
    }

    pub fn active_value_mut(&mut self) -> &mut String {
        match self.active_field {
            FormField::Name => &mut self.name,
            FormField::Contact => &mut self.contact,
            FormField::Note => &mut self.note,
        }
    }

    /// Ready to submit once the visitor has left us a way to reach them.
    pub fn can_submit(&self) -> bool {
        self.phase == FormPhase::Editing
            && !self.name.trim().is_empty()
            && !self.contact.trim().is_empty()
    }

    pub fn to_submission(&self) -> LeadSubmission {
        let mut message = String::new();
        if let Some(n) = &self.seed.neighbourhood {
            message.push_str(&format!("Viewing request for {n}. "));
        }
        if let Some(c) = &self.seed.context {
            message.push_str(&format!("Context: {c}. "));
        }
        message.push_str(&self.note);
        LeadSubmission {
            name: self.name.trim().to_string(),
            contact: self.contact.trim().to_string(),
            message: message.trim().to_string(),
            source: "chat-schedule-viewing".to_string(),
        }
    }

    pub fn mark_submitting(&mut self) {
        self.phase = FormPhase::Submitting;
        self.error = None;
    }

    pub fn mark_confirmed(&mut self) {
        self.phase = FormPhase::Confirmed;
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.phase = FormPhase::Failed;
        self.error = Some(reason.into());
    }

    /// A failed submission returns to editing so the visitor can retry.
    pub fn retry(&mut self) {
        if self.phase == FormPhase::Failed {
            self.phase = FormPhase::Editing;
        }
    }
}
