// Emergency contacts
//
// Two permanent contacts (CVV crisis hotline, SAMU medical emergency) are
// always present; the user can add and remove personal ones.

use crate::errors::ContactError;
use serde::{Deserialize, Serialize};

pub const CRISIS_HOTLINE_ID: &str = "cvv";
pub const CRISIS_HOTLINE_PHONE: &str = "188";
pub const EMERGENCY_MEDICAL_ID: &str = "samu";
pub const EMERGENCY_MEDICAL_PHONE: &str = "192";

const PERSONAL_COLORS: [&str; 5] = ["#6C63FF", "#00B894", "#FD79A8", "#FDCB6E", "#0984E3"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub is_permanent: bool,
    pub color: String,
    pub icon: String,
}

impl EmergencyContact {
    pub fn crisis_hotline() -> Self {
        Self {
            id: CRISIS_HOTLINE_ID.to_string(),
            name: "CVV - Centro de Valorização da Vida".to_string(),
            phone: CRISIS_HOTLINE_PHONE.to_string(),
            is_permanent: true,
            color: "#E17055".to_string(),
            icon: "heart".to_string(),
        }
    }

    pub fn emergency_medical() -> Self {
        Self {
            id: EMERGENCY_MEDICAL_ID.to_string(),
            name: "SAMU".to_string(),
            phone: EMERGENCY_MEDICAL_PHONE.to_string(),
            is_permanent: true,
            color: "#D63031".to_string(),
            icon: "medkit".to_string(),
        }
    }
}

/// Emergency contacts: the permanent pair followed by personal entries.
///
/// Only personal contacts are serialized; the permanent ones are rebuilt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactBook {
    personal: Vec<EmergencyContact>,
}

impl ContactBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// All contacts, permanent first
    pub fn all(&self) -> Vec<EmergencyContact> {
        let mut all = vec![
            EmergencyContact::crisis_hotline(),
            EmergencyContact::emergency_medical(),
        ];
        all.extend(self.personal.iter().cloned());
        all
    }

    pub fn personal(&self) -> &[EmergencyContact] {
        &self.personal
    }

    /// Who gets called on a crisis: the first personal contact, else the hotline
    pub fn dial_target(&self) -> EmergencyContact {
        self.personal
            .first()
            .cloned()
            .unwrap_or_else(EmergencyContact::crisis_hotline)
    }

    pub fn add_personal(
        &mut self,
        name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<EmergencyContact, ContactError> {
        let phone = phone.into().trim().to_string();
        if !phone.chars().any(|c| c.is_ascii_digit()) {
            return Err(ContactError::InvalidPhone(phone));
        }

        let contact = EmergencyContact {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            phone,
            is_permanent: false,
            color: PERSONAL_COLORS[self.personal.len() % PERSONAL_COLORS.len()].to_string(),
            icon: "person".to_string(),
        };
        self.personal.push(contact.clone());
        Ok(contact)
    }

    pub fn remove(&mut self, id: &str) -> Result<EmergencyContact, ContactError> {
        if id == CRISIS_HOTLINE_ID || id == EMERGENCY_MEDICAL_ID {
            return Err(ContactError::Permanent(id.to_string()));
        }
        let index = self
            .personal
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ContactError::NotFound(id.to_string()))?;
        Ok(self.personal.remove(index))
    }
}
