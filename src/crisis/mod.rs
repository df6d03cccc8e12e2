// Crisis handling: emergency contacts, escalation and dialing

mod contacts;
mod dialer;
mod escalation;

pub use contacts::{
    ContactBook, EmergencyContact, CRISIS_HOTLINE_ID, CRISIS_HOTLINE_PHONE,
    EMERGENCY_MEDICAL_ID, EMERGENCY_MEDICAL_PHONE,
};
pub use dialer::{CallOutcome, CommandDialer, Dialer};
pub use escalation::{CrisisEscalation, CrisisResponse, EscalationPlan, DEFAULT_AUTO_DIAL_DELAY};
