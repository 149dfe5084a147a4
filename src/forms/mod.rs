//! Typed Form State
//!
//! One struct per form kind, with named fields instead of stringly-keyed
//! maps: a misspelled field is a compile error, not a silent no-op. Each
//! kind carries its declarative rule table and its payload mapping.

pub mod announcement;
pub mod complaint;
pub mod document_request;
pub mod registration;

pub use announcement::AnnouncementForm;
pub use complaint::ComplaintForm;
pub use document_request::DocumentRequestForm;
pub use registration::RegistrationForm;
