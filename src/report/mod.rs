//! Report module - the single live report record and its field editors.
//!
//! - `model` - record types and partial-change payloads
//! - `update` - pure field-level updates
//! - `store` - the shared holder of the live record
//! - `template` - the record a session starts from
//! - `routes` - HTTP endpoints for the field editors

pub mod model;
pub mod routes;
pub mod store;
pub mod template;
pub mod update;

pub use model::ReportRecord;
pub use store::RecordStore;
pub use template::initial_record;
