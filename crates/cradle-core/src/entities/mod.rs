//! Entity structs for all Cradle domain objects.
//!
//! Persisted entities (`Account`, `Child`, `VaccinationRecord`) map to tables
//! in the libSQL database. Chart types are ephemeral: computed fresh by the
//! schedule generator on every call and never stored. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and schema
//! validation.

mod account;
mod chart;
mod child;
mod vaccination;

pub use account::Account;
pub use chart::{AdministeredDose, ChartEntry};
pub use child::Child;
pub use vaccination::{DoseEvent, VaccinationRecord};
