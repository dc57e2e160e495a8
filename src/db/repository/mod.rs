//! Repository layer: the persistence port for specialists and its
//! SQLite implementation.

mod specialist;

use uuid::Uuid;

use super::StoreError;
use crate::models::{ListOrder, NewSpecialist, Specialist};

pub use specialist::SqliteStore;

/// Storage operations the specialist service depends on.
///
/// `insert` and `update` must reject a registration number already held by
/// another record with `StoreError::DuplicateRegistration`, atomically with
/// the write. The service pre-checks too, but only the store can close the
/// window between two concurrent writers.
pub trait SpecialistStore: Send + Sync {
    fn list(&self, active: bool, order: &ListOrder) -> Result<Vec<Specialist>, StoreError>;
    fn get(&self, id: &Uuid) -> Result<Option<Specialist>, StoreError>;
    fn registration_exists(
        &self,
        registration_number: &str,
        excluding: Option<&Uuid>,
    ) -> Result<bool, StoreError>;
    /// Persist a new active record; the store assigns id and timestamps.
    fn insert(&self, new: NewSpecialist) -> Result<Specialist, StoreError>;
    /// Overwrite the editable fields (name, specialty, registration number,
    /// schedule) and `updated_at`. `active` and `created_at` keep their
    /// stored values. Returns the stored record, or `None` if the id no
    /// longer exists.
    fn update(&self, specialist: &Specialist) -> Result<Option<Specialist>, StoreError>;
    /// Returns `false` if the id does not exist.
    fn set_active(&self, id: &Uuid, active: bool) -> Result<bool, StoreError>;
    /// Returns `false` if the id does not exist.
    fn delete(&self, id: &Uuid) -> Result<bool, StoreError>;
}
