use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{SubsecRound, Utc};
use uuid::Uuid;

use super::{SpecialistStore, StoreError};
use crate::models::{ListOrder, NewSpecialist, Specialist};

/// In-process `SpecialistStore`. Uniqueness is checked and the write applied
/// under one write lock, so it gives the same guarantee as the SQLite
/// constraint.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, Specialist>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Uuid, Specialist>>, StoreError> {
        self.records.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Uuid, Specialist>>, StoreError> {
        self.records.write().map_err(|_| StoreError::LockPoisoned)
    }
}

fn registration_taken(
    records: &HashMap<Uuid, Specialist>,
    registration_number: &str,
    excluding: Option<&Uuid>,
) -> bool {
    records
        .values()
        .any(|s| s.registration_number == registration_number && Some(&s.id) != excluding)
}

impl SpecialistStore for MemoryStore {
    fn list(&self, active: bool, order: &ListOrder) -> Result<Vec<Specialist>, StoreError> {
        let records = self.read()?;
        let mut specialists: Vec<Specialist> = records
            .values()
            .filter(|s| s.active == active)
            .cloned()
            .collect();
        specialists.sort_by(|a, b| order.compare(a, b));
        Ok(specialists)
    }

    fn get(&self, id: &Uuid) -> Result<Option<Specialist>, StoreError> {
        Ok(self.read()?.get(id).cloned())
    }

    fn registration_exists(
        &self,
        registration_number: &str,
        excluding: Option<&Uuid>,
    ) -> Result<bool, StoreError> {
        let records = self.read()?;
        Ok(registration_taken(&records, registration_number, excluding))
    }

    fn insert(&self, new: NewSpecialist) -> Result<Specialist, StoreError> {
        let mut records = self.write()?;
        if registration_taken(&records, &new.registration_number, None) {
            return Err(StoreError::DuplicateRegistration(new.registration_number));
        }

        let now = Utc::now().trunc_subsecs(6);
        let specialist = Specialist {
            id: Uuid::new_v4(),
            full_name: new.full_name,
            specialty: new.specialty,
            registration_number: new.registration_number,
            weekly_schedule: new.weekly_schedule,
            active: true,
            created_at: now,
            updated_at: now,
        };
        records.insert(specialist.id, specialist.clone());
        Ok(specialist)
    }

    fn update(&self, specialist: &Specialist) -> Result<Option<Specialist>, StoreError> {
        let mut records = self.write()?;
        if !records.contains_key(&specialist.id) {
            return Ok(None);
        }
        if registration_taken(&records, &specialist.registration_number, Some(&specialist.id)) {
            return Err(StoreError::DuplicateRegistration(
                specialist.registration_number.clone(),
            ));
        }

        let Some(stored) = records.get_mut(&specialist.id) else {
            return Ok(None);
        };
        stored.full_name = specialist.full_name.clone();
        stored.specialty = specialist.specialty.clone();
        stored.registration_number = specialist.registration_number.clone();
        stored.weekly_schedule = specialist.weekly_schedule.clone();
        stored.updated_at = Utc::now().trunc_subsecs(6);
        Ok(Some(stored.clone()))
    }

    fn set_active(&self, id: &Uuid, active: bool) -> Result<bool, StoreError> {
        let mut records = self.write()?;
        match records.get_mut(id) {
            Some(specialist) => {
                specialist.active = active;
                specialist.updated_at = Utc::now().trunc_subsecs(6);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: &Uuid) -> Result<bool, StoreError> {
        Ok(self.write()?.remove(id).is_some())
    }
}
