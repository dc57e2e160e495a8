//! Specialist record service.
//!
//! Validation and the active/inactive lifecycle on top of an injected
//! `SpecialistStore`. Create validates in a fixed order and stops at the
//! first failure; update validates only the fields it is given and merges
//! them into the stored record.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::db::{SpecialistStore, StoreError};
use crate::models::*;
use crate::schedule::{has_overlaps, parse_schedule};

/// Minimum length of `nombre_completo`, in characters.
pub const MIN_NAME_CHARS: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("nombre_completo must have at least 3 characters")]
    NameTooShort,

    #[error("especialidad is required")]
    SpecialtyRequired,

    #[error("registro_profesional is required")]
    RegistrationRequired,

    #[error("registro_profesional already exists")]
    DuplicateRegistration,

    #[error("dias_horarios is required and must map each day to a list of {{inicio, fin}} ranges")]
    ScheduleInvalid,

    #[error("dias_horarios contains overlapping time ranges")]
    ScheduleOverlap,

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Specialist not found: {0}")]
    NotFound(Uuid),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            // A writer that raced past the pre-check lands here.
            StoreError::DuplicateRegistration(_) => {
                ServiceError::Validation(ValidationError::DuplicateRegistration)
            }
            other => ServiceError::Store(other),
        }
    }
}

pub struct SpecialistService {
    store: Arc<dyn SpecialistStore>,
}

impl SpecialistService {
    pub fn new(store: Arc<dyn SpecialistStore>) -> Self {
        Self { store }
    }

    /// Active specialists in the requested order.
    pub fn list_active(&self, order: &ListOrder) -> Result<Vec<Specialist>, ServiceError> {
        Ok(self.store.list(true, order)?)
    }

    /// Soft-deleted specialists, by name.
    pub fn list_inactive(&self) -> Result<Vec<Specialist>, ServiceError> {
        Ok(self.store.list(false, &ListOrder::default())?)
    }

    pub fn get(&self, id: &Uuid) -> Result<Specialist, ServiceError> {
        self.store.get(id)?.ok_or(ServiceError::NotFound(*id))
    }

    /// Validate and persist a new specialist. The record starts active.
    pub fn create(&self, payload: SpecialistPayload) -> Result<Specialist, ServiceError> {
        let new = self.validate_new(payload).inspect_err(|e| {
            tracing::debug!(error = %e, "Rejected specialist create");
        })?;
        let created = self.store.insert(new)?;
        tracing::info!(id = %created.id, "Specialist created");
        Ok(created)
    }

    fn validate_new(&self, payload: SpecialistPayload) -> Result<NewSpecialist, ServiceError> {
        let full_name = validate_name(payload.nombre_completo.as_ref())?;
        let specialty = present(payload.especialidad.as_ref())
            .ok_or(ValidationError::SpecialtyRequired)?;
        let registration_number = present(payload.registro_profesional.as_ref())
            .ok_or(ValidationError::RegistrationRequired)?;
        if self.store.registration_exists(&registration_number, None)? {
            return Err(ValidationError::DuplicateRegistration.into());
        }
        let weekly_schedule = validate_schedule(payload.dias_horarios.as_ref())?;

        Ok(NewSpecialist {
            full_name,
            specialty,
            registration_number,
            weekly_schedule,
        })
    }

    /// Apply the supplied fields to an existing specialist.
    pub fn update(&self, id: &Uuid, payload: SpecialistPayload) -> Result<Specialist, ServiceError> {
        let mut specialist = self.get(id)?;
        let patch = self.validate_patch(&specialist, payload).inspect_err(|e| {
            tracing::debug!(%id, error = %e, "Rejected specialist update");
        })?;

        specialist.apply(patch);
        let updated = self
            .store
            .update(&specialist)?
            .ok_or(ServiceError::NotFound(*id))?;
        tracing::info!(%id, "Specialist updated");
        Ok(updated)
    }

    fn validate_patch(
        &self,
        current: &Specialist,
        payload: SpecialistPayload,
    ) -> Result<SpecialistPatch, ServiceError> {
        let full_name = payload
            .nombre_completo
            .as_ref()
            .map(|name| validate_name(Some(name)))
            .transpose()?;
        let specialty = payload
            .especialidad
            .as_ref()
            .map(|s| present(Some(s)).ok_or(ValidationError::SpecialtyRequired))
            .transpose()?;
        let registration_number = payload
            .registro_profesional
            .as_ref()
            .map(|r| present(Some(r)).ok_or(ValidationError::RegistrationRequired))
            .transpose()?;
        if let Some(registration) = &registration_number {
            if *registration != current.registration_number
                && self.store.registration_exists(registration, Some(&current.id))?
            {
                return Err(ValidationError::DuplicateRegistration.into());
            }
        }
        let weekly_schedule = payload
            .dias_horarios
            .as_ref()
            .map(|value| validate_schedule(Some(value)))
            .transpose()?;

        Ok(SpecialistPatch {
            full_name,
            specialty,
            registration_number,
            weekly_schedule,
        })
    }

    /// Mark inactive. Repeating it on an inactive record is not an error.
    pub fn soft_delete(&self, id: &Uuid) -> Result<(), ServiceError> {
        self.set_active(id, false)?;
        tracing::info!(%id, "Specialist deactivated");
        Ok(())
    }

    /// Mark active again. Repeating it on an active record is not an error.
    pub fn restore(&self, id: &Uuid) -> Result<(), ServiceError> {
        self.set_active(id, true)?;
        tracing::info!(%id, "Specialist restored");
        Ok(())
    }

    fn set_active(&self, id: &Uuid, active: bool) -> Result<(), ServiceError> {
        if self.store.set_active(id, active)? {
            Ok(())
        } else {
            Err(ServiceError::NotFound(*id))
        }
    }

    /// Remove the record permanently.
    pub fn hard_delete(&self, id: &Uuid) -> Result<(), ServiceError> {
        if !self.store.delete(id)? {
            return Err(ServiceError::NotFound(*id));
        }
        tracing::warn!(%id, "Specialist permanently deleted");
        Ok(())
    }
}

// ═══════════════════════════════════════════
// Field rules
// ═══════════════════════════════════════════

/// Trimmed string value, or `None` when missing, blank or not a string.
fn present(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn validate_name(value: Option<&Value>) -> Result<String, ValidationError> {
    present(value)
        .filter(|name| name.chars().count() >= MIN_NAME_CHARS)
        .ok_or(ValidationError::NameTooShort)
}

fn validate_schedule(value: Option<&Value>) -> Result<WeeklySchedule, ValidationError> {
    let schedule = value
        .and_then(parse_schedule)
        .ok_or(ValidationError::ScheduleInvalid)?;
    if has_overlaps(&schedule) {
        return Err(ValidationError::ScheduleOverlap);
    }
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, SqliteStore};
    use serde_json::json;

    fn service() -> SpecialistService {
        SpecialistService::new(Arc::new(MemoryStore::new()))
    }

    fn payload(name: &str, registration: &str) -> SpecialistPayload {
        SpecialistPayload {
            nombre_completo: Some(name.into()),
            especialidad: Some("Cardiología".into()),
            registro_profesional: Some(registration.into()),
            dias_horarios: Some(json!({
                "lunes": [{"inicio": "09:00", "fin": "10:00"}, {"inicio": "10:00", "fin": "12:00"}],
                "miercoles": [{"inicio": "15:00", "fin": "18:00"}]
            })),
        }
    }

    fn validation(err: ServiceError) -> ValidationError {
        match err {
            ServiceError::Validation(v) => v,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_returns_record_matching_input() {
        let svc = service();
        let created = svc.create(payload("Ana Torres", "CMP-1")).unwrap();

        assert_eq!(created.full_name, "Ana Torres");
        assert_eq!(created.specialty, "Cardiología");
        assert_eq!(created.registration_number, "CMP-1");
        assert!(created.active);
        let days: Vec<_> = created.weekly_schedule.days().map(|(d, _)| d).collect();
        assert_eq!(days, ["lunes", "miercoles"]);
        assert_eq!(svc.get(&created.id).unwrap(), created);
    }

    #[test]
    fn create_trims_text_fields() {
        let svc = service();
        let mut p = payload("  Ana Torres ", " CMP-1 ");
        p.especialidad = Some(" Cardiología\n".into());
        let created = svc.create(p).unwrap();
        assert_eq!(created.full_name, "Ana Torres");
        assert_eq!(created.specialty, "Cardiología");
        assert_eq!(created.registration_number, "CMP-1");
    }

    #[test]
    fn short_name_is_rejected_and_nothing_persisted() {
        let svc = service();
        let err = svc.create(payload("Al", "CMP-1")).unwrap_err();
        assert_eq!(validation(err), ValidationError::NameTooShort);
        assert!(svc.list_active(&ListOrder::default()).unwrap().is_empty());
    }

    #[test]
    fn name_length_counts_characters() {
        let svc = service();
        // Two characters, four bytes
        assert!(svc.create(payload("Ñá", "CMP-1")).is_err());
        assert!(svc.create(payload("Íña", "CMP-2")).is_ok());
    }

    #[test]
    fn create_validates_in_fixed_order() {
        let svc = service();
        svc.create(payload("Existente", "DUP")).unwrap();

        let all_bad = SpecialistPayload::default();
        assert_eq!(validation(svc.create(all_bad).unwrap_err()), ValidationError::NameTooShort);

        let mut p = payload("Ana Torres", "DUP");
        p.especialidad = None;
        p.dias_horarios = None;
        assert_eq!(validation(svc.create(p).unwrap_err()), ValidationError::SpecialtyRequired);

        let mut p = payload("Ana Torres", "");
        p.dias_horarios = None;
        assert_eq!(validation(svc.create(p).unwrap_err()), ValidationError::RegistrationRequired);

        let mut p = payload("Ana Torres", "DUP");
        p.dias_horarios = Some(json!("todos los días"));
        assert_eq!(validation(svc.create(p).unwrap_err()), ValidationError::DuplicateRegistration);

        let mut p = payload("Ana Torres", "NEW");
        p.dias_horarios = None;
        assert_eq!(validation(svc.create(p).unwrap_err()), ValidationError::ScheduleInvalid);

        let mut p = payload("Ana Torres", "NEW");
        p.dias_horarios = Some(json!({"lunes": [
            {"inicio": "09:00", "fin": "10:00"},
            {"inicio": "09:30", "fin": "11:00"}
        ]}));
        assert_eq!(validation(svc.create(p).unwrap_err()), ValidationError::ScheduleOverlap);
    }

    #[test]
    fn non_string_fields_fail_at_their_own_step() {
        let svc = service();

        let p = SpecialistPayload {
            nombre_completo: Some(json!("Al")),
            especialidad: Some(json!(5)),
            ..Default::default()
        };
        assert_eq!(validation(svc.create(p).unwrap_err()), ValidationError::NameTooShort);

        let mut p = payload("Ana Torres", "CMP-1");
        p.especialidad = Some(json!(["Cardiología"]));
        assert_eq!(validation(svc.create(p).unwrap_err()), ValidationError::SpecialtyRequired);

        let mut p = payload("Ana Torres", "CMP-1");
        p.registro_profesional = Some(json!(1234));
        assert_eq!(validation(svc.create(p).unwrap_err()), ValidationError::RegistrationRequired);

        let created = svc.create(payload("Ana Torres", "CMP-1")).unwrap();
        let err = svc
            .update(
                &created.id,
                SpecialistPayload {
                    nombre_completo: Some(json!(true)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(validation(err), ValidationError::NameTooShort);
    }

    #[test]
    fn update_leaves_active_flag_alone() {
        let svc = service();
        let created = svc.create(payload("Ana Torres", "CMP-1")).unwrap();
        svc.soft_delete(&created.id).unwrap();

        let updated = svc
            .update(
                &created.id,
                SpecialistPayload {
                    especialidad: Some("Neurología".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!updated.active);
        assert!(!svc.get(&created.id).unwrap().active);
    }

    #[test]
    fn empty_schedule_is_accepted() {
        let svc = service();
        let mut p = payload("Ana Torres", "CMP-1");
        p.dias_horarios = Some(json!({}));
        let created = svc.create(p).unwrap();
        assert!(created.weekly_schedule.is_empty());
    }

    #[test]
    fn duplicate_registration_includes_inactive_records() {
        let svc = service();
        let first = svc.create(payload("Ana Torres", "CMP-1")).unwrap();
        svc.soft_delete(&first.id).unwrap();

        let err = svc.create(payload("Otra Persona", "CMP-1")).unwrap_err();
        assert_eq!(validation(err), ValidationError::DuplicateRegistration);
    }

    #[test]
    fn store_level_duplicate_maps_to_validation() {
        let err: ServiceError = StoreError::DuplicateRegistration("X".into()).into();
        assert_eq!(validation(err), ValidationError::DuplicateRegistration);
    }

    #[test]
    fn get_missing_is_not_found() {
        let id = Uuid::new_v4();
        assert!(matches!(service().get(&id), Err(ServiceError::NotFound(missing)) if missing == id));
    }

    #[test]
    fn update_merges_supplied_fields() {
        let svc = service();
        let created = svc.create(payload("Ana Torres", "CMP-1")).unwrap();

        let updated = svc
            .update(
                &created.id,
                SpecialistPayload {
                    especialidad: Some("Neurología".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.specialty, "Neurología");
        assert_eq!(updated.full_name, created.full_name);
        assert_eq!(updated.registration_number, created.registration_number);
        assert_eq!(updated.weekly_schedule, created.weekly_schedule);
        assert_eq!(updated.active, created.active);
        assert_eq!(svc.get(&created.id).unwrap(), updated);
    }

    #[test]
    fn update_with_short_name_leaves_record_unchanged() {
        let svc = service();
        let created = svc.create(payload("Ana Torres", "CMP-1")).unwrap();
        let err = svc
            .update(
                &created.id,
                SpecialistPayload {
                    nombre_completo: Some("Jo".into()),
                    especialidad: Some("Neurología".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(validation(err), ValidationError::NameTooShort);
        assert_eq!(svc.get(&created.id).unwrap(), created);
    }

    #[test]
    fn update_allows_keeping_own_registration() {
        let svc = service();
        let created = svc.create(payload("Ana Torres", "CMP-1")).unwrap();
        let updated = svc.update(&created.id, payload("Ana Torres Vega", "CMP-1")).unwrap();
        assert_eq!(updated.full_name, "Ana Torres Vega");
    }

    #[test]
    fn update_rejects_registration_of_another_record() {
        let svc = service();
        svc.create(payload("Ana Torres", "CMP-1")).unwrap();
        let other = svc.create(payload("Bruno Díaz", "CMP-2")).unwrap();

        let err = svc
            .update(
                &other.id,
                SpecialistPayload {
                    registro_profesional: Some("CMP-1".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(validation(err), ValidationError::DuplicateRegistration);
    }

    #[test]
    fn update_rejects_overlapping_or_malformed_schedule() {
        let svc = service();
        let created = svc.create(payload("Ana Torres", "CMP-1")).unwrap();

        let overlapping = SpecialistPayload {
            dias_horarios: Some(json!({"viernes": [
                {"inicio": "08:00", "fin": "12:00"},
                {"inicio": "11:00", "fin": "13:00"}
            ]})),
            ..Default::default()
        };
        assert_eq!(
            validation(svc.update(&created.id, overlapping).unwrap_err()),
            ValidationError::ScheduleOverlap
        );

        let malformed = SpecialistPayload {
            dias_horarios: Some(json!([1, 2, 3])),
            ..Default::default()
        };
        assert_eq!(
            validation(svc.update(&created.id, malformed).unwrap_err()),
            ValidationError::ScheduleInvalid
        );
    }

    #[test]
    fn update_rejects_blank_required_fields() {
        let svc = service();
        let created = svc.create(payload("Ana Torres", "CMP-1")).unwrap();
        let err = svc
            .update(
                &created.id,
                SpecialistPayload {
                    especialidad: Some("   ".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(validation(err), ValidationError::SpecialtyRequired);
    }

    #[test]
    fn update_missing_is_not_found() {
        let err = service()
            .update(&Uuid::new_v4(), SpecialistPayload::default())
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn soft_delete_then_restore_round_trips() {
        let svc = service();
        let created = svc.create(payload("Ana Torres", "CMP-1")).unwrap();

        svc.soft_delete(&created.id).unwrap();
        assert!(!svc.get(&created.id).unwrap().active);
        // Idempotent
        svc.soft_delete(&created.id).unwrap();

        svc.restore(&created.id).unwrap();
        svc.restore(&created.id).unwrap();
        let restored = svc.get(&created.id).unwrap();
        assert!(restored.active);
        assert_eq!(restored.full_name, created.full_name);
        assert_eq!(restored.specialty, created.specialty);
        assert_eq!(restored.registration_number, created.registration_number);
        assert_eq!(restored.weekly_schedule, created.weekly_schedule);
        assert_eq!(restored.created_at, created.created_at);
    }

    #[test]
    fn listings_partition_by_active_flag() {
        let svc = service();
        let a = svc.create(payload("Ana Torres", "CMP-1")).unwrap();
        let b = svc.create(payload("Bruno Díaz", "CMP-2")).unwrap();
        svc.soft_delete(&b.id).unwrap();

        let active = svc.list_active(&ListOrder::default()).unwrap();
        let inactive = svc.list_inactive().unwrap();
        assert!(active.iter().all(|s| s.active));
        assert!(inactive.iter().all(|s| !s.active));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, a.id);
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].id, b.id);
    }

    #[test]
    fn hard_delete_is_terminal() {
        let svc = service();
        let created = svc.create(payload("Ana Torres", "CMP-1")).unwrap();
        svc.hard_delete(&created.id).unwrap();

        assert!(matches!(svc.get(&created.id), Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.restore(&created.id), Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.hard_delete(&created.id), Err(ServiceError::NotFound(_))));
        // The registration number is free again
        assert!(svc.create(payload("Ana Torres", "CMP-1")).is_ok());
    }

    #[test]
    fn lifecycle_on_missing_id_is_not_found() {
        let svc = service();
        let id = Uuid::new_v4();
        assert!(matches!(svc.soft_delete(&id), Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.restore(&id), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn works_against_sqlite_store() {
        let svc = SpecialistService::new(Arc::new(SqliteStore::open_in_memory().unwrap()));
        let created = svc.create(payload("Ana Torres", "CMP-1")).unwrap();
        assert_eq!(
            validation(svc.create(payload("Ana Torres", "CMP-1")).unwrap_err()),
            ValidationError::DuplicateRegistration
        );
        let updated = svc
            .update(
                &created.id,
                SpecialistPayload {
                    nombre_completo: Some("Ana María Torres".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(svc.get(&created.id).unwrap(), updated);
    }
}
