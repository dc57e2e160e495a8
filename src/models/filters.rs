use std::cmp::Ordering;

use super::enums::{SortDirection, SortField};
use super::specialist::Specialist;
use crate::specialists::ValidationError;

/// Ordering for the specialist listings. Defaults to `nombre_completo` ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for ListOrder {
    fn default() -> Self {
        Self {
            field: SortField::FullName,
            direction: SortDirection::Asc,
        }
    }
}

impl ListOrder {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Parse the `orderBy`/`direction` query pair. Missing values fall back
    /// to the defaults; the direction is case-insensitive.
    pub fn parse(order_by: Option<&str>, direction: Option<&str>) -> Result<Self, ValidationError> {
        let mut order = Self::default();
        if let Some(field) = order_by.map(str::trim).filter(|s| !s.is_empty()) {
            order.field = field.parse()?;
        }
        if let Some(direction) = direction.map(str::trim).filter(|s| !s.is_empty()) {
            order.direction = direction.to_ascii_lowercase().parse()?;
        }
        Ok(order)
    }

    /// Compare two records the same way the SQL `ORDER BY` does: by the
    /// chosen field, ties broken by id ascending.
    pub fn compare(&self, a: &Specialist, b: &Specialist) -> Ordering {
        let primary = match self.field {
            SortField::FullName => a.full_name.cmp(&b.full_name),
            SortField::Specialty => a.specialty.cmp(&b.specialty),
            SortField::RegistrationNumber => a.registration_number.cmp(&b.registration_number),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Id => a.id.cmp(&b.id),
        };
        let primary = match self.direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}
