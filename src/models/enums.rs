use serde::{Deserialize, Serialize};

use crate::specialists::ValidationError;

/// Generates an enum with an `as_str` wire name and a matching `FromStr`.
macro_rules! str_enum {
    ($name:ident, $field:literal { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ValidationError::InvalidValue {
                        field: $field,
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(SortField, "orderBy" {
    FullName => "nombre_completo",
    Specialty => "especialidad",
    RegistrationNumber => "registro_profesional",
    CreatedAt => "created_at",
    UpdatedAt => "updated_at",
    Id => "id",
});

str_enum!(SortDirection, "direction" {
    Asc => "asc",
    Desc => "desc",
});

impl SortField {
    /// Column name in the `specialists` table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::Specialty => "specialty",
            Self::RegistrationNumber => "registration_number",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Id => "id",
        }
    }
}

impl SortDirection {
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}
