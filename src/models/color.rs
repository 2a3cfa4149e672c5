use diesel::prelude::*;

use crate::domain::color::Color as DomainColor;
use crate::domain::types::{ColorId, ColorName, TypeConstraintError};

/// Diesel model representing the `colors` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::colors)]
pub struct Color {
    pub id: i32,
    pub name: String,
}

impl TryFrom<Color> for DomainColor {
    type Error = TypeConstraintError;

    fn try_from(color: Color) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ColorId::new(color.id)?,
            name: ColorName::new(color.name)?,
        })
    }
}
