use serde::{Deserialize, Serialize};

use crate::domain::types::{ColorId, ColorName};

/// A color a product can be available in. Reference data populated outside
/// this service; there is no write path for colors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Color {
    pub id: ColorId,
    pub name: ColorName,
}
