use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::color::Color;
use crate::domain::types::{ProductId, ProductName, ProductPrice, ProductSize};

/// A catalog product together with its resolved color associations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub price: ProductPrice,
    /// Free text, used in practice as a comma-separated tag list.
    pub features: Option<String>,
    pub purchase_date: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub size: ProductSize,
    /// Relative path under which the uploaded image is served.
    pub image_path: Option<String>,
    pub colors: Vec<Color>,
}

/// Information required to create a [`Product`], also used as the full
/// overwrite payload on update. On update, `image_path` of `None` keeps the
/// previously stored path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name: ProductName,
    pub price: ProductPrice,
    pub features: Option<String>,
    pub purchase_date: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub size: ProductSize,
    pub image_path: Option<String>,
}
