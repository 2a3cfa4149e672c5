use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::color::Color;
use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};
use crate::domain::types::{
    ProductId, ProductName, ProductPrice, ProductSize, TypeConstraintError,
};

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub features: Option<String>,
    pub purchase_date: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub size: String,
    pub image_path: Option<String>,
}

impl Product {
    /// Converts the row into a domain product carrying the supplied colors.
    pub fn into_domain(self, colors: Vec<Color>) -> Result<DomainProduct, TypeConstraintError> {
        Ok(DomainProduct {
            id: ProductId::new(self.id)?,
            name: ProductName::new(self.name)?,
            price: ProductPrice::new(self.price)?,
            features: self.features,
            purchase_date: self.purchase_date,
            description: self.description,
            size: ProductSize::new(self.size)?,
            image_path: self.image_path,
            colors,
        })
    }
}

/// Insertable form of [`Product`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub features: Option<String>,
    pub purchase_date: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub size: String,
    pub image_path: Option<String>,
}

impl From<DomainNewProduct> for NewProduct {
    fn from(product: DomainNewProduct) -> Self {
        Self {
            name: product.name.into_inner(),
            price: product.price.get(),
            features: product.features,
            purchase_date: product.purchase_date,
            description: product.description,
            size: product.size.into_inner(),
            image_path: product.image_path,
        }
    }
}
