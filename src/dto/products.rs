use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::product::Product;

/// Listing projection: color names flattened through the junction table.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductListItem {
    pub product_id: i32,
    pub product_name: String,
    pub product_price: f64,
    pub features: Option<String>,
    pub purchase_date: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub size: String,
    pub colors: Vec<String>,
}

impl From<Product> for ProductListItem {
    fn from(product: Product) -> Self {
        Self {
            product_id: product.id.get(),
            product_name: product.name.into_inner(),
            product_price: product.price.get(),
            features: product.features,
            purchase_date: product.purchase_date,
            description: product.description,
            size: product.size.into_inner(),
            colors: product
                .colors
                .into_iter()
                .map(|color| color.name.into_inner())
                .collect(),
        }
    }
}

/// Detail projection: color ids and the stored image path.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub product_id: i32,
    pub product_name: String,
    pub product_price: f64,
    pub features: Option<String>,
    pub purchase_date: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub size: String,
    pub color_ids: Vec<i32>,
    pub image_path: Option<String>,
}

impl From<Product> for ProductDetail {
    fn from(product: Product) -> Self {
        Self {
            product_id: product.id.get(),
            product_name: product.name.into_inner(),
            product_price: product.price.get(),
            features: product.features,
            purchase_date: product.purchase_date,
            description: product.description,
            size: product.size.into_inner(),
            color_ids: product
                .colors
                .into_iter()
                .map(|color| color.id.get())
                .collect(),
            image_path: product.image_path,
        }
    }
}

/// Envelope returned by the listing endpoint. `total_records` counts every
/// match regardless of the pagination window.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub data: Vec<ProductListItem>,
    pub total_records: usize,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeResponse {
    pub min: i64,
    pub max: i64,
}
