use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::domain::product::NewProduct;
use crate::domain::types::{ColorId, ProductName, ProductPrice, ProductSize, TypeConstraintError};

/// Multipart payload accepted by the create and update endpoints. Field
/// names match the wire format of the JSON responses.
#[derive(MultipartForm)]
pub struct ProductForm {
    #[multipart(rename = "productName")]
    pub product_name: Text<String>,
    #[multipart(rename = "productPrice")]
    pub product_price: Text<f64>,
    pub features: Option<Text<String>>,
    #[multipart(rename = "purchaseDate")]
    pub purchase_date: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub size: Text<String>,
    #[multipart(rename = "colorIds")]
    pub color_ids: Vec<Text<i32>>,
    #[multipart(limit = "5MB")]
    pub image: Option<TempFile>,
}

#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error(transparent)]
    Constraint(#[from] TypeConstraintError),
    #[error("invalid purchase date: {0}")]
    InvalidDate(String),
}

/// A [`ProductForm`] converted into domain types. The image, when present,
/// is still the unsaved multipart temp file.
pub struct ParsedProduct {
    pub product: NewProduct,
    pub color_ids: Vec<ColorId>,
    pub image: Option<TempFile>,
}

impl ProductForm {
    /// Validates the form fields and converts them into a domain payload.
    pub fn parse(self) -> Result<ParsedProduct, ProductFormError> {
        let purchase_date = self
            .purchase_date
            .map(|value| parse_datetime(&value.into_inner()))
            .transpose()?;

        let color_ids = self
            .color_ids
            .into_iter()
            .map(|id| ColorId::new(id.into_inner()))
            .collect::<Result<Vec<_>, _>>()?;

        let product = NewProduct {
            name: ProductName::new(self.product_name.into_inner())?,
            price: ProductPrice::new(self.product_price.into_inner())?,
            features: none_if_blank(self.features.map(Text::into_inner)),
            purchase_date,
            description: none_if_blank(self.description.map(Text::into_inner)),
            size: ProductSize::new(self.size.into_inner())?,
            image_path: None,
        };

        Ok(ParsedProduct {
            product,
            color_ids,
            image: self.image,
        })
    }
}

/// Parses a timestamp from the formats clients actually send: a full
/// timestamp with or without the `T` separator, or a bare date taken as
/// midnight.
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, ProductFormError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|date| date.and_time(NaiveTime::MIN))
        })
        .map_err(|_| ProductFormError::InvalidDate(value.to_string()))
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> ProductForm {
        ProductForm {
            product_name: Text("Chair".to_string()),
            product_price: Text(1250.0),
            features: Some(Text("red,large".to_string())),
            purchase_date: Some(Text("2026-03-01".to_string())),
            description: Some(Text("   ".to_string())),
            size: Text("M".to_string()),
            color_ids: vec![Text(1), Text(3)],
            image: None,
        }
    }

    #[test]
    fn parses_fields_into_domain_types() {
        let parsed = sample_form().parse().unwrap();

        assert_eq!(parsed.product.name, "Chair");
        assert_eq!(parsed.product.price, 1250.0);
        assert_eq!(parsed.product.features.as_deref(), Some("red,large"));
        assert_eq!(
            parsed.product.purchase_date,
            Some(parse_datetime("2026-03-01T00:00:00").unwrap())
        );
        // Blank optional text collapses to None.
        assert_eq!(parsed.product.description, None);
        assert_eq!(
            parsed.color_ids,
            vec![ColorId::new(1).unwrap(), ColorId::new(3).unwrap()]
        );
    }

    #[test]
    fn rejects_blank_name() {
        let mut form = sample_form();
        form.product_name = Text("  ".to_string());
        assert!(form.parse().is_err());
    }

    #[test]
    fn rejects_negative_price() {
        let mut form = sample_form();
        form.product_price = Text(-1.0);
        assert!(form.parse().is_err());
    }

    #[test]
    fn rejects_non_positive_color_id() {
        let mut form = sample_form();
        form.color_ids = vec![Text(0)];
        assert!(form.parse().is_err());
    }

    #[test]
    fn accepts_all_supported_date_formats() {
        assert!(parse_datetime("2026-03-01T10:30:00").is_ok());
        assert!(parse_datetime("2026-03-01 10:30:00").is_ok());
        assert!(parse_datetime("2026-03-01").is_ok());
        assert!(parse_datetime("March 1st").is_err());
    }
}
