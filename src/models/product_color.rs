use diesel::prelude::*;

/// Diesel model representing the `product_colors` junction table. Rows carry
/// no attributes beyond the two foreign keys.
#[derive(Debug, Clone, Identifiable, Insertable, Queryable)]
#[diesel(table_name = crate::schema::product_colors)]
#[diesel(primary_key(product_id, color_id))]
pub struct ProductColor {
    pub product_id: i32,
    pub color_id: i32,
}
