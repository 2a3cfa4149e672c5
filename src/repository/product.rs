use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::color::Color;
use crate::domain::product::{NewProduct as DomainNewProduct, Product};
use crate::domain::types::{ColorId, ProductId};
use crate::models::product::{NewProduct, Product as DbProduct};
use crate::models::product_color::ProductColor;
use crate::repository::{
    DieselRepository, ProductListQuery, ProductReader, ProductSort, ProductWriter,
    RepositoryError, RepositoryResult, SortOrder,
};

impl DieselRepository {
    /// Load the colors associated with a single product.
    fn colors_for(conn: &mut SqliteConnection, product_id: i32) -> RepositoryResult<Vec<Color>> {
        use crate::schema::{colors, product_colors};

        let rows = product_colors::table
            .inner_join(colors::table)
            .filter(product_colors::product_id.eq(product_id))
            .order(colors::id.asc())
            .select(colors::all_columns)
            .load::<crate::models::color::Color>(conn)?;

        rows.into_iter()
            .map(|color| color.try_into().map_err(RepositoryError::from))
            .collect()
    }

    /// Resolve colors for a page of product rows with a single junction
    /// query, then convert the rows into domain products.
    fn attach_colors(
        conn: &mut SqliteConnection,
        rows: Vec<DbProduct>,
    ) -> RepositoryResult<Vec<Product>> {
        use crate::schema::{colors, product_colors};

        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let pairs: Vec<(i32, crate::models::color::Color)> = product_colors::table
            .inner_join(colors::table)
            .filter(product_colors::product_id.eq_any(&ids))
            .order((product_colors::product_id.asc(), colors::id.asc()))
            .select((product_colors::product_id, colors::all_columns))
            .load(conn)?;

        let mut by_product: HashMap<i32, Vec<Color>> = HashMap::new();
        for (product_id, color) in pairs {
            by_product.entry(product_id).or_default().push(
                color
                    .try_into()
                    .map_err(RepositoryError::from)?,
            );
        }

        rows.into_iter()
            .map(|row| {
                let colors = by_product.remove(&row.id).unwrap_or_default();
                row.into_domain(colors).map_err(RepositoryError::from)
            })
            .collect()
    }

    /// Replace the full association set of a product with `color_ids`.
    fn replace_colors(
        conn: &mut SqliteConnection,
        product_id: i32,
        color_ids: &[ColorId],
    ) -> Result<(), diesel::result::Error> {
        use crate::schema::product_colors;

        diesel::delete(product_colors::table.filter(product_colors::product_id.eq(product_id)))
            .execute(conn)?;

        let associations: Vec<ProductColor> = color_ids
            .iter()
            .map(|color_id| ProductColor {
                product_id,
                color_id: color_id.get(),
            })
            .collect();
        if !associations.is_empty() {
            diesel::insert_into(product_colors::table)
                .values(&associations)
                .execute(conn)?;
        }

        Ok(())
    }
}

impl ProductReader for DieselRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = products::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(search) = &query.search {
                items = items.filter(products::name.like(format!("%{search}%")));
            }
            if let Some(from_date) = query.from_date {
                items = items.filter(products::purchase_date.ge(from_date));
            }
            if let Some(to_date) = query.to_date {
                items = items.filter(products::purchase_date.le(to_date));
            }
            for feature in &query.features {
                items = items.filter(products::features.like(format!("%{feature}%")));
            }
            if let Some(min_price) = query.min_price {
                items = items.filter(products::price.ge(min_price));
            }
            if let Some(max_price) = query.max_price {
                items = items.filter(products::price.le(max_price));
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();

        // The fallback sort ignores the requested direction.
        items = match (query.sort, query.order) {
            (ProductSort::Name, SortOrder::Asc) => items.order(products::name.asc()),
            (ProductSort::Name, SortOrder::Desc) => items.order(products::name.desc()),
            (ProductSort::Price, SortOrder::Asc) => items.order(products::price.asc()),
            (ProductSort::Price, SortOrder::Desc) => items.order(products::price.desc()),
            (ProductSort::PurchaseDate, SortOrder::Asc) => {
                items.order(products::purchase_date.asc())
            }
            (ProductSort::PurchaseDate, SortOrder::Desc) => {
                items.order(products::purchase_date.desc())
            }
            (ProductSort::Id, _) => items.order(products::id.asc()),
        };

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbProduct>(&mut conn)?;
        let products = Self::attach_colors(&mut conn, rows)?;

        Ok((total, products))
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let row = products::table
            .find(id.get())
            .first::<DbProduct>(&mut conn)
            .optional()?;

        match row {
            Some(row) => {
                let colors = Self::colors_for(&mut conn, row.id)?;
                Ok(Some(row.into_domain(colors)?))
            }
            None => Ok(None),
        }
    }

    fn price_bounds(&self) -> RepositoryResult<Option<(f64, f64)>> {
        use crate::schema::products;
        use diesel::dsl::{max, min};

        let mut conn = self.conn()?;

        let bounds = products::table
            .select((min(products::price), max(products::price)))
            .first::<(Option<f64>, Option<f64>)>(&mut conn)?;

        match bounds {
            (Some(lowest), Some(highest)) => Ok(Some((lowest, highest))),
            _ => Ok(None),
        }
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(
        &self,
        product: &DomainNewProduct,
        color_ids: &[ColorId],
    ) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_product: NewProduct = product.clone().into();

        let row = conn.transaction::<_, RepositoryError, _>(|conn| {
            let row = diesel::insert_into(products::table)
                .values(&db_product)
                .get_result::<DbProduct>(conn)?;

            Self::replace_colors(conn, row.id, color_ids)?;

            Ok(row)
        })?;

        let colors = Self::colors_for(&mut conn, row.id)?;
        Ok(row.into_domain(colors)?)
    }

    fn update_product(
        &self,
        id: ProductId,
        product: &DomainNewProduct,
        color_ids: &[ColorId],
    ) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let row = conn.transaction::<_, RepositoryError, _>(|conn| {
            // Scalar fields are overwritten unconditionally, including
            // clearing previously set optional values.
            let affected = diesel::update(products::table.find(id.get()))
                .set((
                    products::name.eq(product.name.as_str()),
                    products::price.eq(product.price.get()),
                    products::features.eq(product.features.as_deref()),
                    products::purchase_date.eq(product.purchase_date),
                    products::description.eq(product.description.as_deref()),
                    products::size.eq(product.size.as_str()),
                ))
                .execute(conn)?;
            if affected == 0 {
                return Ok(None);
            }

            // The stored image path survives unless a new one is supplied.
            if let Some(image_path) = &product.image_path {
                diesel::update(products::table.find(id.get()))
                    .set(products::image_path.eq(image_path))
                    .execute(conn)?;
            }

            Self::replace_colors(conn, id.get(), color_ids)?;

            let row = products::table.find(id.get()).first::<DbProduct>(conn)?;
            Ok(Some(row))
        })?;

        match row {
            Some(row) => {
                let colors = Self::colors_for(&mut conn, row.id)?;
                Ok(Some(row.into_domain(colors)?))
            }
            None => Ok(None),
        }
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<bool> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        // product_colors rows are removed by the ON DELETE CASCADE rule.
        let affected = diesel::delete(products::table.find(id.get())).execute(&mut conn)?;

        Ok(affected > 0)
    }
}
