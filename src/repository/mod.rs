use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool};
use crate::domain::product::{NewProduct, Product};
use crate::domain::types::{ColorId, ProductId};

pub mod errors;
pub mod product;

pub use errors::{RepositoryError, RepositoryResult};

/// Page size applied when a listing request does not specify one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Pagination window for listing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
}

/// Sort key for product listings. Anything but the three recognized keys
/// falls back to ascending order by product id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSort {
    #[default]
    Id,
    Name,
    Price,
    PurchaseDate,
}

impl ProductSort {
    /// Parses a `sortBy` parameter, case-insensitively.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("name") => ProductSort::Name,
            Some("price") => ProductSort::Price,
            Some("purchasedate") => ProductSort::PurchaseDate,
            _ => ProductSort::Id,
        }
    }
}

/// Sort direction; only an explicit `desc` selects descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parses a `sortOrder` parameter, case-insensitively.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

/// Query parameters used when listing products. All present filters combine
/// with logical AND; the match count is computed before the pagination window
/// is applied.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Substring match against the product name.
    pub search: Option<String>,
    /// Inclusive lower bound on the purchase date.
    pub from_date: Option<NaiveDateTime>,
    /// Inclusive upper bound on the purchase date.
    pub to_date: Option<NaiveDateTime>,
    /// Inclusive lower bound on the price.
    pub min_price: Option<f64>,
    /// Inclusive upper bound on the price.
    pub max_price: Option<f64>,
    /// Tag tokens that must all appear in the stored features string.
    pub features: Vec<String>,
    pub sort: ProductSort,
    pub order: SortOrder,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn from_date(mut self, from_date: NaiveDateTime) -> Self {
        self.from_date = Some(from_date);
        self
    }
    pub fn to_date(mut self, to_date: NaiveDateTime) -> Self {
        self.to_date = Some(to_date);
        self
    }
    pub fn min_price(mut self, min_price: f64) -> Self {
        self.min_price = Some(min_price);
        self
    }
    pub fn max_price(mut self, max_price: f64) -> Self {
        self.max_price = Some(max_price);
        self
    }
    /// Splits a comma-separated tag list into tokens; blanks are dropped.
    pub fn features(mut self, list: &str) -> Self {
        self.features = list
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(String::from)
            .collect();
        self
    }
    pub fn sort(mut self, sort: ProductSort) -> Self {
        self.sort = sort;
        self
    }
    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List products matching the supplied query parameters, returning the
    /// total match count alongside the requested page.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Retrieve a product by its identifier, colors resolved.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
    /// Minimum and maximum price over all products, `None` when the catalog
    /// is empty.
    fn price_bounds(&self) -> RepositoryResult<Option<(f64, f64)>>;
}

/// Write operations for product entities and their color associations.
pub trait ProductWriter {
    /// Persist a new product and its color associations atomically.
    fn create_product(
        &self,
        product: &NewProduct,
        color_ids: &[ColorId],
    ) -> RepositoryResult<Product>;
    /// Overwrite all scalar fields and replace the full color association
    /// set. `None` when no product with that id exists. An `image_path` of
    /// `None` keeps the previously stored path.
    fn update_product(
        &self,
        id: ProductId,
        product: &NewProduct,
        color_ids: &[ColorId],
    ) -> RepositoryResult<Option<Product>>;
    /// Delete a product; associations are removed by the storage cascade.
    /// Returns whether a row was deleted.
    fn delete_product(&self, id: ProductId) -> RepositoryResult<bool>;
}
