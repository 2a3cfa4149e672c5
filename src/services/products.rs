use serde::Deserialize;
use validator::Validate;

use crate::domain::types::ProductId;
use crate::dto::products::{
    PriceRangeResponse, ProductDetail, ProductListItem, ProductListResponse,
};
use crate::forms::products::{ParsedProduct, ProductForm, parse_datetime};
use crate::repository::{
    DEFAULT_ITEMS_PER_PAGE, ProductListQuery, ProductReader, ProductSort, ProductWriter,
    SortOrder,
};
use crate::services::images::ImageStore;

use super::{ServiceError, ServiceResult};

/// Query parameters accepted by the product listing endpoint.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQueryParams {
    pub search: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub features: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 100))]
    pub page_size: Option<usize>,
}

/// Price-range buckets are aligned to thousands.
const PRICE_STEP: i64 = 1000;

fn round_down_to_step(value: f64) -> i64 {
    (value as i64 / PRICE_STEP) * PRICE_STEP
}

/// Truncates, then moves to the next boundary; an exact multiple still moves
/// up one step.
fn round_up_to_step(value: f64) -> i64 {
    (value as i64 / PRICE_STEP + 1) * PRICE_STEP
}

/// Core business logic for the product listing endpoint.
///
/// Validates the pagination window, assembles the conjunctive filter set
/// from the raw query parameters and returns the requested page together
/// with the total match count. Repository errors are converted into
/// `ServiceError` variants so that the HTTP route can remain a thin wrapper.
pub fn list_products<R>(
    params: ListProductsQueryParams,
    repo: &R,
) -> ServiceResult<ProductListResponse>
where
    R: ProductReader,
{
    params
        .validate()
        .map_err(|e| ServiceError::Form(e.to_string()))?;

    let mut query = ProductListQuery::default()
        .sort(ProductSort::parse(params.sort_by.as_deref()))
        .order(SortOrder::parse(params.sort_order.as_deref()))
        .paginate(
            params.page.unwrap_or(1),
            params.page_size.unwrap_or(DEFAULT_ITEMS_PER_PAGE),
        );

    if let Some(search) = params.search.filter(|s| !s.trim().is_empty()) {
        query = query.search(search);
    }
    if let Some(from_date) = params.from_date.as_deref() {
        query = query.from_date(parse_datetime(from_date)?);
    }
    if let Some(to_date) = params.to_date.as_deref() {
        query = query.to_date(parse_datetime(to_date)?);
    }
    if let Some(features) = params.features.as_deref() {
        query = query.features(features);
    }
    if let Some(min_price) = params.min_price {
        query = query.min_price(min_price);
    }
    if let Some(max_price) = params.max_price {
        query = query.max_price(max_price);
    }

    match repo.list_products(query) {
        Ok((total, products)) => Ok(ProductListResponse {
            data: products.into_iter().map(ProductListItem::from).collect(),
            total_records: total,
        }),
        Err(e) => {
            log::error!("Failed to list products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetches a single product projected with its color ids and image path.
pub fn get_product<R>(id: i32, repo: &R) -> ServiceResult<ProductDetail>
where
    R: ProductReader,
{
    let id = match ProductId::new(id) {
        Ok(id) => id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.get_product_by_id(id) {
        Ok(Some(product)) => Ok(ProductDetail::from(product)),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Creates a product from a multipart form.
///
/// A supplied image is written to the blob store first; the product row and
/// its color associations are then persisted atomically.
pub fn create_product<R>(
    form: ProductForm,
    images: &ImageStore,
    repo: &R,
) -> ServiceResult<ProductDetail>
where
    R: ProductWriter,
{
    let mut parsed = form.parse()?;
    store_image(&mut parsed, images)?;

    match repo.create_product(&parsed.product, &parsed.color_ids) {
        Ok(created) => Ok(ProductDetail::from(created)),
        Err(e) if e.is_foreign_key_violation() => {
            Err(ServiceError::Form("unknown color id".to_string()))
        }
        Err(e) => {
            log::error!("Failed to create product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Overwrites a product from a multipart form.
///
/// All scalar fields are replaced, the color association set is replaced
/// wholesale, and the stored image is replaced only when the form carries a
/// new one.
pub fn update_product<R>(
    id: i32,
    form: ProductForm,
    images: &ImageStore,
    repo: &R,
) -> ServiceResult<ProductDetail>
where
    R: ProductWriter,
{
    let id = match ProductId::new(id) {
        Ok(id) => id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    let mut parsed = form.parse()?;
    store_image(&mut parsed, images)?;

    match repo.update_product(id, &parsed.product, &parsed.color_ids) {
        Ok(Some(updated)) => Ok(ProductDetail::from(updated)),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) if e.is_foreign_key_violation() => {
            Err(ServiceError::Form("unknown color id".to_string()))
        }
        Err(e) => {
            log::error!("Failed to update product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Deletes a product; its associations are removed by the storage cascade.
pub fn delete_product<R>(id: i32, repo: &R) -> ServiceResult<()>
where
    R: ProductWriter,
{
    let id = match ProductId::new(id) {
        Ok(id) => id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.delete_product(id) {
        Ok(true) => Ok(()),
        Ok(false) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to delete product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Reports the catalog price range rounded outward to thousands, for
/// building a price-filter UI. An empty catalog has no range.
pub fn price_range<R>(repo: &R) -> ServiceResult<PriceRangeResponse>
where
    R: ProductReader,
{
    match repo.price_bounds() {
        Ok(Some((lowest, highest))) => Ok(PriceRangeResponse {
            min: round_down_to_step(lowest),
            max: round_up_to_step(highest),
        }),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to compute price bounds: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn store_image(parsed: &mut ParsedProduct, images: &ImageStore) -> ServiceResult<()> {
    if let Some(image) = &parsed.image {
        let path = images
            .store(image.file.path(), image.file_name.as_deref())
            .map_err(|e| {
                log::error!("Failed to store uploaded image: {e}");
                ServiceError::Internal
            })?;
        parsed.product.image_path = Some(path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use actix_multipart::form::text::Text;
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::color::Color;
    use crate::domain::product::Product;
    use crate::domain::types::{
        ColorId, ColorName, ProductId, ProductName, ProductPrice, ProductSize,
    };
    use crate::repository::test::TestRepository;

    fn palette() -> Vec<Color> {
        [(1, "Red"), (2, "Green"), (3, "Blue")]
            .into_iter()
            .map(|(id, name)| Color {
                id: ColorId::new(id).unwrap(),
                name: ColorName::new(name).unwrap(),
            })
            .collect()
    }

    fn sample_product(id: i32, name: &str, price: f64) -> Product {
        Product {
            id: ProductId::new(id).unwrap(),
            name: ProductName::new(name).unwrap(),
            price: ProductPrice::new(price).unwrap(),
            features: None,
            purchase_date: None,
            description: None,
            size: ProductSize::new("M").unwrap(),
            image_path: None,
            colors: vec![],
        }
    }

    fn sample_form(name: &str, color_ids: &[i32]) -> ProductForm {
        ProductForm {
            product_name: Text(name.to_string()),
            product_price: Text(100.0),
            features: None,
            purchase_date: None,
            description: None,
            size: Text("M".to_string()),
            color_ids: color_ids.iter().map(|id| Text(*id)).collect(),
            image: None,
        }
    }

    fn image_store() -> (tempfile::TempDir, ImageStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().join("images"));
        (dir, store)
    }

    #[test]
    fn listing_rejects_out_of_range_pagination() {
        let repo = TestRepository::new(palette(), vec![]);

        let params = ListProductsQueryParams {
            page: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            list_products(params, &repo),
            Err(ServiceError::Form(_))
        ));

        let params = ListProductsQueryParams {
            page_size: Some(101),
            ..Default::default()
        };
        assert!(matches!(
            list_products(params, &repo),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn listing_rejects_malformed_dates() {
        let repo = TestRepository::new(palette(), vec![]);
        let params = ListProductsQueryParams {
            from_date: Some("last tuesday".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            list_products(params, &repo),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn listing_reports_total_independent_of_page() {
        let products = (1..=5)
            .map(|id| sample_product(id, &format!("Item {id}"), id as f64))
            .collect();
        let repo = TestRepository::new(palette(), products);

        let params = ListProductsQueryParams {
            page: Some(3),
            page_size: Some(2),
            ..Default::default()
        };
        let response = list_products(params, &repo).unwrap();

        assert_eq!(response.total_records, 5);
        assert_eq!(response.data.len(), 1);
    }

    #[test]
    fn listing_unknown_sort_key_orders_by_id_ascending() {
        let mut products = vec![
            sample_product(2, "B", 2.0),
            sample_product(1, "A", 1.0),
            sample_product(3, "C", 3.0),
        ];
        products.rotate_left(1);
        let repo = TestRepository::new(palette(), products);

        let params = ListProductsQueryParams {
            sort_by: Some("bogus".to_string()),
            sort_order: Some("desc".to_string()),
            ..Default::default()
        };
        let response = list_products(params, &repo).unwrap();

        let ids: Vec<i32> = response.data.iter().map(|p| p.product_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn listing_sorts_by_price_descending() {
        let products = vec![
            sample_product(1, "A", 10.0),
            sample_product(2, "B", 30.0),
            sample_product(3, "C", 20.0),
        ];
        let repo = TestRepository::new(palette(), products);

        let params = ListProductsQueryParams {
            sort_by: Some("price".to_string()),
            sort_order: Some("DESC".to_string()),
            ..Default::default()
        };
        let response = list_products(params, &repo).unwrap();

        let prices: Vec<f64> = response.data.iter().map(|p| p.product_price).collect();
        assert_eq!(prices, vec![30.0, 20.0, 10.0]);
    }

    #[test]
    fn listing_requires_every_feature_token() {
        let mut tagged = sample_product(1, "Sofa", 10.0);
        tagged.features = Some("red,large,wood".to_string());
        let mut other = sample_product(2, "Stool", 20.0);
        other.features = Some("red,small".to_string());
        let repo = TestRepository::new(palette(), vec![tagged, other]);

        let params = ListProductsQueryParams {
            features: Some("red,large".to_string()),
            ..Default::default()
        };
        let response = list_products(params, &repo).unwrap();

        assert_eq!(response.total_records, 1);
        assert_eq!(response.data[0].product_id, 1);
    }

    #[test]
    fn get_product_returns_not_found_for_missing_or_invalid_ids() {
        let repo = TestRepository::new(palette(), vec![sample_product(1, "A", 1.0)]);

        assert_eq!(get_product(2, &repo), Err(ServiceError::NotFound));
        assert_eq!(get_product(0, &repo), Err(ServiceError::NotFound));
        assert_eq!(get_product(-7, &repo), Err(ServiceError::NotFound));
    }

    #[test]
    fn create_resolves_color_ids() {
        let repo = TestRepository::new(palette(), vec![]);
        let (_dir, images) = image_store();

        let detail = create_product(sample_form("Chair", &[1, 3]), &images, &repo).unwrap();

        assert_eq!(detail.color_ids, vec![1, 3]);
        assert_eq!(detail.image_path, None);
    }

    #[test]
    fn create_with_unknown_color_id_is_a_form_error() {
        let repo = TestRepository::new(palette(), vec![]);
        let (_dir, images) = image_store();

        let result = create_product(sample_form("Chair", &[99]), &images, &repo);

        assert_eq!(
            result.map(|_| ()),
            Err(ServiceError::Form("unknown color id".to_string()))
        );
    }

    #[test]
    fn update_replaces_color_set_and_keeps_image() {
        let mut existing = sample_product(1, "Chair", 100.0);
        existing.image_path = Some("/images/old.png".to_string());
        existing.colors = palette().into_iter().take(2).collect();
        let repo = TestRepository::new(palette(), vec![existing]);
        let (_dir, images) = image_store();

        let detail = update_product(1, sample_form("Chair v2", &[2]), &images, &repo).unwrap();

        assert_eq!(detail.product_name, "Chair v2");
        assert_eq!(detail.color_ids, vec![2]);
        assert_eq!(detail.image_path, Some("/images/old.png".to_string()));
    }

    #[test]
    fn update_missing_product_is_not_found() {
        let repo = TestRepository::new(palette(), vec![]);
        let (_dir, images) = image_store();

        let result = update_product(9, sample_form("Chair", &[]), &images, &repo);

        assert_eq!(result.map(|_| ()), Err(ServiceError::NotFound));
    }

    #[test]
    fn delete_missing_product_is_not_found() {
        let repo = TestRepository::new(palette(), vec![sample_product(1, "A", 1.0)]);

        assert_eq!(delete_product(1, &repo), Ok(()));
        assert_eq!(delete_product(1, &repo), Err(ServiceError::NotFound));
    }

    #[test]
    fn price_range_rounds_outward_to_thousands() {
        let repo = TestRepository::new(
            palette(),
            vec![
                sample_product(1, "A", 950.0),
                sample_product(2, "B", 2500.0),
                sample_product(3, "C", 13000.0),
            ],
        );

        let range = price_range(&repo).unwrap();

        assert_eq!(range.min, 0);
        assert_eq!(range.max, 14000);
    }

    #[test]
    fn price_range_exact_multiple_still_moves_up() {
        let repo = TestRepository::new(palette(), vec![sample_product(1, "A", 2000.0)]);

        let range = price_range(&repo).unwrap();

        assert_eq!(range.min, 2000);
        assert_eq!(range.max, 3000);
    }

    #[test]
    fn price_range_of_empty_catalog_is_not_found() {
        let repo = TestRepository::new(palette(), vec![]);

        assert_eq!(price_range(&repo).map(|_| ()), Err(ServiceError::NotFound));
    }

    #[test]
    fn listing_date_bounds_are_inclusive() {
        let day = |d: u32| {
            NaiveDate::from_ymd_opt(2026, 3, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        let mut early = sample_product(1, "A", 1.0);
        early.purchase_date = Some(day(1));
        let mut late = sample_product(2, "B", 2.0);
        late.purchase_date = Some(day(10));
        let undated = sample_product(3, "C", 3.0);
        let repo = TestRepository::new(palette(), vec![early, late, undated]);

        let params = ListProductsQueryParams {
            from_date: Some("2026-03-01".to_string()),
            to_date: Some("2026-03-10".to_string()),
            ..Default::default()
        };
        let response = list_products(params, &repo).unwrap();

        let ids: Vec<i32> = response.data.iter().map(|p| p.product_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
