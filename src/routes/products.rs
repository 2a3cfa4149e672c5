use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::forms::products::ProductForm;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::images::ImageStore;
use crate::services::products::{
    ListProductsQueryParams, create_product as create_product_service,
    delete_product as delete_product_service, get_product as get_product_service,
    list_products as list_products_service, price_range as price_range_service,
    update_product as update_product_service,
};

#[get("/api/products")]
pub async fn list_products(
    params: web::Query<ListProductsQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_products_service(params.into_inner(), repo.get_ref()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(ServiceError::Form(message)) => HttpResponse::BadRequest().body(message),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

// Registered before `get_product` so the literal segment is not swallowed
// by the `{id}` matcher.
#[get("/api/products/price-range")]
pub async fn price_range(repo: web::Data<DieselRepository>) -> impl Responder {
    match price_range_service(repo.get_ref()) {
        Ok(range) => HttpResponse::Ok().json(range),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to compute price range: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/api/products/{id}")]
pub async fn get_product(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match get_product_service(id.into_inner(), repo.get_ref()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to get product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/api/products")]
pub async fn create_product(
    MultipartForm(form): MultipartForm<ProductForm>,
    images: web::Data<ImageStore>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match create_product_service(form, images.get_ref(), repo.get_ref()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(ServiceError::Form(message)) => HttpResponse::BadRequest().body(message),
        Err(err) => {
            log::error!("Failed to create product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[put("/api/products/{id}")]
pub async fn update_product(
    id: web::Path<i32>,
    MultipartForm(form): MultipartForm<ProductForm>,
    images: web::Data<ImageStore>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match update_product_service(id.into_inner(), form, images.get_ref(), repo.get_ref()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Form(message)) => HttpResponse::BadRequest().body(message),
        Err(err) => {
            log::error!("Failed to update product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[delete("/api/products/{id}")]
pub async fn delete_product(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_product_service(id.into_inner(), repo.get_ref()) {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to delete product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
