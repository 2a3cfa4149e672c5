use actix_files::Files;
use actix_web::{App, HttpServer, web};

use product_catalog::db::establish_connection_pool;
use product_catalog::models::config::ServerConfig;
use product_catalog::repository::DieselRepository;
use product_catalog::routes::products::{
    create_product, delete_product, get_product, list_products, price_range, update_product,
};
use product_catalog::services::images::ImageStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let images = ImageStore::new(&config.upload_dir);
    if let Err(e) = images.ensure_root() {
        log::error!("Failed to create upload directory: {e}");
        std::process::exit(1);
    }

    let upload_dir = config.upload_dir.clone();
    log::info!("Starting server on {}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(images.clone()))
            .service(list_products)
            .service(price_range)
            .service(get_product)
            .service(create_product)
            .service(update_product)
            .service(delete_product)
            .service(Files::new("/images", upload_dir.clone()))
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
