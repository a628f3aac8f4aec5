use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};

use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::customers::{
    assign_customer_type, check_email, check_phone, count_customers, create_customer,
    delete_customer, delete_customers_bulk, export_customers, get_customer, get_customer_avatar,
    import_customers, list_customers, new_customer_code, update_customer, upload_temp_avatar,
};
use crate::services::uploads::UploadStore;

pub mod db;
pub mod domain;
pub mod dto;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = db::establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);
    let uploads = UploadStore::new(&server_config.upload_dir);

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/uploads", &server_config.upload_dir))
            .service(
                // Literal segments are registered ahead of `{id}` routes so
                // `bulk`, `count` and friends never bind as identifiers.
                web::scope("/api/v1")
                    .service(list_customers)
                    .service(count_customers)
                    .service(new_customer_code)
                    .service(delete_customers_bulk)
                    .service(import_customers)
                    .service(export_customers)
                    .service(upload_temp_avatar)
                    .service(assign_customer_type)
                    .service(check_email)
                    .service(check_phone)
                    .service(get_customer_avatar)
                    .service(get_customer)
                    .service(create_customer)
                    .service(update_customer)
                    .service(delete_customer),
            )
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(uploads.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
