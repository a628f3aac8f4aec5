use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use chrono::Utc;

use crate::dto::api::{ApiResponse, MetaData};
use crate::dto::customer::{
    AssignTypeRequest, AvatarUploadForm, CheckEmailRequest, CheckPhoneRequest, CustomerQueryParams,
    CustomerRequest, ImportCsvForm, TempAvatarResponse,
};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::customer as customer_service;
use crate::services::uploads::UploadStore;

#[get("/customers")]
pub async fn list_customers(
    params: web::Query<CustomerQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = params.to_list_query();
    match customer_service::list_customers(repo.get_ref(), &query) {
        Ok((total, customers)) => HttpResponse::Ok().json(ApiResponse::paged(
            customers,
            MetaData {
                page: params.page(),
                page_size: params.per_page(),
                total,
            },
        )),
        Err(e) => error_response(&e),
    }
}

#[get("/customers/count")]
pub async fn count_customers(
    params: web::Query<CustomerQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match customer_service::total_count(repo.get_ref(), &params.to_filter_query()) {
        Ok(total) => HttpResponse::Ok().json(ApiResponse::ok(total)),
        Err(e) => error_response(&e),
    }
}

#[get("/customers/new-code")]
pub async fn new_customer_code(repo: web::Data<DieselRepository>) -> impl Responder {
    match customer_service::generate_code(repo.get_ref()) {
        Ok(code) => HttpResponse::Ok().json(ApiResponse::ok(code)),
        Err(e) => error_response(&e),
    }
}

#[get("/customers/{id}")]
pub async fn get_customer(
    id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match customer_service::get_customer(repo.get_ref(), &id) {
        Ok(customer) => HttpResponse::Ok().json(ApiResponse::ok(customer)),
        Err(e) => error_response(&e),
    }
}

#[post("/customers")]
pub async fn create_customer(
    body: web::Json<CustomerRequest>,
    repo: web::Data<DieselRepository>,
    uploads: web::Data<UploadStore>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match customer_service::create_customer(
        repo.get_ref(),
        uploads.get_ref(),
        body.into_inner(),
        &config.actor,
    ) {
        Ok(customer) => HttpResponse::Created().json(ApiResponse::ok(customer)),
        Err(e) => error_response(&e),
    }
}

#[put("/customers/{id}")]
pub async fn update_customer(
    id: web::Path<String>,
    body: web::Json<CustomerRequest>,
    repo: web::Data<DieselRepository>,
    uploads: web::Data<UploadStore>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match customer_service::update_customer(
        repo.get_ref(),
        uploads.get_ref(),
        &id,
        body.into_inner(),
        &config.actor,
    ) {
        Ok(customer) => HttpResponse::Ok().json(ApiResponse::ok(customer)),
        Err(e) => error_response(&e),
    }
}

#[delete("/customers/bulk")]
pub async fn delete_customers_bulk(
    body: web::Json<Vec<String>>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match customer_service::soft_delete_customers(repo.get_ref(), &body) {
        Ok(affected) => {
            HttpResponse::Ok().json(ApiResponse::ok(format!("Deleted {affected} customers")))
        }
        Err(e) => error_response(&e),
    }
}

#[delete("/customers/{id}")]
pub async fn delete_customer(
    id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match customer_service::soft_delete_customer(repo.get_ref(), &id) {
        Ok(_) => HttpResponse::Ok().json(ApiResponse::ok(format!("Deleted customer {id}"))),
        Err(e) => error_response(&e),
    }
}

#[post("/customers/import")]
pub async fn import_customers(
    MultipartForm(form): MultipartForm<ImportCsvForm>,
    repo: web::Data<DieselRepository>,
    uploads: web::Data<UploadStore>,
) -> impl Responder {
    let file = match std::fs::File::open(form.file.file.path()) {
        Ok(file) => file,
        Err(e) => return error_response(&e.into()),
    };

    match customer_service::import_csv(repo.get_ref(), uploads.get_ref(), file) {
        Ok(count) => HttpResponse::Ok().json(ApiResponse::ok(format!("Imported {count} customers"))),
        Err(e) => error_response(&e),
    }
}

#[post("/customers/export")]
pub async fn export_customers(
    body: web::Json<Vec<String>>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match customer_service::export_csv(repo.get_ref(), &body) {
        Ok(bytes) => {
            let file_name = format!("customers_selected_{}.csv", Utc::now().format("%Y%m%d%H%M%S"));
            HttpResponse::Ok()
                .content_type("text/csv")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{file_name}\""),
                ))
                .body(bytes)
        }
        Err(e) => error_response(&e),
    }
}

#[get("/customers/{id}/avatar")]
pub async fn get_customer_avatar(
    id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    uploads: web::Data<UploadStore>,
) -> impl Responder {
    match customer_service::load_avatar(repo.get_ref(), uploads.get_ref(), &id) {
        Ok(Some((bytes, mime))) => HttpResponse::Ok().content_type(mime).body(bytes),
        // No avatar on file: an empty-string sentinel, not an error.
        Ok(None) => HttpResponse::Ok().json(ApiResponse::ok(String::new())),
        Err(e) => error_response(&e),
    }
}

#[post("/customers/upload-temp-avatar")]
pub async fn upload_temp_avatar(
    MultipartForm(form): MultipartForm<AvatarUploadForm>,
    uploads: web::Data<UploadStore>,
) -> impl Responder {
    let original_name = form.file.file_name.as_deref().unwrap_or("");
    match uploads.store_temp_avatar(form.file.file.path(), original_name) {
        Ok(url) => HttpResponse::Ok().json(ApiResponse::ok(TempAvatarResponse {
            temp_avatar_url: url,
        })),
        Err(e) => error_response(&e),
    }
}

#[post("/customers/assign-type")]
pub async fn assign_customer_type(
    body: web::Json<AssignTypeRequest>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match customer_service::assign_customer_type(
        repo.get_ref(),
        &body.customer_ids,
        &body.customer_type,
    ) {
        Ok(affected) => HttpResponse::Ok().json(ApiResponse::ok(format!(
            "Assigned type '{}' to {affected} customers",
            body.customer_type.trim()
        ))),
        Err(e) => error_response(&e),
    }
}

#[post("/customers/check-email")]
pub async fn check_email(
    body: web::Json<CheckEmailRequest>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match customer_service::check_email_exists(
        repo.get_ref(),
        &body.customer_email,
        body.customer_id.as_deref(),
    ) {
        Ok(exists) => HttpResponse::Ok().json(ApiResponse::ok(exists)),
        Err(e) => error_response(&e),
    }
}

#[post("/customers/check-phone")]
pub async fn check_phone(
    body: web::Json<CheckPhoneRequest>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match customer_service::check_phone_exists(
        repo.get_ref(),
        &body.customer_phone_number,
        body.customer_id.as_deref(),
    ) {
        Ok(exists) => HttpResponse::Ok().json(ApiResponse::ok(exists)),
        Err(e) => error_response(&e),
    }
}
