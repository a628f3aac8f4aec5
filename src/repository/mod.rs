use crate::db::DbPool;
use crate::domain::customer::{Customer, NewCustomer, UpdateCustomer};
use crate::repository::errors::RepositoryResult;

pub mod customer;
pub mod errors;
#[cfg(test)]
pub mod mock;

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

/// Sort keys accepted by the customer listing. Anything a client sends
/// outside this set silently falls back to the default, so a sort parameter
/// can never reach the query as a raw column reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    Code,
    Name,
    Email,
    Phone,
    CustomerType,
    LastPurchaseDate,
    #[default]
    CreatedAt,
}

impl SortField {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "code" | "customer_code" => Some(Self::Code),
            "name" | "customer_name" => Some(Self::Name),
            "email" | "customer_email" => Some(Self::Email),
            "phone" | "customer_phone_number" => Some(Self::Phone),
            "customer_type" => Some(Self::CustomerType),
            "last_purchase_date" => Some(Self::LastPurchaseDate),
            "created_at" | "created_date" => Some(Self::CreatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Filter, sort and paging parameters for the customer listing. The same
/// value drives both the page query and the total count so the two can
/// never disagree.
#[derive(Debug, Clone, Default)]
pub struct CustomerListQuery {
    pub search: Option<String>,
    pub customer_type: Option<String>,
    pub sort_by: SortField,
    pub sort_direction: SortDirection,
    pub pagination: Option<Pagination>,
}

impl CustomerListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn customer_type(mut self, customer_type: impl Into<String>) -> Self {
        self.customer_type = Some(customer_type.into());
        self
    }

    pub fn sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_by = field;
        self.sort_direction = direction;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait CustomerReader {
    /// Active customer by identifier; soft-deleted rows are invisible here.
    fn get_by_id(&self, id: &str) -> RepositoryResult<Option<Customer>>;
    /// Exact email match. Deliberately does not filter deleted rows: a
    /// soft-deleted customer still owns its email for uniqueness purposes.
    fn get_by_email(&self, email: &str) -> RepositoryResult<Option<Customer>>;
    /// Exact phone match, same deleted-row semantics as [`get_by_email`].
    ///
    /// [`get_by_email`]: CustomerReader::get_by_email
    fn get_by_phone(&self, phone: &str) -> RepositoryResult<Option<Customer>>;
    /// Largest code starting with `prefix`. The numeric tail is fixed-width
    /// zero-padded, so the lexicographic maximum is the numeric maximum.
    fn max_code_with_prefix(&self, prefix: &str) -> RepositoryResult<Option<String>>;
    fn list(&self, query: &CustomerListQuery) -> RepositoryResult<Vec<Customer>>;
    fn total_count(&self, query: &CustomerListQuery) -> RepositoryResult<usize>;
    /// Bulk fetch of active customers; an empty input issues no query.
    fn get_by_ids(&self, ids: &[String]) -> RepositoryResult<Vec<Customer>>;
}

pub trait CustomerWriter {
    fn create(&self, new_customer: &NewCustomer) -> RepositoryResult<usize>;
    fn update(&self, id: &str, updates: &UpdateCustomer) -> RepositoryResult<Customer>;
    fn soft_delete(&self, id: &str) -> RepositoryResult<usize>;
    fn soft_delete_many(&self, ids: &[String]) -> RepositoryResult<usize>;
    fn assign_type(&self, ids: &[String], customer_type: &str) -> RepositoryResult<usize>;
}

/// Diesel-backed repository handed to the HTTP handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}
