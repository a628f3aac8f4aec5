use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::customer::{Customer, NewCustomer, UpdateCustomer};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CustomerListQuery, CustomerReader, CustomerWriter, DieselRepository, SortDirection, SortField,
};

type BoxedCustomers<'a> = crate::schema::customers::BoxedQuery<'a, Sqlite>;

/// Builds the shared predicate for the paged listing and its count. Both
/// callers go through here, so the page and the total always agree.
fn filtered(query: &CustomerListQuery) -> BoxedCustomers<'static> {
    use crate::schema::customers;

    let mut filtered = customers::table
        .filter(customers::is_deleted.eq(false))
        .into_boxed();

    if let Some(term) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{term}%");
        filtered = filtered.filter(
            customers::name
                .like(pattern.clone())
                .or(customers::email.like(pattern.clone()))
                .or(customers::phone.like(pattern)),
        );
    }

    if let Some(customer_type) = query
        .customer_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        filtered = filtered.filter(customers::customer_type.like(format!("%{customer_type}%")));
    }

    filtered
}

fn ordered(query: &CustomerListQuery, statement: BoxedCustomers<'static>) -> BoxedCustomers<'static> {
    use crate::schema::customers;

    match (query.sort_by, query.sort_direction) {
        (SortField::Code, SortDirection::Asc) => statement.order(customers::code.asc()),
        (SortField::Code, SortDirection::Desc) => statement.order(customers::code.desc()),
        (SortField::Name, SortDirection::Asc) => statement.order(customers::name.asc()),
        (SortField::Name, SortDirection::Desc) => statement.order(customers::name.desc()),
        (SortField::Email, SortDirection::Asc) => statement.order(customers::email.asc()),
        (SortField::Email, SortDirection::Desc) => statement.order(customers::email.desc()),
        (SortField::Phone, SortDirection::Asc) => statement.order(customers::phone.asc()),
        (SortField::Phone, SortDirection::Desc) => statement.order(customers::phone.desc()),
        (SortField::CustomerType, SortDirection::Asc) => {
            statement.order(customers::customer_type.asc())
        }
        (SortField::CustomerType, SortDirection::Desc) => {
            statement.order(customers::customer_type.desc())
        }
        (SortField::LastPurchaseDate, SortDirection::Asc) => {
            statement.order(customers::last_purchase_date.asc())
        }
        (SortField::LastPurchaseDate, SortDirection::Desc) => {
            statement.order(customers::last_purchase_date.desc())
        }
        (SortField::CreatedAt, SortDirection::Asc) => statement.order(customers::created_at.asc()),
        (SortField::CreatedAt, SortDirection::Desc) => {
            statement.order(customers::created_at.desc())
        }
    }
}

impl CustomerReader for DieselRepository {
    fn get_by_id(&self, id: &str) -> RepositoryResult<Option<Customer>> {
        use crate::models::customer::Customer as DbCustomer;
        use crate::schema::customers;

        let mut conn = self.pool().get()?;
        let customer = customers::table
            .find(id)
            .filter(customers::is_deleted.eq(false))
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        Ok(customer.map(Into::into))
    }

    fn get_by_email(&self, email: &str) -> RepositoryResult<Option<Customer>> {
        use crate::models::customer::Customer as DbCustomer;
        use crate::schema::customers;

        // No is_deleted filter: deleted customers still hold their email.
        let mut conn = self.pool().get()?;
        let customer = customers::table
            .filter(customers::email.eq(email))
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        Ok(customer.map(Into::into))
    }

    fn get_by_phone(&self, phone: &str) -> RepositoryResult<Option<Customer>> {
        use crate::models::customer::Customer as DbCustomer;
        use crate::schema::customers;

        let mut conn = self.pool().get()?;
        let customer = customers::table
            .filter(customers::phone.eq(phone))
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        Ok(customer.map(Into::into))
    }

    fn max_code_with_prefix(&self, prefix: &str) -> RepositoryResult<Option<String>> {
        use crate::schema::customers;

        let mut conn = self.pool().get()?;
        let code = customers::table
            .filter(customers::code.like(format!("{prefix}%")))
            .order(customers::code.desc())
            .select(customers::code)
            .first::<String>(&mut conn)
            .optional()?;

        Ok(code)
    }

    fn list(&self, query: &CustomerListQuery) -> RepositoryResult<Vec<Customer>> {
        use crate::models::customer::Customer as DbCustomer;

        let mut conn = self.pool().get()?;
        let mut statement = ordered(query, filtered(query));

        if let Some(pagination) = &query.pagination {
            let page = pagination.page.max(1) as i64;
            let per_page = pagination.per_page as i64;
            statement = statement.limit(per_page).offset((page - 1) * per_page);
        }

        let items = statement
            .load::<DbCustomer>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(items)
    }

    fn total_count(&self, query: &CustomerListQuery) -> RepositoryResult<usize> {
        let mut conn = self.pool().get()?;
        let total: i64 = filtered(query).count().get_result(&mut conn)?;

        Ok(total as usize)
    }

    fn get_by_ids(&self, ids: &[String]) -> RepositoryResult<Vec<Customer>> {
        use crate::models::customer::Customer as DbCustomer;
        use crate::schema::customers;

        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut conn = self.pool().get()?;
        let items = customers::table
            .filter(customers::id.eq_any(ids))
            .filter(customers::is_deleted.eq(false))
            .load::<DbCustomer>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(items)
    }
}

impl CustomerWriter for DieselRepository {
    fn create(&self, new_customer: &NewCustomer) -> RepositoryResult<usize> {
        use crate::models::customer::NewCustomer as DbNewCustomer;
        use crate::schema::customers;

        let mut conn = self.pool().get()?;
        let insertable: DbNewCustomer = new_customer.into();
        let affected = diesel::insert_into(customers::table)
            .values(&insertable)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn update(&self, id: &str, updates: &UpdateCustomer) -> RepositoryResult<Customer> {
        use crate::models::customer::{Customer as DbCustomer, UpdateCustomer as DbUpdateCustomer};
        use crate::schema::customers;

        let mut conn = self.pool().get()?;
        let db_updates: DbUpdateCustomer = updates.into();

        let updated = diesel::update(customers::table.find(id))
            .set(&db_updates)
            .get_result::<DbCustomer>(&mut conn)?;

        Ok(updated.into())
    }

    fn soft_delete(&self, id: &str) -> RepositoryResult<usize> {
        use crate::schema::customers;

        let mut conn = self.pool().get()?;
        let affected = diesel::update(customers::table.find(id))
            .set(customers::is_deleted.eq(true))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn soft_delete_many(&self, ids: &[String]) -> RepositoryResult<usize> {
        use crate::schema::customers;

        if ids.is_empty() {
            return Ok(0);
        }

        let mut conn = self.pool().get()?;
        let affected = diesel::update(customers::table.filter(customers::id.eq_any(ids)))
            .set(customers::is_deleted.eq(true))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn assign_type(&self, ids: &[String], customer_type: &str) -> RepositoryResult<usize> {
        use crate::schema::customers;

        if ids.is_empty() {
            return Ok(0);
        }

        let mut conn = self.pool().get()?;
        let affected = diesel::update(
            customers::table
                .filter(customers::id.eq_any(ids))
                .filter(customers::is_deleted.eq(false)),
        )
        .set(customers::customer_type.eq(customer_type))
        .execute(&mut conn)?;

        Ok(affected)
    }
}
