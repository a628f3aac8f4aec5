use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::customer::{
    Customer as DomainCustomer, NewCustomer as DomainNewCustomer,
    UpdateCustomer as DomainUpdateCustomer,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::customers)]
/// Diesel model for [`crate::domain::customer::Customer`].
pub struct Customer {
    pub id: String,
    pub code: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub customer_type: Option<String>,
    pub tax_code: Option<String>,
    pub address: Option<String>,
    pub avatar_url: String,
    pub last_purchase_date: Option<NaiveDate>,
    pub purchased_item_code: Option<String>,
    pub purchased_item_name: Option<String>,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: Option<NaiveDateTime>,
    pub updated_by: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customers)]
/// Insertable form of [`Customer`].
pub struct NewCustomer<'a> {
    pub id: &'a str,
    pub code: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub customer_type: Option<&'a str>,
    pub tax_code: Option<&'a str>,
    pub address: Option<&'a str>,
    pub avatar_url: &'a str,
    pub last_purchase_date: Option<NaiveDate>,
    pub purchased_item_code: Option<&'a str>,
    pub purchased_item_name: Option<&'a str>,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub created_by: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::customers)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Customer`] record. `None` clears the column:
/// an update overwrites every business field.
pub struct UpdateCustomer<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub customer_type: Option<&'a str>,
    pub tax_code: Option<&'a str>,
    pub address: Option<&'a str>,
    pub avatar_url: &'a str,
    pub last_purchase_date: Option<NaiveDate>,
    pub purchased_item_code: Option<&'a str>,
    pub purchased_item_name: Option<&'a str>,
    pub updated_at: NaiveDateTime,
    pub updated_by: &'a str,
}

impl From<Customer> for DomainCustomer {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            code: customer.code,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            customer_type: customer.customer_type,
            tax_code: customer.tax_code,
            address: customer.address,
            avatar_url: customer.avatar_url,
            last_purchase_date: customer.last_purchase_date,
            purchased_item_code: customer.purchased_item_code,
            purchased_item_name: customer.purchased_item_name,
            created_at: customer.created_at,
            created_by: customer.created_by,
            updated_at: customer.updated_at,
            updated_by: customer.updated_by,
        }
    }
}

impl<'a> From<&'a DomainNewCustomer> for NewCustomer<'a> {
    fn from(customer: &'a DomainNewCustomer) -> Self {
        Self {
            id: customer.id.as_str(),
            code: customer.code.as_str(),
            name: customer.name.as_str(),
            email: customer.email.as_str(),
            phone: customer.phone.as_str(),
            customer_type: customer.customer_type.as_deref(),
            tax_code: customer.tax_code.as_deref(),
            address: customer.address.as_deref(),
            avatar_url: customer.avatar_url.as_str(),
            last_purchase_date: customer.last_purchase_date,
            purchased_item_code: customer.purchased_item_code.as_deref(),
            purchased_item_name: customer.purchased_item_name.as_deref(),
            is_deleted: false,
            created_at: customer.created_at,
            created_by: customer.created_by.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateCustomer> for UpdateCustomer<'a> {
    fn from(customer: &'a DomainUpdateCustomer) -> Self {
        Self {
            name: customer.name.as_str(),
            email: customer.email.as_str(),
            phone: customer.phone.as_str(),
            customer_type: customer.customer_type.as_deref(),
            tax_code: customer.tax_code.as_deref(),
            address: customer.address.as_deref(),
            avatar_url: customer.avatar_url.as_str(),
            last_purchase_date: customer.last_purchase_date,
            purchased_item_code: customer.purchased_item_code.as_deref(),
            purchased_item_name: customer.purchased_item_name.as_deref(),
            updated_at: customer.updated_at,
            updated_by: customer.updated_by.as_str(),
        }
    }
}
