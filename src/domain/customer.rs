use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// An active customer record as seen by the rest of the application.
///
/// Soft-deleted rows never cross the repository boundary on the read paths,
/// so the deletion flag does not appear here.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Opaque unique identifier, minted by the service on insert.
    pub id: String,
    /// Derived code, `KH{yyyyMM}{6-digit sequence}`.
    pub code: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub customer_type: Option<String>,
    pub tax_code: Option<String>,
    pub address: Option<String>,
    /// Relative URL under `/uploads/avatars`, empty when no avatar is set.
    pub avatar_url: String,
    pub last_purchase_date: Option<NaiveDate>,
    pub purchased_item_code: Option<String>,
    pub purchased_item_name: Option<String>,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: Option<NaiveDateTime>,
    pub updated_by: Option<String>,
}

/// Full row to insert; identifier, code and creation metadata are supplied
/// by the service, never by the caller.
#[derive(Clone, Debug)]
pub struct NewCustomer {
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
    pub created_at: NaiveDateTime,
    pub created_by: String,
}

/// Data applied when updating a customer. Every business field is
/// overwritten; `avatar_url` is already resolved by the service (either the
/// freshly committed file or the value the row previously held).
#[derive(Clone, Debug)]
pub struct UpdateCustomer {
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
    pub updated_at: NaiveDateTime,
    pub updated_by: String,
}

impl From<NewCustomer> for Customer {
    fn from(new: NewCustomer) -> Self {
        Self {
            id: new.id,
            code: new.code,
            name: new.name,
            email: new.email,
            phone: new.phone,
            customer_type: new.customer_type,
            tax_code: new.tax_code,
            address: new.address,
            avatar_url: new.avatar_url,
            last_purchase_date: new.last_purchase_date,
            purchased_item_code: new.purchased_item_code,
            purchased_item_name: new.purchased_item_name,
            created_at: new.created_at,
            created_by: new.created_by,
            updated_at: None,
            updated_by: None,
        }
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl NewCustomer {
    /// Normalizes free-text fields: trims whitespace, lowercases the email
    /// and drops empty optionals.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.phone = self.phone.trim().to_string();
        self.customer_type = clean(self.customer_type);
        self.tax_code = clean(self.tax_code);
        self.address = clean(self.address);
        self.purchased_item_code = clean(self.purchased_item_code);
        self.purchased_item_name = clean(self.purchased_item_name);
        self
    }
}

impl UpdateCustomer {
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.phone = self.phone.trim().to_string();
        self.customer_type = clean(self.customer_type);
        self.tax_code = clean(self.tax_code);
        self.address = clean(self.address);
        self.purchased_item_code = clean(self.purchased_item_code);
        self.purchased_item_name = clean(self.purchased_item_name);
        self
    }
}
