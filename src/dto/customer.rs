//! Request DTOs and the CSV record mapping for the customer endpoints.

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::customer::Customer;
use crate::repository::{CustomerListQuery, SortDirection, SortField};

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// CSV header, in column order. Import refuses files missing any of these.
pub const CSV_COLUMNS: [&str; 10] = [
    "customer_type",
    "customer_code",
    "customer_name",
    "customer_tax_code",
    "customer_addr",
    "customer_phone_number",
    "customer_email",
    "last_purchase_date",
    "purchased_item_code",
    "purchased_item_name",
];

/// Body of create/update. The code is never taken from here — it is minted
/// server-side; `customer_avatar_url` carries the temp URL from a prior
/// upload-temp-avatar call, if any.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    #[serde(default)]
    pub customer_avatar_url: Option<String>,
    #[serde(default)]
    pub customer_type: Option<String>,
    pub customer_name: String,
    #[serde(default)]
    pub customer_tax_code: Option<String>,
    #[serde(default)]
    pub customer_addr: Option<String>,
    pub customer_phone_number: String,
    pub customer_email: String,
    #[serde(default)]
    pub last_purchase_date: Option<NaiveDate>,
    #[serde(default)]
    pub purchased_item_code: Option<String>,
    #[serde(default)]
    pub purchased_item_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQueryParams {
    pub page_number: Option<usize>,
    pub page_size: Option<usize>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
    pub customer_type: Option<String>,
}

impl CustomerQueryParams {
    pub fn page(&self) -> usize {
        self.page_number.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    /// Filter without paging, for the count endpoint.
    pub fn to_filter_query(&self) -> CustomerListQuery {
        let sort_by = self
            .sort_by
            .as_deref()
            .and_then(SortField::parse)
            .unwrap_or_default();
        let sort_direction = self
            .sort_direction
            .as_deref()
            .and_then(SortDirection::parse)
            .unwrap_or_default();

        let mut query = CustomerListQuery::new().sort(sort_by, sort_direction);
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.search(search);
        }
        if let Some(customer_type) = self
            .customer_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            query = query.customer_type(customer_type);
        }
        query
    }

    pub fn to_list_query(&self) -> CustomerListQuery {
        self.to_filter_query().paginate(self.page(), self.per_page())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTypeRequest {
    pub customer_ids: Vec<String>,
    pub customer_type: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckEmailRequest {
    pub customer_email: String,
    #[serde(default)]
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPhoneRequest {
    pub customer_phone_number: String,
    #[serde(default)]
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TempAvatarResponse {
    pub temp_avatar_url: String,
}

#[derive(MultipartForm)]
pub struct ImportCsvForm {
    #[multipart(limit = "10MB")]
    pub file: TempFile,
}

#[derive(MultipartForm)]
pub struct AvatarUploadForm {
    #[multipart(limit = "10MB")]
    pub file: TempFile,
}

/// One CSV row, headers in snake_case; dates travel as `dd/MM/yyyy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCsvRecord {
    pub customer_type: Option<String>,
    pub customer_code: String,
    pub customer_name: String,
    pub customer_tax_code: Option<String>,
    pub customer_addr: Option<String>,
    pub customer_phone_number: String,
    pub customer_email: String,
    #[serde(with = "csv_date")]
    pub last_purchase_date: Option<NaiveDate>,
    pub purchased_item_code: Option<String>,
    pub purchased_item_name: Option<String>,
}

impl From<&Customer> for CustomerCsvRecord {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_type: customer.customer_type.clone(),
            customer_code: customer.code.clone(),
            customer_name: customer.name.clone(),
            customer_tax_code: customer.tax_code.clone(),
            customer_addr: customer.address.clone(),
            customer_phone_number: customer.phone.clone(),
            customer_email: customer.email.clone(),
            last_purchase_date: customer.last_purchase_date,
            purchased_item_code: customer.purchased_item_code.clone(),
            purchased_item_name: customer.purchased_item_name.clone(),
        }
    }
}

impl CustomerCsvRecord {
    /// Turns an imported row into a create request. The code column is
    /// dropped on purpose: every import mints a fresh code.
    pub fn into_request(self) -> CustomerRequest {
        CustomerRequest {
            customer_avatar_url: None,
            customer_type: self.customer_type,
            customer_name: self.customer_name,
            customer_tax_code: self.customer_tax_code,
            customer_addr: self.customer_addr,
            customer_phone_number: self.customer_phone_number,
            customer_email: self.customer_email,
            last_purchase_date: self.last_purchase_date,
            purchased_item_code: self.purchased_item_code,
            purchased_item_name: self.purchased_item_name,
        }
    }
}

/// `dd/MM/yyyy` (de)serialization for optional CSV date columns; an empty
/// cell is `None`.
mod csv_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%d/%m/%Y";

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw, FORMAT)
            .map(Some)
            .map_err(D::Error::custom)
    }
}
