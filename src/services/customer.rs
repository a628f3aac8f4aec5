//! Customer business rules: validation, code minting, create/update
//! orchestration, CSV import/export and the live existence checks.

use std::io::Read;

use chrono::Utc;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::domain::customer::{Customer, NewCustomer, UpdateCustomer};
use crate::dto::customer::{CSV_COLUMNS, CustomerCsvRecord, CustomerRequest};
use crate::repository::{CustomerListQuery, CustomerReader, CustomerWriter};
use crate::services::uploads::UploadStore;
use crate::services::{ServiceError, ServiceResult};

const CODE_PREFIX: &str = "KH";

/// UTF-8 byte order mark, prepended to CSV exports so spreadsheet tools
/// pick the right encoding for non-ASCII text.
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Phone numbers are a leading zero followed by 9 or 10 digits.
fn is_valid_phone(phone: &str) -> bool {
    (10..=11).contains(&phone.len())
        && phone.starts_with('0')
        && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Runs the create/update validation chain. Checks run in a fixed order and
/// the first failure wins: blank name, email format, email uniqueness, phone
/// format, phone uniqueness. Uniqueness ignores the record being edited.
pub fn validate_customer<R>(
    repo: &R,
    exclude_id: Option<&str>,
    dto: &CustomerRequest,
) -> ServiceResult<()>
where
    R: CustomerReader + ?Sized,
{
    if dto.customer_name.trim().is_empty() {
        return Err(ServiceError::validation(
            "customerName",
            "Customer name must not be blank",
        ));
    }

    let email = dto.customer_email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(ServiceError::validation(
            "customerEmail",
            "Email is not a valid address",
        ));
    }
    if let Some(owner) = repo.get_by_email(&email)?
        && exclude_id != Some(owner.id.as_str())
    {
        return Err(ServiceError::conflict(
            "customerEmail",
            "Email already exists",
        ));
    }

    let phone = dto.customer_phone_number.trim();
    if !is_valid_phone(phone) {
        return Err(ServiceError::validation(
            "customerPhoneNumber",
            "Phone number must be 10 or 11 digits starting with 0",
        ));
    }
    if let Some(owner) = repo.get_by_phone(phone)?
        && exclude_id != Some(owner.id.as_str())
    {
        return Err(ServiceError::conflict(
            "customerPhoneNumber",
            "Phone number already exists",
        ));
    }

    Ok(())
}

fn bump_code(prefix: &str, max_code: Option<&str>) -> ServiceResult<String> {
    let next = match max_code {
        None => 1,
        Some(code) => {
            let tail = code.get(prefix.len()..).unwrap_or("");
            tail.parse::<u64>()
                .map_err(|_| ServiceError::Internal(format!("Malformed customer code: {code}")))?
                + 1
        }
    };
    Ok(format!("{prefix}{next:06}"))
}

/// Mints the next customer code: `KH{yyyyMM}` plus a zero-padded sequence
/// one past the stored maximum for the current month.
///
/// Read-then-increment with no isolation: two simultaneous creates can
/// observe the same maximum and mint the same code.
pub fn generate_code<R>(repo: &R) -> ServiceResult<String>
where
    R: CustomerReader + ?Sized,
{
    let prefix = format!("{CODE_PREFIX}{}", Utc::now().format("%Y%m"));
    let max_code = repo.max_code_with_prefix(&prefix)?;
    bump_code(&prefix, max_code.as_deref())
}

/// Fetches one page of customers together with the total matching count.
pub fn list_customers<R>(
    repo: &R,
    query: &CustomerListQuery,
) -> ServiceResult<(usize, Vec<Customer>)>
where
    R: CustomerReader + ?Sized,
{
    let items = repo.list(query)?;
    let total = repo.total_count(query)?;
    Ok((total, items))
}

pub fn total_count<R>(repo: &R, query: &CustomerListQuery) -> ServiceResult<usize>
where
    R: CustomerReader + ?Sized,
{
    Ok(repo.total_count(query)?)
}

pub fn get_customer<R>(repo: &R, id: &str) -> ServiceResult<Customer>
where
    R: CustomerReader + ?Sized,
{
    repo.get_by_id(id)?
        .ok_or_else(|| ServiceError::not_found("customerId", "Customer not found"))
}

/// Validates and persists a new customer, minting its identifier and code
/// and committing any staged avatar along the way.
pub fn create_customer<R>(
    repo: &R,
    uploads: &UploadStore,
    dto: CustomerRequest,
    actor: &str,
) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    validate_customer(repo, None, &dto)?;

    let avatar_url = uploads
        .commit_temp_avatar(dto.customer_avatar_url.as_deref())?
        .unwrap_or_default();
    let code = generate_code(repo)?;

    let new_customer = NewCustomer {
        id: Uuid::new_v4().to_string(),
        code,
        name: dto.customer_name,
        email: dto.customer_email,
        phone: dto.customer_phone_number,
        customer_type: dto.customer_type,
        tax_code: dto.customer_tax_code,
        address: dto.customer_addr,
        avatar_url,
        last_purchase_date: dto.last_purchase_date,
        purchased_item_code: dto.purchased_item_code,
        purchased_item_name: dto.purchased_item_name,
        created_at: Utc::now().naive_utc(),
        created_by: actor.to_string(),
    }
    .normalized();

    repo.create(&new_customer)?;

    Ok(new_customer.into())
}

/// Overwrites a customer's business fields. The avatar only changes when a
/// new temp URL was supplied; absent means keep the current file.
pub fn update_customer<R>(
    repo: &R,
    uploads: &UploadStore,
    id: &str,
    dto: CustomerRequest,
    actor: &str,
) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    validate_customer(repo, Some(id), &dto)?;

    let existing = repo
        .get_by_id(id)?
        .ok_or_else(|| ServiceError::not_found("customerId", "Customer not found"))?;

    let avatar_url = match uploads.commit_temp_avatar(dto.customer_avatar_url.as_deref())? {
        Some(url) => url,
        None => existing.avatar_url,
    };

    let updates = UpdateCustomer {
        name: dto.customer_name,
        email: dto.customer_email,
        phone: dto.customer_phone_number,
        customer_type: dto.customer_type,
        tax_code: dto.customer_tax_code,
        address: dto.customer_addr,
        avatar_url,
        last_purchase_date: dto.last_purchase_date,
        purchased_item_code: dto.purchased_item_code,
        purchased_item_name: dto.purchased_item_name,
        updated_at: Utc::now().naive_utc(),
        updated_by: actor.to_string(),
    }
    .normalized();

    Ok(repo.update(id, &updates)?)
}

pub fn soft_delete_customer<R>(repo: &R, id: &str) -> ServiceResult<usize>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    repo.get_by_id(id)?
        .ok_or_else(|| ServiceError::not_found("customerId", "Customer not found"))?;

    Ok(repo.soft_delete(id)?)
}

pub fn soft_delete_customers<R>(repo: &R, ids: &[String]) -> ServiceResult<usize>
where
    R: CustomerWriter + ?Sized,
{
    if ids.is_empty() {
        return Err(ServiceError::validation(
            "customerIds",
            "Customer id list must not be empty",
        ));
    }

    Ok(repo.soft_delete_many(ids)?)
}

pub fn assign_customer_type<R>(
    repo: &R,
    ids: &[String],
    customer_type: &str,
) -> ServiceResult<usize>
where
    R: CustomerWriter + ?Sized,
{
    if ids.is_empty() {
        return Err(ServiceError::validation(
            "customerIds",
            "Customer id list must not be empty",
        ));
    }
    let customer_type = customer_type.trim();
    if customer_type.is_empty() {
        return Err(ServiceError::validation(
            "customerType",
            "Customer type must not be blank",
        ));
    }

    Ok(repo.assign_type(ids, customer_type)?)
}

/// Serializes the selected customers to CSV bytes, UTF-8 with a BOM.
pub fn export_csv<R>(repo: &R, ids: &[String]) -> ServiceResult<Vec<u8>>
where
    R: CustomerReader + ?Sized,
{
    if ids.is_empty() {
        return Err(ServiceError::validation(
            "customerIds",
            "No customers selected for export",
        ));
    }

    let customers = repo.get_by_ids(ids)?;

    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        for customer in &customers {
            writer.serialize(CustomerCsvRecord::from(customer))?;
        }
        writer.flush()?;
    }

    Ok(buffer)
}

/// Imports customers from CSV, row by row and best-effort: a row that fails
/// validation is skipped without aborting the batch. Missing header columns
/// fail the whole operation. Returns the number of rows inserted.
pub fn import_csv<R>(repo: &R, uploads: &UploadStore, input: impl Read) -> ServiceResult<usize>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    let mut reader = csv::Reader::from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| ServiceError::Internal(e.to_string()))?
        .clone();
    let missing = CSV_COLUMNS
        .iter()
        .any(|column| !headers.iter().any(|header| header.trim() == *column));
    if missing {
        return Err(ServiceError::validation(
            "file",
            "CSV file is missing required columns",
        ));
    }

    let mut count = 0;
    for row in reader.deserialize::<CustomerCsvRecord>() {
        let Ok(record) = row else {
            continue;
        };
        // Imports carry no actor identity.
        if create_customer(repo, uploads, record.into_request(), "").is_ok() {
            count += 1;
        }
    }

    Ok(count)
}

pub fn check_email_exists<R>(
    repo: &R,
    email: &str,
    exclude_id: Option<&str>,
) -> ServiceResult<bool>
where
    R: CustomerReader + ?Sized,
{
    let email = email.trim().to_lowercase();
    Ok(repo
        .get_by_email(&email)?
        .is_some_and(|owner| exclude_id != Some(owner.id.as_str())))
}

pub fn check_phone_exists<R>(
    repo: &R,
    phone: &str,
    exclude_id: Option<&str>,
) -> ServiceResult<bool>
where
    R: CustomerReader + ?Sized,
{
    let phone = phone.trim();
    Ok(repo
        .get_by_phone(phone)?
        .is_some_and(|owner| exclude_id != Some(owner.id.as_str())))
}

/// Loads a customer's avatar bytes with their content type. `None` stands
/// for "no avatar": either the record never had one or the file is gone.
pub fn load_avatar<R>(
    repo: &R,
    uploads: &UploadStore,
    id: &str,
) -> ServiceResult<Option<(Vec<u8>, String)>>
where
    R: CustomerReader + ?Sized,
{
    let customer = get_customer(repo, id)?;
    if customer.avatar_url.is_empty() {
        return Ok(None);
    }

    match uploads.read(&customer.avatar_url)? {
        Some(bytes) => Ok(Some((bytes, UploadStore::mime_for(&customer.avatar_url)))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;

    fn request() -> CustomerRequest {
        CustomerRequest {
            customer_name: "An Nguyen".to_string(),
            customer_email: "an@example.com".to_string(),
            customer_phone_number: "0912345678".to_string(),
            ..Default::default()
        }
    }

    fn owner(id: &str) -> Customer {
        Customer {
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn phone_format_boundaries() {
        assert!(is_valid_phone("0123456789")); // 10 digits
        assert!(is_valid_phone("01234567890")); // 11 digits
        assert!(!is_valid_phone("012345678")); // 9 digits
        assert!(!is_valid_phone("012345678901")); // 12 digits
        assert!(!is_valid_phone("1123456789")); // no leading zero
        assert!(!is_valid_phone("0123a56789"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn blank_name_short_circuits_before_any_lookup() {
        let repo = MockRepository::new();
        let mut dto = request();
        dto.customer_name = "   ".to_string();

        let err = validate_customer(&repo, None, &dto).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { ref field, .. } if field == "customerName"));
    }

    #[test]
    fn malformed_email_fails_validation() {
        let repo = MockRepository::new();
        let mut dto = request();
        dto.customer_email = "not-an-email".to_string();

        let err = validate_customer(&repo, None, &dto).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { ref field, .. } if field == "customerEmail"));
    }

    #[test]
    fn email_owned_by_someone_else_conflicts() {
        let mut repo = MockRepository::new();
        repo.expect_get_by_email()
            .returning(|_| Ok(Some(owner("other"))));

        let err = validate_customer(&repo, Some("me"), &request()).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict { ref field, .. } if field == "customerEmail"));
    }

    #[test]
    fn own_email_and_phone_pass_on_update() {
        let mut repo = MockRepository::new();
        repo.expect_get_by_email().returning(|_| Ok(Some(owner("me"))));
        repo.expect_get_by_phone().returning(|_| Ok(Some(owner("me"))));

        assert!(validate_customer(&repo, Some("me"), &request()).is_ok());
    }

    #[test]
    fn phone_conflict_reported_after_email_checks() {
        let mut repo = MockRepository::new();
        repo.expect_get_by_email().returning(|_| Ok(None));
        repo.expect_get_by_phone()
            .returning(|_| Ok(Some(owner("other"))));

        let err = validate_customer(&repo, None, &request()).unwrap_err();
        assert!(
            matches!(err, ServiceError::Conflict { ref field, .. } if field == "customerPhoneNumber")
        );
    }

    #[test]
    fn bump_code_increments_numeric_tail() {
        assert_eq!(
            bump_code("KH202512", Some("KH202512000041")).unwrap(),
            "KH202512000042"
        );
    }

    #[test]
    fn bump_code_starts_at_one() {
        assert_eq!(bump_code("KH202512", None).unwrap(), "KH202512000001");
    }

    #[test]
    fn bump_code_rejects_malformed_tail() {
        let err = bump_code("KH202512", Some("KH202512garbage")).unwrap_err();
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn generate_code_uses_current_month_prefix() {
        let mut repo = MockRepository::new();
        repo.expect_max_code_with_prefix()
            .returning(|prefix| Ok(Some(format!("{prefix}000041"))));

        let expected = format!("KH{}000042", Utc::now().format("%Y%m"));
        assert_eq!(generate_code(&repo).unwrap(), expected);
    }

    #[test]
    fn empty_id_list_is_rejected_for_bulk_ops() {
        let repo = MockRepository::new();
        let err = soft_delete_customers(&repo, &[]).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { ref field, .. } if field == "customerIds"));

        let err = assign_customer_type(&repo, &[], "vip").unwrap_err();
        assert!(matches!(err, ServiceError::Validation { ref field, .. } if field == "customerIds"));
    }

    #[test]
    fn blank_type_is_rejected_for_assign() {
        let repo = MockRepository::new();
        let ids = vec!["a".to_string()];
        let err = assign_customer_type(&repo, &ids, "  ").unwrap_err();
        assert!(matches!(err, ServiceError::Validation { ref field, .. } if field == "customerType"));
    }

    #[test]
    fn export_rejects_empty_selection() {
        let repo = MockRepository::new();
        let err = export_csv(&repo, &[]).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { ref field, .. } if field == "customerIds"));
    }

    #[test]
    fn export_starts_with_bom_and_header() {
        let mut repo = MockRepository::new();
        repo.expect_get_by_ids().returning(|_| {
            Ok(vec![Customer {
                id: "id".to_string(),
                code: "KH202508000001".to_string(),
                name: "An".to_string(),
                email: "an@example.com".to_string(),
                phone: "0912345678".to_string(),
                ..Default::default()
            }])
        });

        let bytes = export_csv(&repo, &["id".to_string()]).unwrap();
        assert_eq!(&bytes[..3], &UTF8_BOM);
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert!(text.starts_with(&CSV_COLUMNS.join(",")));
        assert!(text.contains("KH202508000001"));
    }

    #[test]
    fn import_rejects_missing_columns() {
        let repo = MockRepository::new();
        let uploads = UploadStore::new(tempfile::tempdir().unwrap().path());
        let csv = "customer_name,customer_email\nAn,an@example.com\n";

        let err = import_csv(&repo, &uploads, csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { ref field, .. } if field == "file"));
    }
}
