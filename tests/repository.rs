use chrono::{Duration, NaiveDateTime, Utc};
use customer_crm::domain::customer::{NewCustomer, UpdateCustomer};
use customer_crm::repository::{
    CustomerListQuery, CustomerReader, CustomerWriter, DieselRepository, SortDirection, SortField,
};
use uuid::Uuid;

mod common;

fn new_customer(name: &str, email: &str, phone: &str, code: &str) -> NewCustomer {
    NewCustomer {
        id: Uuid::new_v4().to_string(),
        code: code.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        customer_type: None,
        tax_code: None,
        address: None,
        avatar_url: String::new(),
        last_purchase_date: None,
        purchased_item_code: None,
        purchased_item_name: None,
        created_at: Utc::now().naive_utc(),
        created_by: "admin".to_string(),
    }
}

fn new_customer_at(
    name: &str,
    email: &str,
    phone: &str,
    code: &str,
    created_at: NaiveDateTime,
) -> NewCustomer {
    NewCustomer {
        created_at,
        ..new_customer(name, email, phone, code)
    }
}

#[test]
fn test_customer_repository_crud() {
    let test_db = common::TestDb::new("test_customer_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let alice = new_customer("Alice", "alice@example.com", "0111111111", "KH202508000001");
    let bob = new_customer("Bob", "bob@example.com", "0222222222", "KH202508000002");
    assert_eq!(repo.create(&alice).unwrap(), 1);
    assert_eq!(repo.create(&bob).unwrap(), 1);

    let query = CustomerListQuery::new();
    assert_eq!(repo.total_count(&query).unwrap(), 2);
    assert_eq!(repo.list(&query).unwrap().len(), 2);

    let fetched = repo.get_by_id(&alice.id).unwrap().unwrap();
    assert_eq!(fetched.name, "Alice");
    assert_eq!(fetched.code, "KH202508000001");

    let updates = UpdateCustomer {
        name: "Bobby".to_string(),
        email: "bob@example.com".to_string(),
        phone: "0222222222".to_string(),
        customer_type: Some("vip".to_string()),
        tax_code: None,
        address: None,
        avatar_url: String::new(),
        last_purchase_date: None,
        purchased_item_code: None,
        purchased_item_name: None,
        updated_at: Utc::now().naive_utc(),
        updated_by: "admin".to_string(),
    };
    let updated = repo.update(&bob.id, &updates).unwrap();
    assert_eq!(updated.name, "Bobby");
    assert_eq!(updated.customer_type.as_deref(), Some("vip"));
    assert_eq!(updated.updated_by.as_deref(), Some("admin"));
    // Code and creation metadata survive an update untouched.
    assert_eq!(updated.code, "KH202508000002");
    assert_eq!(updated.created_by, "admin");

    assert_eq!(repo.soft_delete(&alice.id).unwrap(), 1);
    assert!(repo.get_by_id(&alice.id).unwrap().is_none());
    assert_eq!(repo.total_count(&query).unwrap(), 1);
    // The row persists: the unfiltered email lookup still finds it.
    let deleted = repo.get_by_email("alice@example.com").unwrap().unwrap();
    assert_eq!(deleted.id, alice.id);
}

#[test]
fn test_search_and_type_filter_are_anded() {
    let test_db = common::TestDb::new("test_search_and_type_filter.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let mut an = new_customer("An Nguyen", "an@example.com", "0111111111", "KH202508000001");
    an.customer_type = Some("vip".to_string());
    let mut lan = new_customer("Lan Tran", "lan@example.com", "0222222222", "KH202508000002");
    lan.customer_type = Some("retail".to_string());
    let binh = new_customer("Binh Le", "binh@example.com", "0333333333", "KH202508000003");
    repo.create(&an).unwrap();
    repo.create(&lan).unwrap();
    repo.create(&binh).unwrap();

    // Case-insensitive substring over name OR email OR phone.
    let query = CustomerListQuery::new().search("AN");
    assert_eq!(repo.total_count(&query).unwrap(), 2);

    let query = CustomerListQuery::new().search("0333");
    let items = repo.list(&query).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Binh Le");

    // Search and type filter must both hold.
    let query = CustomerListQuery::new().search("an").customer_type("vip");
    let items = repo.list(&query).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "An Nguyen");
    assert_eq!(repo.total_count(&query).unwrap(), 1);

    let query = CustomerListQuery::new().search("binh").customer_type("vip");
    assert_eq!(repo.total_count(&query).unwrap(), 0);
}

#[test]
fn test_sorting() {
    let test_db = common::TestDb::new("test_sorting.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let base = Utc::now().naive_utc();
    repo.create(&new_customer_at(
        "Charlie",
        "c@example.com",
        "0333333333",
        "KH202508000003",
        base,
    ))
    .unwrap();
    repo.create(&new_customer_at(
        "Alice",
        "a@example.com",
        "0111111111",
        "KH202508000001",
        base + Duration::seconds(1),
    ))
    .unwrap();
    repo.create(&new_customer_at(
        "Bob",
        "b@example.com",
        "0222222222",
        "KH202508000002",
        base + Duration::seconds(2),
    ))
    .unwrap();

    let query = CustomerListQuery::new().sort(SortField::Name, SortDirection::Asc);
    let names: Vec<String> = repo.list(&query).unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["Alice", "Bob", "Charlie"]);

    // Default ordering is newest first.
    let names: Vec<String> = repo
        .list(&CustomerListQuery::new())
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Bob", "Alice", "Charlie"]);

    let query = CustomerListQuery::new().sort(SortField::Code, SortDirection::Desc);
    let codes: Vec<String> = repo.list(&query).unwrap().into_iter().map(|c| c.code).collect();
    assert_eq!(codes, ["KH202508000003", "KH202508000002", "KH202508000001"]);
}

#[test]
fn test_paging_boundaries() {
    let test_db = common::TestDb::new("test_paging_boundaries.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    for i in 0..5 {
        repo.create(&new_customer(
            &format!("Customer {i}"),
            &format!("c{i}@example.com"),
            &format!("011111111{i}"),
            &format!("KH20250800000{i}"),
        ))
        .unwrap();
    }

    let per_page = 2;
    let page = |n: usize| CustomerListQuery::new().paginate(n, per_page);

    assert_eq!(repo.list(&page(1)).unwrap().len(), 2);
    assert_eq!(repo.list(&page(2)).unwrap().len(), 2);
    // Last page holds the remainder.
    assert_eq!(repo.list(&page(3)).unwrap().len(), 1);
    // Past the end: empty list, not an error.
    assert_eq!(repo.list(&page(4)).unwrap().len(), 0);
    // Page zero is treated as the first page.
    assert_eq!(repo.list(&page(0)).unwrap().len(), 2);
    // The count is paging-independent.
    assert_eq!(repo.total_count(&page(4)).unwrap(), 5);
}

#[test]
fn test_bulk_operations() {
    let test_db = common::TestDb::new("test_bulk_operations.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let a = new_customer("A", "a@example.com", "0111111111", "KH202508000001");
    let b = new_customer("B", "b@example.com", "0222222222", "KH202508000002");
    let c = new_customer("C", "c@example.com", "0333333333", "KH202508000003");
    repo.create(&a).unwrap();
    repo.create(&b).unwrap();
    repo.create(&c).unwrap();

    assert_eq!(repo.get_by_ids(&[]).unwrap().len(), 0);
    let ids = vec![a.id.clone(), b.id.clone()];
    assert_eq!(repo.get_by_ids(&ids).unwrap().len(), 2);

    // Assigning a type skips soft-deleted rows.
    assert_eq!(repo.soft_delete(&a.id).unwrap(), 1);
    assert_eq!(repo.assign_type(&ids, "vip").unwrap(), 1);
    let b_after = repo.get_by_id(&b.id).unwrap().unwrap();
    assert_eq!(b_after.customer_type.as_deref(), Some("vip"));

    // Deleted rows drop out of bulk fetches too.
    assert_eq!(repo.get_by_ids(&ids).unwrap().len(), 1);

    assert_eq!(repo.soft_delete_many(&[]).unwrap(), 0);
    let rest = vec![b.id.clone(), c.id.clone()];
    assert_eq!(repo.soft_delete_many(&rest).unwrap(), 2);
    assert_eq!(repo.total_count(&CustomerListQuery::new()).unwrap(), 0);
}

#[test]
fn test_max_code_with_prefix() {
    let test_db = common::TestDb::new("test_max_code_with_prefix.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    assert_eq!(repo.max_code_with_prefix("KH202512").unwrap(), None);

    repo.create(&new_customer(
        "A",
        "a@example.com",
        "0111111111",
        "KH202512000041",
    ))
    .unwrap();
    repo.create(&new_customer(
        "B",
        "b@example.com",
        "0222222222",
        "KH202512000007",
    ))
    .unwrap();
    repo.create(&new_customer(
        "C",
        "c@example.com",
        "0333333333",
        "KH202511000099",
    ))
    .unwrap();

    assert_eq!(
        repo.max_code_with_prefix("KH202512").unwrap().as_deref(),
        Some("KH202512000041")
    );
    assert_eq!(
        repo.max_code_with_prefix("KH202511").unwrap().as_deref(),
        Some("KH202511000099")
    );
}
