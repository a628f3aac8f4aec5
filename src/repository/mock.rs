//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::customer::{Customer, NewCustomer, UpdateCustomer};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CustomerListQuery, CustomerReader, CustomerWriter};

mock! {
    pub Repository {}

    impl CustomerReader for Repository {
        fn get_by_id(&self, id: &str) -> RepositoryResult<Option<Customer>>;
        fn get_by_email(&self, email: &str) -> RepositoryResult<Option<Customer>>;
        fn get_by_phone(&self, phone: &str) -> RepositoryResult<Option<Customer>>;
        fn max_code_with_prefix(&self, prefix: &str) -> RepositoryResult<Option<String>>;
        fn list(&self, query: &CustomerListQuery) -> RepositoryResult<Vec<Customer>>;
        fn total_count(&self, query: &CustomerListQuery) -> RepositoryResult<usize>;
        fn get_by_ids(&self, ids: &[String]) -> RepositoryResult<Vec<Customer>>;
    }

    impl CustomerWriter for Repository {
        fn create(&self, new_customer: &NewCustomer) -> RepositoryResult<usize>;
        fn update(&self, id: &str, updates: &UpdateCustomer) -> RepositoryResult<Customer>;
        fn soft_delete(&self, id: &str) -> RepositoryResult<usize>;
        fn soft_delete_many(&self, ids: &[String]) -> RepositoryResult<usize>;
        fn assign_type(&self, ids: &[String], customer_type: &str) -> RepositoryResult<usize>;
    }
}
