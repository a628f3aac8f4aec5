pub mod config;
pub mod customer;
