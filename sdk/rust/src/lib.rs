//! Typed async client for the address book HTTP service.

pub mod client;

pub use client::{Address, AddressBookClient, AddressFields, ClientError};
