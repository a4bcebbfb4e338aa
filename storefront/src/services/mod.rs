// vitrina/storefront/src/services/mod.rs

pub mod credentials;
pub mod storage_key;
