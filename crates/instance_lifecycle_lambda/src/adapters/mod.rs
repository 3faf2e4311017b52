pub mod compute;
pub mod credential_store;
