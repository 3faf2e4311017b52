pub mod authorizer;
pub mod lifecycle;
pub mod response;
