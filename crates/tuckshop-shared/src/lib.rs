pub mod constants;
pub mod credentials;
pub mod error;
pub mod price;
pub mod types;
