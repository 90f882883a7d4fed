pub mod ip;
pub mod request;
pub mod serde_utils;
