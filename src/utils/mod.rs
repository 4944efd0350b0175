pub mod auth_utils;
pub mod catalog_utils;
pub mod token_utils;
