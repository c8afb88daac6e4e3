pub mod ids;
pub mod jwt;
pub mod test_utils;
