pub mod jwt;
pub mod password;
pub mod pagination;
pub mod storage;

#[cfg(test)]
pub mod test_utils;
