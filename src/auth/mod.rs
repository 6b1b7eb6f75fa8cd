pub mod claims;
pub mod jwt;

#[cfg(test)]
pub use jwt::issue_jwt;
pub use jwt::validate_jwt;
