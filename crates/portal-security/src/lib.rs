//! # Portal Security
//! 
//! Secret hashing for stored credentials.

pub mod password;

pub use password::{PasswordError, PasswordService};
