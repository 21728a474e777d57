//! Post-cleaning data validation.
//!
//! This module provides the final consistency checks that run after every
//! repair pass: email format verification, follower count bounds, and
//! engagement rate range enforcement.

mod validator;

pub use validator::validate_data;
