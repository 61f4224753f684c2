pub mod accounts;
pub mod applications;
