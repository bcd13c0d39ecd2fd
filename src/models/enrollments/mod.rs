pub mod entities;
pub mod import;
pub mod requests;
