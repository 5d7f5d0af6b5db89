pub mod init;
pub mod list_types;
pub mod score;
pub mod trend;
pub mod validate;
