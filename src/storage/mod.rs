pub mod json_file;
pub mod models;
pub mod users;
