pub mod analyze;
pub mod bands;
pub mod init_config;
pub mod validate;
