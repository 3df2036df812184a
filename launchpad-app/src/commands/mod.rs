pub mod health;
pub mod init;
