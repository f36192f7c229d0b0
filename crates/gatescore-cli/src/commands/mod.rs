pub mod compare;
pub mod init;
pub mod key;
pub mod score;
