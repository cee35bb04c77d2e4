pub mod check;
pub mod fix;
pub mod init;
pub mod map;
pub mod resolve;
