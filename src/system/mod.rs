pub mod error;
pub mod line;
pub mod load;
pub mod os_release;
pub mod stat;
