mod async_client;
mod base;
mod file;
mod memory;

pub use async_client::*;
pub use base::*;
pub use file::*;
pub use memory::*;
