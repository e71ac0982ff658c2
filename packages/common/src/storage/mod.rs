mod error;
mod traits;

pub mod memory;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use traits::{MovieStore, ReviewStore};
