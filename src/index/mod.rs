pub mod loader;
pub mod store;
pub mod types;

pub use loader::BatchLoader;
pub use store::IndexStore;
pub use types::*;
