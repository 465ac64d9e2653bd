//! Built-in [`Store`](crate::store::Store) implementations.
//!
//! Currently only [`MemoryStore`], gated behind the default `store-memory`
//! feature. Production deployments implement the trait over their hosted
//! document database.

mod memory;

pub use memory::MemoryStore;
