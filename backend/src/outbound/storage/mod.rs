//! Object store adapters for uploaded profile images.

mod in_memory_object_store;
mod local_object_store;

pub use in_memory_object_store::InMemoryObjectStore;
pub use local_object_store::LocalObjectStore;
