//! Storage Adapters
//!
//! Implementations of the DeviceStorage port backing the local session
//! adapter.
//!
//! ## Available Adapters
//!
//! - **FileDeviceStorage** - One JSON file per key on disk
//! - **InMemoryDeviceStorage** - Documents in memory (testing/simulated devices)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileDeviceStorage, InMemoryDeviceStorage};
//!
//! // Production: file-based storage
//! let storage = FileDeviceStorage::new("./data");
//!
//! // Testing: in-memory storage
//! let storage = InMemoryDeviceStorage::new();
//! ```

mod file_device_storage;
mod in_memory_device_storage;

pub use file_device_storage::FileDeviceStorage;
pub use in_memory_device_storage::InMemoryDeviceStorage;
