mod inmemory;

pub use inmemory::InMemoryAdminRegistry;
