pub mod backend;
pub mod cassandra;
pub mod gateway;
pub mod memory;

pub use backend::KeyValueBackend;
pub use cassandra::CassandraBackend;
pub use gateway::StorageGateway;
pub use memory::MemoryBackend;
