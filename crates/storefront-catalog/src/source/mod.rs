pub mod http;
pub mod memory;
pub mod traits;

pub use http::HttpProductSource;
pub use memory::MemorySource;
pub use traits::{DEFAULT_DESCRIPTION, DynSource, ProductSource, RemoteProduct};
