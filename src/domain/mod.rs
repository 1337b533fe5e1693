pub mod allocation_store;
pub mod event;
pub mod session;
pub mod traffic;
pub mod utils;
pub mod venue;
