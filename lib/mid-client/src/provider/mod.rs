pub mod mss_port;
pub mod session_pool;
