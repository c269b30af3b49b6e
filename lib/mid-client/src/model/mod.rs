pub mod profile;
pub mod receipt;
pub mod signature;
pub mod status;
