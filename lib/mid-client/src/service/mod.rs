pub mod mss;
