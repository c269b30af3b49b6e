pub mod clock;
pub mod json;
pub mod traffic_observer;
