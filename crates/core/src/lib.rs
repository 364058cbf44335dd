pub mod capture;
pub mod detection;
pub mod events;
pub mod monitor;
pub mod preview;
pub mod shared;
