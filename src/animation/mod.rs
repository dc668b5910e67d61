pub mod controller;
pub mod progress;
