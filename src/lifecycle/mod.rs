pub mod manager;
pub mod mutation;
