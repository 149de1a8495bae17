pub mod access;
pub mod collections;
pub mod describe;
