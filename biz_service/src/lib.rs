pub mod controller;
pub mod entitys;
pub mod notify;
pub mod tree;

#[cfg(test)]
mod mock_client;
