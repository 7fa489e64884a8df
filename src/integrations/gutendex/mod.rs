pub mod client;

pub use client::GutendexClient;
