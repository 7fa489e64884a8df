pub mod client;

pub use client::OpenLibraryClient;
