//! Clients - HTTP Clients for External APIs
//!
//! This module contains HTTP clients for the Supabase auth and storage APIs.

pub mod supabase_auth_client;
pub mod supabase_storage_client;

// Re-export main types for convenience
pub use supabase_auth_client::SupabaseAuthClient;
pub use supabase_storage_client::SupabaseStorageClient;
