pub mod contracts;
pub mod google_client;
