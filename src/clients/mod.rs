pub mod frappe_client;

pub use frappe_client::FrappeClient;
