pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod output;
pub mod types;
pub mod util;
