pub mod adapter;
pub mod error;
pub mod handler;
pub mod send;
pub mod transport;

pub use adapter::DiscordAdapter;
pub use error::DiscordError;
pub use transport::SerenityTransport;
