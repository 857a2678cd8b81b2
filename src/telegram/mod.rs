pub mod poller;
pub mod transport;

pub use poller::UpdatePoller;
pub use transport::{TelegramTransport, Transport};
