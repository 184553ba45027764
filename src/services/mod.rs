pub mod bot;
pub mod local;

pub use bot::BotService;
pub use local::LocalCommand;
