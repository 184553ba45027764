pub mod games;
pub mod settings;

pub use games::{Game, GameColumns, canonical_header};
pub use settings::AppConfig;
