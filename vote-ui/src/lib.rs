pub mod api;
pub mod buttons;
pub mod config;
pub mod engine;
pub mod feed;
pub mod interop;
pub mod notify;
pub mod reconcile;
pub mod token;

pub use api::*;
pub use buttons::*;
pub use config::*;
pub use engine::*;
pub use feed::*;
pub use interop::*;
pub use notify::*;
pub use reconcile::*;
pub use token::*;
