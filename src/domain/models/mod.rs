mod action;
mod attachment;
mod event;
mod loading;
mod message;
mod notice;
mod payload;
mod role;
mod slash_commands;
mod textarea;
mod transport;

pub use action::*;
pub use attachment::*;
pub use event::*;
pub use loading::*;
pub use message::*;
pub use notice::*;
pub use payload::*;
pub use role::*;
pub use slash_commands::*;
pub use textarea::*;
pub use transport::*;
