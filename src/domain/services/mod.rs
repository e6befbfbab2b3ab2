pub mod actions;
mod app_state;
mod bubble;
mod bubble_list;
mod conversation;
mod dispatcher;
pub mod events;
mod normalizer;
mod scroll;
mod session;

pub use app_state::*;
pub use bubble::*;
pub use bubble_list::*;
pub use conversation::*;
pub use dispatcher::*;
pub use normalizer::*;
pub use scroll::*;
pub use session::*;
