use super::Payload;
use crate::configuration::Settings;

pub enum Action {
    /// Run one turn against the agent. Settings travel with the payload so a
    /// turn always uses the settings that were active when it was submitted.
    DispatchTurn(Settings, Payload),
}
