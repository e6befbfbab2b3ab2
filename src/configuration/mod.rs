mod settings;
mod settings_form;

pub use settings::*;
pub use settings_form::*;
