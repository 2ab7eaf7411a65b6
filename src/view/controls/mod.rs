mod move_form;
mod setup_form;

pub use move_form::{MoveField, MoveForm};
pub use setup_form::SetupForm;
