mod command;
pub mod mealplan;
pub mod user;

pub use command::*;
