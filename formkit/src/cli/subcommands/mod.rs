pub mod fill;
mod fill_handler;
pub mod show;
mod show_handler;
pub mod users;
