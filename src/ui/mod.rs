mod app;
mod console;
mod input;
mod view;

pub use app::{App, run};
