pub mod keyboard;

pub use keyboard::handle_key;
