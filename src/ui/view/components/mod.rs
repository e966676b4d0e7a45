pub(super) mod build;
pub(super) mod console;

pub(super) use build::render_build_status;
pub(super) use console::render_console;
