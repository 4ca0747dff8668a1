//! Terminal front end hosting the form controller.

pub mod clipboard;
pub mod session;
pub mod view;

pub use clipboard::SystemClipboard;
pub use session::run;
pub use view::TerminalView;
