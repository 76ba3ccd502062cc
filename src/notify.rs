use daybook_library::host::{Notice, Notifier};

/// Prints notices to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str, notice: Notice) {
        match notice {
            Notice::Timed => eprintln!("{message}"),
            Notice::Persistent => eprintln!("error: {message}"),
        }
    }
}
