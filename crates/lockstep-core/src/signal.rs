//! Outbound "installed packages changed" signal

/// Receives the parameterless refresh signal.
///
/// Emitted whenever an entity's observed view changes or an action resolves
/// against a changed view. Listeners re-query status to find out what.
pub trait ChangeNotifier {
    fn installed_packages_changed(&self);
}

impl<F: Fn()> ChangeNotifier for F {
    fn installed_packages_changed(&self) {
        self()
    }
}

/// Notifier that only logs the signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl ChangeNotifier for LogNotifier {
    fn installed_packages_changed(&self) {
        tracing::info!("Installed packages changed");
    }
}
