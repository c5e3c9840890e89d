use std::sync::Arc;

use tracing::info;

use crate::errors::NotifyError;

/// delivers the agreement link to an investor once a loan is fully funded
pub trait Notifier: Send + Sync {
    fn notify(&self, investor_id: &str, agreement_link: &str) -> Result<(), NotifyError>;
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, investor_id: &str, agreement_link: &str) -> Result<(), NotifyError> {
        (**self).notify(investor_id, agreement_link)
    }
}

/// writes each notification to the tracing log instead of sending it
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, investor_id: &str, agreement_link: &str) -> Result<(), NotifyError> {
        info!(investor_id, agreement_link, "sent agreement link to investor");
        Ok(())
    }
}

/// drops every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _investor_id: &str, _agreement_link: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_notifiers_succeed() {
        assert!(LogNotifier.notify("INV001", "https://link.pdf").is_ok());
        assert!(NoopNotifier.notify("INV001", "").is_ok());
    }

    #[test]
    fn test_shared_notifier_delegates() {
        let shared: Arc<dyn Notifier> = Arc::new(LogNotifier);
        assert!(shared.notify("INV002", "").is_ok());
    }
}
