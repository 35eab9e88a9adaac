use crate::mail::{Confirmation, Mailer};
use slotbook_booking::RegistrationAdmitted;
use slotbook_event_bus::EventReceiverExt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Consumes admission events until the bus closes. Each delivery runs on its own task,
/// so a slow relay never holds up the next confirmation.
pub(crate) fn spawn<M: Mailer>(
    mut events: broadcast::Receiver<Arc<RegistrationAdmitted>>,
    mailer: Arc<M>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.next_event().await {
            tokio::spawn(deliver(Arc::clone(&mailer), event));
        }
        info!("Admission events closed, notifier stopped");
    })
}

async fn deliver<M: Mailer>(mailer: Arc<M>, event: Arc<RegistrationAdmitted>) {
    let Some(smtp) = event.smtp.as_ref() else {
        debug!(date = %event.record.date, "Mail not configured, skipping confirmation");
        return;
    };

    let mail = Confirmation::for_registration(&event.record);
    match mailer.send(smtp, mail).await {
        Ok(()) => info!(date = %event.record.date, cohort = %event.record.cohort, "Confirmation sent"),
        Err(err) => warn!(error = %err, "Confirmation not delivered"),
    }
}
