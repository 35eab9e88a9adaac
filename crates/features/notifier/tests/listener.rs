use slotbook_booking::{Registration, RegistrationAdmitted, SmtpSettings};
use slotbook_event_bus::EventBus;
use slotbook_notifier::{Confirmation, Mailer, Notifier, NotifierError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

struct Recording {
    sent: mpsc::UnboundedSender<(String, Confirmation)>,
    fail_first: AtomicUsize,
}

impl Mailer for Recording {
    async fn send(&self, smtp: &SmtpSettings, mail: Confirmation) -> Result<(), NotifierError> {
        if self.fail_first.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1)).is_ok() {
            return Err(NotifierError::Address {
                source: "broken".parse::<lettre::Address>().unwrap_err(),
                context: Some("simulated".into()),
            });
        }
        let _ = self.sent.send((smtp.host.clone(), mail));
        Ok(())
    }
}

fn mailer(fail_first: usize) -> (Recording, mpsc::UnboundedReceiver<(String, Confirmation)>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Recording { sent: tx, fail_first: AtomicUsize::new(fail_first) }, rx)
}

fn admitted(email: &str, smtp: Option<SmtpSettings>) -> RegistrationAdmitted {
    RegistrationAdmitted {
        record: Registration {
            timestamp: "2024-01-01T08:00:00.000Z".into(),
            name: "Ada".into(),
            college: "Analytical".into(),
            year: "2".into(),
            contact: "1111111111".into(),
            email: email.into(),
            food: "Veg".into(),
            date: "2024-01-01".into(),
            cohort: "Alpha".into(),
        },
        smtp,
    }
}

fn smtp() -> SmtpSettings {
    SmtpSettings {
        host: "mail.example.org".into(),
        port: 587,
        secure: false,
        user: "bot@example.org".into(),
        pass: "secret".into(),
        from: "bot@example.org".into(),
    }
}

#[tokio::test]
async fn sends_a_confirmation_per_admission() {
    let events = EventBus::new();
    let (mailer, mut sent) = mailer(0);
    let notifier = Notifier::start(&events, mailer).unwrap();
    assert!(notifier.is_running());

    assert_eq!(events.publish(admitted("ada@example.org", Some(smtp()))).unwrap(), 1);

    let (host, mail) = timeout(Duration::from_secs(5), sent.recv()).await.unwrap().unwrap();
    assert_eq!(host, "mail.example.org");
    assert_eq!(mail.to, "ada@example.org");
    assert_eq!(mail.subject, "Registration confirmed: 2024-01-01");
}

#[tokio::test]
async fn skips_when_mail_is_not_configured() {
    let events = EventBus::new();
    let (mailer, mut sent) = mailer(0);
    let _notifier = Notifier::start(&events, mailer).unwrap();

    events.publish(admitted("ada@example.org", None)).unwrap();
    assert!(timeout(Duration::from_millis(200), sent.recv()).await.is_err());
}

#[tokio::test]
async fn failures_do_not_stop_the_listener() {
    let events = EventBus::new();
    let (mailer, mut sent) = mailer(1);
    let notifier = Notifier::start(&events, mailer).unwrap();

    events.publish(admitted("first@example.org", Some(smtp()))).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    events.publish(admitted("second@example.org", Some(smtp()))).unwrap();

    let (_, mail) = timeout(Duration::from_secs(5), sent.recv()).await.unwrap().unwrap();
    assert_eq!(mail.to, "second@example.org");
    assert!(notifier.is_running());
}

#[tokio::test]
async fn listener_stops_when_the_bus_shuts_down() {
    let events = EventBus::new();
    let (mailer, _sent) = mailer(0);
    let notifier = Notifier::start(&events, mailer).unwrap();

    events.shutdown();
    timeout(Duration::from_secs(5), async {
        while notifier.is_running() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
}
