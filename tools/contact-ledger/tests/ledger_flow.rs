use std::sync::{Arc, Mutex};

use chrono::{Duration, TimeZone, Utc};

use contact_ledger::{dispatch, FileScope};
use contact_ledger_common::export::parse_table;
use contact_ledger_common::handoff::{
    plan_handoffs, HandoffConfig, HandoffError, HandoffRequest, HandoffTarget, Opener,
};
use contact_ledger_common::store::{SUBMISSIONS_KEY, TRACKING_KEY};
use contact_ledger_common::{
    BadgeProjection, BadgeState, ContactMethod, ManualClock, StorageScope, SubmissionDraft,
    SubmissionStore,
};

fn draft(name: &str, message: &str, methods: Vec<ContactMethod>) -> SubmissionDraft {
    SubmissionDraft {
        name: name.into(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: Some("+91 98765 43210".into()),
        service: Some("Photo Retouching".into()),
        message: message.into(),
        contact_methods: methods,
    }
}

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 11, 3, 9, 0, 0).unwrap())
}

#[test]
fn history_survives_reopening_the_directory() {
    let tmp = tempfile::tempdir().unwrap();

    {
        let scope = FileScope::open(tmp.path()).unwrap();
        let store = SubmissionStore::new(&scope, clock());
        store.capture(draft("Asha", "first", vec![]));
        store.clock().advance(Duration::minutes(3));
        store.capture(draft("Ravi", "second, with commas", vec![ContactMethod::Whatsapp]));
    }

    let scope = FileScope::open(tmp.path()).unwrap();
    let store = SubmissionStore::new(&scope, clock());
    let names: Vec<_> = store.list().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["Ravi", "Asha"]);
    assert_eq!(BadgeProjection::new(&store).render(), BadgeState::Visible(2));
    assert_eq!(store.tracking_log().len(), 2);

    let rows = parse_table(&store.export_as_delimited_text());
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.len() == 8));
    assert_eq!(rows[1][5], "second, with commas");
}

#[test]
fn clear_deletes_both_files() {
    let tmp = tempfile::tempdir().unwrap();
    let scope = FileScope::open(tmp.path()).unwrap();
    let store = SubmissionStore::new(&scope, clock());
    store.capture(draft("Asha", "hi", vec![]));
    assert!(tmp.path().join("submissions.json").exists());
    assert!(tmp.path().join("browsingNetwork.json").exists());

    store.clear();
    assert_eq!(scope.get(SUBMISSIONS_KEY).unwrap(), None);
    assert_eq!(scope.get(TRACKING_KEY).unwrap(), None);
    assert_eq!(BadgeProjection::new(&store).render(), BadgeState::Hidden);
}

#[test]
fn hand_written_garbage_reads_as_empty() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("submissions.json"), "[{\"id\": 1").unwrap();
    let scope = FileScope::open(tmp.path()).unwrap();
    let store = SubmissionStore::new(&scope, clock());
    assert!(store.list().is_empty());
    assert_eq!(store.export_as_delimited_text().lines().count(), 1);
}

struct FailingMail {
    opened: Mutex<Vec<HandoffTarget>>,
}

impl Opener for FailingMail {
    fn open(&self, request: &HandoffRequest) -> Result<(), HandoffError> {
        if request.target == HandoffTarget::Email {
            return Err(HandoffError {
                target: "email",
                reason: "no mail client".into(),
            });
        }
        self.opened.lock().unwrap().push(request.target);
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn failed_handoff_leaves_submission_stored() {
    let tmp = tempfile::tempdir().unwrap();
    let scope = FileScope::open(tmp.path()).unwrap();
    let store = SubmissionStore::new(&scope, clock());

    let submission = store.capture(draft(
        "Asha",
        "hi",
        vec![ContactMethod::Instagram, ContactMethod::Telegram],
    ));
    let opener = Arc::new(FailingMail {
        opened: Mutex::new(Vec::new()),
    });
    let outcomes = dispatch(
        plan_handoffs(&submission, &HandoffConfig::default()),
        opener.clone(),
    )
    .join()
    .await;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].result.is_err());
    assert_eq!(
        *opener.opened.lock().unwrap(),
        vec![HandoffTarget::Instagram, HandoffTarget::Telegram]
    );
    assert_eq!(store.list(), vec![submission]);
}
