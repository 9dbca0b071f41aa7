use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::api::{ActionReply, ApiEnvelope, ClientOptions, HttpApi, TargetApi};
use crate::board::fallback::sample_targets;
use crate::board::filter::FilterCriteria;
use crate::board::model::Target;
use crate::board::store::{
    DataSource, LoadOutcome, MutationKind, MutationState, NoticeLevel, TargetStore,
};
use crate::board::validate::{NewTargetRequest, TargetForm};
use crate::effects::{NoEffects, ParticleEffects, BURST_SIZE};
use crate::error::{BoardError, ValidationError};
use crate::output::report::{RenderOptions, REMOVING_CLASS};
use crate::prompt::{AssumeYes, Confirm};

/// In-memory board server with scripted replies and call counters.
#[derive(Default)]
struct MockApi {
    lists: Mutex<VecDeque<Result<Vec<Target>, BoardError>>>,
    actions: Mutex<VecDeque<Result<ActionReply, BoardError>>>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    complete_calls: AtomicUsize,
    image_calls: AtomicUsize,
}

impl MockApi {
    fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push_list(&self, reply: Result<Vec<Target>, BoardError>) {
        self.lists.lock().unwrap().push_back(reply);
    }

    fn push_action(&self, reply: Result<ActionReply, BoardError>) {
        self.actions.lock().unwrap().push_back(reply);
    }

    fn next_action(&self) -> Result<ActionReply, BoardError> {
        self.actions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ActionReply::default()))
    }
}

#[async_trait]
impl TargetApi for Arc<MockApi> {
    async fn list_targets(&self, status: &str) -> Result<Vec<Target>, BoardError> {
        assert_eq!(status, "active");
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn create_target(&self, _request: &NewTargetRequest) -> Result<ActionReply, BoardError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.next_action()
    }

    async fn delete_target(&self, _id: u64) -> Result<ActionReply, BoardError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.next_action()
    }

    async fn complete_target(&self, _id: u64) -> Result<ActionReply, BoardError> {
        self.complete_calls.fetch_add(1, Ordering::SeqCst);
        self.next_action()
    }

    async fn delete_image(&self, _filename: &str) -> Result<ActionReply, BoardError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.next_action()
    }
}

struct Refuse;

impl Confirm for Refuse {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

fn unreachable_server() -> BoardError {
    BoardError::Decode {
        status: 502,
        source: serde_json::from_str::<serde_json::Value>("<html>Bad Gateway</html>").unwrap_err(),
    }
}

fn rejected(message: &str) -> BoardError {
    BoardError::Application {
        message: Some(message.to_string()),
    }
}

fn valid_form() -> TargetForm {
    TargetForm {
        nickname: "Griefer".to_string(),
        gamemode: "survival".to_string(),
        server: "play.example.net".to_string(),
        priority: "high".to_string(),
        tags: "grief, toxic".to_string(),
        reason: "Destroyed spawn".to_string(),
        description: String::new(),
    }
}

fn names(view: &[Target]) -> Vec<&str> {
    view.iter().map(|t| t.nickname.as_str()).collect()
}

#[tokio::test]
async fn overlong_nickname_never_reaches_the_server() {
    let api = MockApi::shared();
    let mut store = TargetStore::new(api.clone(), AssumeYes, NoEffects);
    let form = TargetForm {
        nickname: "x".repeat(21),
        ..valid_form()
    };
    let err = store.create(&form).await.unwrap_err();
    assert!(matches!(
        err,
        BoardError::Validation(ValidationError::TooLong {
            field: "nickname",
            max: 20,
            actual: 21
        })
    ));
    assert_eq!(api.create_calls.load(Ordering::SeqCst), 0);
    let notices = store.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn failed_load_falls_back_to_sample_records() {
    let api = MockApi::shared();
    api.push_list(Err(unreachable_server()));
    let mut store = TargetStore::new(api.clone(), AssumeYes, NoEffects);

    assert_eq!(store.load().await, LoadOutcome::Fallback);
    assert_eq!(store.source(), DataSource::Fallback);
    assert_eq!(store.view().len(), 3);
    let stats = store.statistics();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.active + stats.completed, 3);
    assert!(!store.is_loading());
    assert_eq!(store.take_notices()[0].level, NoticeLevel::Info);

    store.apply_filters(FilterCriteria {
        priority: Some("critical".to_string()),
        ..FilterCriteria::default()
    });
    assert_eq!(names(store.view()), vec!["SpeedHacker"]);

    store.apply_filters(FilterCriteria {
        search: Some("toxic".to_string()),
        ..FilterCriteria::default()
    });
    assert_eq!(names(store.view()), vec!["ToxicPlayer99"]);
}

#[tokio::test]
async fn failed_load_without_fallback_keeps_previous_collection() {
    let api = MockApi::shared();
    api.push_list(Ok(sample_targets(Utc::now())));
    api.push_list(Err(rejected("maintenance")));
    let mut store = TargetStore::new(api.clone(), AssumeYes, NoEffects).with_fallback(false);

    assert_eq!(store.load().await, LoadOutcome::Live(3));
    assert_eq!(store.load().await, LoadOutcome::Failed);
    assert_eq!(store.source(), DataSource::Live);
    assert_eq!(store.targets().len(), 3);
    let notices = store.take_notices();
    assert_eq!(notices.last().unwrap().message, "Error: maintenance");
}

#[tokio::test]
async fn filtering_is_idempotent_and_sorted() {
    let api = MockApi::shared();
    api.push_list(Ok(sample_targets(Utc::now())));
    let mut store = TargetStore::new(api, AssumeYes, NoEffects);
    store.load().await;

    assert_eq!(
        names(store.view()),
        vec!["SpeedHacker", "TestPlayer1", "ToxicPlayer99"]
    );

    let criteria = FilterCriteria {
        tags: Some("cheat".to_string()),
        ..FilterCriteria::default()
    };
    let first = store.apply_filters(criteria.clone()).to_vec();
    let second = store.apply_filters(criteria).to_vec();
    assert_eq!(first, second);
    assert_eq!(names(&first), vec!["SpeedHacker", "TestPlayer1"]);
    assert_eq!(store.targets().len(), 3);
}

#[tokio::test]
async fn stale_load_response_is_discarded() {
    let api = MockApi::shared();
    let mut store = TargetStore::new(api, AssumeYes, NoEffects);
    let now = Utc::now();

    let first = store.begin_load();
    let second = store.begin_load();

    let newest = sample_targets(now)[..1].to_vec();
    assert_eq!(store.finish_load(second, Ok(newest.clone())), LoadOutcome::Live(1));
    assert_eq!(
        store.finish_load(first, Ok(sample_targets(now))),
        LoadOutcome::Stale
    );
    assert_eq!(store.targets(), newest.as_slice());

    // An older failure cannot trigger the fallback either.
    let older = store.begin_load();
    let newer = store.begin_load();
    assert_eq!(store.finish_load(older, Err(unreachable_server())), LoadOutcome::Stale);
    assert!(store.is_loading());
    assert_eq!(store.finish_load(newer, Ok(Vec::new())), LoadOutcome::Live(0));
    assert_eq!(store.source(), DataSource::Live);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn failed_removal_reverts_without_reload() {
    let api = MockApi::shared();
    api.push_list(Ok(sample_targets(Utc::now())));
    api.push_action(Err(rejected("denied")));
    let mut store = TargetStore::new(api.clone(), AssumeYes, ParticleEffects::seeded(5));
    store.load().await;
    store.take_notices();

    let err = store.remove(2).await.unwrap_err();
    assert!(matches!(err, BoardError::Application { .. }));
    assert_eq!(store.mutation(2).map(|m| m.state), Some(MutationState::Reverted));
    assert!(store.pending_ids().is_empty());
    assert_eq!(store.effects().removing(), &[2]);
    assert_eq!(api.delete_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.targets().len(), 3);

    let notices = store.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Error: denied");
}

#[tokio::test]
async fn confirmed_completion_reloads_and_bursts() {
    let api = MockApi::shared();
    let now = Utc::now();
    api.push_list(Ok(sample_targets(now)));
    api.push_action(Ok(ActionReply { message: None }));
    api.push_list(Ok(sample_targets(now)[1..].to_vec()));
    let mut store = TargetStore::new(api.clone(), AssumeYes, ParticleEffects::seeded(9));
    store.load().await;
    store.take_notices();

    assert_eq!(store.complete(1).await.unwrap(), MutationState::Confirmed);
    assert_eq!(api.complete_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
    assert_eq!(names(store.view()), vec!["SpeedHacker", "ToxicPlayer99"]);
    // The reload supersedes the resolved marker.
    assert_eq!(store.mutation(1), None);
    assert_eq!(store.effects().last_burst().len(), BURST_SIZE);
    assert!(store.effects().removing().is_empty());

    let notices = store.take_notices();
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(notices[0].message, "Target marked as completed!");
}

#[tokio::test]
async fn declined_confirmation_sends_nothing() {
    let api = MockApi::shared();
    let mut store = TargetStore::new(api.clone(), Refuse, NoEffects);

    assert!(matches!(store.remove(3).await, Err(BoardError::Declined)));
    assert!(matches!(store.complete(3).await, Err(BoardError::Declined)));
    assert_eq!(api.delete_calls.load(Ordering::SeqCst), 0);
    assert_eq!(api.complete_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.mutation(3), None);
    assert!(store.take_notices().is_empty());
}

#[tokio::test]
async fn pending_card_renders_as_removing_until_settled() {
    let api = MockApi::shared();
    api.push_list(Ok(sample_targets(Utc::now())));
    let mut store = TargetStore::new(api, AssumeYes, NoEffects);
    store.load().await;
    let options = RenderOptions { is_admin: true };

    assert!(!store.render(&options).contains(REMOVING_CLASS));

    let ticket = store.begin_mutation(2, MutationKind::Remove).unwrap();
    let html = store.render(&options);
    assert_eq!(html.matches(REMOVING_CLASS).count(), 1);
    assert!(html.contains(&format!("{REMOVING_CLASS}\" data-priority=\"medium\" data-target-id=\"2\"")));

    let state = store.finish_mutation(ticket, &Err(unreachable_server()));
    assert_eq!(state, MutationState::Reverted);
    assert!(!store.render(&options).contains(REMOVING_CLASS));
    assert_eq!(
        store.take_notices()[0].message,
        "Failed to delete target"
    );
}

#[tokio::test]
async fn successful_create_notifies_and_reloads() {
    let api = MockApi::shared();
    api.push_action(Ok(ActionReply {
        message: Some("Target added to the list".to_string()),
    }));
    api.push_list(Ok(sample_targets(Utc::now())));
    let mut store = TargetStore::new(api.clone(), AssumeYes, ParticleEffects::seeded(2));

    store.create(&valid_form()).await.unwrap();
    assert_eq!(api.create_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.view().len(), 3);
    assert_eq!(store.effects().last_burst().len(), BURST_SIZE);
    assert_eq!(store.take_notices()[0].message, "Target added to the list");
}

#[tokio::test]
async fn rejected_create_surfaces_server_message() {
    let api = MockApi::shared();
    api.push_action(Err(rejected("Target already exists")));
    let mut store = TargetStore::new(api.clone(), AssumeYes, NoEffects);

    assert!(store.create(&valid_form()).await.is_err());
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        store.take_notices()[0].message,
        "Error: Target already exists"
    );

    api.push_action(Err(unreachable_server()));
    assert!(store.create(&valid_form()).await.is_err());
    assert_eq!(store.take_notices()[0].message, "Failed to add target");
}

#[tokio::test]
async fn gallery_delete_checks_name_and_confirmation() {
    let api = MockApi::shared();

    let err = crate::gallery::delete_image(&api, &AssumeYes, "../secret.png")
        .await
        .unwrap_err();
    assert!(matches!(err, BoardError::Validation(_)));
    let err = crate::gallery::delete_image(&api, &Refuse, "cat.png")
        .await
        .unwrap_err();
    assert!(matches!(err, BoardError::Declined));
    assert_eq!(api.image_calls.load(Ordering::SeqCst), 0);

    let notice = crate::gallery::delete_image(&api, &AssumeYes, "cat.png")
        .await
        .unwrap();
    assert_eq!(notice.message, crate::gallery::DELETED_MESSAGE);

    api.push_action(Err(BoardError::Application { message: None }));
    let err = crate::gallery::delete_image(&api, &AssumeYes, "cat.png")
        .await
        .unwrap_err();
    assert_eq!(crate::gallery::failure_message(&err), "Failed to delete image.");
    assert_eq!(api.image_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn server_list_payload_decodes() {
    let body = r#"{
        "success": true,
        "targets": [{
            "id": 7,
            "nickname": "Blocky",
            "server": "mc.example.org",
            "gamemode": "skywars",
            "reason": "xray",
            "description": null,
            "priority": "critical",
            "tags": ["xray"],
            "status": "active",
            "added_by": "Mod",
            "date_added": "2024-05-01T10:15:00.123456",
            "last_updated": "2024-05-02T08:00:00",
            "date_completed": null,
            "reactions": {"fragged": 2, "killed": 1},
            "total_reactions": 3
        }]
    }"#;
    let env: ApiEnvelope = serde_json::from_str(body).unwrap();
    let targets = env.into_targets().unwrap();
    assert_eq!(targets.len(), 1);
    let t = &targets[0];
    assert_eq!(t.id, 7);
    assert_eq!(t.priority.rank(), 4);
    assert_eq!(t.description, None);
    assert_eq!(t.reactions.fragged, 2);
    assert_eq!(t.reactions.killed, 1);
    assert!(!t.is_bloodied());
    assert!(t.date_added.is_some());
    assert!(t.last_updated > t.date_added);
}

#[test]
fn one_bad_counter_keeps_the_live_list() {
    let body = r#"{"success": true, "targets": [
        {"id": 1, "nickname": "ok", "status": "active"},
        {"id": 2, "nickname": "bad", "status": "active", "likes": -1}
    ]}"#;
    let reply = serde_json::from_str::<ApiEnvelope>(body)
        .map_err(|source| BoardError::Decode { status: 200, source })
        .and_then(ApiEnvelope::into_targets);

    let mut store = TargetStore::new(MockApi::shared(), AssumeYes, NoEffects);
    let ticket = store.begin_load();
    assert_eq!(store.finish_load(ticket, reply), LoadOutcome::Live(2));
    assert_eq!(store.source(), DataSource::Live);
    assert_eq!(store.targets()[1].likes, 0);
}

#[tokio::test]
async fn refused_connection_falls_back_to_sample_records() {
    let api = HttpApi::new(&ClientOptions {
        base_url: "http://127.0.0.1:1/".to_string(),
        timeout_seconds: 2,
        ..ClientOptions::default()
    })
    .unwrap();
    assert!(matches!(
        api.list_targets("active").await,
        Err(BoardError::Transport { .. })
    ));

    let mut store = TargetStore::new(api, AssumeYes, NoEffects);
    assert_eq!(store.load().await, LoadOutcome::Fallback);
    assert_eq!(store.view().len(), 3);
    assert_eq!(store.statistics().total, 3);
}

#[tokio::test]
async fn confirmed_removal_plays_no_success_burst() {
    let api = MockApi::shared();
    let mut store = TargetStore::new(api.clone(), AssumeYes, ParticleEffects::seeded(4));

    assert_eq!(store.remove(3).await.unwrap(), MutationState::Confirmed);
    assert_eq!(store.effects().removing(), &[3]);
    assert!(store.effects().last_burst().is_empty());
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
}
