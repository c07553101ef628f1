use kemblog_client::memory::Operation;
use kemblog_client::state::{
    CREATED_TEXT, CREATE_HEADING, CREATE_SAVE_LABEL, DELETE_PROMPT, EDIT_HEADING, EMPTY_TEXT,
    FETCH_FAILED_TEXT, UPDATED_TEXT,
};
use kemblog_client::{
    AdminError, AdminService, AdminSession, DeleteOutcome, Draft, FormView, ImageFile, ListView,
    MemoryBackend, PostId, Thumbnail, Ui,
};
use std::cell::{Cell, RefCell};

#[derive(Default)]
struct RecordingUi {
    alerts: RefCell<Vec<String>>,
    prompts: RefCell<Vec<String>>,
    renders: RefCell<Vec<ListView>>,
    forms: RefCell<Vec<FormView>>,
    decline: Cell<bool>,
}

impl RecordingUi {
    fn last_render(&self) -> ListView {
        self.renders.borrow().last().cloned().expect("nothing rendered")
    }

    fn last_alert(&self) -> Option<String> {
        self.alerts.borrow().last().cloned()
    }

    fn rendered_titles(&self) -> Vec<String> {
        self.last_render()
            .cards
            .into_iter()
            .map(|card| card.title)
            .collect()
    }
}

impl Ui for RecordingUi {
    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        self.prompts.borrow_mut().push(message.to_string());
        !self.decline.get()
    }

    fn render(&self, view: &ListView) {
        self.renders.borrow_mut().push(view.clone());
    }

    fn show_form(&self, form: &FormView) {
        self.forms.borrow_mut().push(form.clone());
    }
}

type Session = AdminSession<MemoryBackend, MemoryBackend, RecordingUi>;

fn session(backend: &MemoryBackend) -> Session {
    AdminSession::new(
        AdminService::new(backend.clone(), backend.clone()),
        RecordingUi::default(),
    )
}

#[tokio::test]
async fn create_adds_exactly_one_post_after_refetch() {
    let backend = MemoryBackend::new();
    backend.seed("Existing", "<p>old</p>", None);
    let mut session = session(&backend);
    session.load().await;

    session
        .save(Draft::new("Fresh", "<p>new</p>"))
        .await
        .expect("save should succeed");

    assert_eq!(session.ui().rendered_titles(), vec!["Fresh", "Existing"]);
    assert_eq!(session.ui().last_alert().as_deref(), Some(CREATED_TEXT));
    assert_eq!(backend.call_count(Operation::Insert), 1);
    assert_eq!(backend.call_count(Operation::Select), 2);

    let form = session.ui().forms.borrow().last().cloned().unwrap();
    assert_eq!(form.heading, CREATE_HEADING);
    assert!(form.title.is_empty() && form.content.is_empty());
}

#[tokio::test]
async fn hello_world_renders_world_excerpt() {
    let backend = MemoryBackend::new();
    let mut session = session(&backend);
    session.load().await;

    session
        .save(Draft::new("Hello", "<p>World</p>"))
        .await
        .unwrap();

    let view = session.ui().last_render();
    assert_eq!(view.cards.len(), 1);
    assert_eq!(view.cards[0].title, "Hello");
    assert_eq!(view.cards[0].excerpt, "World...");
    assert_eq!(view.cards[0].thumbnail, Thumbnail::Placeholder);
    assert_eq!(view.placeholder, None);
}

#[tokio::test]
async fn edit_then_save_changes_title_and_keeps_image() {
    let backend = MemoryBackend::new();
    let id = backend.seed("Before", "<p>body</p>", Some("memory://blog-images/a.png"));
    let mut session = session(&backend);
    session.load().await;

    session.edit(&PostId::new(id.as_str())).unwrap();
    let form = session.ui().forms.borrow().last().cloned().unwrap();
    assert_eq!(form.heading, EDIT_HEADING);
    assert_eq!(form.title, "Before");

    session
        .save(Draft::new("After", form.content))
        .await
        .unwrap();

    let row = backend.row(&id).unwrap();
    assert_eq!(row.title, "After");
    assert_eq!(row.main_image_url.as_deref(), Some("memory://blog-images/a.png"));
    assert_eq!(backend.call_count(Operation::Insert), 0);
    assert_eq!(session.ui().last_alert().as_deref(), Some(UPDATED_TEXT));
    assert!(!session.state().form().is_editing());
    assert_eq!(session.ui().rendered_titles(), vec!["After"]);
}

#[tokio::test]
async fn edit_with_new_image_replaces_url() {
    let backend = MemoryBackend::new();
    let id = backend.seed("Post", "<p>body</p>", Some("memory://blog-images/old.png"));
    let mut session = session(&backend);
    session.load().await;
    session.edit(&id).unwrap();

    let draft = Draft::new("Post", "<p>body</p>")
        .with_image(ImageFile::new("new.png", vec![9]).with_content_type("image/png"));
    session.save(draft).await.unwrap();

    let url = backend.row(&id).unwrap().main_image_url.unwrap();
    assert!(url.starts_with("memory://blog-images/"));
    assert!(url.ends_with("-new.png"));
    match &session.ui().last_render().cards[0].thumbnail {
        Thumbnail::Image(rendered) => assert_eq!(rendered, &url),
        other => panic!("expected image thumbnail, got {:?}", other),
    }
}

#[tokio::test]
async fn failed_upload_during_edit_silently_keeps_old_image() {
    let backend = MemoryBackend::new();
    let id = backend.seed("Post", "<p>body</p>", Some("memory://blog-images/old.png"));
    backend.fail(Operation::Upload);
    let mut session = session(&backend);
    session.load().await;
    session.edit(&id).unwrap();

    let draft = Draft::new("Renamed", "<p>body</p>").with_image(ImageFile::new("new.png", vec![9]));
    session.save(draft).await.unwrap();

    let row = backend.row(&id).unwrap();
    assert_eq!(row.title, "Renamed");
    assert_eq!(row.main_image_url.as_deref(), Some("memory://blog-images/old.png"));
    assert_eq!(session.ui().last_alert().as_deref(), Some(UPDATED_TEXT));
}

#[tokio::test]
async fn blank_title_or_content_makes_no_backend_calls() {
    let backend = MemoryBackend::new();
    backend.seed("Existing", "<p>x</p>", None);
    let mut session = session(&backend);

    for draft in [Draft::new("", "<p>x</p>"), Draft::new("Title", "   ")] {
        let err = session.save(draft).await.unwrap_err();
        assert!(matches!(err, AdminError::Validation));
    }

    assert!(backend.calls().is_empty());
    assert_eq!(backend.rows().len(), 1);
    assert_eq!(
        session.ui().last_alert().as_deref(),
        Some("Please enter a title and content for the post")
    );
}

#[tokio::test]
async fn failed_insert_alerts_and_keeps_form() {
    let backend = MemoryBackend::new();
    backend.fail(Operation::Insert);
    let mut session = session(&backend);
    session.load().await;

    let err = session
        .save(Draft::new("Title", "<p>x</p>"))
        .await
        .unwrap_err();

    assert!(matches!(err, AdminError::Save(_)));
    assert_eq!(
        session.ui().last_alert().as_deref(),
        Some("An error occurred while saving the post")
    );
    assert!(session.ui().forms.borrow().is_empty());
    assert_eq!(backend.call_count(Operation::Select), 1);
}

#[tokio::test]
async fn failed_update_stays_in_edit_mode() {
    let backend = MemoryBackend::new();
    let id = backend.seed("Post", "<p>x</p>", None);
    backend.fail(Operation::Update);
    let mut session = session(&backend);
    session.load().await;
    session.edit(&id).unwrap();

    assert!(session.save(Draft::new("New", "<p>x</p>")).await.is_err());

    assert_eq!(session.state().form().editing_post_id(), Some(&id));
    assert_eq!(backend.row(&id).unwrap().title, "Post");
}

#[tokio::test]
async fn editing_unknown_post_alerts_and_stays_in_create_mode() {
    let backend = MemoryBackend::new();
    backend.seed("Post", "<p>x</p>", None);
    let mut session = session(&backend);
    session.load().await;

    let err = session.edit(&PostId::new("404")).unwrap_err();

    assert!(matches!(err, AdminError::PostNotFound(_)));
    assert_eq!(session.ui().last_alert().as_deref(), Some("Post not found"));
    assert!(!session.state().form().is_editing());
}

#[tokio::test]
async fn cancel_edit_restores_blank_create_form_without_backend_calls() {
    let backend = MemoryBackend::new();
    let id = backend.seed("Draft", "<p>keep me</p>", None);
    let mut session = session(&backend);
    session.load().await;
    session.edit(&id).unwrap();

    session.cancel_edit();

    let form = session.ui().forms.borrow().last().cloned().unwrap();
    assert_eq!(form.heading, CREATE_HEADING);
    assert_eq!(form.save_label, CREATE_SAVE_LABEL);
    assert!(form.title.is_empty());
    assert!(form.content.is_empty());
    assert!(!session.state().form().is_editing());
    assert_eq!(backend.call_count(Operation::Update), 0);
    assert_eq!(backend.row(&id).unwrap().title, "Draft");
}

#[tokio::test]
async fn confirmed_delete_removes_only_the_target() {
    let backend = MemoryBackend::new();
    backend.seed("one", "<p>1</p>", None);
    let two = backend.seed("two", "<p>2</p>", None);
    backend.seed("three", "<p>3</p>", None);
    let mut session = session(&backend);
    session.load().await;

    let outcome = session.delete(&PostId::new(two.as_str())).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted { removed: true });
    assert_eq!(session.ui().rendered_titles(), vec!["three", "one"]);
    assert_eq!(*session.ui().prompts.borrow(), vec![DELETE_PROMPT.to_string()]);
    // Local patch, no refetch.
    assert_eq!(backend.call_count(Operation::Select), 1);
}

#[tokio::test]
async fn declined_delete_changes_nothing() {
    let backend = MemoryBackend::new();
    let id = backend.seed("one", "<p>1</p>", None);
    let mut session = session(&backend);
    session.load().await;
    session.ui().decline.set(true);
    let renders_before = session.ui().renders.borrow().len();

    let outcome = session.delete(&id).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(backend.call_count(Operation::Delete), 0);
    assert_eq!(backend.rows().len(), 1);
    assert_eq!(session.ui().renders.borrow().len(), renders_before);
}

#[tokio::test]
async fn deleting_uncached_id_leaves_rendered_list_unchanged() {
    let backend = MemoryBackend::new();
    backend.seed("one", "<p>1</p>", None);
    backend.seed("two", "<p>2</p>", None);
    let mut session = session(&backend);
    session.load().await;
    let before = session.ui().last_render();

    let outcome = session.delete(&PostId::new("999")).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted { removed: false });
    assert_eq!(session.ui().last_render(), before);
}

#[tokio::test]
async fn failed_delete_keeps_cache() {
    let backend = MemoryBackend::new();
    let id = backend.seed("one", "<p>1</p>", None);
    backend.fail(Operation::Delete);
    let mut session = session(&backend);
    session.load().await;

    assert!(session.delete(&id).await.is_err());

    assert_eq!(session.state().posts().len(), 1);
    assert_eq!(
        session.ui().last_alert().as_deref(),
        Some("An error occurred while deleting the post")
    );
}

#[tokio::test]
async fn zero_rows_show_empty_placeholder() {
    let backend = MemoryBackend::new();
    let mut session = session(&backend);

    session.load().await;

    let view = session.ui().last_render();
    assert!(view.cards.is_empty());
    assert_eq!(view.placeholder, Some(EMPTY_TEXT));
}

#[tokio::test]
async fn fetch_failure_shows_error_placeholder_without_alert() {
    let backend = MemoryBackend::new();
    backend.seed("one", "<p>1</p>", None);
    let mut session = session(&backend);
    session.load().await;

    backend.fail(Operation::Select);
    session.load().await;

    let view = session.ui().last_render();
    assert!(view.cards.is_empty());
    assert_eq!(view.placeholder, Some(FETCH_FAILED_TEXT));
    assert!(session.state().posts().is_empty());
    assert!(session.ui().alerts.borrow().is_empty());
}

#[tokio::test]
async fn search_filters_rendered_cards() {
    let backend = MemoryBackend::new();
    backend.seed("Rust tips", "<p>borrowing</p>", None);
    backend.seed("Cooking", "<p>pasta</p>", None);
    let mut session = session(&backend);
    session.load().await;

    session.set_query("BORROW");
    assert_eq!(session.ui().rendered_titles(), vec!["Rust tips"]);

    session.set_query("");
    assert_eq!(session.ui().rendered_titles(), vec!["Cooking", "Rust tips"]);
}
