use crate::api;
use kemblog_client::render::NO_IMAGE_TEXT;
use kemblog_client::state::DELETE_PROMPT;
use kemblog_client::{
    AdminError, AdminState, BackendError, Draft, FormView, Post, PostCard, PostId,
    RestAdminService, SaveOutcome, Thumbnail,
};
use wasm_bindgen_futures::spawn_local;
use web_sys::{File, HtmlElement, HtmlInputElement};
use yew::prelude::*;

pub enum Msg {
    // Form messages
    UpdatePostTitle(String),
    UpdateSearch(String),
    SavePost,
    PostSaved(Result<SaveOutcome, AdminError>, &'static str),
    EditPost(PostId),
    CancelEdit,

    // Post list messages
    LoadPosts,
    PostsLoaded(Result<Vec<Post>, BackendError>),
    DeletePost(PostId),
    PostDeleted(PostId, Result<(), AdminError>),
}

pub struct App {
    state: AdminState,
    // Ошибка подключения хранится, чтобы сообщать о ней при каждом действии
    service: Result<RestAdminService, String>,

    // Form
    post_title: String,
    search: String,
    saving: bool,
    editor_ref: NodeRef,
    image_ref: NodeRef,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let app = Self::with_connection(api::connect());
        if app.service.is_ok() {
            ctx.link().send_message(Msg::LoadPosts);
        }
        app
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::UpdatePostTitle(val) => {
                self.post_title = val;
                true
            }
            Msg::UpdateSearch(val) => {
                self.search = val;
                true
            }

            Msg::LoadPosts => {
                let Some(service) = self.connected() else {
                    return false;
                };
                let link = ctx.link().clone();

                spawn_local(async move {
                    let result = service.fetch().await;
                    link.send_message(Msg::PostsLoaded(result));
                });

                false
            }

            Msg::PostsLoaded(result) => {
                self.state.apply_fetch(result);
                true
            }

            Msg::SavePost => {
                if self.saving {
                    return false;
                }

                let draft = Draft::new(self.post_title.clone(), self.editor_html());
                let mut plan = match self.state.prepare_save(draft) {
                    Ok(plan) => plan,
                    Err(e) => {
                        log::warn!("Save rejected: {}", e);
                        api::alert(e.user_message());
                        return false;
                    }
                };
                let Some(service) = self.connected() else {
                    return false;
                };

                self.saving = true;
                let file = self.selected_file();
                let link = ctx.link().clone();

                spawn_local(async move {
                    // Непрочитанный файл = поста без картинки
                    if let Some(file) = file {
                        match api::read_file(file).await {
                            Ok(image) => plan.image = Some(image),
                            Err(e) => log::error!("{}", e),
                        }
                    }
                    let success_message = plan.success_message();
                    let result = service.save(plan).await;
                    link.send_message(Msg::PostSaved(result, success_message));
                });

                true
            }

            Msg::PostSaved(result, success_message) => {
                self.saving = false;
                match result {
                    Ok(_) => {
                        api::alert(success_message);
                        self.reset_form();
                        ctx.link().send_message(Msg::LoadPosts);
                    }
                    Err(e) => {
                        log::error!("{}", e);
                        api::alert(e.user_message());
                    }
                }
                true
            }

            // Форма занята сохранением
            Msg::EditPost(_) if !self.edit_enabled() => false,

            Msg::EditPost(id) => match self.state.enter_edit(&id) {
                Ok(form) => {
                    self.fill_form(&form);
                    true
                }
                Err(e) => {
                    log::warn!("{}", e);
                    api::alert(e.user_message());
                    false
                }
            },

            Msg::CancelEdit => {
                self.reset_form();
                true
            }

            Msg::DeletePost(id) => {
                let Some(service) = self.connected() else {
                    return false;
                };
                if !api::confirm(DELETE_PROMPT) {
                    return false;
                }
                let link = ctx.link().clone();

                spawn_local(async move {
                    let result = service.delete(&id).await;
                    link.send_message(Msg::PostDeleted(id, result));
                });

                false
            }

            Msg::PostDeleted(id, result) => match result {
                Ok(()) => {
                    // Локально, без повторной загрузки
                    self.state.remove_post(&id);
                    true
                }
                Err(e) => {
                    log::error!("{}", e);
                    api::alert(e.user_message());
                    false
                }
            },
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                <h1>{ "Blog Admin" }</h1>

                { self.view_editor(ctx) }

                { self.view_posts_section(ctx) }
            </div>
        }
    }
}

impl App {
    fn with_connection(connection: Result<RestAdminService, BackendError>) -> Self {
        let mut state = AdminState::new();
        let service = connection.map_err(|e| {
            let reason = format!("Backend is not configured: {}", e);
            state.apply_fetch(Err(e));
            reason
        });

        Self {
            state,
            service,
            post_title: String::new(),
            search: String::new(),
            saving: false,
            editor_ref: NodeRef::default(),
            image_ref: NodeRef::default(),
        }
    }

    fn connected(&self) -> Option<RestAdminService> {
        match &self.service {
            Ok(service) => Some(service.clone()),
            Err(reason) => {
                log::error!("{}", reason);
                api::alert(reason);
                None
            }
        }
    }

    // Пока идёт сохранение, форму нельзя перезаполнить
    fn edit_enabled(&self) -> bool {
        !self.saving
    }

    fn editor_html(&self) -> String {
        self.editor_ref
            .cast::<HtmlElement>()
            .map(|editor| editor.inner_html())
            .unwrap_or_default()
    }

    fn selected_file(&self) -> Option<File> {
        self.image_ref
            .cast::<HtmlInputElement>()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
    }

    fn fill_form(&mut self, form: &FormView) {
        self.post_title = form.title.clone();
        if let Some(editor) = self.editor_ref.cast::<HtmlElement>() {
            editor.set_inner_html(&form.content);
        }
    }

    fn reset_form(&mut self) {
        let form = self.state.reset_form();
        self.fill_form(&form);
        if let Some(input) = self.image_ref.cast::<HtmlInputElement>() {
            input.set_value("");
        }
    }

    fn view_editor(&self, ctx: &Context<Self>) -> Html {
        let form = self.state.form();

        html! {
            <div class="post-editor">
                <h3 id="editorTitle">{ form.heading() }</h3>
                <input
                    id="postTitle"
                    type="text"
                    placeholder="Title"
                    value={self.post_title.clone()}
                    oninput={ctx.link().callback(|e: InputEvent| {
                        let input: HtmlInputElement = e.target_unchecked_into();
                        Msg::UpdatePostTitle(input.value())
                    })}
                />
                <input
                    id="mainImageInput"
                    type="file"
                    accept="image/*"
                    ref={self.image_ref.clone()}
                />
                <div
                    id="editor"
                    class="editor"
                    contenteditable="true"
                    ref={self.editor_ref.clone()}
                ></div>
                <div class="editor-actions">
                    <button
                        id="saveBtn"
                        disabled={self.saving}
                        onclick={ctx.link().callback(|_| Msg::SavePost)}
                    >
                        { form.save_label() }
                    </button>
                    if form.is_editing() {
                        <button onclick={ctx.link().callback(|_| Msg::CancelEdit)}>
                            { "Cancel" }
                        </button>
                    }
                </div>
            </div>
        }
    }

    fn view_posts_section(&self, ctx: &Context<Self>) -> Html {
        let view = self.state.list_view(&self.search);
        let placeholder = match view.placeholder {
            Some(text) => html! { <p id="noPosts" class="no-posts">{ text }</p> },
            None => html! {},
        };

        html! {
            <div class="posts-section">
                <h2>{ "Posts" }</h2>
                <input
                    type="search"
                    placeholder="Search posts"
                    value={self.search.clone()}
                    oninput={ctx.link().callback(|e: InputEvent| {
                        let input: HtmlInputElement = e.target_unchecked_into();
                        Msg::UpdateSearch(input.value())
                    })}
                />
                <button onclick={ctx.link().callback(|_| Msg::LoadPosts)}>
                    { "Refresh Posts" }
                </button>

                { placeholder }

                <div id="postsContainer" class="posts-list">
                    { for view.cards.iter().map(|card| self.view_post(card, ctx)) }
                </div>
            </div>
        }
    }

    fn view_post(&self, card: &PostCard, ctx: &Context<Self>) -> Html {
        let edit_callback = {
            let id = card.id.clone();
            ctx.link().callback(move |_| Msg::EditPost(id.clone()))
        };
        let delete_callback = {
            let id = card.id.clone();
            ctx.link().callback(move |_| Msg::DeletePost(id.clone()))
        };

        let thumbnail = match &card.thumbnail {
            Thumbnail::Image(url) => html! {
                <img src={url.clone()} alt={card.title.clone()} />
            },
            Thumbnail::Placeholder => html! { <div>{ NO_IMAGE_TEXT }</div> },
        };

        html! {
            <div class="post-card" key={card.id.to_string()} data-id={card.id.to_string()}>
                <div class="post-thumb">
                    { thumbnail }
                </div>
                <div class="post-meta">
                    <h4>{ card.title.clone() }</h4>
                    <p>{ card.excerpt.clone() }</p>
                    <div class="post-actions">
                        <button class="edit-btn" disabled={!self.edit_enabled()} onclick={edit_callback}>
                            { "✏ Edit" }
                        </button>
                        <button class="delete-btn" onclick={delete_callback}>
                            { "🗑 Delete" }
                        </button>
                    </div>
                </div>
            </div>
        }
    }
}
