//! Drives the admin flows end to end against any user interface.
//!
//! A session owns the [`AdminState`], talks to the backend through an
//! [`AdminService`] and reports everything through a [`Ui`]. Errors are shown
//! to the user and logged here; the returned `Result`s only tell the caller
//! how the action ended.

use crate::backend::{StorageClient, TableClient};
use crate::error::AdminError;
use crate::models::PostId;
use crate::render::ListView;
use crate::service::{AdminService, SaveOutcome};
use crate::state::{AdminState, Draft, FormView, DELETE_PROMPT};

/// The surface the user sees.
pub trait Ui {
    /// Blocking notice.
    fn alert(&self, message: &str);
    /// Yes/no question; `false` aborts the action.
    fn confirm(&self, message: &str) -> bool;
    /// Replace the whole list area.
    fn render(&self, view: &ListView);
    /// Fill the form fields and labels.
    fn show_form(&self, form: &FormView);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    /// `removed` is false when the id was not in the loaded list.
    Deleted { removed: bool },
}

pub struct AdminSession<T, S, U> {
    service: AdminService<T, S>,
    state: AdminState,
    ui: U,
    query: String,
}

impl<T, S, U> AdminSession<T, S, U>
where
    T: TableClient,
    S: StorageClient,
    U: Ui,
{
    pub fn new(service: AdminService<T, S>, ui: U) -> Self {
        Self {
            service,
            state: AdminState::new(),
            ui,
            query: String::new(),
        }
    }

    /// Starts with a search query already applied.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn state(&self) -> &AdminState {
        &self.state
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn service(&self) -> &AdminService<T, S> {
        &self.service
    }

    pub fn render(&self) {
        self.ui.render(&self.state.list_view(&self.query));
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.render();
    }

    /// Re-fetches the whole list and redraws it. Failures end up in the
    /// placeholder, never in the caller.
    pub async fn load(&mut self) {
        let result = self.service.fetch().await;
        self.state.apply_fetch(result);
        self.render();
    }

    pub async fn save(&mut self, draft: Draft) -> Result<SaveOutcome, AdminError> {
        let plan = match self.state.prepare_save(draft) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!("Save rejected: {}", e);
                self.ui.alert(e.user_message());
                return Err(e);
            }
        };
        let success_message = plan.success_message();

        match self.service.save(plan).await {
            Ok(outcome) => {
                self.ui.alert(success_message);
                let form = self.state.reset_form();
                self.ui.show_form(&form);
                self.load().await;
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!("{}", e);
                self.ui.alert(e.user_message());
                Err(e)
            }
        }
    }

    pub fn edit(&mut self, id: &PostId) -> Result<(), AdminError> {
        match self.state.enter_edit(id) {
            Ok(form) => {
                self.ui.show_form(&form);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.ui.alert(e.user_message());
                Err(e)
            }
        }
    }

    /// Leaves create/edit mode without saving.
    pub fn cancel_edit(&mut self) {
        let form = self.state.reset_form();
        self.ui.show_form(&form);
    }

    /// Asks first. On success the post is dropped from the cache and the list
    /// is redrawn without another fetch.
    pub async fn delete(&mut self, id: &PostId) -> Result<DeleteOutcome, AdminError> {
        if !self.ui.confirm(DELETE_PROMPT) {
            return Ok(DeleteOutcome::Cancelled);
        }

        if let Err(e) = self.service.delete(id).await {
            tracing::error!("{}", e);
            self.ui.alert(e.user_message());
            return Err(e);
        }

        let removed = self.state.remove_post(id);
        self.render();
        Ok(DeleteOutcome::Deleted { removed })
    }
}
