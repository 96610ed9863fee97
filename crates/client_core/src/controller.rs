//! Form state for browsing, adding and editing customer records.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::domain::{Customer, CustomerId, CustomerOption};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::{
    error::{FormError, ValidationError},
    types::{FieldEdit, FormMode, FormSnapshot, Notice, SubmitOutcome},
    RecordsRepository,
};

/// Reads a count the way the form always has: leading whitespace and an
/// optional `+` are skipped, the leading run of ASCII digits is taken and
/// the rest ignored. Anything else, including negative numbers and values
/// past `u32::MAX`, reads as zero.
pub fn parse_count(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..end].parse().unwrap_or(0)
}

/// Owns the loaded records, the draft being edited and the status notice.
///
/// Every operation takes `&mut self`, so at most one repository call is in
/// flight per controller. A future dropped mid-call leaves `busy` raised
/// until the next operation finishes.
pub struct CustomerFormController {
    repository: Arc<dyn RecordsRepository>,
    records: Vec<Customer>,
    options: Vec<CustomerOption>,
    mode: FormMode,
    draft: Customer,
    busy: bool,
    notice: Option<Notice>,
    draft_revision: u64,
    snapshots: watch::Sender<FormSnapshot>,
}

impl CustomerFormController {
    pub fn new(repository: Arc<dyn RecordsRepository>) -> Self {
        let (snapshots, _) = watch::channel(FormSnapshot::default());
        let controller = Self {
            repository,
            records: Vec::new(),
            options: Vec::new(),
            mode: FormMode::default(),
            draft: Customer::default(),
            busy: false,
            notice: None,
            draft_revision: 0,
            snapshots,
        };
        controller.publish();
        controller
    }

    pub fn records(&self) -> &[Customer] {
        &self.records
    }

    /// Selector entries, index-aligned with [`Self::records`].
    pub fn options(&self) -> &[CustomerOption] {
        &self.options
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn selected(&self) -> Option<&Customer> {
        let id = self.mode.selected()?;
        self.records.iter().find(|record| record.id == Some(id))
    }

    pub fn draft(&self) -> &Customer {
        &self.draft
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn draft_revision(&self) -> u64 {
        self.draft_revision
    }

    pub fn subscribe(&self) -> watch::Receiver<FormSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            options: self.options.clone(),
            mode: self.mode,
            draft: self.draft.clone(),
            busy: self.busy,
            notice: self.notice.clone(),
            draft_revision: self.draft_revision,
            can_submit: self.can_submit(),
            duplicate_name: self.mode.is_add() && self.check_duplicate(&self.draft.name),
        }
    }

    /// Replaces the loaded records with the repository's current contents.
    /// Returns the number of records loaded.
    pub async fn load(&mut self) -> Result<usize, FormError> {
        self.set_busy(true);
        let result = self.repository.list().await;
        self.busy = false;

        match result {
            Ok(records) => {
                info!(count = records.len(), "customers: loaded");
                self.options = CustomerOption::for_records(&records);
                self.records = records;
                self.publish();
                Ok(self.records.len())
            }
            Err(err) => {
                error!(error = %err, "customers: load failed");
                Err(self.fail(FormError::Load(err.to_string())))
            }
        }
    }

    /// Binds the draft to a loaded record and switches to edit mode. Returns
    /// false, changing nothing, when no loaded record has this id.
    pub fn select_existing(&mut self, id: CustomerId) -> bool {
        let Some(record) = self.records.iter().find(|record| record.id == Some(id)) else {
            debug!(customer_id = id.0, "customers: selection ignored, id not loaded");
            return false;
        };

        self.draft = record.clone();
        self.mode = FormMode::Edit { selected: Some(id) };
        self.draft_revision += 1;
        self.publish();
        true
    }

    pub fn set_name(&mut self, value: &str) {
        self.draft.name = value.to_string();
        self.publish();
    }

    pub fn set_address(&mut self, value: &str) {
        self.draft.address = value.to_string();
        self.publish();
    }

    pub fn set_rig_count(&mut self, raw: &str) {
        self.draft.rig_count = parse_count(raw);
        self.publish();
    }

    pub fn set_jack_up_count(&mut self, raw: &str) {
        self.draft.jack_up_count = parse_count(raw);
        self.publish();
    }

    pub fn set_modu_count(&mut self, raw: &str) {
        self.draft.modu_count = parse_count(raw);
        self.publish();
    }

    pub fn set_site_url(&mut self, value: &str) {
        self.draft.site_url = Some(value.to_string());
        self.publish();
    }

    pub fn apply_edit(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Name(value) => self.set_name(&value),
            FieldEdit::Address(value) => self.set_address(&value),
            FieldEdit::RigCount(raw) => self.set_rig_count(&raw),
            FieldEdit::JackUpCount(raw) => self.set_jack_up_count(&raw),
            FieldEdit::ModuCount(raw) => self.set_modu_count(&raw),
            FieldEdit::SiteUrl(value) => self.set_site_url(&value),
        }
    }

    /// True if a loaded record already carries `name`, ignoring case.
    ///
    /// Only the records fetched by the last load are consulted; the list
    /// service itself does not enforce unique names, so a record created
    /// elsewhere since then is not seen.
    pub fn check_duplicate(&self, name: &str) -> bool {
        self.records.iter().any(|record| record.name_matches(name))
    }

    pub fn can_submit(&self) -> bool {
        if self.busy {
            return false;
        }
        match self.mode {
            FormMode::Add => {
                !self.draft.name.is_empty() && !self.check_duplicate(&self.draft.name)
            }
            FormMode::Edit { selected } => selected.is_some(),
        }
    }

    /// Creates or updates the record behind the draft, then reloads.
    ///
    /// Edit mode with a selection updates that record. Add mode creates a new
    /// one unless the name collides with a loaded record. On failure the
    /// draft is kept so the user can retry.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, FormError> {
        if self.draft.name.is_empty() || self.draft.address.is_empty() {
            return Err(self.fail(ValidationError::MissingRequiredFields.into()));
        }

        let target = match self.mode {
            FormMode::Edit {
                selected: Some(id),
            } => Some(id),
            FormMode::Edit { selected: None } => {
                return Err(self.fail(ValidationError::NoSelection.into()));
            }
            FormMode::Add => None,
        };

        if target.is_none() && self.check_duplicate(&self.draft.name) {
            warn!(name = %self.draft.name, "customers: duplicate name rejected");
            return Err(self.fail(FormError::DuplicateName(self.draft.name.clone())));
        }

        self.notice = None;
        self.set_busy(true);

        let mut payload = self.draft.clone();
        if payload.normalized_site_url().is_none() {
            payload.site_url = None;
        }

        let result = match target {
            Some(id) => self
                .repository
                .update(id, &payload)
                .await
                .map(|()| SubmitOutcome::Updated(id)),
            None => self
                .repository
                .add(&payload)
                .await
                .map(SubmitOutcome::Created),
        };
        self.busy = false;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(error = %err, update = target.is_some(), "customers: save failed");
                return Err(self.fail(FormError::Persist(err.to_string())));
            }
        };

        let text = match &outcome {
            SubmitOutcome::Created(created) => {
                info!(customer_id = ?created.id.map(|id| id.0), "customers: added");
                "Customer added successfully!"
            }
            SubmitOutcome::Updated(id) => {
                info!(customer_id = id.0, "customers: updated");
                "Customer updated successfully!"
            }
        };
        self.notice = Some(Notice::success(text));
        self.mode = FormMode::default();
        self.replace_draft();
        self.publish();

        if let Err(err) = self.load().await {
            warn!(error = %err, "customers: reload after save failed");
        }

        Ok(outcome)
    }

    /// Empties the draft and drops the selection. Stays in the current mode.
    pub fn reset_draft(&mut self) {
        if let FormMode::Edit { selected } = &mut self.mode {
            *selected = None;
        }
        self.replace_draft();
        self.publish();
    }

    pub fn enter_add_mode(&mut self) {
        self.mode = FormMode::Add;
        self.reset_draft();
    }

    pub fn enter_edit_mode(&mut self) {
        self.mode = FormMode::default();
        self.reset_draft();
    }

    pub fn toggle_mode(&mut self) {
        if self.mode.is_add() {
            self.enter_edit_mode();
        } else {
            self.enter_add_mode();
        }
    }

    /// Add mode: leave it. Edit mode: drop the selection and the draft.
    pub fn cancel(&mut self) {
        if self.mode.is_add() {
            self.enter_edit_mode();
        } else {
            self.reset_draft();
        }
    }

    pub fn dismiss_notice(&mut self) {
        if self.notice.take().is_some() {
            self.publish();
        }
    }

    /// Dismisses the notice only if it is still the one raised at
    /// `raised_at`. A dismissal queued behind a later operation leaves that
    /// operation's notice alone.
    pub fn dismiss_notice_if(&mut self, raised_at: DateTime<Utc>) -> bool {
        if self.notice.as_ref().map(|notice| notice.raised_at) != Some(raised_at) {
            debug!("customers: stale notice dismissal ignored");
            return false;
        }
        self.dismiss_notice();
        true
    }

    fn replace_draft(&mut self) {
        self.draft = Customer::default();
        self.draft_revision += 1;
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
        self.publish();
    }

    fn fail(&mut self, err: FormError) -> FormError {
        self.notice = Some(err.notice());
        self.publish();
        err
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}
