use std::collections::HashSet;

use chrono::NaiveDate;

use super::domain::{
    Application, ApplicationDraft, ApplicationId, ApplicationPatch, SortOrder, StatusFilter, Task,
    TaskId, TaskPatch,
};
use super::error::{NotFoundError, TrackerError, ValidationError};
use super::snapshot::Snapshot;

/// In-memory, ordered collection of applications.
///
/// The store is the only place identifiers are minted. Every id it has seen
/// during the session, whether generated, hydrated or imported, is remembered
/// so a removed id is never handed out again.
#[derive(Debug, Clone, Default)]
pub struct ApplicationStore {
    applications: Vec<Application>,
    issued_applications: HashSet<ApplicationId>,
    issued_tasks: HashSet<TaskId>,
    application_sequence: u64,
    task_sequence: u64,
}

impl ApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate from a persisted snapshot after validating its identifiers.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, TrackerError> {
        let mut store = Self::new();
        store.replace_all(snapshot)?;
        Ok(store)
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    pub fn get(&self, id: &ApplicationId) -> Option<&Application> {
        self.applications
            .iter()
            .find(|application| &application.id == id)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.applications.clone())
    }

    pub fn add(&mut self, draft: ApplicationDraft) -> Result<Application, TrackerError> {
        require_text(&draft.company, "company")?;
        require_text(&draft.position, "position")?;
        if draft.tasks.iter().any(|task| task.text.trim().is_empty()) {
            return Err(ValidationError::EmptyTaskText.into());
        }

        let id = self.next_application_id();
        let tasks = draft
            .tasks
            .into_iter()
            .map(|task| Task {
                id: self.next_task_id(),
                text: task.text.trim().to_string(),
                due_date: task.due_date,
                completed: task.completed,
            })
            .collect();

        let application = Application {
            id,
            company: draft.company.trim().to_string(),
            position: draft.position.trim().to_string(),
            status: draft.status,
            date_applied: draft.date_applied,
            notes: draft.notes,
            tasks,
        };
        self.applications.push(application.clone());
        Ok(application)
    }

    pub fn update(
        &mut self,
        id: &ApplicationId,
        patch: ApplicationPatch,
    ) -> Result<Application, TrackerError> {
        let index = self.index_of(id)?;
        if let Some(company) = &patch.company {
            require_text(company, "company")?;
        }
        if let Some(position) = &patch.position {
            require_text(position, "position")?;
        }

        let application = &mut self.applications[index];
        if let Some(company) = patch.company {
            application.company = company.trim().to_string();
        }
        if let Some(position) = patch.position {
            application.position = position.trim().to_string();
        }
        if let Some(status) = patch.status {
            application.status = status;
        }
        if let Some(date_applied) = patch.date_applied {
            application.date_applied = date_applied;
        }
        if let Some(notes) = patch.notes {
            application.notes = notes;
        }
        Ok(application.clone())
    }

    /// Delete an application together with its tasks.
    pub fn remove(&mut self, id: &ApplicationId) -> Result<Application, TrackerError> {
        let index = self.index_of(id)?;
        Ok(self.applications.remove(index))
    }

    pub fn add_task(
        &mut self,
        job_id: &ApplicationId,
        text: &str,
        due_date: Option<NaiveDate>,
    ) -> Result<Task, TrackerError> {
        let index = self.index_of(job_id)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyTaskText.into());
        }

        let task = Task {
            id: self.next_task_id(),
            text: text.to_string(),
            due_date,
            completed: false,
        };
        self.applications[index].tasks.push(task.clone());
        Ok(task)
    }

    pub fn toggle_task(
        &mut self,
        job_id: &ApplicationId,
        task_id: &TaskId,
    ) -> Result<Task, TrackerError> {
        let task = self.task_mut(job_id, task_id)?;
        task.completed = !task.completed;
        Ok(task.clone())
    }

    pub fn edit_task(
        &mut self,
        job_id: &ApplicationId,
        task_id: &TaskId,
        patch: TaskPatch,
    ) -> Result<Task, TrackerError> {
        let text = match &patch.text {
            Some(text) if text.trim().is_empty() => {
                // Resolve ids first so a missing task still reports NotFound.
                self.task_mut(job_id, task_id)?;
                return Err(ValidationError::EmptyTaskText.into());
            }
            Some(text) => Some(text.trim().to_string()),
            None => None,
        };

        let task = self.task_mut(job_id, task_id)?;
        if let Some(text) = text {
            task.text = text;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        Ok(task.clone())
    }

    pub fn remove_task(
        &mut self,
        job_id: &ApplicationId,
        task_id: &TaskId,
    ) -> Result<Task, TrackerError> {
        let index = self.index_of(job_id)?;
        let tasks = &mut self.applications[index].tasks;
        let position = tasks
            .iter()
            .position(|task| &task.id == task_id)
            .ok_or_else(|| NotFoundError::Task {
                application_id: job_id.clone(),
                task_id: task_id.clone(),
            })?;
        Ok(tasks.remove(position))
    }

    /// Applications matching `filter`, in store order.
    pub fn filter_by_status(&self, filter: &StatusFilter) -> Vec<&Application> {
        self.applications
            .iter()
            .filter(|application| filter.matches(application.status))
            .collect()
    }

    /// Stable ordering by date applied; equal dates keep store order in both directions.
    pub fn sort_by_date_applied(&self, order: SortOrder) -> Vec<&Application> {
        let mut sorted: Vec<&Application> = self.applications.iter().collect();
        sort_applications(&mut sorted, order);
        sorted
    }

    /// Filter, then optionally sort, the way list views ask for it.
    pub fn query(&self, filter: &StatusFilter, order: Option<SortOrder>) -> Vec<&Application> {
        let mut selected = self.filter_by_status(filter);
        if let Some(order) = order {
            sort_applications(&mut selected, order);
        }
        selected
    }

    /// Discard the current contents and install `snapshot` verbatim.
    ///
    /// Nothing changes when the snapshot fails validation.
    pub fn replace_all(&mut self, snapshot: Snapshot) -> Result<(), TrackerError> {
        snapshot.validate()?;

        for application in snapshot.applications() {
            self.issued_applications.insert(application.id.clone());
            self.issued_tasks
                .extend(application.tasks.iter().map(|task| task.id.clone()));
        }
        self.applications = snapshot.into_applications();
        Ok(())
    }

    fn index_of(&self, id: &ApplicationId) -> Result<usize, NotFoundError> {
        self.applications
            .iter()
            .position(|application| &application.id == id)
            .ok_or_else(|| NotFoundError::Application(id.clone()))
    }

    fn task_mut(
        &mut self,
        job_id: &ApplicationId,
        task_id: &TaskId,
    ) -> Result<&mut Task, NotFoundError> {
        let index = self.index_of(job_id)?;
        self.applications[index]
            .tasks
            .iter_mut()
            .find(|task| &task.id == task_id)
            .ok_or_else(|| NotFoundError::Task {
                application_id: job_id.clone(),
                task_id: task_id.clone(),
            })
    }

    fn next_application_id(&mut self) -> ApplicationId {
        loop {
            self.application_sequence += 1;
            let candidate = ApplicationId(format!("job-{:06}", self.application_sequence));
            if self.issued_applications.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    fn next_task_id(&mut self) -> TaskId {
        loop {
            self.task_sequence += 1;
            let candidate = TaskId(format!("task-{:06}", self.task_sequence));
            if self.issued_tasks.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

fn sort_applications(applications: &mut [&Application], order: SortOrder) {
    match order {
        SortOrder::Asc => applications.sort_by(|a, b| a.date_applied.cmp(&b.date_applied)),
        SortOrder::Desc => applications.sort_by(|a, b| b.date_applied.cmp(&a.date_applied)),
    }
}

fn require_text(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField { field })
    } else {
        Ok(())
    }
}
