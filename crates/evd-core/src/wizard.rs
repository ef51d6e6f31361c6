//! Multi-step event creation.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::forms::{FieldError, FormError, into_result};
use crate::model::Event;
use crate::types::{Category, EventId};

/// Seats offered when the organiser does not say otherwise.
pub const DEFAULT_CAPACITY: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WizardStep {
    #[default]
    BasicInfo,
    Details,
    Poster,
    Summary,
}

impl WizardStep {
    pub const ALL: [Self; 4] = [Self::BasicInfo, Self::Details, Self::Poster, Self::Summary];

    pub const fn label(self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Info",
            Self::Details => "Details",
            Self::Poster => "Poster",
            Self::Summary => "Summary",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::BasicInfo => 0,
            Self::Details => 1,
            Self::Poster => 2,
            Self::Summary => 3,
        }
    }

    const fn next(self) -> Self {
        match self {
            Self::BasicInfo => Self::Details,
            Self::Details => Self::Poster,
            Self::Poster | Self::Summary => Self::Summary,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::BasicInfo | Self::Details => Self::BasicInfo,
            Self::Poster => Self::Details,
            Self::Summary => Self::Poster,
        }
    }
}

/// The event being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub description: String,
    pub poster: Option<String>,
    pub category: Category,
    pub capacity: u32,
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            date: None,
            description: String::new(),
            poster: None,
            category: Category::Tech,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl EventDraft {
    /// Field errors for `step`. The summary step checks capacity.
    pub fn errors_for(&self, step: WizardStep) -> Vec<FieldError> {
        let mut errors = Vec::new();
        match step {
            WizardStep::BasicInfo => {
                if self.title.trim().is_empty() {
                    errors.push(FieldError::new("title", "Event title is required"));
                }
                if self.date.is_none() {
                    errors.push(FieldError::new("date", "Event date is required"));
                }
            }
            WizardStep::Details => {
                if self.description.trim().is_empty() {
                    errors.push(FieldError::new(
                        "description",
                        "Event description is required",
                    ));
                }
            }
            WizardStep::Poster => {
                if self.poster.as_deref().is_none_or(|p| p.trim().is_empty()) {
                    errors.push(FieldError::new("poster", "Event poster is required"));
                }
            }
            WizardStep::Summary => {
                if self.capacity == 0 {
                    errors.push(FieldError::new(
                        "capacity",
                        "Capacity must be greater than zero",
                    ));
                }
            }
        }
        errors
    }
}

/// Walks an [`EventDraft`] through the creation steps.
#[derive(Debug, Clone, Default)]
pub struct CreationWizard {
    step: WizardStep,
    draft: EventDraft,
}

impl CreationWizard {
    pub fn new(draft: EventDraft) -> Self {
        Self {
            step: WizardStep::BasicInfo,
            draft,
        }
    }

    pub const fn step(&self) -> WizardStep {
        self.step
    }

    pub const fn draft(&self) -> &EventDraft {
        &self.draft
    }

    pub const fn draft_mut(&mut self) -> &mut EventDraft {
        &mut self.draft
    }

    /// Percentage of the way through the steps.
    pub const fn progress_percent(&self) -> usize {
        self.step.index() * 100 / (WizardStep::ALL.len() - 1)
    }

    /// Moves forward if the current step validates.
    pub fn next(&mut self) -> Result<WizardStep, FormError> {
        into_result(self.draft.errors_for(self.step))?;
        self.step = self.step.next();
        Ok(self.step)
    }

    pub const fn prev(&mut self) -> WizardStep {
        self.step = self.step.prev();
        self.step
    }

    /// Back to an empty draft on the first step.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validates every step and produces the event with a fresh id.
    pub fn finish(&self) -> Result<Event, FormError> {
        let errors: Vec<FieldError> = WizardStep::ALL
            .into_iter()
            .flat_map(|step| self.draft.errors_for(step))
            .collect();
        into_result(errors)?;

        let missing_date = || FormError(vec![FieldError::new("date", "Event date is required")]);
        let date = self.draft.date.ok_or_else(missing_date)?;
        let id = EventId::new(format!("evt-{}", Uuid::new_v4()))
            .map_err(|_| FormError(vec![FieldError::new("id", "could not allocate an id")]))?;

        Ok(Event {
            id,
            title: self.draft.title.trim().to_string(),
            date,
            description: self.draft.description.trim().to_string(),
            poster: self.draft.poster.clone(),
            category: Some(self.draft.category),
            capacity: self.draft.capacity,
            registrations: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> EventDraft {
        EventDraft {
            title: "Science Fair".to_string(),
            date: Some(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()),
            description: "Projects from every department.".to_string(),
            poster: Some("posters/science.png".to_string()),
            category: Category::Science,
            capacity: 80,
        }
    }

    #[test]
    fn first_step_requires_title_and_date() {
        let mut wizard = CreationWizard::default();
        let err = wizard.next().unwrap_err();
        assert_eq!(err.message_for("title"), Some("Event title is required"));
        assert_eq!(err.message_for("date"), Some("Event date is required"));
        assert_eq!(wizard.step(), WizardStep::BasicInfo);
    }

    #[test]
    fn steps_advance_and_report_progress() {
        let mut wizard = CreationWizard::new(complete_draft());
        assert_eq!(wizard.progress_percent(), 0);
        assert_eq!(wizard.next().unwrap(), WizardStep::Details);
        assert_eq!(wizard.progress_percent(), 33);
        assert_eq!(wizard.next().unwrap(), WizardStep::Poster);
        assert_eq!(wizard.next().unwrap(), WizardStep::Summary);
        assert_eq!(wizard.progress_percent(), 100);
        assert_eq!(wizard.prev(), WizardStep::Poster);
    }

    #[test]
    fn poster_step_blocks_without_poster() {
        let mut wizard = CreationWizard::new(EventDraft {
            poster: None,
            ..complete_draft()
        });
        wizard.next().unwrap();
        wizard.next().unwrap();
        let err = wizard.next().unwrap_err();
        assert_eq!(err.message_for("poster"), Some("Event poster is required"));
    }

    #[test]
    fn finish_builds_event_with_zero_registrations() {
        let event = CreationWizard::new(complete_draft()).finish().unwrap();
        assert!(event.id.as_str().starts_with("evt-"));
        assert_eq!(event.title, "Science Fair");
        assert_eq!(event.category, Some(Category::Science));
        assert_eq!(event.capacity, 80);
        assert_eq!(event.registrations, 0);
    }

    #[test]
    fn finish_rejects_zero_capacity() {
        let wizard = CreationWizard::new(EventDraft {
            capacity: 0,
            ..complete_draft()
        });
        let err = wizard.finish().unwrap_err();
        assert_eq!(
            err.message_for("capacity"),
            Some("Capacity must be greater than zero")
        );
    }

    #[test]
    fn reset_restores_defaults() {
        let mut wizard = CreationWizard::new(complete_draft());
        wizard.next().unwrap();
        wizard.reset();
        assert_eq!(wizard.step(), WizardStep::BasicInfo);
        assert_eq!(wizard.draft(), &EventDraft::default());
        assert_eq!(wizard.draft().capacity, DEFAULT_CAPACITY);
    }
}
