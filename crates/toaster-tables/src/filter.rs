use chrono::{Days, NaiveDate};
use serde::Serialize;
use toaster_index::Predicate;
use toaster_types::TIMESTAMP_FORMAT;

use crate::{Error, Result};

/// Calendar day relative to the request's reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Day {
    Today,
    Yesterday,
}

#[derive(Debug, Clone)]
enum ActionKind {
    /// Fixed predicate, usually paired with its negation.
    Toggle(Predicate),
    /// One calendar day on a timestamp column.
    Day { field: &'static str, day: Day },
    /// Inclusive `YYYY-MM-DD,YYYY-MM-DD` range on a timestamp column.
    DateRange { field: &'static str },
}

/// One selectable choice of a filter.
#[derive(Debug, Clone)]
pub struct FilterAction {
    name: String,
    title: String,
    kind: ActionKind,
}

impl FilterAction {
    pub fn toggle(name: &str, title: &str, predicate: Predicate) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            kind: ActionKind::Toggle(predicate),
        }
    }

    pub fn day(name: &str, title: &str, field: &'static str, day: Day) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            kind: ActionKind::Day { field, day },
        }
    }

    pub fn date_range(name: &str, title: &str, field: &'static str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            kind: ActionKind::DateRange { field },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn action_type(&self) -> &'static str {
        match self.kind {
            ActionKind::Toggle(_) => "toggle",
            ActionKind::Day { .. } => "day",
            ActionKind::DateRange { .. } => "daterange",
        }
    }

    /// Whether the action needs a value to select anything.
    pub fn takes_value(&self) -> bool {
        matches!(self.kind, ActionKind::DateRange { .. })
    }

    /// Predicate selecting the rows this action keeps.
    pub fn predicate(&self, value: Option<&str>, today: NaiveDate) -> Result<Predicate> {
        match &self.kind {
            ActionKind::Toggle(predicate) => Ok(predicate.clone()),
            ActionKind::Day { field, day } => {
                let date = match day {
                    Day::Today => today,
                    Day::Yesterday => today.pred_opt().unwrap_or(today),
                };
                Ok(day_window(field, date, date))
            }
            ActionKind::DateRange { field } => {
                let value = value.unwrap_or_default();
                let (from, to) = parse_date_range(value).ok_or_else(|| Error::InvalidFilterValue {
                    action: self.name.clone(),
                    value: value.to_string(),
                })?;
                Ok(day_window(field, from, to))
            }
        }
    }
}

/// From 00:00 of `first` up to, not including, 00:00 after `last`.
fn day_window(field: &str, first: NaiveDate, last: NaiveDate) -> Predicate {
    let start = first.and_time(chrono::NaiveTime::MIN);
    let end = last
        .checked_add_days(Days::new(1))
        .unwrap_or(last)
        .and_time(chrono::NaiveTime::MIN);

    Predicate::between(
        field,
        start.format(TIMESTAMP_FORMAT).to_string(),
        end.format(TIMESTAMP_FORMAT).to_string(),
    )
}

fn parse_date_range(value: &str) -> Option<(NaiveDate, NaiveDate)> {
    let (from, to) = value.split_once(',')?;
    let from = NaiveDate::parse_from_str(from.trim(), "%Y-%m-%d").ok()?;
    let to = NaiveDate::parse_from_str(to.trim(), "%Y-%m-%d").ok()?;
    Some((from, to))
}

/// A named group of mutually exclusive actions.
#[derive(Debug, Clone)]
pub struct TableFilter {
    name: String,
    title: String,
    actions: Vec<FilterAction>,
}

impl TableFilter {
    pub fn new(name: &str, title: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            actions: Vec::new(),
        }
    }

    pub fn add_action(mut self, action: FilterAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn actions(&self) -> &[FilterAction] {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Result<&FilterAction> {
        self.actions
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| Error::UnknownFilterAction {
                filter: self.name.clone(),
                action: name.to_string(),
            })
    }
}

/// The in-project / not-in-project pair shared by tables whose rows come
/// from a project's layers.
pub struct ProjectFilters {
    pub in_project: Predicate,
    pub not_in_project: Predicate,
}

impl ProjectFilters {
    /// `column` holds the row's layer version id.
    pub fn new(column: &str, project_layers: impl IntoIterator<Item = i64>) -> Self {
        let in_project = Predicate::is_in(column, project_layers);
        Self {
            not_in_project: in_project.clone().not(),
            in_project,
        }
    }

    pub fn into_filter(self, title: &str, in_title: &str, not_in_title: &str) -> TableFilter {
        TableFilter::new("in_current_project", title)
            .add_action(FilterAction::toggle("in_project", in_title, self.in_project))
            .add_action(FilterAction::toggle(
                "not_in_project",
                not_in_title,
                self.not_in_project,
            ))
    }
}

/// Count of rows one action would select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterActionInfo {
    pub action_name: String,
    pub title: String,
    pub action_type: &'static str,
    /// Absent for actions that need a value first.
    pub count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterInfo {
    pub name: String,
    pub title: String,
    pub filter_actions: Vec<FilterActionInfo>,
}
