//! The two-step due date picker.
//!
//! Platforms usually only provide single-field pickers (date-only or time-only).
//! A [`DueDateTimeSelector`] chains them: tapping its label opens a date picker, and confirming a date
//! unconditionally opens a time picker. Each half that the user picks replaces only that half of the
//! working timestamp, so changing the date never resets the time of day (and vice versa).
//!
//! ```text
//!  Idle --tap--> DatePickerOpen --confirm date--> TimePickerOpen --confirm time--> Idle
//!                      |                                |
//!                      +---------- dismiss -------------+--------> Idle
//! ```
//!
//! Note that a confirmed date is published before the time picker even opens. Dismissing the time
//! picker therefore keeps the new date.

use std::fmt::Display;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Timelike};

use crate::theme::{Palette, Theme};

/// Which picker (if any) is currently shown
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerState {
    Idle,
    DatePickerOpen,
    TimePickerOpen,
}

impl Default for PickerState {
    fn default() -> Self {
        PickerState::Idle
    }
}

/// Something the user did to the selector
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerEvent {
    /// The user tapped the "Due" label
    TapLabel,
    /// The user picked a calendar date. Only its year, month and day are used.
    ConfirmDate(NaiveDate),
    DismissDate,
    /// The user picked a clock time. Only its hour and minute are used.
    ConfirmTime(NaiveTime),
    DismissTime,
}

/// The outcome of feeding a [`PickerEvent`] to [`transition`]
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<Tz: TimeZone> {
    pub next: PickerState,
    /// A new timestamp to publish, if this event produced one
    pub emitted: Option<DateTime<Tz>>,
}

impl<Tz: TimeZone> Transition<Tz> {
    fn to(next: PickerState) -> Self {
        Self { next, emitted: None }
    }
}

/// The pure state-transition function of the selector.
///
/// Events that do not make sense in the current state (e.g. a time confirmation while the date picker is open)
/// are ignored: the state is kept and nothing is emitted.
pub fn transition<Tz: TimeZone>(state: PickerState, working: &DateTime<Tz>, event: PickerEvent) -> Transition<Tz> {
    match (state, event) {
        (PickerState::Idle, PickerEvent::TapLabel) => Transition::to(PickerState::DatePickerOpen),

        (PickerState::DatePickerOpen, PickerEvent::DismissDate) => Transition::to(PickerState::Idle),
        (PickerState::DatePickerOpen, PickerEvent::ConfirmDate(date)) => Transition {
            next: PickerState::TimePickerOpen,
            emitted: Some(merge_date(working, date)),
        },

        (PickerState::TimePickerOpen, PickerEvent::DismissTime) => Transition::to(PickerState::Idle),
        (PickerState::TimePickerOpen, PickerEvent::ConfirmTime(time)) => Transition {
            next: PickerState::Idle,
            emitted: Some(merge_time(working, time)),
        },

        (state, event) => {
            log::debug!("Ignoring picker event {:?} in state {:?}", event, state);
            Transition::to(state)
        },
    }
}

/// Replace the year, month and day of `working`, keeping its time of day (down to the nanosecond)
pub fn merge_date<Tz: TimeZone>(working: &DateTime<Tz>, date: NaiveDate) -> DateTime<Tz> {
    let local = working.naive_local();
    resolve_local(&working.timezone(), date.and_time(local.time()))
}

/// Replace the hour and minute of `working`. Its date, seconds and sub-seconds are kept.
pub fn merge_time<Tz: TimeZone>(working: &DateTime<Tz>, time: NaiveTime) -> DateTime<Tz> {
    let local = working.naive_local();
    let new_time = local.time()
        .with_hour(time.hour())
        .and_then(|t| t.with_minute(time.minute()))
        .unwrap_or(local.time());
    resolve_local(&working.timezone(), local.date().and_time(new_time))
}

/// Turn a wall-clock time into an instant of `tz`.
///
/// Ambiguous times (when clocks go back) resolve to the earlier instant.
/// Times that do not exist (when clocks go forward) are pushed forward by the length of the gap.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(earliest, _latest) => earliest,
        LocalResult::None => {
            // Interpret the wall-clock time with the offset in force before the gap
            let before_gap = naive - Duration::hours(24);
            let offset = tz.offset_from_local_datetime(&before_gap)
                .earliest()
                .map(|o| o.fix().local_minus_utc())
                .unwrap_or(0);
            let utc = naive - Duration::seconds(i64::from(offset));
            tz.from_utc_datetime(&utc)
        },
    }
}


/// A selector bound to a working timestamp.
///
/// This holds the only state of the selector (which picker is shown, and the timestamp being built).
/// It does not render anything: a UI layer shows the label and the pickers according to [`Self::state`], and
/// feeds user actions back through [`Self::handle`].
#[derive(Clone, Debug)]
pub struct DueDateTimeSelector<Tz: TimeZone> {
    state: PickerState,
    working: DateTime<Tz>,
}

impl<Tz: TimeZone> DueDateTimeSelector<Tz> {
    /// Create a selector that starts from `working`.
    ///
    /// This is "now" for a task that is being created, or the current due date of a task that is being edited.
    pub fn new(working: DateTime<Tz>) -> Self {
        Self { state: PickerState::Idle, working }
    }

    pub fn state(&self) -> PickerState      { self.state }
    pub fn working(&self) -> &DateTime<Tz>  { &self.working }

    pub fn is_date_picker_visible(&self) -> bool {
        self.state == PickerState::DatePickerOpen
    }
    pub fn is_time_picker_visible(&self) -> bool {
        self.state == PickerState::TimePickerOpen
    }

    /// Replace the working timestamp, e.g. when the owner of the draft changed it by other means.
    ///
    /// Any open picker is closed.
    pub fn reset(&mut self, working: DateTime<Tz>) {
        self.state = PickerState::Idle;
        self.working = working;
    }

    /// Feed a user action to the selector.
    ///
    /// `setter` is called with every timestamp this action publishes. A confirmed date is published on its own,
    /// before the time picker opens.
    pub fn handle<F>(&mut self, event: PickerEvent, mut setter: F)
    where
        F: FnMut(DateTime<Tz>),
    {
        let Transition { next, emitted } = transition(self.state, &self.working, event);
        self.state = next;
        if let Some(timestamp) = emitted {
            self.working = timestamp.clone();
            setter(timestamp);
        }
    }
}

impl<Tz: TimeZone> DueDateTimeSelector<Tz>
where
    Tz::Offset: Display,
{
    /// The text of the label, e.g. `📅 Due: Tue, Mar 5, 14:30`
    pub fn label(&self) -> String {
        format!("📅 Due: {}", self.working.format("%a, %b %-d, %H:%M"))
    }
}

impl<Tz: TimeZone> DueDateTimeSelector<Tz> {
    /// The colors the label is drawn with. This has no effect on the behaviour of the selector.
    pub fn label_palette(&self, theme: Theme) -> Palette {
        Palette::for_theme(theme)
    }
}
