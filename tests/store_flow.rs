//! Drives the screens against an in-memory store, the way a user would

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use study_tasks::mock_behaviour::MockBehaviour;
use study_tasks::screens::{ConfirmChoice, Notice, TaskListScreen};
use study_tasks::selector::PickerEvent;
use study_tasks::store::MemoryStore;
use study_tasks::subscription::FeedState;
use study_tasks::theme::{Palette, Theme, ThemeContext, ThemeSetting};
use study_tasks::traits::TaskStore;
use study_tasks::{to_iso_string, Task, TaskFields, TaskId};

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    let naive = NaiveDate::from_ymd_opt(y, mo, d).unwrap().and_hms_opt(h, mi, 0).unwrap();
    Utc.from_utc_datetime(&naive)
}

fn seeded_task(title: &str, due: DateTime<Utc>) -> Task {
    Task::new(TaskId::random(), TaskFields::new(title.to_string(), due))
}

#[tokio::test]
async fn created_tasks_read_back_unchanged() {
    let _ = env_logger::builder().is_test(true).try_init();

    let cases = vec![
        ("Read chapter 4", utc(2024, 3, 5, 14, 30)),
        ("Lab report", utc(2023, 12, 31, 23, 59)),
        ("Flashcards: organic chemistry ⚗", utc(2025, 1, 1, 0, 0) + chrono::Duration::milliseconds(123)),
    ];

    for (title, due) in cases {
        let store = Arc::new(MemoryStore::new());
        let mut screen = TaskListScreen::new(Arc::clone(&store), due);
        screen.set_title(title);

        let id = screen.add_task().await.unwrap().expect("a task should have been created");
        let task = store.get_task(&id).await.unwrap().unwrap();
        assert_eq!(task.title(), title);
        assert_eq!(task.due_iso(), to_iso_string(&due));
        assert_eq!(task.completed(), false);

        // The form is ready for the next task
        assert_eq!(screen.title(), "");
        assert_eq!(screen.due(), &due);
    }
}

#[tokio::test]
async fn blank_titles_are_not_written() {
    let _ = env_logger::builder().is_test(true).try_init();

    let store = Arc::new(MemoryStore::new());
    let mut screen = TaskListScreen::new(Arc::clone(&store), Utc::now());

    for title in &["", " ", "   \t  ", "\n"] {
        screen.set_title(*title);
        assert_eq!(screen.add_task().await, Ok(None));
    }
    assert_eq!(store.n_writes(), 0);
    assert!(store.get_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn toggling_twice_restores_completion() {
    let _ = env_logger::builder().is_test(true).try_init();

    let original = seeded_task("Essay outline", utc(2024, 4, 2, 18, 0));
    let id = original.id().clone();
    let store = Arc::new(MemoryStore::with_tasks(vec![original.clone()]));
    let screen = TaskListScreen::new(Arc::clone(&store), Utc::now());

    let task = store.get_task(&id).await.unwrap().unwrap();
    screen.toggle_completed(&task).await.unwrap();
    let toggled = store.get_task(&id).await.unwrap().unwrap();
    assert_eq!(toggled.completed(), true);
    assert_eq!(toggled.title(), original.title());
    assert_eq!(toggled.due(), original.due());

    screen.toggle_completed(&toggled).await.unwrap();
    let back = store.get_task(&id).await.unwrap().unwrap();
    assert_eq!(back, original);
    assert_eq!(store.n_writes(), 2);
}

#[tokio::test]
async fn saving_a_blank_title_is_refused() {
    let _ = env_logger::builder().is_test(true).try_init();

    let original = seeded_task("Problem set 3", utc(2024, 3, 8, 9, 0));
    let store = Arc::new(MemoryStore::with_tasks(vec![original.clone()]));
    let list = TaskListScreen::new(Arc::clone(&store), Utc::now());

    let mut detail = list.open_detail(&original);
    detail.set_title("   ");
    detail.on_picker_event(PickerEvent::TapLabel);
    detail.on_picker_event(PickerEvent::ConfirmDate(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()));

    let notice = detail.save().await.unwrap_err();
    assert!(notice.is_blocking());
    assert_eq!(notice.message(), "Title cannot be empty");

    assert_eq!(store.get_task(original.id()).await.unwrap().unwrap(), original);
    assert_eq!(store.n_writes(), 0);
}

#[tokio::test]
async fn saving_writes_title_and_due() {
    let _ = env_logger::builder().is_test(true).try_init();

    let original = seeded_task("Problem set 3", utc(2024, 3, 1, 9, 0));
    let store = Arc::new(MemoryStore::with_tasks(vec![original.clone()]));
    let list = TaskListScreen::new(Arc::clone(&store), Utc::now());

    let mut detail = list.open_detail(&original);
    detail.set_title("Problem set 3 (extended)");
    detail.on_picker_event(PickerEvent::TapLabel);
    detail.on_picker_event(PickerEvent::ConfirmDate(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()));
    detail.on_picker_event(PickerEvent::ConfirmTime(NaiveTime::from_hms_opt(14, 30, 0).unwrap()));
    detail.save().await.unwrap();

    let saved = store.get_task(original.id()).await.unwrap().unwrap();
    assert_eq!(saved.title(), "Problem set 3 (extended)");
    assert_eq!(saved.due(), &utc(2024, 3, 5, 14, 30));
    assert_eq!(saved.completed(), original.completed());
}

#[tokio::test]
async fn deletion_needs_confirmation() {
    let _ = env_logger::builder().is_test(true).try_init();

    let task = seeded_task("Old quiz", utc(2024, 2, 1, 10, 0));
    let store = Arc::new(MemoryStore::with_tasks(vec![task.clone()]));
    let screen = TaskListScreen::new(Arc::clone(&store), Utc::now());

    let prompt = screen.request_delete(&task);
    assert_eq!(prompt.title(), "Delete Task");
    assert_eq!(prompt.message(), "Are you sure you want to delete \"Old quiz\"?");
    assert_eq!(prompt.choices(), [ConfirmChoice::Cancel, ConfirmChoice::Delete]);

    assert_eq!(screen.resolve_delete(prompt.clone(), ConfirmChoice::Cancel).await, Ok(false));
    assert!(store.get_task(task.id()).await.unwrap().is_some());

    assert_eq!(screen.resolve_delete(prompt, ConfirmChoice::Delete).await, Ok(true));
    assert!(store.get_task(task.id()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_follows_the_subscription() {
    let _ = env_logger::builder().is_test(true).try_init();

    let store = Arc::new(MemoryStore::new());
    let mut screen = TaskListScreen::new(Arc::clone(&store), utc(2024, 3, 5, 14, 30));
    assert_eq!(screen.feed(), &FeedState::Loading);
    assert!(screen.rows().is_empty());

    let mut subscription = store.subscribe().await;
    screen.apply_feed(subscription.current());
    assert!(screen.rows().is_empty());

    screen.set_title("Revise for midterm");
    let id = screen.add_task().await.unwrap().unwrap();

    // Adding a task does not touch the list until the store reports it
    assert!(screen.rows().is_empty());

    let state = subscription.next().await.unwrap();
    screen.apply_feed(state);
    let rows = screen.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);
    assert_eq!(rows[0].title, "Revise for midterm");
    assert_eq!(rows[0].completed, false);
    assert_eq!(rows[0].due_label, "Due: 3/5/2024, 2:30:00 PM");
}

#[tokio::test]
async fn failed_feed_shows_nothing() {
    let _ = env_logger::builder().is_test(true).try_init();

    let store = Arc::new(MemoryStore::with_tasks(vec![seeded_task("Lab", Utc::now())]));
    let mut screen = TaskListScreen::new(Arc::clone(&store), Utc::now());
    screen.apply_feed(store.subscribe().await.current());
    assert_eq!(screen.rows().len(), 1);

    screen.apply_feed(FeedState::Failed("permission denied".to_string()));
    assert!(screen.rows().is_empty());
}

#[tokio::test]
async fn store_failures_become_notices() {
    let _ = env_logger::builder().is_test(true).try_init();

    let task = seeded_task("Group project", utc(2024, 5, 1, 12, 0));
    let store = Arc::new(MemoryStore::with_tasks(vec![task.clone()]));
    store.set_mock_behaviour(MockBehaviour::fail_writes(1));
    let mut screen = TaskListScreen::new(Arc::clone(&store), Utc::now());

    screen.set_title("Read the syllabus");
    match screen.add_task().await {
        Err(Notice::Error(_)) => {},
        other => panic!("unexpected result {:?}", other),
    }
    // The draft is kept so that the user can try again
    assert_eq!(screen.title(), "Read the syllabus");

    match screen.toggle_completed(&task).await {
        Err(Notice::Error(_)) => {},
        other => panic!("unexpected result {:?}", other),
    }

    let prompt = screen.request_delete(&task);
    match screen.resolve_delete(prompt, ConfirmChoice::Delete).await {
        Err(Notice::Error(_)) => {},
        other => panic!("unexpected result {:?}", other),
    }

    // Failures are not retried
    assert_eq!(store.n_writes(), 0);
    assert_eq!(store.get_task(task.id()).await.unwrap(), Some(task.clone()));
    assert!(screen.add_task().await.unwrap().is_some());
}

#[tokio::test]
async fn screens_follow_the_theme() {
    let task = seeded_task("Read chapter 5", utc(2024, 3, 5, 14, 30));
    let store = Arc::new(MemoryStore::with_tasks(vec![task.clone()]));
    let list = TaskListScreen::new(Arc::clone(&store), Utc::now());
    let detail = list.open_detail(&task);

    let dark = ThemeContext::new(ThemeSetting::Dark, Some(Theme::Light));
    let system = ThemeContext::new(ThemeSetting::System, Some(Theme::Dark));
    let unknown = ThemeContext::new(ThemeSetting::System, None);

    assert_eq!(list.palette(&dark), Palette::for_theme(Theme::Dark));
    assert_eq!(detail.palette(&dark), Palette::for_theme(Theme::Dark));
    assert_eq!(list.palette(&system), Palette::for_theme(Theme::Dark));
    assert_eq!(detail.palette(&unknown), Palette::for_theme(Theme::Light));
    assert_ne!(Palette::for_theme(Theme::Dark), Palette::for_theme(Theme::Light));
}
