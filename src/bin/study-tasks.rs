//! A command-line front end to a Firestore task collection.
//!
//! Settings are read from the JSON file named by `STUDY_TASKS_SETTINGS`, or from `STUDY_TASKS_*` environment
//! variables. Set `RUST_LOG` to see more or less details.

use std::error::Error;
use std::io::{stdin, BufRead};
use std::path::Path;
use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveTime};

use study_tasks::config::{self, Settings};
use study_tasks::quote::ChatQuoteClient;
use study_tasks::screens::{ConfirmChoice, QuotePanel, TaskListScreen};
use study_tasks::selector::PickerEvent;
use study_tasks::store::FirestoreStore;
use study_tasks::subscription::Snapshot;
use study_tasks::theme::ThemeContext;
use study_tasks::traits::TaskStore;
use study_tasks::utils::print_snapshot;
use study_tasks::TaskId;

const USAGE: &str = "\
Usage: study-tasks <command>

Commands:
    list                              Print every task (default)
    add <title> [YYYY-MM-DD] [HH:MM]  Add a task, due now unless a date and a time are given
    edit <id> <title>                 Rename a task
    toggle <id>                       Mark a task as completed, or not completed
    delete <id>                       Delete a task (asks for confirmation)
    watch                             Print the collection every time it changes
    quote                             Print a motivational quote";


#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(&args).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn load_settings() -> Result<Settings, Box<dyn Error>> {
    match std::env::var("STUDY_TASKS_SETTINGS") {
        Ok(path) => Settings::from_file(Path::new(&path)),
        Err(_) => Settings::from_env(),
    }
}

async fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let command = args.get(0).map(|s| s.as_str()).unwrap_or("list");
    if command == "help" || command == "--help" {
        println!("{}", USAGE);
        return Ok(());
    }

    let settings = load_settings()?;
    config::set_theme_setting(settings.theme);

    if command == "quote" {
        let client = ChatQuoteClient::new(&settings.quote)?;
        let mut panel = QuotePanel::new(Arc::new(client));
        panel.mount().await;
        println!("{}", panel.text());
        return Ok(());
    }

    let store = Arc::new(FirestoreStore::new(&settings.firestore)?);
    let mut screen = TaskListScreen::new(Arc::clone(&store), Local::now());
    log::debug!("Drawing with {:?}", screen.palette(&ThemeContext::current(None)));

    match command {
        "list" => {
            let snapshot = Snapshot::new(store.get_tasks().await?);
            print_snapshot(&snapshot);
        },
        "add" => {
            let title = args.get(1).ok_or(USAGE)?;
            screen.set_title(title.as_str());
            if let Some(date) = args.get(2) {
                let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")?;
                screen.on_picker_event(PickerEvent::TapLabel);
                screen.on_picker_event(PickerEvent::ConfirmDate(date));
                match args.get(3) {
                    Some(time) => {
                        let time = NaiveTime::parse_from_str(time, "%H:%M")?;
                        screen.on_picker_event(PickerEvent::ConfirmTime(time));
                    },
                    None => screen.on_picker_event(PickerEvent::DismissTime),
                }
            }
            println!("{}", screen.selector().label());
            match screen.add_task().await? {
                Some(id) => println!("Added task {}", id),
                None => println!("Not adding a task without a title"),
            }
        },
        "edit" => {
            let id = TaskId::from(args.get(1).ok_or(USAGE)?.as_str());
            let title = args.get(2).ok_or(USAGE)?;
            let task = store.get_task(&id).await?.ok_or_else(|| format!("No task {}", id))?;
            let mut detail = screen.open_detail(&task);
            detail.set_title(title.as_str());
            detail.save().await?;
            println!("Saved task {}", id);
        },
        "toggle" => {
            let id = TaskId::from(args.get(1).ok_or(USAGE)?.as_str());
            let task = store.get_task(&id).await?.ok_or_else(|| format!("No task {}", id))?;
            screen.toggle_completed(&task).await?;
            println!("Task {} is now {}", id, if task.completed() { "not completed" } else { "completed" });
        },
        "delete" => {
            let id = TaskId::from(args.get(1).ok_or(USAGE)?.as_str());
            let task = store.get_task(&id).await?.ok_or_else(|| format!("No task {}", id))?;
            let prompt = screen.request_delete(&task);
            println!("{}\n{}", prompt.title(), prompt.message());
            let labels: Vec<&str> = prompt.choices().iter().map(|c| c.label()).collect();
            println!("[{}]", labels.join("/"));

            let mut answer = String::new();
            stdin().lock().read_line(&mut answer)?;
            let choice = if answer.trim().eq_ignore_ascii_case("delete") { ConfirmChoice::Delete } else { ConfirmChoice::Cancel };
            if screen.resolve_delete(prompt, choice).await? {
                println!("Deleted task {}", id);
            }
        },
        "watch" => {
            let mut subscription = store.subscribe().await;
            while let Some(state) = subscription.next().await {
                println!("---- {} -----", state);
                screen.apply_feed(state);
                for row in screen.rows() {
                    let completion = if row.completed { "✓" } else { " " };
                    println!("    {} {}\t{}\t{}", completion, row.title, row.due_label, row.id);
                }
            }
        },
        other => {
            return Err(format!("Unknown command {:?}\n{}", other, USAGE).into());
        },
    }

    Ok(())
}
