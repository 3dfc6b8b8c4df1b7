//! Some utility functions

use crate::subscription::Snapshot;
use crate::task::Task;

/// A debug utility that pretty-prints a collection
pub fn print_snapshot(snapshot: &Snapshot) {
    let mut tasks: Vec<&Task> = snapshot.tasks().iter().collect();
    tasks.sort_by(|a, b| a.due().cmp(b.due()));
    for task in tasks {
        print_task(task);
    }
}

pub fn print_task(task: &Task) {
    let completion = if task.completed() { "✓" } else { " " };
    println!("    {} {}\t{}\t{}", completion, task.title(), task.due_iso(), task.id());
}

