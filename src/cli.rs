//! Command-line surface over [`Planner`].
//!
//! Each subcommand maps to one planner operation; results are rendered as
//! YAML for stdout.

use std::path::PathBuf;

use chrono::Local;
use clap::{value_parser, Arg, ArgMatches, Command};
use serde::Serialize;

use crate::capacity::{parse_date, DocumentStore, Planner, TaskUpdate};
use crate::error::{PlannerError, Result};

pub fn command() -> Command {
    Command::new("sprint-capacity")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Plan sprint capacity and track team workload")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding roster and sprint records"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log filter when RUST_LOG is unset (e.g. info, debug)"),
        )
        .subcommand(members_command())
        .subcommand(sprints_command())
        .subcommand(tasks_command())
        .subcommand(Command::new("dashboard").about("Workload by client and by member across all sprints"))
}

fn id_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).required(true).help(help)
}

fn members_command() -> Command {
    Command::new("members")
        .about("Manage the team roster")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List team members"))
        .subcommand(
            Command::new("add")
                .about("Add a team member")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("emoji").long("emoji").required(true)),
        )
        .subcommand(
            Command::new("show")
                .about("Show one team member")
                .arg(id_arg("member-id", "Member id")),
        )
        .subcommand(
            Command::new("update")
                .about("Rename a member or change their emoji")
                .arg(id_arg("member-id", "Member id"))
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("emoji").long("emoji")),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove a member from the roster")
                .arg(id_arg("member-id", "Member id")),
        )
}

fn sprints_command() -> Command {
    Command::new("sprints")
        .about("Create and inspect sprints")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List sprints, newest first"))
        .subcommand(
            Command::new("create")
                .about("Create a sprint with a snapshot of the current roster")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("start").long("start").required(true).help("Start date, YYYY-MM-DD"))
                .arg(Arg::new("end").long("end").required(true).help("End date, YYYY-MM-DD")),
        )
        .subcommand(
            Command::new("show")
                .about("Show one sprint")
                .arg(id_arg("sprint-id", "Sprint id")),
        )
        .subcommand(
            Command::new("current")
                .about("Show the sprint running on a date")
                .arg(Arg::new("date").long("date").help("Date to look up, YYYY-MM-DD (default: today)")),
        )
}

fn tasks_command() -> Command {
    Command::new("tasks")
        .about("Manage tasks inside a sprint")
        .subcommand_required(true)
        .subcommand(
            Command::new("list")
                .about("List every task in a sprint")
                .arg(id_arg("sprint-id", "Sprint id")),
        )
        .subcommand(
            Command::new("add")
                .about("Assign a new task to a member of the sprint")
                .arg(id_arg("sprint-id", "Sprint id"))
                .arg(Arg::new("member").long("member").required(true).help("Member id"))
                .arg(Arg::new("description").long("description").required(true))
                .arg(Arg::new("client").long("client").required(true).help("Client name"))
                .arg(
                    Arg::new("time")
                        .long("time")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64))
                        .help("Hours"),
                ),
        )
        .subcommand(
            Command::new("update")
                .about("Edit a task's description, client or hours")
                .arg(id_arg("sprint-id", "Sprint id"))
                .arg(id_arg("task-id", "Task id"))
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("client").long("client").help("Client name"))
                .arg(
                    Arg::new("time")
                        .long("time")
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64))
                        .help("Hours"),
                ),
        )
        .subcommand(
            Command::new("remove")
                .about("Delete a task")
                .arg(id_arg("sprint-id", "Sprint id"))
                .arg(id_arg("task-id", "Task id")),
        )
}

#[derive(Serialize)]
struct Removed<'a> {
    removed: &'a str,
}

fn render<T: Serialize>(value: &T) -> String {
    serde_yaml::to_string(value).unwrap_or_else(|e| format!("# failed to render output: {e}\n"))
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches.get_one::<String>(name).map(String::as_str).unwrap_or_default()
}

fn opt_arg<'a>(matches: &'a ArgMatches, name: &str) -> Option<&'a str> {
    matches.get_one::<String>(name).map(String::as_str)
}

/// Runs the parsed subcommand and returns the text to print.
pub fn run<S: DocumentStore>(matches: &ArgMatches, planner: &mut Planner<S>) -> Result<String> {
    match matches.subcommand() {
        Some(("members", sub)) => run_members(sub, planner),
        Some(("sprints", sub)) => run_sprints(sub, planner),
        Some(("tasks", sub)) => run_tasks(sub, planner),
        Some(("dashboard", _)) => Ok(render(&planner.dashboard()?)),
        _ => Err(PlannerError::validation("unknown command")),
    }
}

fn run_members<S: DocumentStore>(matches: &ArgMatches, planner: &mut Planner<S>) -> Result<String> {
    match matches.subcommand() {
        Some(("list", _)) => Ok(render(&planner.list_members()?)),
        Some(("add", m)) => Ok(render(&planner.add_member(arg(m, "name"), arg(m, "emoji"))?)),
        Some(("show", m)) => Ok(render(&planner.get_member(arg(m, "member-id"))?)),
        Some(("update", m)) => {
            let member = planner.update_member(arg(m, "member-id"), opt_arg(m, "name"), opt_arg(m, "emoji"))?;
            Ok(render(&member))
        }
        Some(("remove", m)) => {
            let member_id = arg(m, "member-id");
            planner.remove_member(member_id)?;
            Ok(render(&Removed { removed: member_id }))
        }
        _ => Err(PlannerError::validation("unknown members command")),
    }
}

fn run_sprints<S: DocumentStore>(matches: &ArgMatches, planner: &mut Planner<S>) -> Result<String> {
    match matches.subcommand() {
        Some(("list", _)) => Ok(render(&planner.list_sprints()?)),
        Some(("create", m)) => {
            let start_date = parse_date("startDate", arg(m, "start"))?;
            let end_date = parse_date("endDate", arg(m, "end"))?;
            Ok(render(&planner.create_sprint(arg(m, "name"), start_date, end_date)?))
        }
        Some(("show", m)) => Ok(render(&planner.get_sprint(arg(m, "sprint-id"))?)),
        Some(("current", m)) => {
            let today = match opt_arg(m, "date") {
                Some(date) => parse_date("date", date)?,
                None => Local::now().date_naive(),
            };
            Ok(render(&planner.current_sprint(today)?))
        }
        _ => Err(PlannerError::validation("unknown sprints command")),
    }
}

fn run_tasks<S: DocumentStore>(matches: &ArgMatches, planner: &mut Planner<S>) -> Result<String> {
    match matches.subcommand() {
        Some(("list", m)) => Ok(render(&planner.list_tasks(arg(m, "sprint-id"))?)),
        Some(("add", m)) => {
            let time = m.get_one::<f64>("time").copied().unwrap_or_default();
            let task = planner.add_task(
                arg(m, "sprint-id"),
                arg(m, "member"),
                arg(m, "description"),
                arg(m, "client"),
                time,
            )?;
            Ok(render(&task))
        }
        Some(("update", m)) => {
            let update = TaskUpdate {
                description: opt_arg(m, "description").map(str::to_string),
                client_name: opt_arg(m, "client").map(str::to_string),
                time: m.get_one::<f64>("time").copied(),
            };
            Ok(render(&planner.update_task(arg(m, "sprint-id"), arg(m, "task-id"), update)?))
        }
        Some(("remove", m)) => Ok(render(&planner.remove_task(arg(m, "sprint-id"), arg(m, "task-id"))?)),
        _ => Err(PlannerError::validation("unknown tasks command")),
    }
}

pub const EXIT_VALIDATION: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_STORAGE: u8 = 3;

pub fn exit_code(err: &PlannerError) -> u8 {
    match err {
        PlannerError::Validation(_) => EXIT_VALIDATION,
        PlannerError::NotFound { .. } => EXIT_NOT_FOUND,
        PlannerError::Storage(_) => EXIT_STORAGE,
    }
}

/// Help and version exit 0; every other parse failure exits with the validation code.
pub fn parse_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        EXIT_VALIDATION
    } else {
        0
    }
}
