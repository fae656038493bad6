use clap::{CommandFactory, Parser};
use join_cli::cli::{Cli, Command, ContactsCommand, SyncCommand, TaskFields, parse_rename};
use join_core::action::{App, Changed, Outcome, RenderScope, UiAction};
use join_core::board::{
    BoardView, ColumnView, NO_CONTACTS, NO_SUBTASKS, TaskDetail, render_board_html,
    render_column_html,
};
use join_core::config::{
    Config, ConfigOverrides, Palette, load_config_with_fallback, merge_overrides,
    palette_for_theme,
};
use join_core::contact_api::{ContactDraft, ContactPatch, ContactRepository, filter_contacts};
use join_core::error::AppError;
use join_core::form::{SubmitError, TaskForm};
use join_core::model::{Category, Contact};
use join_core::storage::ALL_KEYS;
use join_core::storage::json_store::LocalMirror;
use join_core::storage::remote::HttpRemoteStore;
use join_core::storage::sync::SyncedStore;
use join_core::summary::current_local_hour;
use join_core::transition::{DragTracker, menu_select, menu_targets};
use std::io::{self, BufRead};
use std::sync::Arc;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_JSON_ENV_VAR: &str = "JOIN_LOG_JSON";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let log_json = std::env::var(LOG_JSON_ENV_VAR)
        .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
        .unwrap_or(false);

    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn effective_config(overrides_raw: &[String]) -> Result<Config, AppError> {
    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error {
        eprintln!("WARNING: {err}");
    }

    let mut overrides = ConfigOverrides::default();
    for raw in overrides_raw {
        overrides.apply(raw)?;
    }
    Ok(merge_overrides(&loaded.config, &overrides))
}

fn open_store(config: &Config) -> Result<Arc<SyncedStore>, AppError> {
    let local = LocalMirror::from_env()?;
    if config.remote.enabled {
        let remote = HttpRemoteStore::new(&config.remote)?;
        debug!(endpoint = %config.remote.endpoint, "remote store enabled");
        Ok(Arc::new(SyncedStore::with_remote(local, Arc::new(remote))))
    } else {
        Ok(Arc::new(SyncedStore::local_only(local)))
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn push_column_rows(builder: &mut Builder, column: &ColumnView) {
    if let Some(placeholder) = column.placeholder {
        builder.push_record([column.title, "-", placeholder, "", "", "", ""]);
        return;
    }

    for card in &column.cards {
        let badges: Vec<&str> = card.badges.iter().map(|badge| badge.initials.as_str()).collect();
        builder.push_record([
            column.title.to_string(),
            card.id.to_string(),
            card.title.clone(),
            card.category.clone(),
            card.priority.label().to_string(),
            card.subtask_ratio()
                .map(|ratio| format!("{ratio} ({}%)", card.percent_done))
                .unwrap_or_else(|| "-".to_string()),
            badges.join(" "),
        ]);
    }
}

fn columns_table(columns: &[&ColumnView]) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "Column", "ID", "Title", "Category", "Priority", "Subtasks", "Assigned",
    ]);
    for column in columns {
        push_column_rows(&mut builder, column);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn print_board(board: &BoardView, palette: &Palette) {
    if let Some(query) = board.query.as_deref() {
        println!("{}", palette.mutedize(&format!("Search: \"{query}\"")));
    }
    let columns: Vec<&ColumnView> = board.columns.iter().collect();
    println!("{}", columns_table(&columns));
}

fn print_column(column: &ColumnView) {
    println!("{}", columns_table(&[column]));
}

fn print_detail(detail: &TaskDetail, palette: &Palette) {
    println!("{}", palette.accentize(&format!("Task {}: {}", detail.id, detail.title)));
    println!("Category: {}", detail.category);
    println!("Column: {}", detail.progress);
    println!("Due date: {}", detail.due_date);
    println!("Priority: {} ({})", detail.priority, detail.priority_icon);
    println!("Description: {}", detail.description);
    println!("Assigned to:");
    if detail.assignees.is_empty() {
        println!("  {}", palette.mutedize(NO_CONTACTS));
    }
    for assignee in &detail.assignees {
        println!("  {} {}", assignee.initials, assignee.full_name);
    }
    println!("Subtasks:");
    if detail.subtasks.is_empty() {
        println!("  {}", palette.mutedize(NO_SUBTASKS));
    }
    for subtask in &detail.subtasks {
        let mark = if subtask.done { "x" } else { " " };
        println!("  [{mark}] {} {}", subtask.id, subtask.text);
    }
}

fn print_contacts(contacts: &[Contact]) {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Initials", "Name", "Email", "Phone", "Color"]);
    for contact in contacts {
        builder.push_record([
            contact.id.to_string(),
            contact.initials(),
            contact.full_name(),
            contact.email.clone(),
            contact.phone.clone(),
            contact.color.clone(),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");
}

fn print_outcome(
    outcome: &Outcome,
    app: &App,
    json: bool,
    interactive: bool,
    palette: &Palette,
) -> Result<(), AppError> {
    if json {
        return match &outcome.changed {
            Changed::Task(task) => print_json(task),
            Changed::Contact(contact) => print_json(contact),
        };
    }

    println!("{}", palette.accentize(&outcome.message));
    if !interactive {
        return Ok(());
    }
    match outcome.render {
        RenderScope::Nothing => {}
        RenderScope::Board => print_board(&app.board(None), palette),
        RenderScope::Column(progress) => print_column(&app.column(progress)),
        RenderScope::Contacts => print_contacts(&app.contacts().sorted()),
    }
    Ok(())
}

fn submit_error(err: SubmitError) -> AppError {
    match err {
        SubmitError::Invalid(errors) => AppError::invalid_input(errors.to_string()),
        SubmitError::Failed(err) => err,
    }
}

fn apply_fields(
    form: &mut TaskForm,
    fields: TaskFields,
    contacts: &ContactRepository,
) -> Result<(), AppError> {
    if let Some(title) = fields.title {
        form.title = title;
    }
    if let Some(description) = fields.description {
        form.description = description;
    }
    if let Some(due_date) = fields.due_date {
        form.due_date = due_date;
    }
    if let Some(category) = fields.category {
        form.category = category;
    }
    if let Some(priority) = fields.priority {
        form.select_priority(priority);
    }
    for text in &fields.add_subtasks {
        form.add_subtask(text)
            .map_err(|err| AppError::invalid_input(format!("subtask '{}': {err}", text.trim())))?;
    }
    for contact_id in fields.assign {
        let contact = contacts.get(contact_id)?.clone();
        form.toggle_contact(&contact);
    }
    Ok(())
}

fn run_sync(command: SyncCommand, store: &SyncedStore, json: bool) -> Result<(), AppError> {
    let (verb, keys) = match command {
        SyncCommand::Pull => ("Pulled", store.pull(&ALL_KEYS)?),
        SyncCommand::Push => ("Pushed", store.push(&ALL_KEYS)?),
    };
    if json {
        return print_json(&keys);
    }
    if keys.is_empty() {
        println!("Nothing to sync");
    } else {
        println!("{verb}: {}", keys.join(", "));
    }
    Ok(())
}

fn run_command(cli: Cli, interactive: bool) -> Result<(), AppError> {
    let config = effective_config(&cli.config_override)?;
    let palette = palette_for_theme(config.theme.as_deref());
    let store = open_store(&config)?;
    let json = cli.json;

    let command = match cli.command {
        Command::Sync { sync } => return run_sync(sync, &store, json),
        Command::Categories => {
            if json {
                return print_json(&Category::names());
            }
            for category in Category::ALL {
                println!("{} ({})", category.name(), category.color());
            }
            return Ok(());
        }
        other => other,
    };

    let mut app = App::load(Arc::clone(&store))?;

    match command {
        Command::Board { search, html } => {
            let board = app.board(search.as_deref());
            if json {
                print_json(&board)?;
            } else if html {
                print!("{}", render_board_html(&board));
            } else {
                print_board(&board, &palette);
            }
        }
        Command::Column { column, html } => {
            let view = app.column(column);
            if json {
                print_json(&view)?;
            } else if html {
                print!("{}", render_column_html(&view));
            } else {
                print_column(&view);
            }
        }
        Command::Add { fields, column } => {
            let mut form = TaskForm::create(column);
            apply_fields(&mut form, fields, app.contacts())?;
            let outcome = form.submit(&mut app).map_err(submit_error)?;
            print_outcome(&outcome, &app, json, interactive, &palette)?;
        }
        Command::Edit {
            id,
            fields,
            remove_subtasks,
            rename_subtasks,
        } => {
            let mut form = TaskForm::edit(app.tasks().get(id)?);
            apply_fields(&mut form, fields, app.contacts())?;
            for subtask_id in remove_subtasks {
                if !form.delete_subtask(subtask_id) {
                    return Err(AppError::subtask_not_found(subtask_id));
                }
            }
            for raw in &rename_subtasks {
                let (subtask_id, text) = parse_rename(raw).map_err(AppError::invalid_input)?;
                let renamed = form
                    .rename_subtask(subtask_id, &text)
                    .map_err(|err| AppError::invalid_input(err.to_string()))?;
                if !renamed {
                    return Err(AppError::subtask_not_found(subtask_id));
                }
            }
            let outcome = form.submit(&mut app).map_err(submit_error)?;
            print_outcome(&outcome, &app, json, interactive, &palette)?;
        }
        Command::Move { id, column } => {
            let outcome = app.dispatch(UiAction::MoveTask { id, to: column })?;
            print_outcome(&outcome, &app, json, interactive, &palette)?;
        }
        Command::Menu { id, select } => {
            let current = app.tasks().get(id)?.progress;
            if let Some(choice) = select {
                let outcome = app.dispatch(menu_select(id, current, choice)?)?;
                print_outcome(&outcome, &app, json, interactive, &palette)?;
            } else {
                let targets = menu_targets(current);
                if json {
                    let labels: Vec<&str> = targets.iter().map(|target| target.label()).collect();
                    print_json(&labels)?;
                } else {
                    for target in targets {
                        println!("{} {}", u8::from(target), target.label());
                    }
                }
            }
        }
        Command::Drag {
            id,
            hold_ms,
            over,
            leave,
        } => {
            app.tasks().get(id)?;
            let mut tracker = DragTracker::new();
            tracker.press(id, 0);
            if tracker.tick(hold_ms) && !json {
                let labels: Vec<&str> = tracker
                    .drop_targets()
                    .iter()
                    .map(|target| target.label())
                    .collect();
                println!("Drop targets: {}", labels.join(", "));
            }
            if leave {
                tracker.leave();
            }
            match tracker.release(over, hold_ms) {
                Some(gesture) => match gesture.action() {
                    Some(action) => {
                        let outcome = app.dispatch(action)?;
                        print_outcome(&outcome, &app, json, interactive, &palette)?;
                    }
                    None => {
                        let detail = app.detail(id)?;
                        if json {
                            print_json(&detail)?;
                        } else {
                            print_detail(&detail, &palette);
                        }
                    }
                },
                None => {
                    if !json {
                        println!("Drag cancelled");
                    }
                }
            }
        }
        Command::Delete { id } => {
            let outcome = app.dispatch(UiAction::DeleteTask { id })?;
            print_outcome(&outcome, &app, json, interactive, &palette)?;
        }
        Command::Show { id } => {
            let detail = app.detail(id)?;
            if json {
                print_json(&detail)?;
            } else {
                print_detail(&detail, &palette);
            }
        }
        Command::ToggleSubtask {
            task_id,
            subtask_id,
        } => {
            let outcome = app.dispatch(UiAction::ToggleSubtask {
                task_id,
                subtask_id,
            })?;
            print_outcome(&outcome, &app, json, interactive, &palette)?;
        }
        Command::Summary => {
            let summary = app.summary(current_local_hour())?;
            if json {
                print_json(&summary)?;
            } else {
                let name = summary.user_name.as_deref().unwrap_or("Guest");
                println!("{}", palette.accentize(&format!("Good {}, {name}", summary.greeting)));
                println!("To do: {}", summary.to_do);
                println!("In progress: {}", summary.in_progress);
                println!("Await feedback: {}", summary.await_feedback);
                println!("Done: {}", summary.done);
                println!("Tasks in board: {}", summary.total);
                println!("Urgent: {}", summary.urgent);
                println!("Upcoming deadline: {}", summary.upcoming_deadline);
            }
        }
        Command::Contacts { contacts } => match contacts {
            ContactsCommand::List { filter } => {
                let mut listed = app.contacts().sorted();
                if let Some(query) = filter.as_deref() {
                    listed = filter_contacts(&listed, query);
                }
                if json {
                    print_json(&listed)?;
                } else {
                    print_contacts(&listed);
                }
            }
            ContactsCommand::Add {
                full_name,
                email,
                phone,
            } => {
                let outcome = app.dispatch(UiAction::CreateContact(ContactDraft {
                    full_name,
                    email,
                    phone,
                }))?;
                print_outcome(&outcome, &app, json, interactive, &palette)?;
            }
            ContactsCommand::Edit {
                id,
                name,
                email,
                phone,
            } => {
                let outcome = app.dispatch(UiAction::UpdateContact {
                    id,
                    patch: ContactPatch {
                        full_name: name,
                        email,
                        phone,
                    },
                })?;
                print_outcome(&outcome, &app, json, interactive, &palette)?;
            }
            ContactsCommand::Delete { id } => {
                let outcome = app.dispatch(UiAction::DeleteContact { id })?;
                print_outcome(&outcome, &app, json, interactive, &palette)?;
            }
        },
        Command::Sync { .. } | Command::Categories => {}
    }

    Ok(())
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_interactive() -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock.read_line(&mut input)?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {err}");
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("join".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli, true) {
            eprintln!("ERROR: {err}");
        }
    }

    Ok(())
}

fn main() {
    init_tracing();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive() {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli, false) {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
