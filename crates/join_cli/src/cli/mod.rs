use clap::{Args, Parser, Subcommand};
use join_core::model::{Priority, Progress};

#[derive(Parser, Debug)]
#[command(author, version, about = "Kanban board for the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the board grouped by column
    ///
    /// Example: join board
    /// Example: join board --search report --html
    Board {
        /// Only show tasks whose title or description contains this text
        #[arg(long)]
        search: Option<String>,
        /// Render HTML instead of a table
        #[arg(long)]
        html: bool,
    },
    /// Show a single column
    ///
    /// Example: join column "await feedback"
    Column {
        column: Progress,
        #[arg(long)]
        html: bool,
    },
    /// Add a task to a column
    ///
    /// Example: join add --title "Fix bug" --description "Crash" --due 2025-12-20 --category Development
    Add {
        #[command(flatten)]
        fields: TaskFields,
        /// Column the task starts in
        #[arg(long, default_value = "todo")]
        column: Progress,
    },
    /// Edit a task; omitted fields keep their value
    ///
    /// Example: join edit 1 --priority urgent --add-subtask "Write tests"
    Edit {
        id: u64,
        #[command(flatten)]
        fields: TaskFields,
        /// Delete the subtask with this id
        #[arg(long = "remove-subtask", value_name = "SUBTASK_ID")]
        remove_subtasks: Vec<u64>,
        /// Rename a subtask (format ID=TEXT)
        #[arg(long = "rename-subtask", value_name = "ID=TEXT")]
        rename_subtasks: Vec<String>,
    },
    /// Move a task to another column
    ///
    /// Example: join move 1 done
    Move { id: u64, column: Progress },
    /// List the columns a task can be moved to, or pick one
    ///
    /// Example: join menu 1 --select done
    Menu {
        id: u64,
        /// Column chosen from the menu
        #[arg(long)]
        select: Option<Progress>,
    },
    /// Press, hold and release a card
    ///
    /// Example: join drag 1 --hold-ms 800 --over done
    Drag {
        id: u64,
        /// How long the card is held before release
        #[arg(long = "hold-ms", default_value_t = 0)]
        hold_ms: u64,
        /// Placeholder column under the pointer on release
        #[arg(long)]
        over: Option<Progress>,
        /// Pointer leaves the card before release
        #[arg(long)]
        leave: bool,
    },
    /// Delete a task
    ///
    /// Example: join delete 1
    Delete { id: u64 },
    /// Show details of a task
    ///
    /// Example: join show 1
    Show { id: u64 },
    /// Flip a subtask between open and done
    ///
    /// Example: join toggle-subtask 1 2
    ToggleSubtask { task_id: u64, subtask_id: u64 },
    /// Counts, urgent tasks and the next deadline
    ///
    /// Example: join summary
    Summary,
    /// Task categories
    ///
    /// Example: join categories
    Categories,
    /// Manage contacts
    ///
    /// Example: join contacts list
    Contacts {
        #[command(subcommand)]
        contacts: ContactsCommand,
    },
    /// Copy data between the local mirror and the remote store
    ///
    /// Example: join sync pull
    Sync {
        #[command(subcommand)]
        sync: SyncCommand,
    },
}

#[derive(Args, Debug, Default)]
pub struct TaskFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long = "due")]
    pub due_date: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub priority: Option<Priority>,
    /// Add a subtask (repeatable)
    #[arg(long = "add-subtask", value_name = "TEXT")]
    pub add_subtasks: Vec<String>,
    /// Assign or unassign a contact by id (repeatable)
    #[arg(long = "assign", value_name = "CONTACT_ID")]
    pub assign: Vec<u64>,
}

#[derive(Subcommand, Debug)]
pub enum ContactsCommand {
    /// List contacts sorted by first name
    ///
    /// Example: join contacts list --filter ann
    List {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Add a contact
    ///
    /// Example: join contacts add "Anna Berg" --email anna@example.com
    Add {
        full_name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Edit a contact
    ///
    /// Example: join contacts edit 1 --phone "0151 1234"
    Edit {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Delete a contact
    ///
    /// Example: join contacts delete 1
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum SyncCommand {
    /// Replace local keys with the remote copies
    Pull,
    /// Send local keys to the remote store
    Push,
}

/// Splits an `ID=TEXT` rename argument.
pub fn parse_rename(raw: &str) -> Result<(u64, String), String> {
    let (id_raw, text) = raw
        .split_once('=')
        .ok_or_else(|| "rename must be in ID=TEXT format".to_string())?;
    let id = id_raw
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("subtask id '{}' is not numeric", id_raw.trim()))?;
    Ok((id, text.to_string()))
}
