pub mod json_store;
pub mod remote;
pub mod sync;

pub const TASKS_KEY: &str = "tasks";
pub const CONTACTS_KEY: &str = "contacts";
pub const CATEGORY_KEY: &str = "category";
pub const USERS_KEY: &str = "users";
pub const LOGGED_IN_USER_KEY: &str = "loggedInUser";

/// Every key the board keeps in the mirror, in bootstrap order.
pub const ALL_KEYS: [&str; 5] = [
    USERS_KEY,
    CONTACTS_KEY,
    CATEGORY_KEY,
    TASKS_KEY,
    LOGGED_IN_USER_KEY,
];
