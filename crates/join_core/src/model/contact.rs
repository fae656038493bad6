use crate::text::initial;
use serde::{Deserialize, Serialize};

pub const CONTACT_PALETTE: [&str; 14] = [
    "red", "green", "blue", "yellow", "orange", "purple", "pink", "teal", "brown", "gray", "cyan",
    "magenta", "lime", "indigo",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: u64,
    pub name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub color: String,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }

    pub fn initials(&self) -> String {
        format!("{}{}", initial(&self.name), initial(&self.last_name))
    }

    /// Palette entry for a new contact, picked by identifier.
    pub fn color_for(id: u64) -> &'static str {
        CONTACT_PALETTE[(id as usize) % CONTACT_PALETTE.len()]
    }
}
