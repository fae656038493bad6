use serde::{Deserialize, Serialize};
use std::fmt;

/// Label the category picker shows before anything is chosen.
pub const CATEGORY_PLACEHOLDER: &str = "Select task category";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Development,
    Design,
    Sales,
    Backoffice,
    Media,
    Marketing,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Development,
        Category::Design,
        Category::Sales,
        Category::Backoffice,
        Category::Media,
        Category::Marketing,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Design => "Design",
            Self::Sales => "Sales",
            Self::Backoffice => "Backoffice",
            Self::Media => "Media",
            Self::Marketing => "Marketing",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Development => "var(--boardCards)",
            Self::Design => "var(--btnHoverColor)",
            Self::Sales => "var(--priority-low)",
            Self::Backoffice => "var(--priority-medium)",
            Self::Media => "var(--menuInitials)",
            Self::Marketing => "var(--scrollThumb)",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(trimmed))
    }

    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|category| category.name().to_string()).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::{CATEGORY_PLACEHOLDER, Category};

    #[test]
    fn from_name_is_case_insensitive() {
        assert_eq!(Category::from_name("design"), Some(Category::Design));
        assert_eq!(Category::from_name(" Sales "), Some(Category::Sales));
    }

    #[test]
    fn placeholder_is_not_a_category() {
        assert_eq!(Category::from_name(CATEGORY_PLACEHOLDER), None);
    }

    #[test]
    fn every_category_has_a_color() {
        for category in Category::ALL {
            assert!(category.color().starts_with("var(--"));
        }
    }
}
