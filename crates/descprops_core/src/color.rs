//! Task color lookup.
//!
//! # Responsibility
//! - Map user-typed color names or ids to canonical palette ids.
//!
//! # Invariants
//! - Lookup never invents ids; unknown input yields `None`.

/// Resolves a color name or id to a canonical color id.
pub trait ColorResolver {
    fn find(&self, name_or_id: &str) -> Option<String>;
}

/// `(id, display name)` pairs of the built-in palette.
const DEFAULT_PALETTE: &[(&str, &str)] = &[
    ("yellow", "Yellow"),
    ("blue", "Blue"),
    ("green", "Green"),
    ("purple", "Purple"),
    ("red", "Red"),
    ("orange", "Orange"),
    ("grey", "Grey"),
    ("brown", "Brown"),
    ("deep_orange", "Deep Orange"),
    ("dark_grey", "Dark Grey"),
    ("pink", "Pink"),
    ("teal", "Teal"),
    ("cyan", "Cyan"),
    ("lime", "Lime"),
    ("light_green", "Light Green"),
    ("amber", "Amber"),
];

/// Fixed color palette.
///
/// Ids match exactly; display names match case-insensitively with spaces
/// ignored, so `DeepOrange` and `deep orange` both find `deep_orange`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    entries: Vec<(String, String)>,
}

impl ColorPalette {
    /// Builds a palette from `(id, display name)` pairs.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(id, name)| (id.into(), name.into()))
                .collect(),
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE.iter().copied())
    }
}

impl ColorResolver for ColorPalette {
    fn find(&self, name_or_id: &str) -> Option<String> {
        if let Some((id, _)) = self.entries.iter().find(|(id, _)| id == name_or_id) {
            return Some(id.clone());
        }

        let wanted = squash(name_or_id);
        if wanted.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(_, name)| squash(name) == wanted)
            .map(|(id, _)| id.clone())
    }
}

fn squash(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ColorPalette, ColorResolver};

    #[test]
    fn finds_by_id() {
        let palette = ColorPalette::default();
        assert_eq!(palette.find("red").as_deref(), Some("red"));
        assert_eq!(palette.find("deep_orange").as_deref(), Some("deep_orange"));
    }

    #[test]
    fn finds_by_display_name_ignoring_case_and_spaces() {
        let palette = ColorPalette::default();
        assert_eq!(palette.find("Deep Orange").as_deref(), Some("deep_orange"));
        assert_eq!(palette.find("LIGHTGREEN").as_deref(), Some("light_green"));
        assert_eq!(palette.find("Red").as_deref(), Some("red"));
    }

    #[test]
    fn unknown_color_is_none() {
        let palette = ColorPalette::default();
        assert_eq!(palette.find("chartreuse"), None);
        assert_eq!(palette.find(" "), None);
    }

    #[test]
    fn custom_palette_replaces_defaults() {
        let palette = ColorPalette::new([("ink", "Ink Blue")]);
        assert_eq!(palette.find("ink blue").as_deref(), Some("ink"));
        assert_eq!(palette.find("red"), None);
    }
}
