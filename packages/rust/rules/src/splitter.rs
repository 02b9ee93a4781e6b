//! Title splitting for `Name: Description` cells.

/// A title cell separated into display name and embedded description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitTitle {
    pub name: String,
    /// Empty when the title carried no description.
    pub description: String,
}

/// Split a raw title on its first colon.
///
/// `"3D-GNOME 3.0: A tool for 3D genome modelling"` yields name
/// `"3D-GNOME 3.0"` and description `"A tool for 3D genome modelling"`.
/// Later colons stay in the description. Titles without a colon, or whose
/// name half is blank, are returned unchanged with an empty description.
pub fn split_title(raw: &str) -> SplitTitle {
    if let Some((left, right)) = raw.split_once(':') {
        let name = left.trim();
        if !name.is_empty() {
            return SplitTitle {
                name: name.to_string(),
                description: right.trim().to_string(),
            };
        }
    }

    SplitTitle {
        name: raw.to_string(),
        description: String::new(),
    }
}
