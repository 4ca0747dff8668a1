//! Deprovisioning action selection.
//!
//! Actions are grouped into four categories the operator can toggle as a
//! block, with individual checkboxes inside each enabled category. The wire
//! form is the flat map the backend reads: one `<category>Actions` boolean
//! per category, plus one boolean per checkbox of each enabled category.

use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Ad,
    M365,
    Mfa,
    Org,
}

impl Category {
    pub const ALL: [Category; 4] = [Category::Ad, Category::M365, Category::Mfa, Category::Org];

    pub fn key(&self) -> &'static str {
        match self {
            Category::Ad => "ad",
            Category::M365 => "m365",
            Category::Mfa => "mfa",
            Category::Org => "org",
        }
    }

    /// Flat payload key carrying the category's enabled flag.
    pub fn wire_flag(&self) -> &'static str {
        match self {
            Category::Ad => "adActions",
            Category::M365 => "m365Actions",
            Category::Mfa => "mfaActions",
            Category::Org => "orgActions",
        }
    }

    /// Checkbox ids belonging to this category, as the backend knows them.
    pub fn check_ids(&self) -> &'static [&'static str] {
        match self {
            Category::Ad => &["disableAD", "expireAD", "resetADPassword"],
            Category::M365 => &["disableM365", "revokeSessions"],
            Category::Mfa => &["removeMFA"],
            Category::Org => &["moveToTerminated"],
        }
    }

    pub fn parse(key: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.key() == key)
    }
}

#[derive(Debug, Clone)]
struct CategoryState {
    category: Category,
    enabled: bool,
    // (checkbox id, checked) in declaration order
    checks: Vec<(&'static str, bool)>,
}

/// The operator's current opt-in set. Rebuilt into a fresh payload on every
/// submit; never persisted between runs.
#[derive(Debug, Clone)]
pub struct ActionSelection {
    groups: Vec<CategoryState>,
}

impl Default for ActionSelection {
    /// Every category enabled with every action checked.
    fn default() -> Self {
        let groups = Category::ALL
            .into_iter()
            .map(|category| CategoryState {
                category,
                enabled: true,
                checks: category.check_ids().iter().map(|id| (*id, true)).collect(),
            })
            .collect();
        Self { groups }
    }
}

impl ActionSelection {
    pub fn is_enabled(&self, category: Category) -> bool {
        self.group(category).enabled
    }

    /// Toggle a whole category. Disabling a category also unchecks all of
    /// its boxes, matching the page behavior.
    pub fn set_enabled(&mut self, category: Category, enabled: bool) {
        let group = self.group_mut(category);
        group.enabled = enabled;
        if !enabled {
            for (_, checked) in &mut group.checks {
                *checked = false;
            }
        }
    }

    /// Set one checkbox by id. Returns false when no category owns the id.
    pub fn set_checked(&mut self, id: &str, checked: bool) -> bool {
        for group in &mut self.groups {
            if let Some(slot) = group.checks.iter_mut().find(|(check_id, _)| *check_id == id) {
                slot.1 = checked;
                return true;
            }
        }
        false
    }

    pub fn is_checked(&self, id: &str) -> Option<bool> {
        self.groups
            .iter()
            .flat_map(|g| g.checks.iter())
            .find(|(check_id, _)| *check_id == id)
            .map(|(_, checked)| *checked)
    }

    /// (id, checked) pairs for one category, for display.
    pub fn checks(&self, category: Category) -> &[(&'static str, bool)] {
        &self.group(category).checks
    }

    fn group(&self, category: Category) -> &CategoryState {
        self.groups
            .iter()
            .find(|g| g.category == category)
            .expect("all categories present")
    }

    fn group_mut(&mut self, category: Category) -> &mut CategoryState {
        self.groups
            .iter_mut()
            .find(|g| g.category == category)
            .expect("all categories present")
    }
}

impl Serialize for ActionSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for group in &self.groups {
            map.serialize_entry(group.category.wire_flag(), &group.enabled)?;
            if group.enabled {
                for (id, checked) in &group.checks {
                    map.serialize_entry(id, checked)?;
                }
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn default_selection_serializes_every_flag_and_check() {
        let selection = ActionSelection::default();
        let value = serde_json::to_value(&selection).unwrap();
        assert_eq!(
            value,
            json!({
                "adActions": true,
                "disableAD": true,
                "expireAD": true,
                "resetADPassword": true,
                "m365Actions": true,
                "disableM365": true,
                "revokeSessions": true,
                "mfaActions": true,
                "removeMFA": true,
                "orgActions": true,
                "moveToTerminated": true,
            })
        );
    }

    #[test]
    fn disabled_category_omits_its_checkboxes() {
        let mut selection = ActionSelection::default();
        selection.set_enabled(Category::Mfa, false);

        let value = serde_json::to_value(&selection).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.get("mfaActions"), Some(&Value::Bool(false)));
        assert!(!map.contains_key("removeMFA"));
    }

    #[test]
    fn disabling_unchecks_then_reenabling_stays_unchecked() {
        let mut selection = ActionSelection::default();
        selection.set_enabled(Category::Ad, false);
        selection.set_enabled(Category::Ad, true);
        assert_eq!(selection.is_checked("disableAD"), Some(false));

        assert!(selection.set_checked("disableAD", true));
        assert_eq!(selection.is_checked("disableAD"), Some(true));
    }

    #[test]
    fn unknown_checkbox_id_is_reported() {
        let mut selection = ActionSelection::default();
        assert!(!selection.set_checked("noSuchBox", true));
        assert_eq!(selection.is_checked("noSuchBox"), None);
    }

    #[test]
    fn category_keys_parse_back() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.key()), Some(category));
        }
        assert_eq!(Category::parse("unknown"), None);
    }
}
