use crate::core::personality::PersonalityRegistry;

#[derive(Debug, Clone)]
pub struct PickerItem {
    pub id: String,
    pub label: String,
}

/// Modal personality chooser; selection wraps at both ends.
#[derive(Debug, Clone)]
pub struct PickerState {
    pub title: String,
    pub items: Vec<PickerItem>,
    pub selected: usize,
}

impl PickerState {
    pub fn new<T: Into<String>>(title: T, items: Vec<PickerItem>, selected: usize) -> Self {
        let selected = selected.min(items.len().saturating_sub(1));
        Self {
            title: title.into(),
            items,
            selected,
        }
    }

    /// One row per registered personality, starting on `current`.
    pub fn for_personalities(registry: &PersonalityRegistry, current: &str) -> Self {
        let items = registry
            .iter()
            .map(|personality| PickerItem {
                id: personality.id.clone(),
                label: format!("{} {}", personality.avatar, personality.display_name),
            })
            .collect();
        let selected = registry.position(current).unwrap_or(0);
        Self::new("Pick a personality", items, selected)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.items.get(self.selected).map(|item| item.id.as_str())
    }

    pub fn move_up(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = if self.selected == 0 {
            self.items.len() - 1
        } else {
            self.selected - 1
        };
    }

    pub fn move_down(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }
}
