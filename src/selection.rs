use crate::schemas::FriendId;

/// Which friend the split-bill form targets and whether the add-friend form
/// is open.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub selected: Option<FriendId>,
    pub show_add_form: bool,
}

impl Selection {
    /// Selecting the already selected friend deselects it.
    pub fn select(&self, id: &FriendId) -> Selection {
        let selected = match &self.selected {
            Some(current) if current == id => None,
            _ => Some(id.clone()),
        };
        Selection {
            selected,
            show_add_form: false,
        }
    }

    pub fn toggle_add_form(&self) -> Selection {
        Selection {
            show_add_form: !self.show_add_form,
            ..self.clone()
        }
    }

    pub fn close_add_form(&self) -> Selection {
        Selection {
            show_add_form: false,
            ..self.clone()
        }
    }

    pub fn clear(&self) -> Selection {
        Selection {
            selected: None,
            ..self.clone()
        }
    }

    pub fn is_selected(&self, id: &FriendId) -> bool {
        self.selected.as_ref() == Some(id)
    }
}
