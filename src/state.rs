use tracing::{debug, info};

use crate::add_friend::{AddFriendForm, IdSource};
use crate::error::Rejection;
use crate::schemas::{Friend, FriendId, Payer};
use crate::selection::Selection;
use crate::split_bill::SplitBillForm;
use crate::store::FriendStore;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    ToggleAddForm,
    ResetAddFriend,
    EditAddFriend {
        name: Option<String>,
        image: Option<String>,
    },
    SubmitAddFriend,
    Select(FriendId),
    SetBill(Option<f64>),
    SetUserPaid(Option<f64>),
    SetPayer(Payer),
    SubmitSplitBill,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Applied,
    Skipped(Rejection),
}

pub struct Transition {
    pub state: AppState,
    pub outcome: Outcome,
}

/// Everything the screen shows, as one immutable value.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub friends: FriendStore,
    pub selection: Selection,
    pub add_friend: AddFriendForm,
    pub split_bill: SplitBillForm,
}

impl AppState {
    pub fn new(friends: Vec<Friend>, add_friend: AddFriendForm) -> Self {
        Self {
            friends: FriendStore::new(friends),
            add_friend,
            ..Default::default()
        }
    }

    pub fn with_demo_friends(add_friend: AddFriendForm) -> Self {
        let demo = [("118836", "Clark", -7.0), ("933372", "Sarah", 20.0), ("499476", "Anthony", 0.0)];
        let friends = demo
            .into_iter()
            .map(|(id, name, balance)| Friend {
                id: FriendId::new(id),
                name: name.to_string(),
                image: format!("https://i.pravatar.cc/48?u={id}"),
                balance,
            })
            .collect();
        Self::new(friends, add_friend)
    }

    pub fn selected_friend(&self) -> Option<&Friend> {
        self.selection
            .selected
            .as_ref()
            .and_then(|id| self.friends.get(id))
    }

    pub fn apply(&self, event: Event, ids: &dyn IdSource) -> Transition {
        match self.next(&event, ids) {
            Ok(state) => {
                info!(?event, "applied");
                Transition {
                    state,
                    outcome: Outcome::Applied,
                }
            }
            Err(rejection) => {
                debug!(?event, %rejection, "skipped");
                Transition {
                    state: self.clone(),
                    outcome: Outcome::Skipped(rejection),
                }
            }
        }
    }

    fn next(&self, event: &Event, ids: &dyn IdSource) -> Result<AppState, Rejection> {
        let state = match event {
            Event::ToggleAddForm => AppState {
                selection: self.selection.toggle_add_form(),
                ..self.clone()
            },
            Event::ResetAddFriend => AppState {
                add_friend: self.add_friend.reset(),
                ..self.clone()
            },
            Event::EditAddFriend { name, image } => AppState {
                add_friend: self.add_friend.edit(name.clone(), image.clone()),
                ..self.clone()
            },
            Event::SubmitAddFriend => {
                let friend = self.add_friend.submit(ids)?;
                AppState {
                    friends: self.friends.add_friend(friend)?,
                    selection: self.selection.close_add_form(),
                    add_friend: self.add_friend.reset(),
                    ..self.clone()
                }
            }
            Event::Select(id) => {
                if !self.friends.contains(id) {
                    return Err(Rejection::UnknownFriend(id.clone()));
                }
                AppState {
                    selection: self.selection.select(id),
                    split_bill: SplitBillForm::default(),
                    ..self.clone()
                }
            }
            Event::SetBill(bill) => AppState {
                split_bill: self.split_bill.set_bill(*bill),
                ..self.clone()
            },
            Event::SetUserPaid(user_paid) => AppState {
                split_bill: self.split_bill.set_user_paid(*user_paid)?,
                ..self.clone()
            },
            Event::SetPayer(payer) => AppState {
                split_bill: self.split_bill.set_payer(*payer),
                ..self.clone()
            },
            Event::SubmitSplitBill => {
                let id = self.selection.selected.as_ref().ok_or(Rejection::NoSelection)?;
                let delta = self.split_bill.submit()?;
                let friends = self
                    .friends
                    .apply_balance_delta(id, delta)
                    .ok_or_else(|| Rejection::UnknownFriend(id.clone()))?;
                AppState {
                    friends,
                    selection: self.selection.clear(),
                    split_bill: SplitBillForm::default(),
                    ..self.clone()
                }
            }
        };
        Ok(state)
    }
}
