use crate::schemas::Payer;

pub fn friend_paid(bill: f64, user_paid: f64) -> f64 {
    bill - user_paid
}

/// The signed amount to add to the selected friend's balance.
///
/// When the user pays the bill the friend owes their share, so the balance
/// moves up by what the friend consumed. When the friend pays, the user owes
/// what they consumed and the balance moves down by that amount.
pub fn split_delta(bill: f64, user_paid: f64, payer: Payer) -> f64 {
    match payer {
        Payer::User => friend_paid(bill, user_paid),
        Payer::Friend => -user_paid,
    }
}

pub fn round_to_2_decimals(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Standing {
    FriendOwesYou(f64),
    YouOweFriend(f64),
    Even,
}

impl Standing {
    pub fn of(balance: f64) -> Self {
        if balance > 0.0 {
            Standing::FriendOwesYou(balance)
        } else if balance < 0.0 {
            Standing::YouOweFriend(balance.abs())
        } else {
            Standing::Even
        }
    }

    /// Amounts are shown to the cent; the stored balance is left exact.
    pub fn describe(&self, name: &str, currency: &str) -> String {
        match self {
            Standing::FriendOwesYou(amount) => {
                format!("{name} owes you {currency} {}", round_to_2_decimals(*amount))
            }
            Standing::YouOweFriend(amount) => {
                format!("You owe {name} {currency} {}", round_to_2_decimals(*amount))
            }
            Standing::Even => format!("You and {name} are even"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_paying_moves_balance_by_friend_share() {
        assert_eq!(split_delta(100.0, 30.0, Payer::User), 70.0);
    }

    #[test]
    fn friend_paying_moves_balance_by_user_share() {
        assert_eq!(split_delta(50.0, 20.0, Payer::Friend), -20.0);
    }

    #[test]
    fn sub_cent_amounts_are_kept_exact() {
        assert_eq!(split_delta(0.004, 0.0, Payer::User), 0.004);
        assert_eq!(split_delta(1.0, 0.005, Payer::Friend), -0.005);
    }

    #[test]
    fn standing_text_is_shown_to_the_cent() {
        assert_eq!(
            Standing::of(0.1 + 0.2).describe("Sarah", "NT$"),
            "Sarah owes you NT$ 0.3"
        );
    }

    #[test]
    fn standing_text_follows_sign() {
        assert_eq!(
            Standing::of(-7.0).describe("Clark", "NT$"),
            "You owe Clark NT$ 7"
        );
        assert_eq!(
            Standing::of(20.0).describe("Sarah", "NT$"),
            "Sarah owes you NT$ 20"
        );
        assert_eq!(
            Standing::of(0.0).describe("Anthony", "NT$"),
            "You and Anthony are even"
        );
    }
}
