use serde::Serialize;

use crate::balance::{friend_paid, split_delta};
use crate::error::Rejection;
use crate::schemas::Payer;

/// Inputs of the split-bill form for the current selection.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SplitBillForm {
    pub bill: Option<f64>,
    pub user_paid: Option<f64>,
    pub payer: Payer,
}

impl SplitBillForm {
    pub fn set_bill(&self, bill: Option<f64>) -> SplitBillForm {
        SplitBillForm {
            bill,
            ..self.clone()
        }
    }

    /// An expense above the bill is refused and the previous value kept.
    /// An unset bill counts as zero here.
    pub fn set_user_paid(&self, user_paid: Option<f64>) -> Result<SplitBillForm, Rejection> {
        let bill = self.bill.unwrap_or(0.0);
        if let Some(value) = user_paid {
            if value > bill {
                return Err(Rejection::UserPaidExceedsBill {
                    user_paid: value,
                    bill,
                });
            }
        }
        Ok(SplitBillForm {
            user_paid,
            ..self.clone()
        })
    }

    pub fn set_payer(&self, payer: Payer) -> SplitBillForm {
        SplitBillForm {
            payer,
            ..self.clone()
        }
    }

    /// Only meaningful once a non-zero bill is entered.
    pub fn friend_paid(&self) -> Option<f64> {
        self.entered_bill()
            .map(|bill| friend_paid(bill, self.user_paid.unwrap_or(0.0)))
    }

    fn entered_bill(&self) -> Option<f64> {
        self.bill.filter(|bill| *bill != 0.0)
    }

    /// Returns the balance delta for the selected friend.
    pub fn submit(&self) -> Result<f64, Rejection> {
        let bill = self.entered_bill().ok_or(Rejection::BillUnset)?;
        let user_paid = self.user_paid.ok_or(Rejection::UserPaidUnset)?;
        Ok(split_delta(bill, user_paid, self.payer))
    }
}
