use actix_cors::Cors;
use actix_web::{get, http::header, post, web, App, HttpResponse, HttpServer};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod add_friend;
mod balance;
mod config;
mod error;
mod schemas;
mod selection;
mod split_bill;
mod state;
mod store;

use crate::add_friend::{AddFriendForm, IdSource, RandomIds};
use crate::balance::Standing;
use crate::error::ApiError;
use crate::schemas::{Friend, FriendId, Payer};
use crate::split_bill::SplitBillForm;
use crate::state::{AppState, Event, Outcome};

/// The single in-memory ledger shared by every request.
struct Ledger {
    state: Mutex<AppState>,
    ids: Box<dyn IdSource>,
    currency: String,
}

impl Ledger {
    fn new(state: AppState, ids: Box<dyn IdSource>, currency: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(state),
            ids,
            currency: currency.into(),
        }
    }

    /// Runs the events in order against the current state.
    ///
    /// The first rejected event stops the run, so later events never act on
    /// form values the request did not set.
    fn dispatch(&self, events: Vec<Event>) -> Result<HttpResponse, ApiError> {
        let mut guard = self.state.lock().map_err(|_| ApiError::StatePoisoned)?;
        let before = guard.friends.clone();
        let mut skipped_reason = None;
        for event in events {
            let transition = guard.apply(event, self.ids.as_ref());
            *guard = transition.state;
            if let Outcome::Skipped(rejection) = transition.outcome {
                skipped_reason = Some(rejection.to_string());
                break;
            }
        }
        Ok(HttpResponse::Ok().json(Reply {
            applied: skipped_reason.is_none(),
            skipped_reason,
            friends_changed: !guard.friends.same_snapshot(&before),
            state: Snapshot::of(&guard, &self.currency),
        }))
    }
}

#[derive(Serialize)]
struct Reply<'a> {
    applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped_reason: Option<String>,
    friends_changed: bool,
    state: Snapshot<'a>,
}

#[derive(Serialize)]
struct FriendView<'a> {
    #[serde(flatten)]
    friend: &'a Friend,
    selected: bool,
    standing: String,
}

#[derive(Serialize)]
struct SplitBillView<'a> {
    #[serde(flatten)]
    form: &'a SplitBillForm,
    friend_paid: Option<f64>,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    friends: Vec<FriendView<'a>>,
    selected: Option<&'a FriendId>,
    show_add_form: bool,
    add_friend: &'a AddFriendForm,
    split_bill: SplitBillView<'a>,
}

impl<'a> Snapshot<'a> {
    fn of(state: &'a AppState, currency: &str) -> Self {
        let friends = state
            .friends
            .friends()
            .iter()
            .map(|friend| FriendView {
                selected: state.selection.is_selected(&friend.id),
                standing: Standing::of(friend.balance).describe(&friend.name, currency),
                friend,
            })
            .collect();
        Snapshot {
            friends,
            selected: state.selected_friend().map(|friend| &friend.id),
            show_add_form: state.selection.show_add_form,
            add_friend: &state.add_friend,
            split_bill: SplitBillView {
                form: &state.split_bill,
                friend_paid: state.split_bill.friend_paid(),
            },
        }
    }
}

// Form fields arrive as loosely typed input. A missing or unreadable field
// counts as unset and ends in a rejection, never a 400.
#[derive(Deserialize)]
struct AddFriendJson {
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    image: Option<String>,
}

#[derive(Deserialize)]
struct SplitBillJson {
    #[serde(default, deserialize_with = "lenient_amount")]
    bill: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    user_paid: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    payer: Option<Payer>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Accepts a JSON number or a numeric string, as typed into a text input.
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(amount.filter(|n| n.is_finite()))
}

#[get("/state")]
async fn get_state(ledger: web::Data<Ledger>) -> Result<HttpResponse, ApiError> {
    ledger.dispatch(vec![])
}

#[post("/add-friend-form/toggle")]
async fn toggle_add_form(ledger: web::Data<Ledger>) -> Result<HttpResponse, ApiError> {
    ledger.dispatch(vec![Event::ToggleAddForm])
}

#[post("/friends")]
async fn submit_add_friend(
    ledger: web::Data<Ledger>,
    json: web::Json<AddFriendJson>,
) -> Result<HttpResponse, ApiError> {
    let json = json.into_inner();
    ledger.dispatch(vec![
        Event::ResetAddFriend,
        Event::EditAddFriend {
            name: json.name,
            image: json.image,
        },
        Event::SubmitAddFriend,
    ])
}

#[post("/friends/{id}/select")]
async fn select_friend(
    ledger: web::Data<Ledger>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    ledger.dispatch(vec![Event::Select(FriendId::new(id.into_inner()))])
}

#[post("/split-bill")]
async fn submit_split_bill(
    ledger: web::Data<Ledger>,
    json: web::Json<SplitBillJson>,
) -> Result<HttpResponse, ApiError> {
    let json = json.into_inner();
    ledger.dispatch(vec![
        Event::SetBill(json.bill),
        Event::SetUserPaid(json.user_paid),
        Event::SetPayer(json.payer.unwrap_or_default()),
        Event::SubmitSplitBill,
    ])
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_state)
        .service(toggle_add_form)
        .service(submit_add_friend)
        .service(select_friend)
        .service(submit_split_bill);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = config::load_settings().map_err(|err| {
        error!(error = %err, "failed to load settings");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
    })?;
    info!(bind = %settings.bind, currency = %settings.currency, "starting ledger");

    let form = AddFriendForm::with_default_image(settings.default_image.clone());
    let state = if settings.seed_demo_friends {
        AppState::with_demo_friends(form)
    } else {
        AppState::new(vec![], form)
    };
    let ledger = web::Data::new(Ledger::new(state, Box::new(RandomIds), settings.currency.clone()));
    let origin = settings.allowed_origin.clone();

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&origin)
            .allowed_methods(vec!["GET", "POST"])
            .allowed_header(header::CONTENT_TYPE);
        App::new()
            .wrap(cors)
            .app_data(ledger.clone())
            .configure(routes)
    })
    .workers(1)
    .bind(settings.bind.as_str())?
    .run()
    .await
}
