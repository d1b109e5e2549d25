//! `turnstile_widget`: Turnstile challenge widgets
//!
//! Identity is `(account_id, id)` where `id` is the widget's site key.
//! Import IDs take the form `<account_id>/<sitekey>`.

mod model;
mod resource;

pub use model::{
    build_challenge_model_from_widget, build_challenge_widget_from_model, TurnstileWidgetModel,
};
pub use resource::{new_resource, TurnstileWidgetResource};
