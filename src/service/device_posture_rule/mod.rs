//! `device_posture_rule`: Zero Trust device posture rules
//!
//! Import IDs take the form `<account_id>/<rule_id>`.

pub mod input;
mod model;
mod resource;

pub use input::{PostureInput, PostureRuleType, UnsupportedRuleType};
pub use model::{
    build_model_from_rule, build_rule_from_model, DevicePostureRuleInputModel,
    DevicePostureRuleMatchModel, DevicePostureRuleModel,
};
pub use resource::{new_resource, DevicePostureRuleResource};
