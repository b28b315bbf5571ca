//! Database model exports.

pub mod group;
pub mod keys;
pub mod offense;

pub use group::{GroupSettings, Template, USER_PLACEHOLDER};
pub use keys::{GroupKey, UserKey};
pub use offense::{
    OffenseLedger, OffenseRecord, Strike, SweepReport, OFFENSE_WINDOW, REMOVAL_THRESHOLD,
    WARN_THRESHOLD, now_millis,
};
