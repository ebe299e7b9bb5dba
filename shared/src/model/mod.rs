pub mod user_model;

pub use user_model::{LoginOutcome, NewUser, RegisterInput, User, UserSummary, UserUpdate};
