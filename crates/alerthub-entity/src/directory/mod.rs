//! Directory entities: users and teams.

pub mod team;
pub mod user;

pub use team::Team;
pub use user::User;
