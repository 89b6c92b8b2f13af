pub mod calendar;
pub mod composer;
pub mod error;
pub mod generation;
pub mod media;
pub mod org;
pub mod overview;
pub mod permissions;
pub mod posts;
pub mod resources;
pub mod schedule;
pub mod seeding;
pub mod sync;

pub use error::ServiceError;
