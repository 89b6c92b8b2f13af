pub mod generation;
pub mod media;
pub mod organization;
pub mod permission;
pub mod post;
pub mod resources;
pub mod seeding;
pub mod session;
pub mod stats;
pub mod sync;
pub mod validation;
