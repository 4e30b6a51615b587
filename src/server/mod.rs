mod configs;
pub mod dto;
mod favorites;
mod generate;
mod plans;
pub mod response;
mod router;
mod shares;
mod users;

pub use router::{AppState, create_router};
