//! Page state machines
//!
//! Each page issues at most two account operations and settles into a
//! terminal state, which is then rendered. Account failures are never
//! propagated out of a page; they select a state instead.

mod home;
mod login;
mod logout;
mod not_found;

pub use home::{HomeState, HomeView, SessionView, UserView};
pub use login::{LoginQuery, LoginState, LoginView, ProviderView, ReturnUrls};
pub use logout::{LogoutDelays, LogoutState, LogoutView};
pub use not_found::NotFound;
