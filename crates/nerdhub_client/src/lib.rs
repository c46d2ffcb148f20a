//! NerdHub client: backend API, effect execution, poll timers and local state.
mod api;
mod auth;
mod handle;
mod persist;
mod timers;
mod types;

pub use api::{ApiSettings, HubApi, ReqwestHubApi};
pub use auth::{AnonymousProvider, AuthContext, AuthError, ClaimsFileProvider, IdentityProvider};
pub use handle::{execute, ClientHandle};
pub use persist::{ensure_state_dir, PersistError, StateFile};
pub use timers::PollTimers;
pub use types::{ApiError, ClientEvent, FailureKind};
