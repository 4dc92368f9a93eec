pub mod apply;
pub mod destroy;
pub mod import;
pub mod plan;
pub mod read;
pub mod refresh;
pub mod resources;

use keycard_provider::{KeycardProvider, StateManager};

/// Configured provider and state store shared by the commands
pub struct Context {
    pub provider: KeycardProvider,
    pub state: StateManager,
}
