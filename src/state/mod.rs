// ============================================================================
// STATE MODULE - Stores over Rc<RefCell> + change notifications
// ============================================================================

pub mod reactivity;
pub mod mutation_gate;
pub mod session_state;
pub mod cart_state;
pub mod shopping_list_state;
pub mod app_state;

pub use reactivity::*;
pub use mutation_gate::*;
pub use session_state::*;
pub use cart_state::*;
pub use shopping_list_state::*;
pub use app_state::*;
