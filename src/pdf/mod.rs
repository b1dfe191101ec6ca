//! Form document handling — field positions and the overlay compositor.

pub mod compositor;
pub mod positions;

pub use compositor::FormRenderer;
pub use positions::{FieldPosition, PositionRegistry, default_positions};
