// ABOUTME: Event plumbing shared by sibling panes.
// ABOUTME: Provides a typed async bus and the sequential size negotiation protocol.

pub mod bus;
pub mod negotiation;

pub use bus::{BusEvent, EmitError, EventBus, ListenerError, SubscriptionId};
pub use negotiation::{
    NegotiationError, NegotiationOutcome, ResizeRequest, SizeBus, SizeNegotiator,
};
