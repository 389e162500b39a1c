pub mod display;
pub mod normalize;

pub use display::{allocation_shares, chain_icon_url, protocol_icon_url, render_cards};
pub use normalize::{fallback_allocations, normalize};
