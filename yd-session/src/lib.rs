//! yd-session: wire event payloads and the authority-side match gateway.

pub mod gateway;
pub mod protocol;

pub use gateway::{GatewayError, Outbox, SessionGateway};
pub use protocol::{
    dice_wire, score_table, GameOverStatus, GameUpdateV1, InboundEvent, MatchId, OutboundEvent,
    PlayerId, ScoreTableV1, PROTOCOL_VERSION, UNFILLED,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}
