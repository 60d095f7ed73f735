//! SessionGateway: translates inbound session events into state machine
//! calls and pushes the resulting deltas to both participants.
//!
//! Delivery is behind the [`Outbox`] trait so the core never depends on a
//! particular transport; the host wires it to sockets, channels, or a test
//! buffer. All mutations of one match go through its single [`MatchDriver`]
//! here, which serializes them by construction.

use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;

use yd_core::{
    Config, MatchOutcome, MatchState, SeatResult, TransitionError, TurnEngine, NUM_DICE,
};
use yd_dice::{RollError, RollSession, RollStatus};
use yd_logging::{
    now_ms, FillEventV1, MatchOverEventV1, NdjsonWriter, RollEventV1, LOG_SCHEMA_VERSION,
};

use crate::protocol::{
    dice_wire, score_table, GameOverStatus, GameUpdateV1, InboundEvent, MatchId, OutboundEvent,
    PlayerId,
};

/// Push-based event sink toward one participant.
pub trait Outbox {
    fn send(&mut self, to: &PlayerId, event: OutboundEvent);
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("unknown match: {match_id}")]
    UnknownMatch { match_id: MatchId },
    #[error("player {player_id} is not seated in match {match_id}")]
    UnknownPlayer {
        match_id: MatchId,
        player_id: PlayerId,
    },
    #[error("match {match_id} already exists")]
    DuplicateMatch { match_id: MatchId },
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Roll(#[from] RollError),
}

/// One match owned by the authority: engine plus the in-flight roll, if any.
struct MatchDriver {
    engine: TurnEngine,
    seats: [PlayerId; 2],
    roll: Option<RollSession>,
}

impl MatchDriver {
    fn seat_of(&self, player_id: &str) -> Option<u8> {
        self.seats.iter().position(|p| p == player_id).map(|i| i as u8)
    }
}

/// The authority-side session gateway for any number of matches.
pub struct SessionGateway {
    cfg: Config,
    matches: FxHashMap<MatchId, MatchDriver>,
    /// Monotonic roll counter mixed into per-roll seeds.
    rolls_started: u64,
    log: Option<NdjsonWriter>,
}

impl SessionGateway {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            matches: FxHashMap::default(),
            rolls_started: 0,
            log: None,
        }
    }

    /// Attach an NDJSON event log. Log failures never affect a match.
    pub fn with_event_log(mut self, log: NdjsonWriter) -> Self {
        self.log = Some(log);
        self
    }

    /// Register a fresh match between two seated players.
    pub fn create_match(
        &mut self,
        match_id: MatchId,
        seats: [PlayerId; 2],
    ) -> Result<(), GatewayError> {
        if self.matches.contains_key(&match_id) {
            return Err(GatewayError::DuplicateMatch { match_id });
        }
        self.matches.insert(
            match_id,
            MatchDriver {
                engine: TurnEngine::new(),
                seats,
                roll: None,
            },
        );
        Ok(())
    }

    /// Authoritative state of an ongoing match, if it exists.
    pub fn match_state(&self, match_id: &str) -> Option<&MatchState> {
        self.matches.get(match_id).map(|d| d.engine.state())
    }

    /// Handle one inbound event. A rejected event mutates nothing and
    /// produces no outbound traffic; the error goes back to the caller.
    pub fn handle_event(
        &mut self,
        event: InboundEvent,
        out: &mut dyn Outbox,
    ) -> Result<(), GatewayError> {
        match event {
            InboundEvent::Roll {
                game_id,
                player_id,
                index,
            } => self.handle_roll(game_id, player_id, index, out),
            InboundEvent::Fill {
                game_id,
                player_id,
                key,
            } => self.handle_fill(game_id, player_id, key, out),
            InboundEvent::GameInitialize { game_id, player_id } => {
                self.handle_initialize(game_id, player_id, out)
            }
        }
    }

    fn handle_roll(
        &mut self,
        match_id: MatchId,
        player_id: PlayerId,
        index: Vec<usize>,
        out: &mut dyn Outbox,
    ) -> Result<(), GatewayError> {
        let driver = get_driver(&mut self.matches, &match_id)?;
        let seat = seat_of(driver, &match_id, &player_id)?;

        let selection = driver.engine.begin_roll(seat, &index)?;
        let held = driver.engine.state().dice;
        let seed = roll_seed(self.cfg.session.roll_seed, self.rolls_started);
        let session = match RollSession::throw(held, selection, seed, self.cfg.physics.clone()) {
            Ok(s) => s,
            Err(e) => {
                // Roll back the staged transition; the match stays playable.
                let _ = driver.engine.abort_roll();
                return Err(e.into());
            }
        };
        self.rolls_started += 1;
        driver.roll = Some(session);

        let rolled: Vec<usize> = (0..NUM_DICE).filter(|&i| selection[i]).collect();
        let opponent = driver.seats[MatchState::other(seat) as usize].clone();
        out.send(&opponent, OutboundEvent::OppoStartRoll { index: rolled });
        Ok(())
    }

    fn handle_fill(
        &mut self,
        match_id: MatchId,
        player_id: PlayerId,
        key: yd_core::Category,
        out: &mut dyn Outbox,
    ) -> Result<(), GatewayError> {
        let driver = get_driver(&mut self.matches, &match_id)?;
        let seat = seat_of(driver, &match_id, &player_id)?;

        let round_before = driver.engine.state().round;
        let report = driver.engine.fill(seat, key)?;

        write_log(
            &mut self.log,
            &FillEventV1 {
                event: "fill",
                schema: LOG_SCHEMA_VERSION,
                ts_ms: now_ms(),
                match_id: match_id.clone(),
                seat,
                round: round_before,
                category: key.wire_key().to_string(),
                score: report.score,
                bonus_awarded: report.bonus_awarded,
            },
        );

        let state = driver.engine.state();
        if state.is_over() {
            let update = GameUpdateV1 {
                active_player: Some(driver.seats[state.active as usize].clone()),
                score_active: Some(score_table(&state.boards[state.active as usize].card)),
                score_inactive: Some(score_table(
                    &state.boards[MatchState::other(state.active) as usize].card,
                )),
                ..GameUpdateV1::default()
            };
            for p in &driver.seats {
                out.send(p, OutboundEvent::GameUpdate(update.clone()));
            }
            for s in 0..2u8 {
                if let Some(status) = seat_status(&driver.engine, s) {
                    out.send(&driver.seats[s as usize], OutboundEvent::GameOver { status });
                }
            }
            let totals = [state.boards[0].total(), state.boards[1].total()];
            let result = match state.outcome {
                Some(MatchOutcome::Winner(w)) => format!("win:{}", w),
                Some(MatchOutcome::Tie) => "tie".to_string(),
                Some(MatchOutcome::Disconnected { leaver }) => format!("disconnect:{}", leaver),
                None => unreachable!("terminal state without outcome"),
            };
            write_log(
                &mut self.log,
                &MatchOverEventV1 {
                    event: "match_over",
                    schema: LOG_SCHEMA_VERSION,
                    ts_ms: now_ms(),
                    match_id: match_id.clone(),
                    result,
                    totals,
                },
            );
            self.matches.remove(&match_id);
        } else {
            let update = GameUpdateV1 {
                i_roll: Some(state.rolls_used),
                round: Some(state.round),
                active_player: Some(driver.seats[state.active as usize].clone()),
                score_active: Some(score_table(&state.boards[state.active as usize].card)),
                score_inactive: Some(score_table(
                    &state.boards[MatchState::other(state.active) as usize].card,
                )),
                ..GameUpdateV1::default()
            };
            for p in &driver.seats {
                out.send(p, OutboundEvent::GameUpdate(update.clone()));
            }
        }
        Ok(())
    }

    fn handle_initialize(
        &mut self,
        match_id: MatchId,
        player_id: PlayerId,
        out: &mut dyn Outbox,
    ) -> Result<(), GatewayError> {
        let driver = get_driver(&mut self.matches, &match_id)?;
        seat_of(driver, &match_id, &player_id)?;

        let state = driver.engine.state();
        let update = GameUpdateV1 {
            dice: Some(dice_wire(state.dice)),
            i_roll: Some(state.rolls_used),
            round: Some(state.round),
            active_player: Some(driver.seats[state.active as usize].clone()),
            score_active: Some(score_table(&state.boards[state.active as usize].card)),
            score_inactive: Some(score_table(
                &state.boards[MatchState::other(state.active) as usize].card,
            )),
        };
        out.send(&player_id, OutboundEvent::GameUpdate(update));
        Ok(())
    }

    /// Advance every in-flight roll by this gateway's step budget, emitting
    /// `gameUpdate` for rolls that completed. Matches without an in-flight
    /// roll are untouched.
    pub fn pump_all(&mut self, out: &mut dyn Outbox) -> Result<(), GatewayError> {
        let ids: Vec<MatchId> = self
            .matches
            .iter()
            .filter(|(_, d)| d.roll.is_some())
            .map(|(id, _)| id.clone())
            .collect();
        for id in ids {
            self.pump_match(&id, out)?;
        }
        Ok(())
    }

    /// Advance one match's in-flight roll. Returns true if the roll
    /// completed (or there was none).
    pub fn pump_match(
        &mut self,
        match_id: &str,
        out: &mut dyn Outbox,
    ) -> Result<bool, GatewayError> {
        let steps = self.cfg.session.steps_per_pump;
        let driver = get_driver(&mut self.matches, match_id)?;

        let session = match driver.roll.as_mut() {
            Some(s) => s,
            None => return Ok(true),
        };
        let outcome = match session.tick(steps) {
            RollStatus::InFlight => return Ok(false),
            RollStatus::Complete(outcome) => outcome,
        };
        let sim_ticks = session.ticks();
        driver.roll = None;
        if let Err(e) = driver.engine.finish_roll(outcome) {
            // The session itself can't produce a bad outcome; if the engine
            // still rejects it, unwind the staged roll so the match stays
            // playable.
            let _ = driver.engine.abort_roll();
            return Err(e.into());
        }

        let state = driver.engine.state();
        write_log(
            &mut self.log,
            &RollEventV1 {
                event: "roll",
                schema: LOG_SCHEMA_VERSION,
                ts_ms: now_ms(),
                match_id: match_id.to_string(),
                seat: state.active,
                round: state.round,
                rolls_used: state.rolls_used,
                dice: outcome,
                sim_ticks,
            },
        );

        let update = GameUpdateV1 {
            dice: Some(dice_wire(outcome)),
            i_roll: Some(state.rolls_used),
            ..GameUpdateV1::default()
        };
        for p in &driver.seats {
            out.send(p, OutboundEvent::GameUpdate(update.clone()));
        }
        Ok(true)
    }

    /// A participant dropped. Cancels any in-flight roll without committing
    /// it, terminates the match, notifies the other seat, and tears the
    /// match down. Returns the id of the affected match, if any.
    pub fn handle_disconnect(
        &mut self,
        player_id: &str,
        out: &mut dyn Outbox,
    ) -> Option<MatchId> {
        let match_id = self
            .matches
            .iter()
            .find(|(_, d)| d.seat_of(player_id).is_some())
            .map(|(id, _)| id.clone())?;

        let driver = self.matches.get_mut(&match_id)?;
        let leaver = driver.seat_of(player_id)?;

        // Cancel first: a canceled roll must not commit anything.
        driver.roll = None;
        let _ = driver.engine.opponent_disconnect(leaver);

        let state = driver.engine.state();
        let totals = [state.boards[0].total(), state.boards[1].total()];
        write_log(
            &mut self.log,
            &MatchOverEventV1 {
                event: "match_over",
                schema: LOG_SCHEMA_VERSION,
                ts_ms: now_ms(),
                match_id: match_id.clone(),
                result: format!("disconnect:{}", leaver),
                totals,
            },
        );

        let remaining = driver.seats[MatchState::other(leaver) as usize].clone();
        out.send(
            &remaining,
            OutboundEvent::OpponentDisconnect {
                player_id: player_id.to_string(),
            },
        );
        self.matches.remove(&match_id);
        Some(match_id)
    }
}

fn get_driver<'a>(
    matches: &'a mut FxHashMap<MatchId, MatchDriver>,
    match_id: &str,
) -> Result<&'a mut MatchDriver, GatewayError> {
    matches.get_mut(match_id).ok_or_else(|| GatewayError::UnknownMatch {
        match_id: match_id.to_string(),
    })
}

fn seat_of(
    driver: &MatchDriver,
    match_id: &str,
    player_id: &str,
) -> Result<u8, GatewayError> {
    driver
        .seat_of(player_id)
        .ok_or_else(|| GatewayError::UnknownPlayer {
            match_id: match_id.to_string(),
            player_id: player_id.to_string(),
        })
}

fn seat_status(engine: &TurnEngine, seat: u8) -> Option<GameOverStatus> {
    match engine.result_for_seat(seat)? {
        SeatResult::Win => Some(GameOverStatus::Win),
        SeatResult::Lose => Some(GameOverStatus::Lose),
        SeatResult::Tie => Some(GameOverStatus::Tie),
        // Disconnects are announced via `opponentDisconnect`, not `gameOver`.
        SeatResult::OpponentLeft => None,
    }
}

fn write_log<T: Serialize>(log: &mut Option<NdjsonWriter>, event: &T) {
    if let Some(w) = log.as_mut() {
        let _ = w.write_event(event);
    }
}

/// Derive a per-roll seed from the configured base and the roll counter
/// (splitmix64 diffusion, stable across platforms).
fn roll_seed(base: u64, counter: u64) -> u64 {
    let mut z = base ^ counter.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
