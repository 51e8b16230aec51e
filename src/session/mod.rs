//! Session domain — the Bevy surface of the farm.
//!
//! Responsible for:
//! - Holding the one `FarmSession` resource
//! - Turning `FarmCommand` events into session calls
//! - Ticking the scheduler on the walk/run cadence while Playing
//! - Publishing every outcome as a `FarmOutcomeEvent` (plus a
//!   `SeasonChangeEvent` whenever the season turns)
//! - Settling the avatar's `moving` flag once a step has played out

mod farm;

pub use farm::FarmSession;

use bevy::prelude::*;

use crate::scheduler::TickCadence;
use crate::shared::*;

/// Seconds a committed step keeps the avatar's `moving` flag raised.
pub const STEP_SETTLE_SECS: f32 = 0.1;

/// Cadence timers for the scheduler. Only the timer matching the current
/// cadence advances; the other is held at zero.
#[derive(Resource, Debug, Clone)]
pub struct SchedulerTimers {
    pub walk: Timer,
    pub run: Timer,
    pub settle: Timer,
}

impl SchedulerTimers {
    pub fn new(walk_secs: f32, run_secs: f32) -> Self {
        Self {
            walk: Timer::from_seconds(walk_secs, TimerMode::Repeating),
            run: Timer::from_seconds(run_secs, TimerMode::Repeating),
            settle: Timer::from_seconds(STEP_SETTLE_SECS, TimerMode::Once),
        }
    }
}

impl Default for SchedulerTimers {
    fn default() -> Self {
        Self::new(WALK_TICK_SECS, RUN_TICK_SECS)
    }
}

pub struct FarmSessionPlugin;

impl Plugin for FarmSessionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<FarmCommand>()
            .add_event::<FarmOutcomeEvent>()
            .add_event::<SeasonChangeEvent>()
            .init_resource::<FarmSession>()
            .init_resource::<SchedulerTimers>()
            .add_systems(OnEnter(GameState::Playing), sync_timers_with_config)
            .add_systems(
                Update,
                (handle_farm_commands, drive_scheduler, settle_avatar)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Send outcomes out in order. Season changes are also mirrored as a
/// `SeasonChangeEvent`.
fn publish(
    outcomes: Vec<FarmOutcome>,
    outcome_events: &mut EventWriter<FarmOutcomeEvent>,
    season_events: &mut EventWriter<SeasonChangeEvent>,
) {
    for outcome in outcomes {
        if let FarmOutcome::SeasonChanged { season, day, .. } = outcome {
            season_events.send(SeasonChangeEvent {
                new_season: season,
                day,
            });
        }
        outcome_events.send(FarmOutcomeEvent(outcome));
    }
}

/// Picks up the tick intervals of whichever config the session was built from.
fn sync_timers_with_config(session: Res<FarmSession>, mut timers: ResMut<SchedulerTimers>) {
    let config = session.config();
    *timers = SchedulerTimers::new(config.walk_tick_secs, config.run_tick_secs);
}

pub fn handle_farm_commands(
    mut commands: EventReader<FarmCommand>,
    mut session: ResMut<FarmSession>,
    mut outcome_events: EventWriter<FarmOutcomeEvent>,
    mut season_events: EventWriter<SeasonChangeEvent>,
) {
    for command in commands.read() {
        let outcomes = match *command {
            FarmCommand::MoveTo(tile) => session.request_move_to(tile),
            FarmCommand::ActOverSelection {
                action,
                corner_a,
                corner_b,
            } => session.request_action_over_selection(action, corner_a, corner_b),
            FarmCommand::ActHere(action) => session.request_action_at_current_tile(action),
            FarmCommand::Step(facing) => session.request_step(facing),
            FarmCommand::AdvanceDay => session.advance_day(),
            FarmCommand::Cancel => session.cancel_pending(),
            FarmCommand::SelectCrop(crop) => {
                if !session.select_crop(crop) {
                    warn!("[Farming] {crop:?} isn't in the crop table");
                }
                Vec::new()
            }
            FarmCommand::BuySeeds { crop, amount } => {
                match session.buy_seeds(crop, amount) {
                    Ok(cost) => info!("[Economy] Bought {amount} {crop:?} seeds for {cost}g"),
                    Err(err) => warn!("[Economy] Can't buy {crop:?} seeds: {err}"),
                }
                Vec::new()
            }
            FarmCommand::SellProduce(crop) => {
                match session.sell_produce(crop) {
                    Ok(gold) => info!("[Economy] Sold {crop:?} for {gold}g"),
                    Err(err) => warn!("[Economy] Can't sell: {err}"),
                }
                Vec::new()
            }
            FarmCommand::Reset => {
                info!("[Farming] Session reset");
                session.reset();
                Vec::new()
            }
        };
        publish(outcomes, &mut outcome_events, &mut season_events);
    }
}

/// At most one scheduler tick per frame, and only once the active cadence
/// timer has run out.
pub fn drive_scheduler(
    time: Res<Time>,
    mut timers: ResMut<SchedulerTimers>,
    mut session: ResMut<FarmSession>,
    mut outcome_events: EventWriter<FarmOutcomeEvent>,
    mut season_events: EventWriter<SeasonChangeEvent>,
) {
    let due = match session.cadence() {
        None => {
            timers.walk.reset();
            timers.run.reset();
            false
        }
        Some(TickCadence::Walk) => {
            timers.run.reset();
            timers.walk.tick(time.delta()).just_finished()
        }
        Some(TickCadence::Run) => {
            timers.walk.reset();
            timers.run.tick(time.delta()).just_finished()
        }
    };
    if !due {
        return;
    }

    let outcomes = session.tick();
    if outcomes
        .iter()
        .any(|o| matches!(o, FarmOutcome::Moved { .. }))
    {
        timers.settle.reset();
    }
    publish(outcomes, &mut outcome_events, &mut season_events);
}

pub fn settle_avatar(
    time: Res<Time>,
    mut timers: ResMut<SchedulerTimers>,
    mut session: ResMut<FarmSession>,
) {
    if !session.avatar().moving {
        return;
    }
    if timers.settle.tick(time.delta()).just_finished() {
        session.settle_avatar();
        timers.settle.reset();
    }
}
