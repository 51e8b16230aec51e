use std::path::PathBuf;
use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use isofarm::data::{DataPlugin, DEFAULT_CONFIG_PATH};
use isofarm::economy::format_gold;
use isofarm::session::{handle_farm_commands, FarmSession, FarmSessionPlugin};
use isofarm::shared::*;

/// Command-line switches: `--trace` prints every outcome as a JSON line,
/// `--config <path>` points at a different farm config.
#[derive(Resource, Debug, Clone)]
struct RunOptions {
    trace: bool,
}

/// Scripted season: one command at a time, each sent once the scheduler is
/// idle again.
#[derive(Resource, Debug, Default)]
struct Script {
    commands: Vec<FarmCommand>,
    next: usize,
}

impl Script {
    fn season() -> Self {
        let corner_a = TilePos::new(FIELD_OFFSET, FIELD_OFFSET);
        let corner_b = TilePos::new(FIELD_OFFSET + 2, FIELD_OFFSET + 1);
        let over = |action| FarmCommand::ActOverSelection {
            action,
            corner_a,
            corner_b,
        };

        let mut commands = vec![
            over(FarmAction::Plant),
            FarmCommand::AdvanceDay,
            over(FarmAction::Water),
            over(FarmAction::Feed),
            FarmCommand::AdvanceDay,
            over(FarmAction::Harvest),
            FarmCommand::AdvanceDay,
        ];
        // Six tiles, all fed: two wheat each.
        commands.extend(std::iter::repeat(FarmCommand::ActHere(FarmAction::Sell)).take(12));
        Self { commands, next: 0 }
    }
}

fn main() {
    let mut trace = false;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--trace" => trace = true,
            "--config" => {
                if let Some(path) = args.next() {
                    config_path = PathBuf::from(path);
                }
            }
            other => eprintln!("ignoring unknown argument {other}"),
        }
    }

    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        .add_plugins(LogPlugin::default())
        .add_plugins(StatesPlugin)
        // Game state
        .init_state::<GameState>()
        // Domain plugins
        .add_plugins(DataPlugin {
            config_path: Some(config_path),
        })
        .add_plugins(FarmSessionPlugin)
        // Scripted driver
        .insert_resource(RunOptions { trace })
        .insert_resource(Script::season())
        .add_systems(
            Update,
            (
                run_script.before(handle_farm_commands),
                report_outcomes.after(handle_farm_commands),
            )
                .run_if(in_state(GameState::Playing)),
        )
        .run();
}

fn run_script(
    mut script: ResMut<Script>,
    session: Res<FarmSession>,
    mut commands: EventWriter<FarmCommand>,
    mut exit: EventWriter<AppExit>,
) {
    if session.cadence().is_some() {
        return;
    }
    let Some(command) = script.commands.get(script.next).cloned() else {
        info!(
            "[Script] Season finished on day {} with {}",
            session.day(),
            format_gold(session.inventory().gold)
        );
        exit.send(AppExit::Success);
        return;
    };
    script.next += 1;
    commands.send(command);
}

fn report_outcomes(options: Res<RunOptions>, mut outcomes: EventReader<FarmOutcomeEvent>) {
    for FarmOutcomeEvent(outcome) in outcomes.read() {
        if options.trace {
            match serde_json::to_string(outcome) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!("[Script] Could not serialize {outcome:?}: {err}"),
            }
        } else {
            info!("[Script] {outcome:?}");
        }
    }
}
