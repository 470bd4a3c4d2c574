//! Sortie CLI
//!
//! Command-line front end for checking a fleet snapshot for scheduling
//! conflicts, ranking replacements and applying staffing changes.

use anyhow::{anyhow, bail, Context};
use sortie_core::{logging, Config};
use sortie_domain::{DroneStatus, PilotStatus};
use sortie_ops::{Command, CommandOutcome, Coordinator, RecordStore};
use std::path::PathBuf;
use std::process;

/// Flags shared by every command
#[derive(Debug, Default)]
struct GlobalArgs {
    config: Option<PathBuf>,
    data: Option<PathBuf>,
    json: bool,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn run(command: Command, globals: &GlobalArgs) -> anyhow::Result<()> {
    let config = load_config(globals.config.as_ref())?;
    logging::init_from_config(&config.logging);

    let data = globals
        .data
        .clone()
        .unwrap_or_else(|| config.store.snapshot_path.clone());
    let store = RecordStore::load(&data)
        .with_context(|| format!("Failed to load snapshot {}", data.display()))?;

    let today = config
        .engine
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let mutating = command.is_mutating();

    let mut coordinator = Coordinator::new(store, &config.engine, today);
    let outcome = coordinator.execute(command)?;

    if mutating {
        coordinator
            .store()
            .save(&data)
            .with_context(|| format!("Failed to save snapshot {}", data.display()))?;
    }

    if globals.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    Ok(())
}

fn print_outcome(outcome: &CommandOutcome) {
    match outcome {
        CommandOutcome::Status(summary) => {
            println!("Fleet status");
            println!("  Pilots:   {} ({} available)", summary.pilots, summary.available_pilots);
            println!("  Drones:   {} ({} available)", summary.drones, summary.available_drones);
            println!(
                "  Missions: {} ({} active, {} planning, {} high priority)",
                summary.missions,
                summary.active_missions,
                summary.planned_missions,
                summary.high_priority_missions
            );
            if summary.rejected_rows > 0 {
                println!("  Skipped rows: {}", summary.rejected_rows);
            }
        }
        CommandOutcome::Pilots { pilots } => {
            if pilots.is_empty() {
                println!("No available pilots match");
            }
            for pilot in pilots {
                println!(
                    "{}  {}  {}  [{}]  {}",
                    pilot.id, pilot.name, pilot.location, pilot.skills, pilot.experience
                );
            }
        }
        CommandOutcome::Drones { drones } => {
            if drones.is_empty() {
                println!("No available drones match");
            }
            for drone in drones {
                println!(
                    "{}  {}  {}  [{}]  battery {}%",
                    drone.id, drone.model, drone.location, drone.capabilities, drone.battery_health
                );
            }
        }
        CommandOutcome::Conflicts(report) => {
            for rejection in &report.rejected {
                println!(
                    "Skipped {} row {} ({}): {}",
                    rejection.kind,
                    rejection.row,
                    rejection.record_id.as_deref().unwrap_or("no id"),
                    rejection.error
                );
            }
            if report.conflicts.is_empty() {
                println!("No conflicts found");
            }
            for conflict in &report.conflicts {
                println!("[{}] {}: {}", conflict.mission_id, conflict.kind, conflict.description);
                for suggestion in report.suggestions_for(conflict) {
                    println!("    -> {}", suggestion.rationale);
                }
            }
        }
        CommandOutcome::Suggestions {
            mission_id,
            suggestions,
        } => {
            if suggestions.is_empty() {
                println!("No suggestions for mission {}", mission_id);
            }
            for suggestion in suggestions {
                println!("[{}] {}: {}", mission_id, suggestion.conflict, suggestion.rationale);
            }
        }
        CommandOutcome::Reassigned {
            mission_id,
            pilot_id,
            drone_id,
        } => {
            if let Some(pilot_id) = pilot_id {
                println!("Assigned pilot {} to mission {}", pilot_id, mission_id);
            }
            if let Some(drone_id) = drone_id {
                println!("Assigned drone {} to mission {}", drone_id, mission_id);
            }
        }
        CommandOutcome::PilotUpdated {
            pilot_id,
            previous,
            status,
        } => println!("Pilot {}: {} -> {}", pilot_id, previous, status),
        CommandOutcome::DroneUpdated {
            drone_id,
            previous,
            status,
        } => println!("Drone {}: {} -> {}", drone_id, previous, status),
        CommandOutcome::MissionCreated { mission_id } => println!("Created mission {}", mission_id),
    }
}

/// Split `args` into global flags, option values and positionals
fn parse_flags(
    args: &[String],
    globals: &mut GlobalArgs,
) -> anyhow::Result<(Vec<(String, String)>, Vec<String>)> {
    let mut options = Vec::new();
    let mut positional = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--json" => globals.json = true,
            "--config" | "-c" | "--data" | "-d" | "--mission" | "-m" | "--pilot" | "--drone"
            | "--skill" | "--capability" | "--location" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| anyhow!("Missing value for {}", arg))?
                    .clone();
                match arg {
                    "--config" | "-c" => globals.config = Some(PathBuf::from(value)),
                    "--data" | "-d" => globals.data = Some(PathBuf::from(value)),
                    _ => options.push((arg.trim_start_matches('-').to_string(), value)),
                }
            }
            other if other.starts_with('-') => bail!("Unknown option: {}", other),
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    Ok((options, positional))
}

fn option(options: &[(String, String)], names: &[&str]) -> Option<String> {
    options
        .iter()
        .find(|(name, _)| names.contains(&name.as_str()))
        .map(|(_, value)| value.clone())
}

fn parse_command(name: &str, args: &[String], globals: &mut GlobalArgs) -> anyhow::Result<Command> {
    let (options, positional) = parse_flags(args, globals)?;

    let command = match name {
        "status" => Command::Status,
        "conflicts" => Command::CheckConflicts,
        "suggest" => Command::Suggest {
            mission_id: option(&options, &["mission", "m"])
                .ok_or_else(|| anyhow!("Missing --mission argument"))?,
        },
        "pilots" => Command::ListAvailablePilots {
            skill: option(&options, &["skill"]),
            location: option(&options, &["location"]),
        },
        "drones" => Command::ListAvailableDrones {
            capability: option(&options, &["capability"]),
            location: option(&options, &["location"]),
        },
        "assign" => Command::Reassign {
            mission_id: option(&options, &["mission", "m"])
                .ok_or_else(|| anyhow!("Missing --mission argument"))?,
            pilot_id: option(&options, &["pilot"]),
            drone_id: option(&options, &["drone"]),
        },
        "update-pilot" => match positional.as_slice() {
            [id, status] => Command::UpdatePilotStatus {
                pilot_id: id.clone(),
                status: status.parse::<PilotStatus>()?,
            },
            _ => bail!("Usage: sortie-cli update-pilot <pilot-id> <status>"),
        },
        "update-drone" => match positional.as_slice() {
            [id, status] => Command::UpdateDroneStatus {
                drone_id: id.clone(),
                status: status.parse::<DroneStatus>()?,
            },
            _ => bail!("Usage: sortie-cli update-drone <drone-id> <status>"),
        },
        other => bail!("Unknown command: {}", other),
    };

    Ok(command)
}

fn print_usage() {
    println!("Sortie CLI - Drone fleet conflict detection and reassignment");
    println!();
    println!("USAGE:");
    println!("    sortie-cli [--config <file>] [--data <file>] <command> [options] [--json]");
    println!();
    println!("COMMANDS:");
    println!("    status                                         Fleet totals");
    println!("    conflicts                                      Detect conflicts and suggest fixes");
    println!("    suggest --mission <id>                         Replacements for one mission");
    println!("    pilots [--skill <s>] [--location <l>]          Available pilots");
    println!("    drones [--capability <c>] [--location <l>]     Available drones");
    println!("    assign --mission <id> [--pilot <id>] [--drone <id>]");
    println!("                                                   Staff a mission");
    println!("    update-pilot <id> <status>                     Set pilot status");
    println!("    update-drone <id> <status>                     Set drone status");
    println!();
    println!("EXAMPLES:");
    println!("    sortie-cli --data fleet.json conflicts");
    println!("    sortie-cli pilots --skill thermal --location Austin --json");
    println!("    sortie-cli assign --mission M1 --pilot P2");
    println!("    sortie-cli update-pilot P3 \"On Leave\"");
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }
    let mut globals = GlobalArgs::default();

    // Global flags may precede the command name.
    let mut leading = Vec::new();
    let mut rest = args.into_iter().peekable();
    while let Some(arg) = rest.peek() {
        if !arg.starts_with('-') {
            break;
        }
        if let Some(flag) = rest.next() {
            let takes_value = matches!(flag.as_str(), "--config" | "-c" | "--data" | "-d");
            leading.push(flag);
            if takes_value {
                leading.extend(rest.next());
            }
        }
    }

    let Some(name) = rest.next() else {
        print_usage();
        process::exit(1);
    };
    let mut remaining: Vec<String> = leading;
    remaining.extend(rest);

    if name == "help" {
        print_usage();
        return;
    }

    let result = parse_command(&name, &remaining, &mut globals)
        .and_then(|command| run(command, &globals));

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
