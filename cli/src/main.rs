use std::{io, path::PathBuf};

use anyhow::anyhow;
use arena_engine::api::{self, ArenaScreen, PreviewRequest};
use arena_engine::sim::simulate_many;
use arena_engine::{
    enumerate_outcomes, win_probability, CombatParameters, Doubling, RecordStore, StallPolicy,
};
use clap::{Args, Parser, Subcommand, ValueEnum};

mod interactive;

#[derive(Copy, Clone, ValueEnum)]
enum Stalls {
    /// A round where nobody loses HP scores as no win
    Forfeit,
    /// A round where nobody loses HP is re-rolled
    Replay,
}

impl From<Stalls> for StallPolicy {
    fn from(s: Stalls) -> Self {
        match s {
            Stalls::Forfeit => StallPolicy::Forfeit,
            Stalls::Replay => StallPolicy::Replay,
        }
    }
}

/// The six numbers the solver needs, plus doubling.
#[derive(Args)]
struct FightArgs {
    /// Player starting HP
    #[arg(long)]
    player_hp: i32,
    /// Enemy starting HP
    #[arg(long)]
    enemy_hp: i32,
    /// Player hit chance (0-100)
    #[arg(long)]
    player_hit: i32,
    /// Damage per landed player attack
    #[arg(long)]
    player_dmg: i32,
    /// Enemy hit chance (0-100)
    #[arg(long)]
    enemy_hit: i32,
    /// Damage per landed enemy attack
    #[arg(long)]
    enemy_dmg: i32,
    /// Who doubles: player | enemy | none | unknown (anything else is none)
    #[arg(long, default_value = "none")]
    doubling: String,
}

impl FightArgs {
    fn params(&self) -> anyhow::Result<CombatParameters> {
        Ok(CombatParameters::new(
            self.player_hp,
            self.enemy_hp,
            self.player_hit,
            self.player_dmg,
            self.enemy_hit,
            self.enemy_dmg,
            Doubling::parse(&self.doubling),
        )?)
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Exact win probability from raw combat numbers
    Calc {
        #[command(flatten)]
        fight: FightArgs,
        /// How rounds where nobody loses HP are scored
        #[arg(long, value_enum, default_value_t = Stalls::Forfeit)]
        stalls: Stalls,
        /// Emit JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print every possible result of a single round
    Outcomes {
        /// Player hit chance (0-100)
        #[arg(long)]
        player_hit: u32,
        /// Damage per landed player attack
        #[arg(long)]
        player_dmg: u32,
        /// Enemy hit chance (0-100)
        #[arg(long)]
        enemy_hit: u32,
        /// Damage per landed enemy attack
        #[arg(long)]
        enemy_dmg: u32,
        /// Who doubles: player | enemy | none | unknown
        #[arg(long, default_value = "none")]
        doubling: String,
    },
    /// Preview a fight from stored characters, weapons and opponents
    Preview {
        /// JSON or YAML request file (replaces the record flags)
        #[arg(long)]
        request: Option<PathBuf>,
        /// Character name
        #[arg(long, required_unless_present = "request")]
        character: Option<String>,
        /// Weapon name
        #[arg(long, required_unless_present = "request")]
        weapon: Option<String>,
        /// Chapter number
        #[arg(long, required_unless_present = "request")]
        chapter: Option<u32>,
        /// Arena level (1-7)
        #[arg(long, required_unless_present = "request")]
        arena: Option<u32>,
        /// Displayed player hit (derived from stats if omitted)
        #[arg(long)]
        player_hit: Option<i32>,
        /// Displayed enemy hit (opponent record if omitted)
        #[arg(long)]
        enemy_hit: Option<i32>,
        /// Who doubles: player | enemy | none | unknown
        #[arg(long, default_value = "none")]
        doubling: String,
        /// How rounds where nobody loses HP are scored
        #[arg(long, value_enum, default_value_t = Stalls::Forfeit)]
        stalls: Stalls,
        /// Emit JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Monte Carlo fights next to the exact table
    Simulate {
        #[command(flatten)]
        fight: FightArgs,
        /// Number of fights
        #[arg(long, default_value_t = 10_000)]
        samples: u32,
        /// RNG base seed (fight i uses seed+i)
        #[arg(long, default_value_t = 12345)]
        seed: u64,
        /// Safety cap on rounds per fight
        #[arg(long, default_value_t = arena_engine::sim::DEFAULT_MAX_ROUNDS)]
        max_rounds: u32,
    },
    /// Prompt for everything, saving new records to the data directory
    Interactive,
}

#[derive(Parser)]
#[command(name = "arena")]
#[command(about = "Arena duel win calculator")]
struct Cli {
    /// Directory holding characters.json, weapons.json and opponents.json
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Cmd::Calc {
            fight,
            stalls,
            json,
        } => {
            let params = fight.params()?;
            let win = win_probability(&params, stalls.into())?;
            if json {
                let out = serde_json::json!({
                    "params": params,
                    "stall_policy": StallPolicy::from(stalls),
                    "win_probability": win,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("Win Chance: {}", api::format_percent(win));
            }
        }
        Cmd::Outcomes {
            player_hit,
            player_dmg,
            enemy_hit,
            enemy_dmg,
            doubling,
        } => {
            let doubling = Doubling::parse(&doubling);
            let outcomes =
                enumerate_outcomes(player_hit, player_dmg, enemy_hit, enemy_dmg, doubling);
            println!("doubling: {}", doubling);
            println!("{:>10} {:>11} {:>12}", "to enemy", "to player", "probability");
            for o in &outcomes {
                println!(
                    "{:>10} {:>11} {:>12.6}",
                    o.damage_to_enemy, o.damage_to_player, o.probability
                );
            }
        }
        Cmd::Preview {
            request,
            character,
            weapon,
            chapter,
            arena,
            player_hit,
            enemy_hit,
            doubling,
            stalls,
            json,
        } => {
            let req = match request {
                Some(path) => api::load_request(&path)?,
                None => PreviewRequest {
                    character: character.ok_or_else(|| anyhow!("--character is required"))?,
                    weapon: weapon.ok_or_else(|| anyhow!("--weapon is required"))?,
                    chapter: chapter.ok_or_else(|| anyhow!("--chapter is required"))?,
                    arena: arena.ok_or_else(|| anyhow!("--arena is required"))?,
                    screen: ArenaScreen {
                        player_hit,
                        enemy_hit,
                        doubling: Doubling::parse(&doubling),
                        stall_policy: stalls.into(),
                    },
                },
            };
            tracing::debug!(data_dir = %cli.data_dir.display(), character = %req.character, "preview");
            let store = RecordStore::load(&cli.data_dir)?;
            let preview = api::preview(&store, &req)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&preview)?);
            } else {
                println!("{}", preview.render());
            }
        }
        Cmd::Simulate {
            fight,
            samples,
            seed,
            max_rounds,
        } => {
            let params = fight.params()?;
            let replay = win_probability(&params, StallPolicy::Replay)?;
            let forfeit = win_probability(&params, StallPolicy::Forfeit)?;
            tracing::debug!(samples, seed, max_rounds, "running simulation");
            let sim = simulate_many(&params, samples, seed, max_rounds);

            println!("simulate results");
            println!("----------------");
            println!("samples:            {}", sim.samples);
            println!("doubling:           {}", params.doubling);
            println!("player wins:        {}", sim.player_wins);
            println!("enemy wins:         {}", sim.enemy_wins);
            println!("unresolved:         {}", sim.unresolved);
            println!("mutual defeats:     {}", sim.mutual_defeats);
            println!("avg rounds:         {:.2}", sim.avg_rounds);
            println!();
            println!("sim win rate:       {}", api::format_percent(sim.win_rate()));
            println!("exact (replay):     {}", api::format_percent(replay));
            println!("exact (forfeit):    {}", api::format_percent(forfeit));
        }
        Cmd::Interactive => {
            let mut store = RecordStore::load(&cli.data_dir)?;
            let stdin = io::stdin();
            interactive::run(&mut store, stdin.lock(), io::stdout())?;
        }
    }
    Ok(())
}
