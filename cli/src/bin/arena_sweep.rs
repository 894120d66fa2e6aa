use arena_engine::{compute_win_probability_with, Doubling, StallPolicy};
use clap::{Parser, ValueEnum};

#[derive(Copy, Clone, ValueEnum)]
enum Stalls {
    Forfeit,
    Replay,
}

#[derive(Parser)]
#[command(name = "arena-sweep")]
#[command(about = "Win chance grid over player hit (rows) and enemy hit (columns)")]
struct Args {
    /// Player starting HP
    #[arg(long)]
    player_hp: i32,

    /// Enemy starting HP
    #[arg(long)]
    enemy_hp: i32,

    /// Damage per landed player attack
    #[arg(long)]
    player_dmg: i32,

    /// Damage per landed enemy attack
    #[arg(long)]
    enemy_dmg: i32,

    /// Doubling: player | enemy | none | unknown
    #[arg(long, default_value = "none")]
    doubling: String,

    /// Hit chance step between rows/columns
    #[arg(long, default_value_t = 10)]
    step: usize,

    /// How rounds where nobody loses HP are scored
    #[arg(long, value_enum, default_value_t = Stalls::Forfeit)]
    stalls: Stalls,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.step == 0 || args.step > 100 {
        anyhow::bail!("step must be within 1..=100, got {}", args.step);
    }
    let doubling = Doubling::parse(&args.doubling);
    let policy = match args.stalls {
        Stalls::Forfeit => StallPolicy::Forfeit,
        Stalls::Replay => StallPolicy::Replay,
    };
    let hits: Vec<i32> = (0..=100).step_by(args.step).collect();

    println!(
        "player HP {} dmg {} vs enemy HP {} dmg {}, doubling {}",
        args.player_hp, args.player_dmg, args.enemy_hp, args.enemy_dmg, doubling
    );
    print!("{:>8}", "P\\E");
    for eh in &hits {
        print!("{:>8}", eh);
    }
    println!();

    for &ph in &hits {
        print!("{:>8}", ph);
        for &eh in &hits {
            let win = compute_win_probability_with(
                args.player_hp,
                args.enemy_hp,
                ph,
                args.player_dmg,
                eh,
                args.enemy_dmg,
                doubling,
                policy,
            )?;
            print!("{:>8.2}", win * 100.0);
        }
        println!();
    }
    Ok(())
}
