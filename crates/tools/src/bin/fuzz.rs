use anyhow::{Result, ensure};
use clap::Parser;
use geocoin_core::{Direction, Game, MemoryStore, WorldConfig};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = 1000)]
    steps: u32,
    #[arg(long, default_value_t = 0.3)]
    spawn_probability: f64,
}

const DIRECTIONS: [Direction; 4] =
    [Direction::North, Direction::South, Direction::East, Direction::West];

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p]
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} steps...", args.seed, args.steps);
    let config = WorldConfig {
        world_seed: args.seed,
        visibility_radius: 2,
        spawn_probability: args.spawn_probability,
        ..WorldConfig::default()
    };
    config.validate()?;
    let mut game = Game::new(config.clone());
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut round_trips = 0;

    for step in 0..args.steps {
        let before = game.total_coins();
        let transferred = match rng.next_u32() % 8 {
            0 | 1 => {
                game.step(choose(&mut rng, &DIRECTIONS));
                false
            }
            2 | 3 => {
                let cell = choose(&mut rng, &game.visible_cells());
                game.collect(cell).is_moved()
            }
            4 | 5 => {
                let cell = choose(&mut rng, &game.visible_cells());
                game.deposit(cell).is_moved()
            }
            6 => {
                // Reloading into a fresh game must reproduce the session exactly
                let mut store = MemoryStore::new();
                game.save(&mut store)?;
                let mut reloaded = Game::new(config.clone());
                let report = reloaded.load(&store);
                ensure!(report.is_complete(), "step {step}: load defaulted {:?}", report.defaulted);
                ensure!(
                    reloaded.snapshot_hash() == game.snapshot_hash(),
                    "step {step}: reloaded game diverged"
                );
                game = reloaded;
                round_trips += 1;
                false
            }
            _ => {
                if rng.next_u32() % 16 == 0 {
                    game.reset("yes")?;
                }
                false
            }
        };

        let after = game.total_coins();
        ensure!(after >= before, "step {step}: coins vanished ({before} -> {after})");
        ensure!(!transferred || after == before, "step {step}: a transfer changed the coin total");
        ensure!(
            game.points() as usize == game.inventory().len(),
            "step {step}: points {} but {} coins held",
            game.points(),
            game.inventory().len()
        );
    }

    println!(
        "Fuzzing completed successfully: {} caches, {} coins, {} save/load round trips.",
        game.caches().len(),
        game.total_coins(),
        round_trips
    );
    Ok(())
}
