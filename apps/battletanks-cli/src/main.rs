use anyhow::{Context, Result};
use battletanks_clock::{ClockSync, HttpDateSource, SystemClock};
use battletanks_common::{EngineConfig, SimConfig};
use battletanks_kernel::{Roster, SpawnPlanner, WorldState, step};
use battletanks_render::{DebugTextRenderer, Renderer, describe};
use battletanks_session::{ChatLine, CommandSource, SessionController, SourceError, StaticRoster};
use clap::{Args, Parser, Subcommand};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "battletanks-cli",
    about = "Headless host for deterministic battletanks sessions"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file overriding simulation and session settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SessionArgs {
    /// Room identity mixed into the session seed
    #[arg(short, long, default_value = "room")]
    room: String,
    /// Seed word, as typed after /startgame
    #[arg(short, long)]
    seed: String,
    /// Participant names, comma separated
    #[arg(short, long, value_delimiter = ',')]
    players: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and effective configuration
    Info,
    /// Print the initial world for a session
    Plan {
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Plan a session and run it headless for a number of steps
    Run {
        #[command(flatten)]
        session: SessionArgs,
        /// Number of fixed steps to simulate
        #[arg(short = 'n', long, default_value = "1000")]
        steps: u64,
        /// Dump the world every N ticks (0 = only at the end)
        #[arg(long, default_value = "0")]
        every: u64,
    },
    /// Check that shuffled roster orders produce the same trajectory
    Verify {
        #[command(flatten)]
        session: SessionArgs,
        /// Number of fixed steps to simulate per run
        #[arg(short = 'n', long, default_value = "1000")]
        steps: u64,
    },
    /// Probe a web server's Date header and print the clock offset
    Sync {
        /// URL to send the HEAD request to
        #[arg(long)]
        url: String,
    },
    /// Run a live session fed by chat lines on stdin ("name: /startgame word")
    Watch {
        /// Room identity mixed into the session seed
        #[arg(short, long, default_value = "room")]
        room: String,
        /// Participant names, comma separated
        #[arg(short, long, value_delimiter = ',')]
        players: Vec<String>,
        /// Sync the shared clock against this URL before starting
        #[arg(long)]
        probe_url: Option<String>,
        /// Frames per second of the host loop
        #[arg(long, default_value = "60")]
        fps: u32,
        /// Stop after this many seconds
        #[arg(long, default_value = "30")]
        seconds: u64,
        /// Dump the world every N ticks (0 = only at the end)
        #[arg(long, default_value = "250")]
        every: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("battletanks-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("{config:#?}");
        }
        Commands::Plan { session } => {
            let world = plan(&session);
            print!("{}", describe(&world));
        }
        Commands::Run {
            session,
            steps,
            every,
        } => {
            let mut world = plan(&session);
            let mut renderer = DebugTextRenderer::new(std::io::stdout(), every);
            run_steps(&mut world, &config.sim, steps, &mut renderer);
            print!("{}", describe(&world));
        }
        Commands::Verify { session, steps } => verify(&session, &config.sim, steps)?,
        Commands::Sync { url } => {
            let mut source = HttpDateSource::new(url.as_str())?;
            let mut sync = ClockSync::new(SystemClock);
            let offset = sync.measure_offset(&mut source);
            println!("Offset: {offset:+.3}s (shared now = {:.3})", sync.now());
        }
        Commands::Watch {
            room,
            players,
            probe_url,
            fps,
            seconds,
            every,
        } => {
            let mut clock = ClockSync::new(SystemClock);
            if let Some(url) = probe_url {
                match HttpDateSource::new(url) {
                    Ok(mut source) => {
                        clock.measure_offset(&mut source);
                    }
                    Err(err) => tracing::warn!(%err, "clock probe unavailable, using local time"),
                }
            }
            let mut controller = SessionController::new(room, clock, config);
            watch(
                &mut controller,
                &StaticRoster(players),
                fps,
                Duration::from_secs(seconds),
                every,
            );
        }
    }

    Ok(())
}

fn plan(session: &SessionArgs) -> WorldState {
    let mut world = SpawnPlanner::plan(
        &session.room,
        &session.seed,
        &Roster::canonical(&session.players),
    );
    world.drain_events();
    world
}

fn run_steps<R: Renderer>(world: &mut WorldState, sim: &SimConfig, steps: u64, renderer: &mut R) {
    for _ in 0..steps {
        step(world, sim.time_step, sim);
        let events = world.drain_events();
        if let Err(err) = renderer.render(world, &events) {
            tracing::warn!(%err, "render failed");
        }
    }
}

fn verify(session: &SessionArgs, sim: &SimConfig, steps: u64) -> Result<()> {
    let mut orders = vec![session.players.clone()];
    let mut reversed = session.players.clone();
    reversed.reverse();
    orders.push(reversed);
    if session.players.len() > 1 {
        let mut rotated = session.players.clone();
        rotated.rotate_left(1);
        orders.push(rotated);
    }

    let mut hashes = Vec::new();
    for order in &orders {
        let mut world = SpawnPlanner::plan(&session.room, &session.seed, &Roster::canonical(order));
        let initial = world.state_hash();
        for _ in 0..steps {
            step(&mut world, sim.time_step, sim);
        }
        println!(
            "order={order:?} initial={initial:#018x} final={:#018x} tick={} entities={}",
            world.state_hash(),
            world.tick(),
            world.len()
        );
        hashes.push((initial, world.state_hash()));
    }

    if hashes.windows(2).all(|w| w[0] == w[1]) {
        println!("Match: OK");
        Ok(())
    } else {
        anyhow::bail!("trajectories diverged across roster orders")
    }
}

/// Chat lines arriving on stdin, read by a background thread.
struct StdinCommands {
    rx: Receiver<String>,
    closed: bool,
}

impl StdinCommands {
    fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self { rx, closed: false }
    }
}

impl CommandSource for StdinCommands {
    fn poll(&mut self) -> Result<Vec<ChatLine>, SourceError> {
        let mut lines = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(raw) => lines.push(chat_line(&raw)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.closed {
                        self.closed = true;
                        tracing::info!("stdin closed, no further commands");
                    }
                    break;
                }
            }
        }
        Ok(lines)
    }
}

/// `name: message` when the prefix looks like a display name, otherwise an anonymous line.
fn chat_line(raw: &str) -> ChatLine {
    match raw.split_once(": ") {
        Some((name, text)) if !name.is_empty() && !name.contains(char::is_whitespace) => {
            ChatLine::from_user(name, text)
        }
        _ => ChatLine::new(raw),
    }
}

fn watch(
    controller: &mut SessionController<SystemClock>,
    roster: &StaticRoster,
    fps: u32,
    duration: Duration,
    every: u64,
) {
    let mut commands = StdinCommands::spawn();
    let mut renderer = DebugTextRenderer::new(std::io::stdout(), every);
    let frame = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
    let deadline = Instant::now() + duration;

    println!(
        "Watching room {:?}; type \"/startgame <word>\" to start",
        controller.room_id()
    );
    while Instant::now() < deadline {
        controller.pump(&mut commands, roster);
        controller.frame(&mut renderer);
        std::thread::sleep(frame);
    }

    match controller.world() {
        Some(world) => print!("{}", describe(world)),
        None => println!("No session was started"),
    }
}
