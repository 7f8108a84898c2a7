use battletanks_clock::{ClockSync, LocalClock, ReferenceSource};
use battletanks_common::EngineConfig;
use battletanks_kernel::{Roster, SpawnPlanner, WorldEvent, WorldState, step};
use battletanks_render::Renderer;

use crate::command::{ChatLine, StartCommand};
use crate::source::{CommandSource, RosterSource};

/// Lifecycle of a controller. There is no way back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
}

/// A start that passed the debounce and captured its roster, but whose world
/// has not been installed yet.
///
/// Planning can happen anywhere; [`SessionController::install`] drops the
/// result if a newer start was accepted in the meantime.
#[derive(Debug)]
pub struct PendingStart {
    generation: u64,
    room_id: String,
    seed_word: String,
    roster: Roster,
}

impl PendingStart {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn seed_word(&self) -> &str {
        &self.seed_word
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn plan(&self) -> WorldState {
        SpawnPlanner::plan(&self.room_id, &self.seed_word, &self.roster)
    }
}

/// Owns the current world and drives it at a fixed cadence.
///
/// Every frame the host calls [`frame`](Self::frame) (or
/// [`advance`](Self::advance)); the controller runs as many fixed steps as the
/// shared clock says are due. Two clients whose clocks agree therefore run the
/// same number of steps at the same phase regardless of frame rate.
pub struct SessionController<L> {
    room_id: String,
    config: EngineConfig,
    clock: ClockSync<L>,
    generation: u64,
    world: Option<WorldState>,
    last_simulation_time: f64,
    debounce_until: Option<f64>,
}

impl<L: LocalClock> SessionController<L> {
    pub fn new(room_id: impl Into<String>, clock: ClockSync<L>, config: EngineConfig) -> Self {
        Self {
            room_id: room_id.into(),
            config,
            clock,
            generation: 0,
            world: None,
            last_simulation_time: 0.0,
            debounce_until: None,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        if self.world.is_some() {
            SessionState::Running
        } else {
            SessionState::Idle
        }
    }

    /// Generation of the newest accepted start (0 before any).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn world(&self) -> Option<&WorldState> {
        self.world.as_ref()
    }

    /// Shared time at which the last completed step was due.
    pub fn last_simulation_time(&self) -> f64 {
        self.last_simulation_time
    }

    pub fn clock(&self) -> &ClockSync<L> {
        &self.clock
    }

    /// Re-measure the clock offset; a failed probe keeps the old one.
    pub fn sync_clock<S: ReferenceSource + ?Sized>(&mut self, source: &mut S) -> f64 {
        self.clock.measure_offset(source)
    }

    /// Drain events the world accumulated since the last drain.
    pub fn take_events(&mut self) -> Vec<WorldEvent> {
        self.world
            .as_mut()
            .map(WorldState::drain_events)
            .unwrap_or_default()
    }

    /// Accept a start command unless it falls inside the debounce window.
    ///
    /// The window is fixed: it opens at an accepted command and is not
    /// extended by ignored ones. The roster is captured here, once; anyone
    /// joining later is not part of this session.
    pub fn begin_start<R: RosterSource + ?Sized>(
        &mut self,
        seed_word: &str,
        roster: &R,
    ) -> Option<PendingStart> {
        let now = self.clock.now();
        if self.debounce_until.is_some_and(|until| now < until) {
            tracing::warn!(seed = seed_word, "ignored duplicate start during debounce window");
            return None;
        }
        self.debounce_until = Some(now + self.config.session.debounce().as_secs_f64());
        self.generation += 1;

        let names = match roster.current() {
            Ok(names) => names,
            Err(err) => {
                tracing::warn!(%err, "roster unavailable, starting with an empty roster");
                Vec::new()
            }
        };
        let roster = Roster::canonical(names);
        tracing::info!(
            generation = self.generation,
            seed = seed_word,
            players = roster.len(),
            "start accepted"
        );

        Some(PendingStart {
            generation: self.generation,
            room_id: self.room_id.clone(),
            seed_word: seed_word.to_owned(),
            roster,
        })
    }

    /// Swap in a planned world. Returns `false` if a newer start superseded it.
    pub fn install(&mut self, pending: PendingStart, world: WorldState) -> bool {
        if pending.generation != self.generation {
            tracing::debug!(
                stale = pending.generation,
                current = self.generation,
                "discarding superseded world"
            );
            return false;
        }
        self.world = Some(world);
        self.last_simulation_time = self.clock.now();
        tracing::info!(
            generation = self.generation,
            seed = %pending.seed_word,
            start = self.last_simulation_time,
            "session running"
        );
        true
    }

    /// Debounce, plan and install in one go.
    pub fn start<R: RosterSource + ?Sized>(&mut self, seed_word: &str, roster: &R) -> bool {
        match self.begin_start(seed_word, roster) {
            Some(pending) => {
                let world = pending.plan();
                self.install(pending, world)
            }
            None => false,
        }
    }

    /// Start a session if `line` is a start command. Returns whether a new world was installed.
    pub fn handle_line<R: RosterSource + ?Sized>(&mut self, line: &ChatLine, roster: &R) -> bool {
        let Some(command) = StartCommand::from_line(line) else {
            return false;
        };
        tracing::info!(
            seed = %command.seed_word,
            from = command.issuer.as_deref().unwrap_or("unknown"),
            "detected start command"
        );
        self.start(&command.seed_word, roster)
    }

    /// Feed every pending chat line through [`handle_line`](Self::handle_line).
    ///
    /// An unavailable command source counts as no new lines.
    pub fn pump<C, R>(&mut self, commands: &mut C, roster: &R) -> usize
    where
        C: CommandSource + ?Sized,
        R: RosterSource + ?Sized,
    {
        let lines = match commands.poll() {
            Ok(lines) => lines,
            Err(err) => {
                tracing::warn!(%err, "command source unavailable");
                return 0;
            }
        };
        lines
            .iter()
            .filter(|line| self.handle_line(line, roster))
            .count()
    }

    /// Run every fixed step that is due and leave events in the world.
    pub fn advance(&mut self) -> usize {
        self.catch_up(|_| {})
    }

    /// Run every fixed step that is due, rendering after each one.
    ///
    /// Render failures are logged and otherwise ignored.
    pub fn frame<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> usize {
        self.catch_up(|world| {
            let events = world.drain_events();
            if let Err(err) = renderer.render(world, &events) {
                tracing::warn!(%err, tick = world.tick(), "render failed");
            }
        })
    }

    fn catch_up(&mut self, mut after_step: impl FnMut(&mut WorldState)) -> usize {
        let Some(world) = self.world.as_mut() else {
            return 0;
        };
        let _span = tracing::trace_span!("catch_up").entered();
        let dt = self.config.sim.time_step;
        let mut elapsed = self.clock.now() - self.last_simulation_time;
        let mut steps = 0;
        while elapsed >= dt {
            step(world, dt, &self.config.sim);
            elapsed -= dt;
            self.last_simulation_time += dt;
            steps += 1;
            after_step(world);
        }
        tracing::trace!(steps, tick = world.tick(), "frame");
        steps
    }
}
