//! One play session: owns the grid and agents and runs the per-tick update.

use std::time::Duration;

use tracing::{debug, info};

use crate::agent::{Dir, Player, Pursuer};
use crate::controller;
use crate::grid::{Cell, Grid, POWER_PELLET_POINTS};
use crate::pathfinder::WallMask;
use crate::strategy::{Patrol, Strategy};

pub const STARTING_LIVES: u32 = 3;
pub const PURSUER_BONUS: u32 = 200;
pub const PURSUER_COUNT: usize = 4;
pub const PLAYER_SPAWN: Cell = Cell::new(1, 1);
pub const PLAYER_SPEED: f32 = crate::BLOCK_SIZE / 5.0;
pub const PURSUER_SPEED: f32 = PLAYER_SPEED / 2.0;
const BASE_RANGE: u32 = 6;

pub fn pursuer_spawn(index: usize) -> Cell {
    Cell::new(10 + index / 2, 9 + index % 2)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    StartScreen,
    Playing,
    GameOver(Outcome),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    ReturnToMenu,
    ToggleMute,
    Quit,
}

/// Notifications for score, audio and life bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    PelletEaten { points: u32 },
    PowerActivated,
    PowerExpired,
    PursuerEaten { index: usize, bonus: u32 },
    LifeLost { remaining: u32 },
    StrategyChanged { index: usize, strategy: Strategy },
    MuteToggled { muted: bool },
    StateChanged(GameState),
}

pub struct Game {
    grid: Grid,
    player: Player,
    pursuers: Vec<Pursuer>,
    score: u32,
    lives: u32,
    state: GameState,
    muted: bool,
    now: Duration,
    tick: Duration,
}

impl Game {
    pub fn new(grid: Grid, tick: Duration) -> Self {
        let now = Duration::ZERO;
        Self {
            player: spawn_player(),
            pursuers: spawn_pursuers(now),
            grid,
            score: 0,
            lives: STARTING_LIVES,
            state: GameState::StartScreen,
            muted: false,
            now,
            tick,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn pursuers(&self) -> &[Pursuer] {
        &self.pursuers
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Simulated time since the session was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn request_direction(&mut self, dir: Dir) {
        self.player.request_direction(dir);
    }

    pub fn handle(&mut self, command: Command) -> Vec<GameEvent> {
        let mut events = Vec::new();
        match command {
            Command::Start => match self.state {
                GameState::StartScreen | GameState::GameOver(_) => {
                    self.restart();
                    self.set_state(GameState::Playing, &mut events);
                }
                GameState::Playing => {}
            },
            Command::ReturnToMenu => {
                if self.state == GameState::Playing {
                    self.set_state(GameState::StartScreen, &mut events);
                }
            }
            Command::ToggleMute => {
                self.muted = !self.muted;
                info!(muted = self.muted, "Audio mute toggled");
                events.push(GameEvent::MuteToggled { muted: self.muted });
            }
            Command::Quit => {}
        }
        events
    }

    /// Advances the simulation by one tick. Does nothing outside `Playing`.
    pub fn update(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state != GameState::Playing {
            return events;
        }
        self.now += self.tick;

        if self.player.power.update(self.now) {
            debug!("Power mode expired");
            events.push(GameEvent::PowerExpired);
        }

        controller::drive_player(&mut self.player, &self.grid);
        self.eat_pellet(&mut events);

        let mask = WallMask::from_grid(&self.grid);
        for (index, pursuer) in self.pursuers.iter_mut().enumerate() {
            let previous = pursuer.strategy;
            let strategy =
                controller::steer_pursuer(pursuer, &self.player, &self.grid, &mask, self.now);
            if strategy != previous {
                debug!(index, ?strategy, target = ?pursuer.target, "Pursuer switched strategy");
                events.push(GameEvent::StrategyChanged { index, strategy });
            }
        }

        self.resolve_captures(&mut events);

        if self.state == GameState::Playing && self.grid.remaining_pellets() == 0 {
            info!(score = self.score, "All pellets eaten");
            self.set_state(GameState::GameOver(Outcome::Won), &mut events);
        }
        events
    }

    fn eat_pellet(&mut self, events: &mut Vec<GameEvent>) {
        let cell = self.player.body.cell(&self.grid);
        let points = self.grid.consume(cell);
        if points == 0 {
            return;
        }
        self.score += points;
        events.push(GameEvent::PelletEaten { points });
        if points == POWER_PELLET_POINTS {
            self.player.power.activate(self.now);
            debug!(until = ?self.player.power.expires_at(), "Power mode active");
            events.push(GameEvent::PowerActivated);
        }
    }

    fn resolve_captures(&mut self, events: &mut Vec<GameEvent>) {
        let player_cell = self.player.body.cell(&self.grid);
        let caught: Vec<usize> = self
            .pursuers
            .iter()
            .enumerate()
            .filter(|(_, pursuer)| pursuer.body.cell(&self.grid) == player_cell)
            .map(|(index, _)| index)
            .collect();
        if caught.is_empty() {
            return;
        }
        if !self.player.power.is_active() {
            self.lose_life(events);
            return;
        }
        for index in caught {
            self.pursuers[index].respawn();
            self.score += PURSUER_BONUS;
            info!(index, score = self.score, "Pursuer eaten");
            events.push(GameEvent::PursuerEaten {
                index,
                bonus: PURSUER_BONUS,
            });
        }
    }

    fn lose_life(&mut self, events: &mut Vec<GameEvent>) {
        self.lives = self.lives.saturating_sub(1);
        info!(remaining = self.lives, "Player caught");
        events.push(GameEvent::LifeLost {
            remaining: self.lives,
        });
        if self.lives == 0 {
            self.set_state(GameState::GameOver(Outcome::Lost), events);
            return;
        }
        self.player = spawn_player();
        self.pursuers = spawn_pursuers(self.now);
    }

    fn restart(&mut self) {
        self.lives = STARTING_LIVES;
        self.score = 0;
        self.grid.reset();
        self.player = spawn_player();
        self.pursuers = spawn_pursuers(self.now);
    }

    fn set_state(&mut self, state: GameState, events: &mut Vec<GameEvent>) {
        info!(from = ?self.state, to = ?state, "Game state changed");
        self.state = state;
        events.push(GameEvent::StateChanged(state));
    }
}

fn spawn_player() -> Player {
    Player::new(PLAYER_SPAWN, PLAYER_SPEED)
}

fn spawn_pursuers(now: Duration) -> Vec<Pursuer> {
    (0..PURSUER_COUNT)
        .map(|index| {
            Pursuer::new(
                pursuer_spawn(index),
                PURSUER_SPEED,
                BASE_RANGE + index as u32,
                Patrol::new(index, now),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Tile;
    use crate::layout::Layout;

    const TICK: Duration = Duration::from_millis(100);

    fn playing(grid: Grid) -> Game {
        let mut game = Game::new(grid, TICK);
        let events = game.handle(Command::Start);
        assert_eq!(events, vec![GameEvent::StateChanged(GameState::Playing)]);
        game
    }

    #[test]
    fn update_is_idle_outside_playing() {
        let mut game = Game::new(Grid::new(Layout::builtin()), TICK);
        assert!(game.update().is_empty());
        assert_eq!(game.now(), Duration::ZERO);
        assert_eq!(game.player().body.x, 20.0);
    }

    #[test]
    fn player_eats_pellets_along_the_top_row() {
        let mut game = playing(Grid::new(Layout::builtin()));
        let events = game.update();
        // Spawn cell (1, 1) holds a pellet.
        assert!(events.contains(&GameEvent::PelletEaten { points: 1 }));
        assert_eq!(game.score(), 1);
        for _ in 0..5 {
            game.update();
        }
        assert_eq!(game.player().body.x, 44.0);
        assert_eq!(game.score(), 2);
    }

    #[test]
    fn menu_and_mute_commands() {
        let mut game = playing(Grid::new(Layout::builtin()));
        assert_eq!(
            game.handle(Command::ToggleMute),
            vec![GameEvent::MuteToggled { muted: true }]
        );
        assert!(game.is_muted());
        game.handle(Command::ReturnToMenu);
        assert_eq!(game.state(), GameState::StartScreen);
        assert!(game.handle(Command::ReturnToMenu).is_empty());
    }

    #[test]
    fn restart_resets_grid_score_and_lives() {
        let mut game = playing(Grid::new(Layout::builtin()));
        for _ in 0..20 {
            game.update();
        }
        assert!(game.score() > 0);
        game.handle(Command::ReturnToMenu);
        game.handle(Command::Start);
        assert_eq!(game.score(), 0);
        assert_eq!(game.lives(), STARTING_LIVES);
        assert_eq!(game.grid().layout(), game.grid().canonical());
    }

    #[test]
    fn capture_costs_a_life_and_respawns_everyone() {
        let mut game = playing(Grid::new(Layout::builtin()));
        game.pursuers[0].body.teleport(PLAYER_SPAWN);
        game.pursuers[2].patrol.rotate_if_due(Duration::from_secs(60));
        let events = game.update();
        assert!(events.contains(&GameEvent::LifeLost { remaining: 2 }));
        assert_eq!(game.lives(), 2);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.player().body.cell(game.grid()), PLAYER_SPAWN);
        for (index, pursuer) in game.pursuers().iter().enumerate() {
            assert_eq!(pursuer.body.cell(game.grid()), pursuer_spawn(index));
            assert_eq!(pursuer.patrol.index(), index);
        }
    }

    #[test]
    fn last_life_ends_the_session() {
        let mut game = playing(Grid::new(Layout::builtin()));
        game.lives = 1;
        game.pursuers[1].body.teleport(PLAYER_SPAWN);
        let events = game.update();
        assert!(events.contains(&GameEvent::StateChanged(GameState::GameOver(Outcome::Lost))));
        assert_eq!(game.lives(), 0);
        // Frozen until restarted.
        assert!(game.update().is_empty());
    }

    #[test]
    fn powered_player_eats_pursuers_in_its_cell() {
        let mut game = playing(Grid::new(Layout::builtin()));
        game.player.power.activate(Duration::ZERO);
        game.pursuers[0].body.teleport(PLAYER_SPAWN);
        game.pursuers[3].body.teleport(PLAYER_SPAWN);
        let events = game.update();
        assert!(events.contains(&GameEvent::PursuerEaten {
            index: 0,
            bonus: PURSUER_BONUS
        }));
        assert!(events.contains(&GameEvent::PursuerEaten {
            index: 3,
            bonus: PURSUER_BONUS
        }));
        assert_eq!(game.lives(), STARTING_LIVES);
        // Spawn pellet plus two bonuses.
        assert_eq!(game.score(), 1 + 2 * PURSUER_BONUS);
        assert_eq!(game.pursuers()[0].body.cell(game.grid()), pursuer_spawn(0));
        assert_eq!(game.pursuers()[3].body.cell(game.grid()), pursuer_spawn(3));
        assert_eq!(game.pursuers()[0].strategy, Strategy::Flee);
    }

    #[test]
    fn power_pellet_activates_and_expires() {
        // Corridor: player spawn (1, 1) sits on a power pellet.
        let mut layout = Layout::filled(23, 21, Tile::Wall);
        for col in 1..20 {
            layout.set(Cell::new(1, col), Tile::Empty);
        }
        layout.set(PLAYER_SPAWN, Tile::PowerPellet);
        // Walled-in pellet keeps the session from being won.
        layout.set(Cell::new(5, 5), Tile::Pellet);
        let mut game = playing(Grid::new(layout));
        let events = game.update();
        assert!(events.contains(&GameEvent::PowerActivated));
        assert_eq!(game.score(), 10);
        assert!(game.player().power.is_active());
        // 10 s at 100 ms ticks, then one more to pass the deadline strictly.
        for _ in 0..100 {
            assert!(!game.update().contains(&GameEvent::PowerExpired));
        }
        assert!(game.player().power.is_active());
        assert!(game.update().contains(&GameEvent::PowerExpired));
        assert!(!game.player().power.is_active());
    }
}
