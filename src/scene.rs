//! Menu and play scenes, kept on an explicit stack.
//!
//! Scenes never reach into the application: they get a `Context` and hand
//! back a `Trans` describing what the stack should do next.

use std::time::Duration;

use log::{error, info};

use crate::config::GameConfig;
use crate::game::{Game, Status};
use crate::input::Input;
use crate::scores::HighScores;

/// Data shared by all scenes.
pub struct Context {
    pub username: String,
    pub high_scores: HighScores,
    pub config: GameConfig,
}

/// Transition requested by the scene on top of the stack.
pub enum Trans {
    None,
    Push(Scene),
    Pop,
    Quit,
}

pub enum Scene {
    Menu(MenuScene),
    Play(PlayScene),
}

impl Scene {
    fn handle_input(&mut self, input: Input, ctx: &mut Context) -> Trans {
        match self {
            Scene::Menu(menu) => menu.handle_input(input, ctx),
            Scene::Play(play) => play.handle_input(input),
        }
    }

    fn update(&mut self, dt: Duration) -> Trans {
        match self {
            Scene::Menu(_) => Trans::None,
            Scene::Play(play) => play.update(dt),
        }
    }

    /// Called on the new top scene after the one above it was popped.
    fn on_uncover(&mut self, popped: Scene, ctx: &mut Context) {
        if let (Scene::Menu(menu), Scene::Play(play)) = (self, popped) {
            menu.game_finished(play, ctx);
        }
    }
}

#[derive(Debug, Default)]
pub struct MenuScene {
    last_score: Option<u32>,
    notice: Option<String>,
}

impl MenuScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_score(&self) -> Option<u32> {
        self.last_score
    }

    /// A message to show instead of starting a game, e.g. a bad config.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn handle_input(&mut self, input: Input, ctx: &mut Context) -> Trans {
        match input {
            Input::Confirm => match Game::new(&ctx.config) {
                Ok(game) => {
                    self.notice = None;
                    Trans::Push(Scene::Play(PlayScene::new(game)))
                }
                Err(e) => {
                    error!("Cannot start a game: {}", e);
                    self.notice = Some(e.to_string());
                    Trans::None
                }
            },
            Input::Back | Input::Quit => Trans::Quit,
            Input::Turn(_) => Trans::None,
        }
    }

    fn game_finished(&mut self, play: PlayScene, ctx: &mut Context) {
        // Games quit halfway are not over and do not count
        if play.game.is_over() {
            let score = play.game.score();
            info!("{} scored {}", ctx.username, score);
            ctx.high_scores.record(&ctx.username, score);
            self.last_score = Some(score);
        }
    }
}

pub struct PlayScene {
    game: Game,
    paused: bool,
}

impl PlayScene {
    pub fn new(game: Game) -> Self {
        PlayScene { game, paused: false }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    fn handle_input(&mut self, input: Input) -> Trans {
        match input {
            Input::Turn(direction) if !self.paused => self.game.enqueue_direction(direction),
            Input::Turn(_) => {}
            Input::Back => self.paused = !self.paused,
            Input::Confirm => self.paused = false,
            Input::Quit => return Trans::Quit,
        }
        Trans::None
    }

    fn update(&mut self, dt: Duration) -> Trans {
        if self.paused {
            return Trans::None;
        }

        match self.game.on_tick(dt) {
            Status::Running => Trans::None,
            Status::Over(_) => Trans::Pop,
        }
    }
}

/// The application's scenes; only the top one receives input and updates.
pub struct SceneStack {
    scenes: Vec<Scene>,
    quit: bool,
}

impl SceneStack {
    pub fn new(root: Scene) -> Self {
        SceneStack { scenes: vec![root], quit: false }
    }

    pub fn is_running(&self) -> bool {
        !self.quit && !self.scenes.is_empty()
    }

    pub fn top(&self) -> Option<&Scene> {
        self.scenes.last()
    }

    pub fn depth(&self) -> usize {
        self.scenes.len()
    }

    pub fn handle_input(&mut self, input: Input, ctx: &mut Context) {
        if input == Input::Quit {
            self.quit = true;
            return;
        }

        if let Some(scene) = self.scenes.last_mut() {
            let trans = scene.handle_input(input, ctx);
            self.apply(trans, ctx);
        }
    }

    pub fn update(&mut self, dt: Duration, ctx: &mut Context) {
        if let Some(scene) = self.scenes.last_mut() {
            let trans = scene.update(dt);
            self.apply(trans, ctx);
        }
    }

    fn apply(&mut self, trans: Trans, ctx: &mut Context) {
        match trans {
            Trans::None => {}
            Trans::Push(scene) => self.scenes.push(scene),
            Trans::Pop => {
                if let Some(popped) = self.scenes.pop() {
                    if let Some(scene) = self.scenes.last_mut() {
                        scene.on_uncover(popped, ctx);
                    }
                }
            }
            Trans::Quit => self.quit = true,
        }
    }
}
