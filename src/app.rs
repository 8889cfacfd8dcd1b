use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use log::{error, info};

use crate::input::map_key;
use crate::render;
use crate::scene::{Context, MenuScene, Scene, SceneStack};
use crate::scores::HighScores;
use crate::term::TermManager;

/// Runs the menu/game scenes on the terminal until the player quits.
///
/// Dropping the `TermManager` restores the terminal on every exit path,
/// panics included.
pub fn run(ctx: &mut Context, fps: u32) -> Result<()> {
    let mut term = TermManager::new().context("Failed to read terminal size")?;
    term.setup().context("Failed to set up terminal")?;

    run_loop(&mut term, ctx, fps)
}

/// Writes the high scores after a run, whether or not the run failed.
///
/// A run error takes precedence over a save error, which is only logged then.
pub fn save_after_run(run: Result<()>, high_scores: &HighScores, path: &Path) -> Result<()> {
    if let Err(e) = &run {
        error!("Game loop failed: {:#}", e);
    }

    let saved = high_scores
        .save(path)
        .with_context(|| format!("Failed to write high scores to {}", path.display()));

    match (run, saved) {
        (Err(e), Err(save_err)) => {
            error!("{:#}", save_err);
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), saved) => {
            if saved.is_ok() {
                info!("Saved {} high scores", high_scores.entries().len());
            }
            saved
        }
    }
}

fn run_loop(term: &mut TermManager, ctx: &mut Context, fps: u32) -> Result<()> {
    let frame_interval = Duration::from_secs(1) / fps.max(1);
    let mut stack = SceneStack::new(Scene::Menu(MenuScene::new()));
    let mut last_frame = Instant::now();

    info!("Entering main loop at {} fps", fps);

    while stack.is_running() {
        let budget = frame_interval.saturating_sub(last_frame.elapsed());
        let keys = term.read_key_events(budget).context("Failed to read input")?;
        for input in keys.iter().filter_map(map_key) {
            stack.handle_input(input, ctx);
        }

        let now = Instant::now();
        let dt = now - last_frame;
        last_frame = now;
        stack.update(dt, ctx);

        if let Some(scene) = stack.top() {
            let mut canvas = term.canvas().context("Failed to read terminal size")?;
            render::draw(&mut canvas, scene, &ctx.high_scores);
            term.present(&canvas).context("Failed to draw frame")?;
        }
    }

    info!("Leaving main loop");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn scores_are_saved_when_the_loop_fails() {
        let path = std::env::temp_dir().join(format!("snake-app-scores-{}.txt", std::process::id()));
        let mut scores = HighScores::new();
        scores.record("alice", 4);

        let result = save_after_run(Err(anyhow!("draw failed")), &scores, &path);
        let saved = std::fs::read_to_string(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(result.unwrap_err().to_string(), "draw failed");
        assert_eq!(saved.unwrap(), "alice:4\n");
    }

    #[test]
    fn save_error_surfaces_after_a_clean_run() {
        // A directory cannot be written as a file
        let result = save_after_run(Ok(()), &HighScores::new(), &std::env::temp_dir());
        assert!(result.is_err());
    }
}
