use crate::game::GameState;
use crate::scene::{MenuScene, PlayScene, Scene};
use crate::scores::HighScores;
use crate::term::{Canvas, TermInt};
use crate::{Cell, GridInt};

const SNAKE_BODY_CHAR: char = '█';
const APPLE_CHAR: char = 'O';
/// Terminal characters are about twice as high as wide.
const CELL_WIDTH: TermInt = 2;
const BOARD_TOP: TermInt = 2;

pub fn draw(canvas: &mut Canvas, scene: &Scene, high_scores: &HighScores) {
    canvas.clear();
    match scene {
        Scene::Menu(menu) => draw_menu(canvas, menu, high_scores),
        Scene::Play(play) => draw_play(canvas, play),
    }
}

fn draw_play(canvas: &mut Canvas, play: &PlayScene) {
    draw_board(canvas, play.game().state());

    if play.is_paused() {
        canvas.message(&["Paused", "Esc to resume", "Ctrl+C to quit"]);
    }
}

/// Border, apple, snake and score. Never touches the game itself.
pub fn draw_board(canvas: &mut Canvas, state: &GameState) {
    let board_width = to_term(state.width).saturating_mul(CELL_WIDTH).saturating_add(2);
    let board_height = to_term(state.height).saturating_add(2);
    let left = canvas.size().0.saturating_sub(board_width) / 2;

    canvas.text_at((left, 0), &format!("Score: {}", state.score));
    draw_borders(canvas, (left, BOARD_TOP), board_width, board_height);

    let origin = (left.saturating_add(1), BOARD_TOP + 1);
    fill_cell(canvas, origin, state.apple, APPLE_CHAR);

    let head = state.snake.head();
    // A crashed head may sit off the board
    for &cell in state.snake.cells().filter(|&&cell| state.in_bounds(cell)) {
        let ch = if cell == head { state.snake.head_char() } else { SNAKE_BODY_CHAR };
        fill_cell(canvas, origin, cell, ch);
    }
}

fn draw_borders(canvas: &mut Canvas, top_left: (TermInt, TermInt), width: TermInt, height: TermInt) {
    let (x0, y0) = top_left;
    let end_x = x0.saturating_add(width).saturating_sub(1);
    let end_y = y0.saturating_add(height).saturating_sub(1);

    for x in x0..=end_x {
        let ch = if x == x0 || x == end_x { '+' } else { '-' };
        canvas.print_at((x, y0), ch);
        canvas.print_at((x, end_y), ch);
    }

    for y in y0 + 1..end_y {
        canvas.print_at((x0, y), '|');
        canvas.print_at((end_x, y), '|');
    }
}

fn fill_cell(canvas: &mut Canvas, origin: (TermInt, TermInt), (x, y): Cell, ch: char) {
    let col = origin.0.saturating_add(to_term(x).saturating_mul(CELL_WIDTH));
    let row = origin.1.saturating_add(to_term(y));
    for dx in 0..CELL_WIDTH {
        canvas.print_at((col.saturating_add(dx), row), ch);
    }
}

/// Grid values past the terminal's range clamp to its edge, where the
/// canvas drops them.
fn to_term(v: GridInt) -> TermInt {
    TermInt::try_from(v.max(0)).unwrap_or(TermInt::MAX)
}

fn draw_menu(canvas: &mut Canvas, menu: &MenuScene, high_scores: &HighScores) {
    let mut y = 2;
    canvas.centered_text(y, "Play");
    y += 1;
    canvas.centered_text(y, "Enter to start, Esc to quit");
    y += 2;

    if let Some(notice) = menu.notice() {
        canvas.centered_text(y, notice);
        y += 2;
    }

    if let Some(score) = menu.last_score() {
        canvas.centered_text(y, &format!("Last score: {}", score));
        y += 2;
    }

    if high_scores.is_empty() {
        return;
    }

    canvas.centered_text(y, "High scores:");
    y += 2;
    for (name, score) in high_scores.entries() {
        canvas.centered_text(y, &format!("{}: {}", name, score));
        y += 1;
    }
}
