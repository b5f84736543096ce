pub mod screen;

use ketik::{
    game::{
        falling::{FallingCapture, ENTITY_SIZE, FIELD_HEIGHT, FIELD_WIDTH, SPAWN_Y},
        grid::{GridNavigation, ObstacleKind, Position, COLLECTIBLE_COUNT, GOAL, GRID_SIZE},
        GameSimulation, RoundDetail, RoundOutcome, RoundResult, Simulation,
    },
    matcher::CharStatus,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use itertools::Itertools;
use unicode_width::UnicodeWidthStr;

use crate::{App, LessonRun};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(&self.activity).render(self, area, buf);
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn green_bold() -> Style {
    bold().fg(Color::Green)
}

fn red_bold() -> Style {
    bold().fg(Color::Red)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

fn underlined_dim_bold() -> Style {
    dim_bold().add_modifier(Modifier::UNDERLINED)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

fn shown(c: char) -> String {
    match c {
        ' ' => "·".to_owned(),
        c => c.to_string(),
    }
}

fn notice_line(app: &App) -> Paragraph<'_> {
    Paragraph::new(Span::styled(
        app.notice.clone().unwrap_or_default(),
        Style::default().fg(Color::Yellow),
    ))
    .alignment(Alignment::Center)
}

fn legend(text: &str) -> Paragraph<'_> {
    Paragraph::new(Span::styled(text, italic())).alignment(Alignment::Center)
}

pub(crate) fn render_lesson(app: &App, run: &LessonRun, area: Rect, buf: &mut Buffer) {
    let lesson = &run.lesson;
    let session = &run.session;
    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let prompt_lines = (lesson.text.width() as u16).div_ceil(max_chars_per_line).max(1);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(prompt_lines),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(Line::from(vec![
        Span::styled(format!("{}-{} ", lesson.level, lesson.sublevel), dim_bold()),
        Span::styled(lesson.title.as_str(), bold()),
        Span::raw("  "),
        Span::styled(
            format!("{} wpm / {}%", lesson.target_wpm, lesson.min_accuracy),
            Style::default().fg(Color::Magenta),
        ),
    ]))
    .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        lesson.instructions.get(app.config.word_language),
        italic(),
    ))
    .wrap(Wrap { trim: true })
    .render(chunks[1], buf);

    let spans = session
        .target()
        .chars()
        .iter()
        .zip(session.character_states())
        .map(|(&c, status)| match status {
            CharStatus::Correct => Span::styled(c.to_string(), green_bold()),
            CharStatus::Incorrect => Span::styled(shown(c), red_bold()),
            CharStatus::Current => Span::styled(c.to_string(), underlined_dim_bold()),
            CharStatus::Pending => Span::styled(c.to_string(), dim_bold()),
        })
        .collect::<Vec<Span>>();

    Paragraph::new(Line::from(spans))
        .alignment(if prompt_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);

    if app.config.show_metrics {
        let progress = session.progress();
        let metrics = progress.metrics;
        Paragraph::new(Span::styled(
            format!(
                "{} wpm   {}% acc   {} errors   {}s   {}/{}",
                metrics.wpm,
                metrics.accuracy,
                progress.error_count,
                metrics.elapsed_seconds,
                progress.cursor,
                progress.total_characters
            ),
            bold(),
        ))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);
    }

    notice_line(app).render(chunks[6], buf);

    let keys = if session.is_complete() {
        "(enter) next lesson / (tab) retry / (esc) quit"
    } else {
        "(tab) restart / (esc) quit"
    };
    legend(keys).render(chunks[7], buf);
}

/// Layout shared by the game screens: status, playfield, target, notice, legend
fn game_chunks(area: Rect, target_lines: u16) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(target_lines),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area)
}

fn status_line(game: &GameSimulation) -> Paragraph<'static> {
    let detail = match game {
        GameSimulation::Catch(g) => format!("caught {}   missed {}", g.caught(), g.missed()),
        GameSimulation::Path(g) => format!(
            "words {}   stars {}/{COLLECTIBLE_COUNT}",
            g.words_typed(),
            g.layout().collected()
        ),
        GameSimulation::Race(g) => format!("sentences {}", g.sentences()),
    };
    Paragraph::new(Line::from(vec![
        Span::styled(format!("{} ", game.kind()), bold()),
        Span::styled(format!("[{}]", game.core().settings().difficulty), dim_bold()),
        Span::raw("   "),
        Span::styled(format!("score {}", game.score()), green_bold()),
        Span::raw("   "),
        Span::styled(format!("{}s", game.time_left()), Style::default().fg(Color::Magenta)),
        Span::raw("   "),
        Span::raw(detail),
    ]))
    .alignment(Alignment::Center)
}

fn game_legend(game: &GameSimulation) -> Paragraph<'static> {
    if game.state().is_over() {
        legend("(tab) play again / (esc) quit")
    } else {
        legend("(tab) restart / (esc) quit")
    }
}

/// Typed text against its target: green where it matches, red where it doesn't
fn typed_against(target: &str, typed: &str) -> Line<'static> {
    let mut typed_chars = typed.chars();
    let mut spans = Vec::new();
    let mut cursor_drawn = false;
    for expected in target.chars() {
        match typed_chars.next() {
            Some(got) if got == expected => spans.push(Span::styled(expected.to_string(), green_bold())),
            Some(got) => spans.push(Span::styled(shown(got), red_bold())),
            None if !cursor_drawn => {
                cursor_drawn = true;
                spans.push(Span::styled(expected.to_string(), underlined_dim_bold()));
            }
            None => spans.push(Span::styled(expected.to_string(), dim_bold())),
        }
    }
    for extra in typed_chars {
        spans.push(Span::styled(shown(extra), red_bold()));
    }
    Line::from(spans)
}

pub(crate) fn render_round_over(result: &RoundResult, area: Rect, buf: &mut Buffer) {
    let headline = match result.outcome {
        RoundOutcome::Won => "Goal reached!",
        RoundOutcome::Finished => "Time's up!",
    };
    let detail = match &result.detail {
        RoundDetail::Catch {
            caught,
            missed,
            dropped,
        } => format!("caught {caught}   missed {missed}   dropped {dropped}"),
        RoundDetail::Path {
            words_typed,
            wpm,
            collectibles,
            position,
        } => format!(
            "{words_typed} words   {wpm} wpm   stars {collectibles}/{COLLECTIBLE_COUNT}   ended at ({}, {})",
            position.x, position.y
        ),
        RoundDetail::Race { sentences } => format!("{sentences} sentences"),
    };

    let lines = vec![
        Line::from(Span::styled(headline, bold().fg(Color::Yellow))),
        Line::default(),
        Line::from(Span::styled(format!("score {}", result.score), green_bold())),
        Line::from(Span::styled(
            format!(
                "{}% acc   {} errors   {}s",
                result.accuracy, result.errors, result.elapsed_seconds
            ),
            bold(),
        )),
        Line::from(Span::styled(detail, dim_bold())),
    ];

    let height = lines.len() as u16;
    let top = area.y + area.height.saturating_sub(height) / 2;
    let centered = Rect::new(area.x, top, area.width, height.min(area.height));
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(centered, buf);
}

/// Summary once the round is over, otherwise the live playfield
fn render_over_or<F>(game: &GameSimulation, area: Rect, buf: &mut Buffer, body: F)
where
    F: FnOnce(Rect, &mut Buffer),
{
    match game.result() {
        Some(result) if game.state().is_over() => render_round_over(result, area, buf),
        _ => body(area, buf),
    }
}

pub(crate) fn render_catch(app: &App, game: &GameSimulation, catch: &FallingCapture, area: Rect, buf: &mut Buffer) {
    let chunks = game_chunks(area, 1);
    status_line(game).render(chunks[0], buf);

    render_over_or(game, chunks[1], buf, |field, buf| {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" catch the letters ", italic()));
        let inner = block.inner(field);
        block.render(field, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let span_x = (FIELD_WIDTH - ENTITY_SIZE).max(1);
        let span_y = (FIELD_HEIGHT - SPAWN_Y).max(1);
        for entity in catch.entities() {
            let col = (entity.x.clamp(0, span_x) as i64 * (inner.width as i64 - 1) / span_x as i64) as u16;
            let row = ((entity.y - SPAWN_Y).clamp(0, span_y) as i64 * (inner.height as i64 - 1)
                / span_y as i64) as u16;
            if let Some(cell) = buf.cell_mut((inner.x + col, inner.y + row)) {
                cell.set_char(entity.glyph).set_style(bold().fg(Color::Cyan));
            }
        }
    });

    Paragraph::new(Span::styled("type a letter to catch it", dim_bold()))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
    notice_line(app).render(chunks[3], buf);
    game_legend(game).render(chunks[4], buf);
}

fn grid_cell(path: &GridNavigation, position: Position) -> Span<'static> {
    let layout = path.layout();
    if position == path.player() {
        return Span::styled("@ ", bold().fg(Color::Cyan));
    }
    if position == GOAL {
        return Span::styled("G ", green_bold());
    }
    if let Some(obstacle) = layout.obstacle_at(position) {
        return match obstacle.kind {
            ObstacleKind::Wall => Span::styled("# ", bold()),
            ObstacleKind::Pit => Span::styled("O ", dim_bold()),
            ObstacleKind::Enemy => Span::styled("X ", red_bold()),
        };
    }
    match layout.collectible_at(position) {
        Some(c) if !c.collected => Span::styled("* ", bold().fg(Color::Yellow)),
        _ => Span::styled("· ", dim_bold()),
    }
}

pub(crate) fn render_path(app: &App, game: &GameSimulation, path: &GridNavigation, area: Rect, buf: &mut Buffer) {
    let chunks = game_chunks(area, 2);
    status_line(game).render(chunks[0], buf);

    render_over_or(game, chunks[1], buf, |field, buf| {
        let rows = (0..GRID_SIZE)
            .map(|y| Line::from((0..GRID_SIZE).map(|x| grid_cell(path, Position::new(x, y))).collect_vec()))
            .collect_vec();
        Paragraph::new(rows)
            .alignment(Alignment::Center)
            .render(field, buf);
    });

    if !game.state().is_over() {
        let target = game.target().unwrap_or_default();
        Paragraph::new(vec![
            typed_against(target, game.typed()),
            Line::from(Span::styled("type the word to move", italic())),
        ])
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
    }
    notice_line(app).render(chunks[3], buf);
    game_legend(game).render(chunks[4], buf);
}

pub(crate) fn render_race(app: &App, game: &GameSimulation, area: Rect, buf: &mut Buffer) {
    let chunks = game_chunks(area, 0);
    status_line(game).render(chunks[0], buf);

    render_over_or(game, chunks[1], buf, |field, buf| {
        let sentence = game.target().unwrap_or_default();
        let height = (sentence.width() as u16)
            .div_ceil(field.width.max(1))
            .max(1)
            .min(field.height);
        let top = field.y + field.height.saturating_sub(height) / 2;
        Paragraph::new(typed_against(sentence, game.typed()))
            .alignment(if height == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: false })
            .render(Rect::new(field.x, top, field.width, height), buf);
    });

    notice_line(app).render(chunks[3], buf);
    game_legend(game).render(chunks[4], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{game_app, lesson_app};
    use crate::Activity;
    use ketik::game::GameKind;
    use ketik::input::keys_for;
    use ratatui::{buffer::Buffer, layout::Rect};
    use tempfile::tempdir;

    fn rendered(app: &App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_lesson_screen_shows_title_text_and_metrics() {
        let dir = tempdir().unwrap();
        let app = lesson_app(1, 1, dir.path());
        let screen = rendered(&app, 80, 24);
        assert!(screen.contains("Home Row Foundation"));
        assert!(screen.contains("fjfjfjfj"));
        assert!(screen.contains("0 wpm"));
        assert!(screen.contains("(tab) restart"));
    }

    #[test]
    fn test_lesson_screen_hides_metrics_when_disabled() {
        let dir = tempdir().unwrap();
        let mut app = lesson_app(1, 1, dir.path());
        app.config.show_metrics = false;
        let screen = rendered(&app, 80, 24);
        assert!(!screen.contains("% acc"));
    }

    #[test]
    fn test_lesson_screen_marks_mistyped_space() {
        let dir = tempdir().unwrap();
        let mut app = lesson_app(1, 1, dir.path());
        for key in keys_for("fjfjfjfjx") {
            app.handle_key(&key);
        }
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        let mistyped = buffer
            .content()
            .iter()
            .find(|c| c.symbol() == "·")
            .map(|c| c.fg);
        assert_eq!(mistyped, Some(Color::Red));
    }

    #[test]
    fn test_lesson_screen_offers_next_after_completion() {
        let dir = tempdir().unwrap();
        let mut app = lesson_app(1, 1, dir.path());
        let text = match &app.activity {
            Activity::Lesson(run) => run.lesson.text.clone(),
            Activity::Game(_) => unreachable!(),
        };
        for key in keys_for(&text) {
            app.handle_key(&key);
        }
        let screen = rendered(&app, 80, 24);
        assert!(screen.contains("(enter) next lesson"));
        assert!(screen.contains("targets met"));
    }

    #[test]
    fn test_catch_screen_draws_entities() {
        let dir = tempdir().unwrap();
        let mut app = game_app(GameKind::Catch, dir.path());
        if let Activity::Game(GameSimulation::Catch(catch)) = &mut app.activity {
            catch.spawn_entity('%', 180);
        }
        let screen = rendered(&app, 60, 30);
        assert!(screen.contains('%'));
        assert!(screen.contains("catch the letters"));
        assert!(screen.contains("score 0"));
    }

    #[test]
    fn test_path_screen_draws_grid_and_target() {
        let dir = tempdir().unwrap();
        let app = game_app(GameKind::Path, dir.path());
        let screen = rendered(&app, 60, 30);
        assert!(screen.contains('@'));
        assert!(screen.contains('G'));
        assert!(screen.contains("type the word to move"));
        let target = match &app.activity {
            Activity::Game(game) => game.target().unwrap_or_default().to_string(),
            Activity::Lesson(_) => unreachable!(),
        };
        assert!(screen.contains(&target));
    }

    #[test]
    fn test_race_screen_shows_sentence() {
        let dir = tempdir().unwrap();
        let app = game_app(GameKind::Race, dir.path());
        let sentence = match &app.activity {
            Activity::Game(game) => game.target().unwrap_or_default().to_string(),
            Activity::Lesson(_) => unreachable!(),
        };
        let first_word = sentence.split(' ').next().unwrap_or_default().to_string();
        let screen = rendered(&app, 100, 20);
        assert!(screen.contains(&first_word));
        assert!(screen.contains("sentences 0"));
    }

    #[test]
    fn test_round_over_summary() {
        let dir = tempdir().unwrap();
        let mut app = game_app(GameKind::Race, dir.path());
        app.on_tick(500.0);
        let screen = rendered(&app, 80, 24);
        assert!(screen.contains("Time's up!"));
        assert!(screen.contains("0 sentences"));
        assert!(screen.contains("(tab) play again"));
    }

    #[test]
    fn test_small_area_does_not_panic() {
        let dir = tempdir().unwrap();
        for kind in [GameKind::Catch, GameKind::Path, GameKind::Race] {
            let app = game_app(kind, dir.path());
            rendered(&app, 12, 4);
        }
        rendered(&lesson_app(1, 1, dir.path()), 10, 3);
    }

    #[test]
    fn test_typed_against_marks_extra_characters() {
        let line = typed_against("ab", "abc");
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[2].style, red_bold());
    }
}
