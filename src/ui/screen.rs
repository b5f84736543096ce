use ketik::game::GameSimulation;
use ratatui::{buffer::Buffer, layout::Rect};

use crate::{
    ui::{render_catch, render_lesson, render_path, render_race},
    Activity, App,
};

/// A UI Screen boundary: renders one activity of the app
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Lesson screen - target text, instructions and live metrics
pub struct LessonScreen;

impl Screen for LessonScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        if let Activity::Lesson(run) = &app.activity {
            render_lesson(app, run, area, buf);
        }
    }
}

pub struct CatchScreen;

impl Screen for CatchScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        if let Activity::Game(game @ GameSimulation::Catch(catch)) = &app.activity {
            render_catch(app, game, catch, area, buf);
        }
    }
}

pub struct PathScreen;

impl Screen for PathScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        if let Activity::Game(game @ GameSimulation::Path(path)) = &app.activity {
            render_path(app, game, path, area, buf);
        }
    }
}

pub struct RaceScreen;

impl Screen for RaceScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        if let Activity::Game(game) = &app.activity {
            render_race(app, game, area, buf);
        }
    }
}

/// Helper to construct the appropriate screen for the current activity
pub fn current_screen(activity: &Activity) -> Box<dyn Screen> {
    match activity {
        Activity::Lesson(_) => Box::new(LessonScreen),
        Activity::Game(GameSimulation::Catch(_)) => Box::new(CatchScreen),
        Activity::Game(GameSimulation::Path(_)) => Box::new(PathScreen),
        Activity::Game(GameSimulation::Race(_)) => Box::new(RaceScreen),
    }
}
