use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::config::Field;
use crate::entities::{Body, Entity, Formation, Player, Projectile};
use crate::simulation::{GameState, Simulation};

const PLAYER_COLOR: Color = Color::Rgb(0xdf, 0xd8, 0xc0);
const SHOT_COLOR: Color = Color::Rgb(0x78, 0x3d, 0x35);
const ENEMY_COLOR: Color = Color::Rgb(0x4a, 0x97, 0x5c);
const TEXT_COLOR: Color = Color::Rgb(0xdf, 0xd8, 0xc0);

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub game_state: GameState,
    pub player: &'a Player,
    pub formation: &'a Formation,
    pub projectiles: &'a [Projectile],
    pub kills: u32,
    pub waves: u32,
    pub field: Field,
    pub area: Rect,
    pub fps: u32,
}

impl<'a> RenderView<'a> {
    pub fn new(sim: &'a Simulation, area: Rect, fps: u32) -> Self {
        Self {
            game_state: sim.state(),
            player: sim.player(),
            formation: sim.formation(),
            projectiles: sim.projectiles(),
            kills: sim.kills(),
            waves: sim.waves(),
            field: sim.config().field,
            area,
            fps,
        }
    }
}

/// Maps field coordinates onto a rectangle of terminal cells
#[derive(Debug, Clone, Copy)]
struct Projection {
    area: Rect,
    scale_x: f64,
    scale_y: f64,
}

impl Projection {
    fn new(area: Rect, field: Field) -> Self {
        Self {
            area,
            scale_x: area.width as f64 / field.width,
            scale_y: area.height as f64 / field.height,
        }
    }

    /// Cells covered by `entity`, clipped to the area. `None` when nothing
    /// of it is visible.
    fn project(&self, entity: &Entity) -> Option<Rect> {
        let left = (entity.x * self.scale_x).floor().max(0.0);
        let top = (entity.y * self.scale_y).floor().max(0.0);
        let right = ((entity.x + entity.width()) * self.scale_x)
            .ceil()
            .min(self.area.width as f64);
        let bottom = ((entity.y + entity.height()) * self.scale_y)
            .ceil()
            .min(self.area.height as f64);

        if right <= left || bottom <= top {
            return None;
        }

        Some(Rect {
            x: self.area.x + left as u16,
            y: self.area.y + top as u16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        })
    }
}

/// Largest rectangle inside `area` with the field's aspect ratio, centered.
fn field_rect(area: Rect, field: Field) -> Rect {
    let ratio = field.width / field.height * CELL_ASPECT;
    let mut height = area.height as f64;
    let mut width = height * ratio;
    if width > area.width as f64 {
        width = area.width as f64;
        height = width / ratio;
    }
    let width = width.floor() as u16;
    let height = height.floor() as u16;

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Rectangle of at most `width` x `height` centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Handles all rendering responsibilities for the game
#[derive(Default)]
pub struct GameRenderer;

impl GameRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Main render method that dispatches to state-specific renderers
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        self.render_game(frame, view);
        if view.game_state == GameState::GameOver {
            self.render_game_over(frame, view);
        }
    }

    /// Renders the active gameplay screen
    fn render_game(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;

        // Leave a row for the HUD and one for the controls hint
        let playable = Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(2),
        };
        let bordered = field_rect(playable, view.field);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let game_area = block.inner(bordered);
        frame.render_widget(block, bordered);

        let projection = Projection::new(game_area, view.field);

        for enemy in view.formation.alive_enemies() {
            if let Some(cells) = projection.project(enemy.entity()) {
                fill(frame, cells, "▓", ENEMY_COLOR);
            }
        }

        for projectile in view.projectiles {
            if let Some(cells) = projection.project(projectile.entity()) {
                fill(frame, cells, "│", SHOT_COLOR);
            }
        }

        if let Some(cells) = projection.project(view.player.entity()) {
            fill(frame, cells, "█", PLAYER_COLOR);
        }

        // Stats overlay at the top
        let stats = Line::from(vec![
            Span::styled(
                format!("wave:{}", view.waves),
                Style::default().fg(TEXT_COLOR).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("points:{}", view.kills),
                Style::default().fg(TEXT_COLOR).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  FPS: {}", view.fps),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        let stats_area = Rect {
            x: bordered.x,
            y: area.y,
            width: area.width.saturating_sub(bordered.x - area.x),
            height: area.height.min(1),
        };
        frame.render_widget(Paragraph::new(stats), stats_area);

        // Controls hint at bottom
        let controls = Line::from(vec![Span::styled(
            "[A/D/Arrows: Move] [Space: Fire] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);
        let controls_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(1),
            width: area.width,
            height: area.height.min(1),
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    /// Renders the game over box on top of the frozen field
    fn render_game_over(&self, frame: &mut Frame, view: &RenderView) {
        let game_over_text = vec![
            Line::from(""),
            Line::from("game over").centered().bold().fg(TEXT_COLOR),
            Line::from(""),
            Line::from(format!("wave:{}  points:{}", view.waves, view.kills))
                .centered()
                .fg(TEXT_COLOR),
            Line::from(""),
            Line::from("Press any key to restart").centered().white(),
            Line::from("Press Q to quit").centered().dark_gray(),
        ];

        let box_area = centered(view.area, 34, 9);
        frame.render_widget(Clear, box_area);
        frame.render_widget(
            Paragraph::new(game_over_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                )
                .alignment(Alignment::Center),
            box_area,
        );
    }
}

fn fill(frame: &mut Frame, cells: Rect, glyph: &str, color: Color) {
    let row = glyph.repeat(cells.width as usize);
    let text: Vec<Line> = (0..cells.height)
        .map(|_| Line::from(row.clone()).style(Style::default().fg(color)))
        .collect();
    frame.render_widget(Paragraph::new(text), cells);
}
