use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::Screen;
use crate::assets::{AssetCatalog, MENU_BACKGROUND, SpriteName};
use crate::geometry;
use crate::menu::{INSTRUCTIONS, Marker, START_BUTTON, TITLE, TopMenu};
use crate::scene::{Fill, Node, Scene};
use crate::session::{GameSession, Level, Outcome};

/// View struct that holds everything needed to draw one frame
pub struct RenderView<'a> {
    pub screen: Screen,
    pub menu: &'a TopMenu,
    pub session: Option<&'a GameSession>,
    pub area: Rect,
    pub fps: u32,
}

/// Maps world coordinates onto a block of terminal cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub cells: Rect,
    pub world_width: f64,
    pub world_height: f64,
}

impl Viewport {
    pub fn new(cells: Rect, world_width: f64, world_height: f64) -> Self {
        Self {
            cells,
            world_width,
            world_height,
        }
    }

    fn scale_x(&self) -> f64 {
        self.cells.width as f64 / self.world_width
    }

    fn scale_y(&self) -> f64 {
        self.cells.height as f64 / self.world_height
    }

    /// Cell holding the world point, or `None` when it falls outside the view.
    pub fn to_cell(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        let col = (x * self.scale_x()).floor();
        let row = (y * self.scale_y()).floor();
        if col < 0.0 || row < 0.0 || col >= self.cells.width as f64 || row >= self.cells.height as f64 {
            return None;
        }
        Some((self.cells.x + col as u16, self.cells.y + row as u16))
    }

    /// Cells covered by a world rectangle, clipped to the view. Anything with
    /// a positive size covers at least one cell.
    pub fn cover(&self, rect: geometry::Rect) -> Option<Rect> {
        let left = (rect.x * self.scale_x()).floor().max(0.0);
        let top = (rect.y * self.scale_y()).floor().max(0.0);
        let right = (rect.right() * self.scale_x())
            .ceil()
            .min(self.cells.width as f64);
        let bottom = (rect.bottom() * self.scale_y())
            .ceil()
            .min(self.cells.height as f64);
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect {
            x: self.cells.x + left as u16,
            y: self.cells.y + top as u16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        })
    }
}

/// Flips a line of sprite art left to right.
pub fn mirror_line(line: &str) -> String {
    line.chars()
        .rev()
        .map(|c| match c {
            '<' => '>',
            '>' => '<',
            '(' => ')',
            ')' => '(',
            '[' => ']',
            ']' => '[',
            '{' => '}',
            '}' => '{',
            '/' => '\\',
            '\\' => '/',
            other => other,
        })
        .collect()
}

fn sprite_color(image: &str) -> Color {
    let base = SpriteName::parse(image)
        .map(|name| name.base)
        .unwrap_or_else(|_| image.to_string());
    match base.as_str() {
        "myShip" => Color::Green,
        "missile" => Color::Yellow,
        "MetroidLight" => Color::LightCyan,
        "MetroidDark" => Color::Magenta,
        "Ridley" => Color::Red,
        "Blaster" => {
            if image.ends_with("_2.png") {
                Color::LightRed
            } else {
                Color::White
            }
        }
        _ => Color::LightYellow,
    }
}

/// Writes `text` at a cell, clipped to `clip`.
fn put(buffer: &mut Buffer, clip: Rect, x: u16, y: u16, text: &str, style: Style) {
    if y < clip.y || y >= clip.bottom() || x >= clip.right() || x < clip.x {
        return;
    }
    let max_width = (clip.right() - x) as usize;
    buffer.set_stringn(x, y, text, max_width, style);
}

/// Handles all rendering responsibilities for the game
pub struct GameRenderer {
    catalog: AssetCatalog,
}

impl Default for GameRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRenderer {
    pub fn new() -> Self {
        Self {
            catalog: AssetCatalog::builtin(),
        }
    }

    /// Main render method that dispatches to screen-specific renderers
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        match (view.screen, view.session) {
            (Screen::Menu, _) | (_, None) => self.render_menu(frame, view),
            (Screen::Playing, Some(session)) => self.render_game(frame, view, session),
            (Screen::Paused, Some(session)) => {
                self.render_game(frame, view, session);
                self.render_paused(frame, view);
            }
        }
    }

    fn render_menu(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;
        let mut text = vec![
            Line::from(""),
            Line::from(TITLE).centered().bold().light_cyan(),
            Line::from(""),
        ];
        text.extend(
            INSTRUCTIONS
                .lines()
                .map(|line| Line::from(line).centered().white()),
        );
        text.push(Line::from(""));
        text.push(
            Line::from(format!("[ Enter: {START_BUTTON} ]"))
                .centered()
                .bold()
                .yellow(),
        );
        text.push(Line::from(""));
        text.push(Line::from("[Esc: Quit]").centered().dark_gray());

        let backdrop_area = Rect {
            x: area.x + 1,
            y: area.y + 1 + text.len() as u16,
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(2 + text.len() as u16),
        };
        self.render_backdrop(frame.buffer_mut(), backdrop_area);

        frame.render_widget(
            Paragraph::new(text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::DarkGray)),
                )
                .alignment(Alignment::Center),
            area,
        );

        // Cheat confirmations in the top left corner
        let markers: Vec<Span> = view
            .menu
            .confirmations()
            .into_iter()
            .map(|marker| {
                let color = match marker {
                    Marker::Red => Color::Red,
                    Marker::Blue => Color::Blue,
                };
                Span::styled("● ", Style::default().fg(color).add_modifier(Modifier::BOLD))
            })
            .collect();
        if !markers.is_empty() && area.width > 2 && area.height > 2 {
            let marker_area = Rect {
                x: area.x + 1,
                y: area.y + 1,
                width: area.width - 2,
                height: 1,
            };
            frame.render_widget(Paragraph::new(Line::from(markers)), marker_area);
        }
    }

    /// Draws the title backdrop centred in `area`, cropped when it does not fit.
    pub fn render_backdrop(&self, buffer: &mut Buffer, area: Rect) {
        let Ok(asset) = self.catalog.get(MENU_BACKGROUND) else {
            return;
        };
        let art_width = asset
            .art
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as u16;
        let x = area.x + area.width.saturating_sub(art_width) / 2;
        let style = Style::default().fg(Color::DarkGray);
        for (row, line) in asset.art.iter().enumerate() {
            put(buffer, area, x, area.y + row as u16, line, style);
        }
    }

    fn render_game(&self, frame: &mut Frame, view: &RenderView, session: &GameSession) {
        let area = view.area;
        if area.height < 3 || area.width < 3 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let field = block.inner(Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height - 2,
        });
        frame.render_widget(
            block,
            Rect {
                x: area.x,
                y: area.y + 1,
                width: area.width,
                height: area.height - 2,
            },
        );

        let config = session.config();
        let viewport = Viewport::new(field, config.width, config.height);
        self.render_scene(frame.buffer_mut(), &viewport, session.scene());

        self.render_hud(frame, view, session);
        self.render_controls(frame, area, session);
    }

    /// Draws the display list in insertion order.
    pub fn render_scene(&self, buffer: &mut Buffer, viewport: &Viewport, scene: &Scene) {
        let clip = viewport.cells;
        for node in scene.nodes() {
            match node {
                Node::Sprite {
                    image,
                    bounds,
                    mirrored,
                } => {
                    let Ok(asset) = scene.asset(image) else {
                        continue;
                    };
                    let Some(cells) = viewport.cover(*bounds) else {
                        continue;
                    };
                    let style = Style::default()
                        .fg(sprite_color(image))
                        .add_modifier(Modifier::BOLD);
                    for (row, line) in asset.art.iter().enumerate() {
                        let text = if *mirrored {
                            mirror_line(line)
                        } else {
                            (*line).to_string()
                        };
                        put(buffer, clip, cells.x, cells.y + row as u16, &text, style);
                    }
                }
                Node::Shape { bounds, fill } => {
                    let Some(cells) = viewport.cover(*bounds) else {
                        continue;
                    };
                    let (glyph, style) = match fill {
                        Fill::Boundary => {
                            let glyph = if bounds.width >= bounds.height { "·" } else { ":" };
                            (glyph, Style::default().fg(Color::DarkGray))
                        }
                        Fill::Beam => ("═", Style::default().fg(Color::LightCyan)),
                        Fill::BeamHit => (
                            "═",
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ),
                    };
                    let row_text = glyph.repeat(cells.width as usize);
                    for y in cells.y..cells.bottom() {
                        put(buffer, clip, cells.x, y, &row_text, style);
                    }
                }
                Node::Label { text, x, y } => {
                    let Some((col, row)) = viewport.to_cell(*x, *y) else {
                        continue;
                    };
                    let style = Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD);
                    for (offset, line) in text.lines().enumerate() {
                        let half = (line.chars().count() / 2) as u16;
                        let start = col.saturating_sub(half).max(clip.x);
                        put(buffer, clip, start, row + offset as u16, line, style);
                    }
                }
            }
        }
    }

    fn render_hud(&self, frame: &mut Frame, view: &RenderView, session: &GameSession) {
        let area = view.area;
        let label = Style::default().fg(Color::DarkGray);
        let value = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);

        let stage = match session.level() {
            Level::Wave => "Wave",
            Level::Boss => "Boss",
            Level::Cleared => "Cleared",
        };
        let mut spans = vec![
            Span::styled("Stage: ", label),
            Span::styled(stage, value(Color::Cyan)),
        ];
        match session.boss() {
            Some(boss) => {
                spans.push(Span::styled("  Boss HP: ", label));
                spans.push(Span::styled(boss.health.max(0).to_string(), value(Color::Red)));
            }
            None => {
                spans.push(Span::styled("  Metroids: ", label));
                spans.push(Span::styled(
                    session.metroids().len().to_string(),
                    value(Color::Magenta),
                ));
            }
        }
        let cheats = session.cheats();
        if cheats.rapid_fire {
            spans.push(Span::styled("  BULLET", value(Color::Red)));
        }
        if cheats.invincible {
            spans.push(Span::styled("  NOHIT", value(Color::Blue)));
        }
        spans.push(Span::styled("  FPS: ", label));
        spans.push(Span::styled(view.fps.to_string(), value(Color::White)));

        let stats_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(Line::from(spans)), stats_area);

        let clock_secs = session.clock_ms() / 1000;
        let timer_text = Line::from(vec![
            Span::styled("Time: ", label),
            Span::styled(
                format!("{:02}:{:02}", clock_secs / 60, clock_secs % 60),
                value(Color::White),
            ),
        ]);
        let timer_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: 1,
        };
        frame.render_widget(Paragraph::new(timer_text).right_aligned(), timer_area);
    }

    /// Hint line at the bottom plus the stage buttons when they are offered.
    fn render_controls(&self, frame: &mut Frame, area: Rect, session: &GameSession) {
        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "[WASD/Arrows: Move] [J/Space: Fire] [P: Pause] [Q: Quit]",
                Style::default().fg(Color::DarkGray),
            )))
            .centered(),
            controls_area,
        );

        let controls = session.controls();
        if !controls.proceed_to_boss && !controls.restart {
            return;
        }

        let mut text = vec![Line::from("")];
        if session.outcome() == Outcome::Lost {
            text.push(Line::from("GAME OVER").centered().red().bold());
            text.push(Line::from(""));
        }
        if controls.proceed_to_boss {
            text.push(Line::from("[B] Boss Stage").centered().yellow().bold());
        }
        if controls.restart {
            text.push(Line::from("[R] First Level Again").centered().white().bold());
        }

        let height = text.len() as u16 + 2;
        let width = 30.min(area.width);
        let panel = Rect {
            x: area.x + area.width.saturating_sub(width) / 2,
            y: area.y + area.height.saturating_sub(height) / 2,
            width,
            height: height.min(area.height),
        };
        frame.render_widget(
            Paragraph::new(text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                )
                .alignment(Alignment::Center),
            panel,
        );
    }

    /// Renders the pause overlay on top of the game
    fn render_paused(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;
        let pause_text = vec![
            Line::from(""),
            Line::from("PAUSED").centered().bold().yellow(),
            Line::from(""),
            Line::from("Press P to resume").centered().white(),
        ];

        let pause_area = Rect {
            x: area.x + area.width.saturating_sub(30) / 2,
            y: area.y + area.height.saturating_sub(6) / 2,
            width: 30.min(area.width),
            height: 6.min(area.height),
        };

        frame.render_widget(
            Paragraph::new(pause_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                )
                .alignment(Alignment::Center),
            pause_area,
        );
    }
}
