use chrono::Local;
use image::{DynamicImage, GenericImageView};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders, Paragraph,
    },
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::app::App;
use crate::format;
use crate::game::{GameInfo, TeamRef};

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(size);

    match (app.is_loading(), app.game()) {
        (true, _) => draw_message(f, chunks[0], "Loading..."),
        (false, None) => draw_message(f, chunks[0], "No game today 😭"),
        (false, Some(game)) => draw_game(f, app, game, chunks[0]),
    }

    draw_footer(f, app, chunks[1]);
}

fn draw_message(f: &mut Frame, area: Rect, text: &str) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage(45),
                Constraint::Length(1),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(inner);
    let p = Paragraph::new(text).alignment(Alignment::Center);
    f.render_widget(p, rows[1]);
}

fn draw_game(f: &mut Frame, app: &App, game: &GameInfo, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(10), // Teams
                Constraint::Length(1),  // Venue
                Constraint::Length(4),  // About
                Constraint::Length(6),  // Score
                Constraint::Length(3),  // Count
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(inner);

    let teams = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[0]);
    draw_team(f, app, &game.home_team, "HOME", teams[0]);
    draw_team(f, app, &game.away_team, "AWAY", teams[1]);

    let venue = Paragraph::new(format!("@ {}", game.venue))
        .style(Style::default().add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center);
    f.render_widget(venue, chunks[1]);

    draw_about(f, game, chunks[2]);

    let scores = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[3]);
    draw_score(f, game.play.home_score, scores[0]);
    draw_score(f, game.play.away_score, scores[1]);

    draw_count(f, game, chunks[4]);
}

fn draw_team(f: &mut Frame, app: &App, team: &TeamRef, side: &str, area: Rect) {
    let title_style = if team.id == app.team_id {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(Span::styled(format!(" {} ", side), title_style))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(inner);

    if app.show_logos {
        if let Some(img) = app.logos.get(&team.id) {
            // Braille cells are 2 dots wide; keep the logo roughly square
            let side_len = rows[0].height.saturating_mul(2).min(rows[0].width);
            let logo_area = Rect {
                x: rows[0].x + (rows[0].width - side_len) / 2,
                width: side_len,
                ..rows[0]
            };
            draw_logo(f, img, logo_area);
        }
    }

    let name = Paragraph::new(team.name.clone())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(name, rows[1]);
}

fn draw_logo(f: &mut Frame, img: &DynamicImage, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let cols = f64::from(area.width) * 2.0;
    let rows = f64::from(area.height) * 4.0;

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, cols])
        .y_bounds([0.0, rows])
        .paint(move |ctx| {
            let (w, h) = img.dimensions();
            for y in 0..rows as u32 {
                for x in 0..cols as u32 {
                    let img_x = (f64::from(x) / cols * f64::from(w)) as u32;
                    let img_y = (f64::from(y) / rows * f64::from(h)) as u32;
                    if img_x < w && img_y < h {
                        let p = img.get_pixel(img_x, img_y);
                        if p[3] > 128 {
                            ctx.draw(&Points {
                                coords: &[(f64::from(x), rows - f64::from(y))],
                                color: Color::Rgb(p[0], p[1], p[2]),
                            });
                        }
                    }
                }
            }
        });
    f.render_widget(canvas, area);
}

fn draw_about(f: &mut Frame, game: &GameInfo, area: Rect) {
    let start = game
        .datetime
        .map(|dt| format::game_time(&dt.with_timezone(&Local)))
        .unwrap_or_default();
    let status_line = Line::from(format!("{} {}", game.status, start));

    let lines = if game.status.is_in_progress() {
        vec![
            Line::from(vec![
                Span::styled(
                    format::remaining_time_label(game.remaining_time),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" (~{})", format::humanize_ms(game.remaining_time))),
            ]),
            status_line,
            Line::from(format::inning_label(game.play.half_inning, game.play.inning)),
        ]
    } else {
        vec![status_line]
    };

    let p = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(p, area);
}

fn draw_score(f: &mut Frame, score: Option<u32>, area: Rect) {
    let text = format::stat_or_dash(score);
    if area.width < 20 {
        let p = Paragraph::new(text)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        f.render_widget(p, area);
    } else {
        let big = BigText::builder()
            .pixel_size(PixelSize::Quadrant)
            .style(Style::default().fg(Color::White))
            .lines(vec![text.into()])
            .alignment(Alignment::Center)
            .build();
        f.render_widget(big, area);
    }
}

fn draw_count(f: &mut Frame, game: &GameInfo, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ]
            .as_ref(),
        )
        .split(area);

    let count = &game.play.count;
    let stats = [("Outs", count.outs), ("Balls", count.balls), ("Strikes", count.strikes)];
    for ((label, value), col) in stats.into_iter().zip(cols.iter()) {
        let lines = vec![
            Line::from(Span::styled(label, Style::default().add_modifier(Modifier::BOLD))),
            Line::from(format::stat_or_dash(value)),
        ];
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), *col);
    }
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();

    if let Some(at) = &app.last_updated {
        spans.push(Span::styled(
            format!(" Last updated at {}", format::updated_at(at)),
            Style::default().add_modifier(Modifier::ITALIC),
        ));
    }

    let polling = if app.polling {
        format!("  [every {}s]", app.interval_secs)
    } else {
        "  [updates stopped]".to_string()
    };
    spans.push(Span::styled(polling, Style::default().fg(Color::DarkGray)));

    if let Some(err) = &app.last_error {
        spans.push(Span::styled(format!("  {}", err), Style::default().fg(Color::Red)));
    }

    let help = Line::from(Span::styled(
        " q quit  r refresh  l logos",
        Style::default().fg(Color::DarkGray),
    ));

    let footer = Paragraph::new(vec![Line::from(spans), help])
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::EstimatorConfig;
    use crate::game::GameDataResponse;
    use crate::model::LiveFeedResponse;
    use crate::poll::PollEvent;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    const LIVE_FEED: &str = include_str!("../fixtures/live_feed.json");

    fn render(app: &App) -> String {
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn renders_loading() {
        let app = App::new(451, 10);
        assert!(render(&app).contains("Loading..."));
    }

    #[test]
    fn renders_no_game() {
        let mut app = App::new(451, 10);
        app.on_poll(PollEvent::Fetched {
            value: GameDataResponse::not_playing(),
            at: Local::now(),
        });
        app.on_poll(PollEvent::Stopped);
        let screen = render(&app);
        assert!(screen.contains("No game today"));
        assert!(screen.contains("[updates stopped]"));
    }

    #[test]
    fn renders_live_game() {
        let feed: LiveFeedResponse = serde_json::from_str(LIVE_FEED).unwrap();
        let mut app = App::new(451, 10);
        app.on_poll(PollEvent::Fetched {
            value: GameDataResponse::playing(451, &feed, &EstimatorConfig::default()),
            at: Local::now(),
        });

        let screen = render(&app);
        assert!(screen.contains("Iowa Cubs"));
        assert!(screen.contains("Nashville Sounds"));
        assert!(screen.contains("@ Principal Park"));
        assert!(screen.contains("Estimated time remaining: 644860ms"));
        assert!(screen.contains("Bottom of the 7th"));
        assert!(screen.contains("Strikes"));
        assert!(screen.contains("Last updated at"));
    }
}
