mod app;
mod data;
mod error;
mod estimate;
mod format;
mod game;
mod logging;
mod model;
mod poll;
mod ui;

use std::{io, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use app::{Action, App};
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use data::DataClient;
use estimate::EstimatorConfig;
use game::{Aggregator, GameDataResponse};
use image::DynamicImage;
use poll::{PollEvent, PollHandle};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Update interval in seconds
    #[arg(short, long, default_value_t = 10)]
    interval: u64,

    /// Team to follow (default: Iowa Cubs)
    #[arg(long, default_value_t = game::DEFAULT_TEAM_ID)]
    team_id: u32,

    /// Sport level the team plays in (1 = MLB, 11 = Triple-A)
    #[arg(long, default_value_t = game::DEFAULT_SPORT_ID)]
    sport_id: u32,

    #[arg(long, default_value = data::MLB_STATS_API)]
    base_url: String,

    /// Average milliseconds per pitch
    #[arg(long, default_value_t = estimate::AVG_TIME_PER_PITCH_MS)]
    pitch_ms: u64,

    /// Average milliseconds per out
    #[arg(long, default_value_t = estimate::AVG_TIME_PER_OUT_MS)]
    out_ms: u64,

    /// Average milliseconds per inning
    #[arg(long, default_value_t = estimate::AVG_TIME_PER_INNING_MS)]
    inning_ms: u64,

    /// Print the current game as JSON and exit
    #[arg(long)]
    json: bool,

    /// Write logs to a daily file in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn estimator(&self) -> EstimatorConfig {
        EstimatorConfig {
            pitch_ms: self.pitch_ms,
            out_ms: self.out_ms,
            inning_ms: self.inning_ms,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let client =
        DataClient::new(args.base_url.as_str()).context("failed to set up HTTP client")?;
    let aggregator = Arc::new(Aggregator::new(
        client,
        args.team_id,
        args.sport_id,
        args.estimator(),
    ));

    if args.json {
        logging::init_stderr();
        return print_game(&aggregator).await;
    }

    let _log_guard = logging::init_tui(args.log_dir.as_deref());
    info!(team_id = args.team_id, sport_id = args.sport_id, interval = args.interval, "starting");

    let (poll_tx, poll_rx) = mpsc::channel::<PollEvent<GameDataResponse>>(16);
    let (logo_tx, logo_rx) = mpsc::channel::<(u32, DynamicImage)>(8);

    let fetcher = aggregator.clone();
    let poller = poll::spawn(
        Duration::from_secs(args.interval.max(1)),
        move || {
            let fetcher = fetcher.clone();
            async move { fetcher.fetch_game_data(Local::now().date_naive()).await }
        },
        GameDataResponse::keep_polling,
        poll_tx,
    );

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(args.team_id, args.interval);
    let mut channels = Channels {
        poll_rx,
        logo_rx,
        logo_tx,
    };
    let res = run_app(&mut terminal, &mut app, &poller, &mut channels, aggregator.client()).await;

    // Closing the receivers unblocks a poll task waiting to send.
    drop(channels);
    poller.cancel();
    if tokio::time::timeout(Duration::from_secs(2), poller.join()).await.is_err() {
        warn!("poll task did not stop in time");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        warn!(error = %err, "terminal loop failed");
        println!("{:?}", err)
    }

    Ok(())
}

async fn print_game(aggregator: &Aggregator) -> anyhow::Result<()> {
    let data = aggregator
        .fetch_game_data(Local::now().date_naive())
        .await
        .context("failed to fetch game data")?;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

struct Channels {
    poll_rx: mpsc::Receiver<PollEvent<GameDataResponse>>,
    logo_rx: mpsc::Receiver<(u32, DynamicImage)>,
    logo_tx: mpsc::Sender<(u32, DynamicImage)>,
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    poller: &PollHandle,
    channels: &mut Channels,
    client: &DataClient,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(Action::Refresh) = app.on_key(key.code) {
                        poller.refresh();
                    }
                }
            }
        }

        while let Ok(event) = channels.poll_rx.try_recv() {
            app.on_poll(event);
        }
        while let Ok((team_id, img)) = channels.logo_rx.try_recv() {
            app.on_logo(team_id, img);
        }

        for team_id in app.logos_to_fetch() {
            let client = client.clone();
            let tx = channels.logo_tx.clone();
            tokio::spawn(async move {
                match client.fetch_logo(team_id).await {
                    Ok(img) => {
                        let _ = tx.send((team_id, img)).await;
                    }
                    Err(e) => warn!(team_id, error = %e, "logo unavailable"),
                }
            });
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_args() {
        let args = Args::parse_from(["ballgame-tui"]);
        assert_eq!(args.interval, 10);
        assert_eq!(args.team_id, 451);
        assert_eq!(args.sport_id, 11);
        assert_eq!(args.base_url, "https://statsapi.mlb.com");
        assert_eq!(args.estimator(), EstimatorConfig::default());
        assert!(!args.json);
    }

    #[test]
    fn estimator_flags() {
        let args = Args::parse_from([
            "ballgame-tui",
            "--team-id",
            "112",
            "--sport-id",
            "1",
            "--pitch-ms",
            "25",
            "--inning-ms",
            "200000",
        ]);
        assert_eq!(args.team_id, 112);
        assert_eq!(args.sport_id, 1);
        let estimator = args.estimator();
        assert_eq!(estimator.pitch_ms, 25);
        assert_eq!(estimator.out_ms, estimate::AVG_TIME_PER_OUT_MS);
        assert_eq!(estimator.inning_ms, 200_000);
    }
}
