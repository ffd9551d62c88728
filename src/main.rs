//! # Tickerboard CLI
//!
//! Command-line interface for the scrolling ticker marquee.
//!
//! ## Usage
//!
//! ```bash
//! # Scroll simulated prices in the terminal
//! tickerboard run --tickers AAPL,MSFT,NVDA
//!
//! # Live Alpaca prices (keys from APCA_API_KEY_ID / APCA_API_SECRET_KEY)
//! tickerboard run --source alpaca
//!
//! # Browser preview on port 8080
//! tickerboard serve --listen 0.0.0.0:8080
//!
//! # Render the board after 200 ticks to a PNG
//! tickerboard snapshot --ticks 200 --seed 7 --png board.png
//!
//! # Rasterize arbitrary text
//! tickerboard text "HELLO $1.23"
//!
//! # Show every glyph of a font
//! tickerboard glyphs --font spleen
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use tickerboard::{
    config::{FetchMode, FontKind, MarqueeConfig},
    display::{self, RunOptions, TerminalDisplay},
    font::{self, builtin, GlyphTable},
    quote::{self, AlpacaConfig, AlpacaSource, PriceSource, SimulatedSource},
    render::{png::save_png, Compositor, Frame, Grid, Rgb},
    server::{self, AppState, ServerConfig, WebDisplay},
    TickerBoard, TickerError,
};

/// Tickerboard - scrolling stock ticker for LED matrix displays
#[derive(Parser, Debug)]
#[command(name = "tickerboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scroll the marquee in the terminal (q to quit)
    Run {
        #[command(flatten)]
        board: BoardArgs,
    },

    /// Serve a live browser preview
    Serve {
        #[command(flatten)]
        board: BoardArgs,

        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,
    },

    /// Run a fixed number of ticks and output the final frame
    Snapshot {
        #[command(flatten)]
        board: BoardArgs,

        /// Ticks to run before capturing
        #[arg(long, default_value = "128")]
        ticks: u64,

        /// Save as PNG instead of printing ASCII art
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,
    },

    /// Rasterize text without scrolling
    Text {
        /// Text to render
        text: String,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Save as PNG instead of printing ASCII art
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,
    },

    /// Print every glyph of a font
    Glyphs {
        #[arg(long, value_enum, default_value = "builtin")]
        font: FontKind,
    },
}

/// Rendering knobs shared by every command that draws text.
#[derive(Args, Debug, Clone)]
struct LayoutArgs {
    /// JSON config file (flags override its values)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// LED rows
    #[arg(long)]
    rows: Option<usize>,

    /// Glyph upscale factor
    #[arg(long)]
    scale: Option<usize>,

    #[arg(long, value_enum)]
    font: Option<FontKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    /// Offline random walk
    Simulated,
    /// Alpaca market data API
    Alpaca,
}

#[derive(Args, Debug, Clone)]
struct BoardArgs {
    #[command(flatten)]
    layout: LayoutArgs,

    /// Ticker symbols, comma separated
    #[arg(long, value_delimiter = ',')]
    tickers: Option<Vec<String>>,

    /// LED columns
    #[arg(long)]
    cols: Option<usize>,

    /// Columns scrolled per tick
    #[arg(long)]
    speed: Option<usize>,

    /// Frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Seconds between price refreshes
    #[arg(long)]
    refresh_secs: Option<u64>,

    #[arg(long, value_enum)]
    fetch_mode: Option<FetchMode>,

    /// Price source
    #[arg(long, value_enum, default_value = "simulated")]
    source: SourceKind,

    /// Seed for the simulated source
    #[arg(long)]
    seed: Option<u64>,

    /// Fraction of simulated requests that fail
    #[arg(long, default_value = "0.0")]
    failure_rate: f64,

    #[arg(long, env = "APCA_API_KEY_ID", hide_env_values = true)]
    alpaca_key_id: Option<String>,

    #[arg(long, env = "APCA_API_SECRET_KEY", hide_env_values = true)]
    alpaca_secret: Option<String>,

    /// Alpaca market data base URL
    #[arg(long, default_value = quote::alpaca::DEFAULT_BASE_URL)]
    alpaca_url: String,
}

impl LayoutArgs {
    fn apply(&self, config: &mut MarqueeConfig) {
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(font) = self.font {
            config.font = font;
        }
    }

    fn load(&self) -> Result<MarqueeConfig, TickerError> {
        let mut config = match &self.config {
            Some(path) => MarqueeConfig::load(path)?,
            None => MarqueeConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }
}

impl BoardArgs {
    fn marquee_config(&self) -> Result<MarqueeConfig, TickerError> {
        let mut config = self.layout.load()?;
        if let Some(tickers) = &self.tickers {
            config.tickers = tickers.clone();
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(speed) = self.speed {
            config.scroll_speed = speed;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(secs) = self.refresh_secs {
            config.refresh_secs = secs;
        }
        if let Some(mode) = self.fetch_mode {
            config.fetch_mode = mode;
        }
        config.validate()?;
        Ok(config)
    }

    fn price_source(&self, timeout: Duration) -> Result<Arc<dyn PriceSource>, TickerError> {
        match self.source {
            SourceKind::Simulated => {
                if !(0.0..=1.0).contains(&self.failure_rate) {
                    return Err(TickerError::Config(format!(
                        "failure rate must be between 0 and 1, got {}",
                        self.failure_rate
                    )));
                }
                Ok(Arc::new(
                    SimulatedSource::new(self.seed).with_failure_rate(self.failure_rate),
                ))
            }
            SourceKind::Alpaca => {
                let (Some(key_id), Some(secret)) = (&self.alpaca_key_id, &self.alpaca_secret) else {
                    return Err(TickerError::Config(
                        "alpaca source needs --alpaca-key-id and --alpaca-secret".to_string(),
                    ));
                };
                let mut alpaca = AlpacaConfig::new(key_id, secret);
                alpaca.base_url = self.alpaca_url.clone();
                Ok(Arc::new(AlpacaSource::new(alpaca, timeout)?))
            }
        }
    }

    /// Config, feed and a seeded board.
    async fn start(&self) -> Result<(TickerBoard, Box<dyn quote::QuoteFeed>), TickerError> {
        let config = self.marquee_config()?;
        let source = self.price_source(config.fetch_timeout())?;
        tracing::info!(source = source.name(), tickers = ?config.tickers, "starting board");

        let mut feed = quote::feed_for(config.fetch_mode, source, config.fetch_timeout());
        let board = TickerBoard::start(config, feed.as_mut()).await?;
        Ok((board, feed))
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), TickerError> {
    let cli = Cli::parse();

    // stderr shares the terminal with the marquee, so stay quiet there
    let default_level = match (&cli.command, &cli.log_file) {
        (Commands::Run { .. }, None) => "off",
        _ => "info",
    };
    init_tracing(default_level, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Run { board } => {
            let (mut board, mut feed) = board.start().await?;
            let mut terminal = TerminalDisplay::open()?;
            let frames = display::run(&mut board, feed.as_mut(), &mut terminal, RunOptions::default()).await?;
            drop(terminal);
            tracing::info!(frames, "marquee stopped");
        }

        Commands::Serve { board, listen } => {
            let (mut board, mut feed) = board.start().await?;
            let state = Arc::new(AppState::new(board.config().clone()));
            let mut web = WebDisplay::new(Arc::clone(&state));
            let config = ServerConfig { listen_addr: listen };

            tokio::select! {
                result = server::serve(config, state, shutdown_signal()) => result?,
                result = display::run(&mut board, feed.as_mut(), &mut web, RunOptions::default()) => {
                    let frames = result?;
                    tracing::info!(frames, "marquee stopped");
                }
            }
        }

        Commands::Snapshot { board, ticks, png } => {
            let (mut board, mut feed) = board.start().await?;
            let period = board.config().frame_period();
            let t0 = board.last_refresh();
            for i in 1..=ticks {
                let now = t0 + period.mul_f64(i as f64);
                board.tick(now, feed.as_mut()).await;
            }

            let frame = board.render();
            let config = board.config();
            match png {
                Some(path) => {
                    save_png(&path, &frame, config.cell_size, config.line_color)?;
                    println!("Saved {}x{} frame to {}", frame.cols(), frame.rows(), path.display());
                }
                None => print!("{}", frame_ascii(&frame, config.background)),
            }
            println!("{}  (offset {})", board.message(), board.offset());
        }

        Commands::Text { text, layout, png } => {
            let config = layout.load()?;
            let compositor = Compositor::from_config(&config);
            let sequence = compositor.compose(&text);

            match png {
                Some(path) => {
                    let mut grid = Grid::new(sequence.rows(), sequence.len().max(1), config.background);
                    for (col, column) in sequence.columns().iter().enumerate() {
                        grid.write_column(col, column, config.color_neutral);
                    }
                    save_png(&path, &grid.render(), config.cell_size, config.line_color)?;
                    println!("Saved {} columns to {}", sequence.len(), path.display());
                }
                None => print!("{}", sequence.to_ascii()),
            }
        }

        Commands::Glyphs { font: kind } => {
            let table = font::glyph_table(kind);
            for ch in builtin::charset() {
                print_glyph(table.as_ref(), ch);
            }
        }
    }

    Ok(())
}

fn init_tracing(default_level: &str, log_file: Option<&std::path::Path>) -> Result<(), TickerError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

/// `#` for lit LEDs, `.` for background.
fn frame_ascii(frame: &Frame, background: Rgb) -> String {
    let mut out = String::with_capacity((frame.cols() + 1) * frame.rows());
    for row in 0..frame.rows() {
        for col in 0..frame.cols() {
            out.push(if frame.get(row, col) == background { '.' } else { '#' });
        }
        out.push('\n');
    }
    out
}

fn print_glyph(table: &dyn GlyphTable, ch: char) {
    let glyph = table.glyph(ch);
    println!("'{}' ({}x{})", ch, glyph.width(), glyph.height());
    for row in 0..glyph.height() {
        let line: String = (0..glyph.width())
            .map(|col| if glyph.is_set(row, col) { '#' } else { '.' })
            .collect();
        println!("  {}", line);
    }
}
