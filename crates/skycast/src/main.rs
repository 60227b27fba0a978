use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Local;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{DefaultTerminal, Frame, layout::Rect};
use skycast_background::{BackgroundCanvas, DrawList, ParticleEngine};
use skycast_config::Config;
use skycast_core::{CELL_HEIGHT_PX, Coordinates, Theme, Viewport};
use tracing::{info, warn};

mod card;
mod gesture;
mod location;
mod logging;
mod weather;

use card::WeatherView;
use gesture::CardDrag;
use location::Location;
use weather::{FetchState, WeatherApi, WeatherFeeds};

/// Terminal weather display with animated weather backgrounds.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Latitude to fetch weather for.
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    /// Longitude to fetch weather for.
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// Force a background theme (clear, cloud, cloudy, rain, snow, thunder).
    #[arg(long)]
    theme: Option<Theme>,

    /// Seed for the animation's random source.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    logging::init(config.log_path().as_deref(), &config.log.level);
    info!(version = env!("CARGO_PKG_VERSION"), "skycast starting");

    let cli_coordinates = args
        .lat
        .zip(args.lon)
        .map(|(lat, lon)| Coordinates::new(lat, lon));
    let location = location::resolve(&[
        (cli_coordinates, None),
        (
            config.location.coordinates(),
            config.location.label.as_deref(),
        ),
    ]);

    let api = WeatherApi::new(
        config.api.base_url.clone(),
        Duration::from_secs(config.api.timeout_secs),
    );
    let feeds = WeatherFeeds::spawn(api, location.coordinates, Local::now().date_naive());

    let rng = args
        .seed
        .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    let frame_interval = Duration::from_secs(1) / config.display.fps;
    let app = App::new(feeds, location, rng, args.theme, frame_interval);

    let terminal = ratatui::init();
    if let Err(e) = crossterm::execute!(stdout(), EnableMouseCapture) {
        warn!(error = %e, "mouse capture unavailable, card dragging disabled");
    }
    let result = app.run(terminal);
    if let Err(e) = crossterm::execute!(stdout(), DisableMouseCapture) {
        warn!(error = %e, "failed to release mouse capture");
    }
    ratatui::restore();

    info!("skycast shutdown complete");
    result
}

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    running: bool,
    /// Current conditions and forecast, filled in by the fetch threads.
    feeds: WeatherFeeds,
    location: Location,
    /// Background animation drawing into a recorded frame.
    engine: ParticleEngine<DrawList, fastrand::Rng>,
    /// Theme from the command line, overriding the weather.
    forced_theme: Option<Theme>,
    /// Theme the engine was last activated for.
    theme: Option<Theme>,
    drag: CardDrag,
    /// Card area from the last draw, for mouse hit-testing.
    card_area: Option<Rect>,
    frame_interval: Duration,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(
        feeds: WeatherFeeds,
        location: Location,
        rng: fastrand::Rng,
        forced_theme: Option<Theme>,
        frame_interval: Duration,
    ) -> Self {
        Self {
            running: false,
            feeds,
            location,
            engine: ParticleEngine::new(Some(DrawList::new()), rng),
            forced_theme,
            theme: None,
            drag: CardDrag::new(),
            card_area: None,
            frame_interval,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        let mut next_frame = Instant::now();

        while self.running {
            let now = Instant::now();
            if now >= next_frame {
                let size = terminal.size()?;
                self.sync_theme(Viewport::from_cells(size.width, size.height));
                self.engine.on_vsync();
                terminal.draw(|frame| self.render(frame))?;
                next_frame = now + self.frame_interval;
            }
            self.handle_crossterm_events(next_frame.saturating_duration_since(Instant::now()))?;
        }

        self.engine.deactivate();
        Ok(())
    }

    /// Theme the background should show right now, if any.
    fn desired_theme(&self) -> Option<Theme> {
        self.forced_theme.or_else(|| match self.feeds.current() {
            FetchState::Ready(current) => Some(current.theme()),
            FetchState::Loading | FetchState::Failed(_) => None,
        })
    }

    /// Re-activate the engine when the theme changes.
    ///
    /// The viewport is only read here, so resizing does not rebuild the particles.
    fn sync_theme(&mut self, viewport: Viewport) {
        let desired = self.desired_theme();
        if desired == self.theme {
            return;
        }

        match desired {
            Some(theme) => {
                info!(%theme, "switching background theme");
                self.engine.activate(theme, viewport);
            }
            None => self.engine.deactivate(),
        }
        self.theme = desired;
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        if let (Some(theme), Some(viewport), Some(list)) = (
            self.engine.theme(),
            self.engine.viewport(),
            self.engine.surface(),
        ) {
            frame.render_widget(
                BackgroundCanvas::new(list, viewport, theme.backdrop()),
                area,
            );
        }

        self.card_area = None;
        match self.feeds.current() {
            FetchState::Loading => card::render_loading(frame, area),
            FetchState::Failed(_) => card::render_failed(frame, area),
            FetchState::Ready(current) => {
                let forecast = self.feeds.forecast();
                let view = WeatherView {
                    current: &current,
                    forecast: &forecast,
                    label: &self.location.label,
                    offset: self.drag.offset(),
                };
                self.card_area = Some(card::render_weather(frame, area, &view));
            }
        }
    }

    /// Reads the crossterm events and updates the state of [`App`].
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Up | KeyCode::Char('k')) => self.drag.expand(),
            (_, KeyCode::Down | KeyCode::Char('j')) => self.drag.collapse(),
            _ => {}
        }
    }

    /// Maps left-button drags on the card's top edge to the card gesture.
    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        let y = i32::from(mouse.row) * CELL_HEIGHT_PX as i32;
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if self.on_card_handle(mouse.row) => {
                self.drag.begin(y);
            }
            MouseEventKind::Drag(MouseButton::Left) => self.drag.drag(y),
            MouseEventKind::Up(MouseButton::Left) => self.drag.release(),
            _ => {}
        }
    }

    /// Whether `row` is the card's border or drag handle.
    fn on_card_handle(&self, row: u16) -> bool {
        self.card_area
            .is_some_and(|card| row >= card.y && row < card.y.saturating_add(2))
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
