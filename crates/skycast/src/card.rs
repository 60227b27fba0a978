//! Weather card rendering.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph},
};
use skycast_core::{CELL_HEIGHT_PX, weather_icon};

use crate::weather::{CurrentWeather, DailyForecast, FetchState};

/// Card height in rows when collapsed, borders included.
const COLLAPSED_ROWS: u16 = 8;

/// Rows kept free above the card for the temperature header.
const HEADER_ROWS: u16 = 5;

const CARD_BG: Color = Color::Rgb(20, 24, 32);
const MAX_COLOR: Color = Color::Rgb(255, 140, 100);
const MIN_COLOR: Color = Color::Rgb(120, 170, 255);

/// Everything needed to draw the loaded weather screen.
#[derive(Debug, Clone, Copy)]
pub struct WeatherView<'a> {
    pub current: &'a CurrentWeather,
    pub forecast: &'a FetchState<Vec<DailyForecast>>,
    pub label: &'a str,
    /// Card drag offset in pixels; negative raises the card.
    pub offset: i32,
}

/// Loading screen shown until current conditions arrive.
pub fn render_loading(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from("🌤️  🌦️  ⛅"),
        Line::default(),
        Line::from("Loading weather..."),
    ];
    render_centered(frame, area, lines);
}

/// Terminal screen shown when current conditions could not be fetched.
pub fn render_failed(frame: &mut Frame, area: Rect) {
    let lines = vec![Line::from("❌ Unable to fetch weather.").bold()];
    render_centered(frame, area, lines);
}

fn render_centered(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let height = lines.len() as u16;
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), middle);
}

/// Draw the header and the card. Returns the card's area for hit-testing.
pub fn render_weather(frame: &mut Frame, area: Rect, view: &WeatherView) -> Rect {
    let header = Rect {
        y: area.y + 1,
        height: 2_u16.min(area.height.saturating_sub(1)),
        ..area
    };
    let header_lines = vec![
        Line::from(format!("{}°", view.current.temperature)).bold(),
        Line::from(format!("{} · Current temperature", view.label)).dark_gray(),
    ];
    frame.render_widget(
        Paragraph::new(header_lines).alignment(Alignment::Center),
        header,
    );

    let card = card_rect(area, view.offset);
    render_card(frame, card, view);
    card
}

/// Area of the card for a given drag offset.
pub fn card_rect(area: Rect, offset: i32) -> Rect {
    let raise = -offset / CELL_HEIGHT_PX as i32;
    let available = area.height.saturating_sub(HEADER_ROWS).max(1);
    let rows = (i32::from(COLLAPSED_ROWS) + raise).clamp(1, i32::from(available)) as u16;
    let rows = rows.min(area.height);

    Rect {
        y: area.bottom() - rows,
        height: rows,
        ..area
    }
}

fn render_card(frame: &mut Frame, card: Rect, view: &WeatherView) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::new().dark_gray())
        .style(Style::new().bg(CARD_BG));
    let inner = block.inner(card);
    frame.render_widget(Clear, card);
    frame.render_widget(block, card);

    let [handle, details, _, title, list] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    frame.render_widget(Line::from("──────").dark_gray().centered(), handle);

    let [wind, updated] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(details);
    frame.render_widget(
        detail("💨", format!("{} km/h", view.current.windspeed), "Wind"),
        wind,
    );
    frame.render_widget(
        detail(
            "⏰",
            view.current.time.format("%H:%M").to_string(),
            "Updated",
        ),
        updated,
    );

    frame.render_widget(Line::from("📅 Weekly forecast").bold(), title);
    frame.render_widget(Paragraph::new(forecast_lines(view.forecast)), list);
}

fn detail(icon: &'static str, value: String, label: &'static str) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(icon),
        Line::from(value).bold(),
        Line::from(label).dark_gray(),
    ])
    .alignment(Alignment::Center)
}

/// One line per forecast day, in the order the API returned them.
pub fn forecast_lines(forecast: &FetchState<Vec<DailyForecast>>) -> Vec<Line<'static>> {
    match forecast {
        FetchState::Loading => vec![Line::from("Loading forecast...").dark_gray()],
        FetchState::Failed(_) => vec![Line::from("Forecast unavailable.").dark_gray()],
        FetchState::Ready(days) => days.iter().map(forecast_line).collect(),
    }
}

fn forecast_line(day: &DailyForecast) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{:<5}", day.date.format("%a").to_string())),
        Span::raw(weather_icon(day.code)),
        Span::raw("  "),
        Span::styled(format!("{}°", day.max), Style::new().fg(MAX_COLOR)),
        Span::raw("/"),
        Span::styled(format!("{}°", day.min), Style::new().fg(MIN_COLOR)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    use crate::gesture::{COLLAPSED_OFFSET, EXPANDED_OFFSET};

    fn current() -> CurrentWeather {
        CurrentWeather {
            temperature: 12.3,
            windspeed: 7.4,
            time: NaiveDateTime::parse_from_str("2024-05-01T14:45", "%Y-%m-%dT%H:%M").unwrap(),
            weathercode: 61,
        }
    }

    fn week() -> Vec<DailyForecast> {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(); // Wednesday
        let codes = [0, 2, 3, 61, 73, 95, 45];
        codes
            .iter()
            .enumerate()
            .map(|(i, &code)| DailyForecast {
                date: start + chrono::Days::new(i as u64),
                max: 20.0 + i as f64,
                min: 10.5 + i as f64,
                code,
            })
            .collect()
    }

    fn rows(buffer: &Buffer) -> Vec<String> {
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn render(view: &WeatherView) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(60, 50)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_weather(frame, area, view);
            })
            .unwrap();
        rows(terminal.backend().buffer())
    }

    #[test]
    fn test_expanded_card_lists_week_in_order() {
        let current = current();
        let forecast = FetchState::Ready(week());
        let view = WeatherView {
            current: &current,
            forecast: &forecast,
            label: "Seoul",
            offset: EXPANDED_OFFSET,
        };
        let rows = render(&view);

        let weekdays = ["Wed", "Thu", "Fri", "Sat", "Sun", "Mon", "Tue"];
        let found: Vec<&str> = rows
            .iter()
            .filter_map(|row| weekdays.iter().copied().find(|day| row.contains(*day)))
            .collect();
        assert_eq!(found, weekdays);

        for i in 0..7 {
            let temps = format!("{}°/{}°", 20.0 + i as f64, 10.5 + i as f64);
            assert!(rows.iter().any(|row| row.contains(&temps)), "missing {temps}");
        }
    }

    #[test]
    fn test_collapsed_card_hides_forecast() {
        let current = current();
        let forecast = FetchState::Ready(week());
        let view = WeatherView {
            current: &current,
            forecast: &forecast,
            label: "Seoul",
            offset: COLLAPSED_OFFSET,
        };
        let rows = render(&view);

        assert!(rows.iter().any(|row| row.contains("12.3°")));
        assert!(rows.iter().any(|row| row.contains("Seoul · Current temperature")));
        assert!(rows.iter().any(|row| row.contains("7.4 km/h")));
        assert!(rows.iter().any(|row| row.contains("14:45")));
        assert!(!rows.iter().any(|row| row.contains("Wed")));
    }

    #[test]
    fn test_forecast_lines_follow_fetch_state() {
        assert_eq!(forecast_lines(&FetchState::Loading).len(), 1);
        assert_eq!(
            forecast_lines(&FetchState::Failed("timeout".to_string())).len(),
            1
        );
        assert_eq!(forecast_lines(&FetchState::Ready(week())).len(), 7);
    }

    #[test]
    fn test_forecast_line_uses_icon_table() {
        let days = week();
        let line = forecast_line(&days[5]);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.starts_with("Mon"));
        assert!(text.contains(weather_icon(95)));
        assert!(text.ends_with("25°/15.5°"));
    }

    #[test]
    fn test_card_rect_follows_offset() {
        let area = Rect::new(0, 0, 80, 50);
        assert_eq!(card_rect(area, COLLAPSED_OFFSET).height, COLLAPSED_ROWS);
        assert_eq!(card_rect(area, EXPANDED_OFFSET).height, COLLAPSED_ROWS + 25);
        assert_eq!(card_rect(area, -80).height, COLLAPSED_ROWS + 5);
        assert_eq!(card_rect(area, 190).height, 1);

        let small = Rect::new(0, 0, 80, 12);
        assert_eq!(card_rect(small, EXPANDED_OFFSET).height, 7);
        assert_eq!(card_rect(small, EXPANDED_OFFSET).bottom(), small.bottom());
    }

    #[test]
    fn test_loading_and_failed_screens() {
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_loading(frame, area);
            })
            .unwrap();
        assert!(
            rows(terminal.backend().buffer())
                .iter()
                .any(|row| row.contains("Loading weather..."))
        );

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_failed(frame, area);
            })
            .unwrap();
        assert!(
            rows(terminal.backend().buffer())
                .iter()
                .any(|row| row.contains("Unable to fetch weather."))
        );
    }
}
