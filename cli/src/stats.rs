use std::{io, time::Duration};

use anyhow::Result;
use calio_core::{
    repository::{FoodEntryRepository, SettingsRepository, WaterEntryRepository},
    service::events::drain_changes,
    time::{local_date, now_millis, shift_days},
    usecase::dashboard::{build_dashboard, Dashboard, DashboardUseCase, Snapshot},
    ChangeNotifier, EntryService, InsightLevel,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Gauge, Padding, Paragraph},
};

/// How many weeks back the dashboard lets you page.
const MAX_WEEKS_BACK: u32 = 12;

/// Logged by the `w` key.
const QUICK_WATER_ML: u32 = 250;

struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    good: Color,
    over: Color,
    water: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    good: Color::Green,
    over: Color::Red,
    water: Color::Blue,
};

pub struct StatsApp {
    snapshot: Snapshot,
    now: i64,
    pub weeks_back: u32,
    dashboard: Dashboard,
    pub status: Option<String>,
}

impl StatsApp {
    pub fn new(snapshot: Snapshot, now: i64) -> Self {
        let dashboard = build_dashboard(&snapshot, now);
        Self {
            snapshot,
            now,
            weeks_back: 0,
            dashboard,
            status: None,
        }
    }

    /// Moves toward today.
    pub fn next_week(&mut self) {
        if self.weeks_back > 0 {
            self.weeks_back -= 1;
            self.refresh();
        }
    }

    pub fn previous_week(&mut self) {
        if self.weeks_back < MAX_WEEKS_BACK {
            self.weeks_back += 1;
            self.refresh();
        }
    }

    /// Swaps in freshly read data, keeping the visible week.
    pub fn reload(&mut self, snapshot: Snapshot, now: i64) {
        self.snapshot = snapshot;
        self.now = now;
        self.refresh();
    }

    fn refresh(&mut self) {
        let anchor = shift_days(self.now, -7 * i64::from(self.weeks_back));
        self.dashboard = build_dashboard(&self.snapshot, anchor);
    }

    pub fn current(&self) -> &Dashboard {
        &self.dashboard
    }
}

pub fn run<F, W, S>(
    food_repo: &F,
    water_repo: &W,
    settings_repo: &S,
    notifier: &ChangeNotifier,
) -> Result<()>
where
    F: FoodEntryRepository + Clone,
    W: WaterEntryRepository + Clone,
    S: SettingsRepository,
{
    let usecase = DashboardUseCase::new(food_repo, water_repo, settings_repo);
    let entries =
        EntryService::new(food_repo.clone(), water_repo.clone()).with_notifier(notifier.clone());
    let mut events = notifier.subscribe();
    let snapshot = usecase.snapshot()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = StatsApp::new(snapshot, now_millis());

    loop {
        terminal.draw(|f| ui(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Left | KeyCode::Char('h') => app.previous_week(),
                        KeyCode::Right | KeyCode::Char('l') => app.next_week(),
                        KeyCode::Char('w') => {
                            app.status = Some(match entries.add_water(QUICK_WATER_ML) {
                                Ok(created) => format!("+{}ml water", created.amount),
                                Err(e) => e.to_string(),
                            });
                        }
                        _ => {}
                    }
                }
            }
        }

        if drain_changes(&mut events) {
            app.reload(usecase.snapshot()?, now_millis());
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn ui(frame: &mut Frame, app: &StatsApp) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let dashboard = app.current();

    // --- Header ---
    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20),
            Constraint::Min(1),
            Constraint::Length(34),
        ])
        .split(main_layout[0]);

    let app_title = Paragraph::new(Span::styled(
        "CALIO STATS",
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(app_title, header_layout[0]);

    let range = match (dashboard.week.first(), dashboard.week.last()) {
        (Some(first), Some(last)) => format!(
            " {} - {} ",
            local_date(first.date).format("%b %d"),
            local_date(last.date).format("%b %d")
        ),
        _ => String::from(" - "),
    };
    let arrow = |enabled: bool| Style::default().fg(if enabled { THEME.text } else { THEME.muted });
    let nav_text = Line::from(vec![
        Span::styled(" < ", arrow(app.weeks_back < MAX_WEEKS_BACK)),
        Span::styled(range, Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        Span::styled(" > ", arrow(app.weeks_back > 0)),
    ]);
    let nav = Paragraph::new(nav_text)
        .alignment(Alignment::Right)
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(nav, header_layout[2]);

    let header_block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(THEME.muted));
    frame.render_widget(header_block, main_layout[0]);

    // --- Main Content Split ---
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(65),
            Constraint::Length(1),
            Constraint::Percentage(35),
        ])
        .split(main_layout[1]);

    draw_chart(frame, dashboard, content_chunks[0]);
    draw_info_panel(frame, dashboard, content_chunks[2]);

    // --- Footer ---
    let help = Line::from(vec![
        Span::styled("WEEK: ", Style::default().fg(THEME.muted)),
        Span::styled("←/→ ", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("WATER: ", Style::default().fg(THEME.muted)),
        Span::styled("w ", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled(app.status.clone().unwrap_or_default(), Style::default().fg(THEME.water)),
    ]);
    let footer = Paragraph::new(help)
        .alignment(Alignment::Center)
        .style(Style::default().fg(THEME.muted));
    frame.render_widget(footer, main_layout[2]);
}

fn draw_chart(frame: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let target = u64::from(dashboard.settings.daily_calorie_target);

    let bar_items: Vec<Bar> = dashboard
        .week
        .iter()
        .map(|day| {
            let value = u64::from(day.total_calories);
            let color = if day.total_calories == 0 {
                THEME.muted
            } else if day.is_on_target() {
                THEME.good
            } else {
                THEME.over
            };
            Bar::default()
                .label(local_date(day.date).format("%a").to_string())
                .value(value)
                .style(Style::default().fg(color))
                .text_value(if value > 0 { value.to_string() } else { String::new() })
        })
        .collect();

    let peak = dashboard
        .week
        .iter()
        .map(|d| u64::from(d.total_calories))
        .max()
        .unwrap_or(0);

    let chart_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
        .title(format!(" Calories per day (target {}) ", target));

    let chart = BarChart::default()
        .block(chart_block)
        .bar_width(7)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bar_items))
        .max(peak.max(target).max(1));

    frame.render_widget(chart, area);
}

fn draw_info_panel(frame: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(11),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    let progress = &dashboard.progress;
    let averages = &dashboard.averages;

    let row = |name: &'static str, text: String, color: Color| {
        Line::from(vec![
            Span::styled(name, Style::default().fg(THEME.muted)),
            Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ])
    };
    let profile = &dashboard.profile;

    let info_text = vec![
        Line::from(vec![Span::styled("Overview", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from(""),
        row("Streak:    ", format!("{}d", progress.current_streak), THEME.good),
        row("Longest:   ", format!("{}d", progress.longest_streak), THEME.text),
        row(
            "On target: ",
            format!("{}/{}", progress.days_on_target, progress.total_days),
            THEME.text,
        ),
        row("Avg kcal:  ", progress.weekly_average.to_string(), THEME.primary),
        row("Avg water: ", format!("{}ml", averages.water), THEME.water),
        row(
            "BMI:       ",
            format!("{:.1} {}", profile.bmi, profile.bmi_category.label()),
            level_color(profile.bmi_category.level()),
        ),
        row("TDEE:      ", profile.tdee.to_string(), THEME.text),
    ];

    let info_block = Paragraph::new(info_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(" Summary "),
    );
    frame.render_widget(info_block, chunks[0]);

    // Last day of the visible window.
    let day = &dashboard.today;
    let ratio = if day.target > 0 {
        f64::from(day.total_calories) / f64::from(day.target)
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(format!(" {} ", local_date(day.date).format("%a %b %d")))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted)),
        )
        .gauge_style(Style::default().fg(if ratio > 1.0 { THEME.over } else { THEME.good }))
        .ratio(ratio.min(1.0))
        .label(format!("{} / {} kcal", day.total_calories, day.target));
    frame.render_widget(gauge, chunks[1]);

    let insight_lines: Vec<Line> = dashboard
        .insights
        .iter()
        .map(|insight| {
            Line::from(Span::styled(
                insight.message.clone(),
                Style::default().fg(level_color(insight.level)),
            ))
        })
        .collect();
    let insights = Paragraph::new(insight_lines)
        .wrap(ratatui::widgets::Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted))
                .title(" Insights "),
        );
    frame.render_widget(insights, chunks[2]);
}

fn level_color(level: InsightLevel) -> Color {
    match level {
        InsightLevel::Success => THEME.good,
        InsightLevel::Warning => Color::Yellow,
        InsightLevel::Info => THEME.water,
        InsightLevel::Error => THEME.over,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calio_core::{
        FileEntryRepository, FileSettingsRepository, FoodEntry, NewFoodEntry, UserSettings,
    };
    use chrono::{Local, TimeZone};

    fn noon() -> i64 {
        Local
            .with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
            .single()
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_week_paging_is_bounded() {
        let now = noon();
        let snapshot = Snapshot {
            food: vec![FoodEntry::new(
                NewFoodEntry {
                    name: "Soup".to_string(),
                    calories: 400,
                    ..NewFoodEntry::default()
                },
                shift_days(now, -7),
            )],
            water: Vec::new(),
            settings: UserSettings::default(),
        };
        let mut app = StatsApp::new(snapshot, now);

        app.next_week();
        assert_eq!(app.weeks_back, 0);
        assert_eq!(app.current().today.total_calories, 0);

        app.previous_week();
        assert_eq!(app.weeks_back, 1);
        assert_eq!(app.current().today.total_calories, 400);

        for _ in 0..20 {
            app.previous_week();
        }
        assert_eq!(app.weeks_back, MAX_WEEKS_BACK);
    }

    #[test]
    fn test_logged_water_reloads_dashboard() {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir()
            .join(format!("calio_stats_{}_{}", std::process::id(), nanos));
        let repo = FileEntryRepository::new(Some(dir.clone())).unwrap();
        let settings = FileSettingsRepository::new(Some(dir.clone())).unwrap();
        let usecase = DashboardUseCase::new(&repo, &repo, &settings);

        let notifier = ChangeNotifier::new();
        let mut events = notifier.subscribe();
        let entries =
            EntryService::new(repo.clone(), repo.clone()).with_notifier(notifier.clone());

        let now = now_millis();
        let mut app = StatsApp::new(usecase.snapshot().unwrap(), now);
        assert_eq!(app.current().today.total_water, 0);
        assert!(!drain_changes(&mut events));

        entries.add_water_at(QUICK_WATER_ML, now).unwrap();
        assert!(drain_changes(&mut events));
        app.reload(usecase.snapshot().unwrap(), now);
        assert_eq!(app.current().today.total_water, QUICK_WATER_ML);

        // Reloading keeps the week being viewed.
        app.previous_week();
        app.reload(usecase.snapshot().unwrap(), now);
        assert_eq!(app.weeks_back, 1);
        assert_eq!(app.current().today.total_water, 0);

        std::fs::remove_dir_all(dir).unwrap();
    }
}
