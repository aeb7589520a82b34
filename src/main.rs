use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use mise_terminal::analysis::ScoredMatch;
use mise_terminal::export;
use mise_terminal::import;
use mise_terminal::kelly::StakeAdvice;
use mise_terminal::record::{self, Side};
use mise_terminal::sample;
use mise_terminal::score::variant_label;
use mise_terminal::state::{AppState, RecordForm, Screen, screen_label, sort_label};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new() -> Self {
        let mut state = AppState::new();

        let budget = std::env::var("STAKE_BUDGET")
            .ok()
            .and_then(|val| val.parse::<f64>().ok())
            .filter(|b| b.is_finite() && *b > 0.0);
        if let Some(budget) = budget {
            state.budget = budget;
        }

        match records_path() {
            Some(path) => match import::load_records_json(&path) {
                Ok(records) => {
                    state.push_log(format!(
                        "[INFO] Loaded {} record(s) from {}",
                        records.len(),
                        path.display()
                    ));
                    state.records = records;
                    state.analysis_dirty = !state.records.is_empty();
                }
                Err(err) => {
                    state.push_log(format!("[WARN] Import failed: {err:#}"));
                }
            },
            None => {
                state.push_log("[INFO] No records file given (arg or RECORDS_FILE)");
            }
        }

        let demo = std::env::var("DEMO_MATCHES")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(0)
            .min(200);
        if state.records.is_empty() && demo > 0 {
            let mut rng = rand::thread_rng();
            state.records = sample::sample_records(demo, &mut rng);
            state.analysis_dirty = true;
            state.push_log(format!("[INFO] Seeded {demo} demo match(es)"));
        }

        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            match key.code {
                KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
                    self.state.help_overlay = false;
                }
                _ => {}
            }
            return;
        }

        if self.state.budget_input.is_some() {
            self.on_budget_key(key);
            return;
        }

        if self.state.screen == Screen::Form {
            self.on_form_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = true,
            KeyCode::Char('1') => self.state.screen = Screen::Matches,
            KeyCode::Char('2') => self.state.screen = Screen::Analysis,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('a') => {
                self.state.run_analysis();
                self.state.screen = Screen::Analysis;
            }
            KeyCode::Char('n') => {
                self.state.form = Some(RecordForm::new());
                self.state.screen = Screen::Form;
            }
            KeyCode::Char('e') => self.edit_selected(),
            KeyCode::Char('x') => {
                if self.state.screen == Screen::Matches {
                    if let Some(removed) = self.state.delete_selected() {
                        self.state.push_log(format!(
                            "[INFO] Deleted {} vs {}",
                            removed.home_team, removed.away_team
                        ));
                    }
                }
            }
            KeyCode::Char('s') => {
                self.state.cycle_sort();
                self.state.push_log(format!(
                    "[INFO] Sort mode: {}",
                    sort_label(self.state.sort)
                ));
            }
            KeyCode::Char('m') => {
                self.state.budget_input = Some(format!("{:.2}", self.state.budget));
            }
            KeyCode::Char('w') => self.export_analysis(),
            KeyCode::Char('d') | KeyCode::Enter => {
                if self.state.screen == Screen::Analysis && !self.state.analysis.is_empty() {
                    self.state.screen = Screen::Detail;
                }
            }
            KeyCode::Char('b') | KeyCode::Esc => {
                self.state.screen = match self.state.screen {
                    Screen::Detail => Screen::Analysis,
                    _ => Screen::Matches,
                };
            }
            _ => {}
        }
    }

    fn on_budget_key(&mut self, key: KeyEvent) {
        let Some(buffer) = self.state.budget_input.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == ',' => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Enter => {
                let raw = self.state.budget_input.take().unwrap_or_default();
                self.state.set_budget(record::parse_num_cell(&raw));
            }
            KeyCode::Esc => {
                self.state.budget_input = None;
            }
            _ => {}
        }
    }

    fn on_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.state.form.as_mut() else {
            self.state.screen = Screen::Matches;
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.state.form = None;
                self.state.screen = Screen::Matches;
                self.state.push_log("[INFO] Entry cancelled");
            }
            KeyCode::Tab => form.toggle_recent_form(),
            KeyCode::Up => form.select_prev(),
            KeyCode::Down => form.select_next(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                if form.selected + 1 == form.visible_len() {
                    self.submit_form();
                } else {
                    form.select_next();
                }
            }
            KeyCode::Char(c) => form.push_char(c),
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let Some(form) = self.state.form.take() else {
            return;
        };
        let record = form.to_record();
        let label = format!("{} vs {}", record.home_team, record.away_team);
        match form.editing {
            Some(index) => {
                self.state.replace_record(index, record);
                self.state.push_log(format!("[INFO] Updated {label}"));
            }
            None => {
                self.state.add_record(record);
                self.state.push_log(format!("[INFO] Added {label}"));
            }
        }
        self.state.screen = Screen::Matches;
    }

    fn edit_selected(&mut self) {
        if self.state.screen != Screen::Matches {
            return;
        }
        let Some(record) = self.state.selected_record() else {
            self.state.push_log("[INFO] No match selected to edit");
            return;
        };
        self.state.form = Some(RecordForm::from_record(record, self.state.selected));
        self.state.screen = Screen::Form;
    }

    fn export_analysis(&mut self) {
        if self.state.analysis.is_empty() {
            self.state
                .push_log("[INFO] Nothing to export - run analysis first (a)");
            return;
        }
        let csv_path = PathBuf::from(export::timestamped_name("analysis", "csv"));
        match export::export_csv(&csv_path, &self.state.analysis, &self.state.stakes) {
            Ok(rows) => self.state.push_log(format!(
                "[INFO] Wrote {rows} row(s) to {}",
                csv_path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] CSV export failed: {err:#}")),
        }
        let xlsx_path = PathBuf::from(export::timestamped_name("analysis", "xlsx"));
        match export::export_xlsx(&xlsx_path, &self.state.analysis, &self.state.stakes) {
            Ok(_) => self
                .state
                .push_log(format!("[INFO] Wrote workbook {}", xlsx_path.display())),
            Err(err) => self
                .state
                .push_log(format!("[WARN] XLSX export failed: {err:#}")),
        }
    }
}

fn records_path() -> Option<PathBuf> {
    if let Some(arg) = std::env::args().nth(1) {
        return Some(PathBuf::from(arg));
    }
    std::env::var("RECORDS_FILE").ok().map(PathBuf::from)
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new();
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Matches => render_matches(frame, chunks[1], &app.state),
        Screen::Analysis => render_analysis(frame, chunks[1], &app.state),
        Screen::Detail => render_detail(frame, chunks[1], &app.state),
        Screen::Form => render_form(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = format!(
        "MISE TERMINAL | {} | Sort: {}",
        screen_label(state.screen),
        sort_label(state.sort)
    );
    let budget_line = match &state.budget_input {
        Some(buffer) => format!("Budget: {buffer}_ (Enter to set, Esc to cancel)"),
        None => format!(
            "Budget: {:.2} | Advised total: {:.2}",
            state.budget,
            state.total_staked()
        ),
    };
    let status = if state.analysis_dirty {
        "Analysis out of date - press a"
    } else {
        ""
    };
    format!(" ($) {title}\n     {budget_line}\n     {status}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Matches => {
            "1 Matches | 2 Analysis | n New | e Edit | x Delete | a Analyse | m Budget | ? Help | q Quit"
                .to_string()
        }
        Screen::Analysis => {
            "Enter/d Detail | j/k Move | s Sort | a Re-analyse | w Export | m Budget | b Back | ? Help | q Quit"
                .to_string()
        }
        Screen::Detail => "b/Esc Back | j/k Move | w Export | ? Help | q Quit".to_string(),
        Screen::Form => {
            "Enter Next/Submit on last | ↑/↓ Field | Tab Last-5 section | Esc Cancel".to_string()
        }
    }
}

fn render_matches(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Matches").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.records.is_empty() {
        let empty = Paragraph::new("No matches yet - press n to add one, or launch with a records file")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let mut lines = vec![format!(
        "   {:<14}{:<14}{:>6}{:>6}  {:<9}{:<9}{:>7}  {}",
        "HOME", "AWAY", "C.H", "C.A", "H W-D-L", "A W-D-L", "GD", "L5"
    )];
    for (idx, record) in state.records.iter().enumerate() {
        let prefix = if idx == state.selected { "> " } else { "  " };
        let goal_gap =
            record.home_stats.goal_balance() - record.away_stats.goal_balance();
        lines.push(format!(
            "{prefix} {:<14}{:<14}{:>6.2}{:>6.2}  {:<9}{:<9}{:>+7.0}  {}",
            truncate(&record.home_team, 13),
            truncate(&record.away_team, 13),
            record.cote_home,
            record.cote_away,
            wdl(record.home_stats.wins, record.home_stats.draws, record.home_stats.losses),
            wdl(record.away_stats.wins, record.away_stats.draws, record.away_stats.losses),
            goal_gap,
            if record.has_recent_form() { "yes" } else { "-" },
        ));
    }

    let list = Paragraph::new(lines.join("\n"));
    frame.render_widget(list, inner);
}

fn render_analysis(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Analysis").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.analysis.is_empty() {
        let hint = if state.records.is_empty() {
            "Add at least one match first (n)"
        } else {
            "Press a to analyse the current match list"
        };
        let empty = Paragraph::new(hint).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let mut lines = vec![format!(
        "   {:<30}{:>8}{:>8}{:>9}  {:<14}{:>10}",
        "MATCH", "VAR", "SCORE", "P(HOME)", "WINNER", "STAKE"
    )];
    for (row, &idx) in state.analysis_order().iter().enumerate() {
        let m = &state.analysis[idx];
        let stake = state
            .stakes
            .get(idx)
            .map(|s| format!("{:.2}", s.stake_amount))
            .unwrap_or_default();
        let prefix = if row == state.analysis_selected {
            "> "
        } else {
            "  "
        };
        lines.push(format!(
            "{prefix} {:<30}{:>8}{:>8.1}{:>8.0}%  {:<14}{:>10}",
            truncate(&format!("{} vs {}", m.home_team, m.away_team), 29),
            variant_label(m.variant),
            m.score_securite,
            m.prob_home * 100.0,
            truncate(&m.winner, 13),
            stake,
        ));
    }

    let list = Paragraph::new(lines.join("\n"));
    frame.render_widget(list, inner);
}

fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Match Detail").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(idx) = state.selected_analysis_index() else {
        let empty = Paragraph::new("No analysed match selected");
        frame.render_widget(empty, inner);
        return;
    };
    let m = &state.analysis[idx];
    let advice = state.stakes.get(idx);

    let text = detail_text(m, advice, state.budget);
    let detail = Paragraph::new(text);
    frame.render_widget(detail, inner);
}

fn detail_text(m: &ScoredMatch, advice: Option<&StakeAdvice>, budget: f64) -> String {
    let mut lines = vec![
        format!("{} vs {}", m.home_team, m.away_team),
        format!("Odds: {:.2} / {:.2}", m.cote_home, m.cote_away),
        String::new(),
        format!("Odds gap:        {:.2}", m.metrics.diff_cote),
        format!(
            "Form points:     {:+.0} / {:+.0}",
            m.metrics.home_form, m.metrics.away_form
        ),
        format!("Goal diff:       {:+.0}", m.metrics.goal_diff),
    ];
    if let (Some(home_recent), Some(away_recent)) =
        (m.metrics.home_recent_form, m.metrics.away_recent_form)
    {
        lines.push(format!(
            "Last-5 index:    {:.2} / {:.2}",
            home_recent, away_recent
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Safety score:    {:.1} ({})",
        m.score_securite,
        variant_label(m.variant)
    ));
    lines.push(format!(
        "Win probability: {:.1}% home / {:.1}% away",
        m.prob_home * 100.0,
        m.prob_away * 100.0
    ));
    let side = match m.winner_side {
        Side::Home => "home",
        Side::Away => "away",
    };
    lines.push(format!("Predicted:       {} ({side})", m.winner));
    if let Some(advice) = advice {
        lines.push(String::new());
        lines.push(format!(
            "Kelly stake:     {:.1}% of {:.2} -> {:.2}",
            advice.stake_fraction * 100.0,
            budget,
            advice.stake_amount
        ));
    }
    lines.push(String::new());
    lines.push(m.home_form_note.clone());
    lines.push(m.away_form_note.clone());
    lines.join("\n")
}

fn render_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = match state.form.as_ref().and_then(|f| f.editing) {
        Some(_) => "Edit Match",
        None => "Add Match",
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(form) = &state.form else {
        return;
    };

    let mut lines = Vec::new();
    for (idx, field) in form.fields.iter().take(form.visible_len()).enumerate() {
        if idx == 14 {
            lines.push(String::new());
            lines.push("Last-5 form:".to_string());
        }
        let marker = if idx == form.selected { "> " } else { "  " };
        let cursor = if idx == form.selected { "_" } else { "" };
        lines.push(format!("{marker}{:<20} {}{cursor}", field.label, field.value));
    }
    if !form.with_recent_form {
        lines.push(String::new());
        lines.push("Tab adds the last-5 form section".to_string());
    }

    let body = Paragraph::new(lines.join("\n"));
    frame.render_widget(body, inner);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No activity yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(4)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Mise Terminal - Help",
        "",
        "Global:",
        "  1            Matches",
        "  2            Analysis",
        "  a            Run analysis",
        "  m            Set budget",
        "  w            Export CSV + XLSX",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Matches:",
        "  n / e / x    New / Edit / Delete record",
        "  j/k or ↑/↓   Move",
        "",
        "Analysis:",
        "  Enter / d    Match detail",
        "  s            Cycle sort (entry/score/stake)",
        "",
        "Form:",
        "  Enter        Next field (submit on last)",
        "  Tab          Toggle last-5 section",
        "  Esc          Cancel",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

fn wdl(wins: u32, draws: u32, losses: u32) -> String {
    format!("{wins}-{draws}-{losses}")
}

fn truncate(raw: &str, max: usize) -> String {
    if raw.chars().count() <= max {
        raw.to_string()
    } else {
        let cut: String = raw.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
