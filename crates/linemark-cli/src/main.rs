use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use linemark_config::Config;
use linemark_engine::{
    Cmd, Decoration, DecorationKind, Document, FoldCache, FoldStore, ToggleKind, decorate,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::{
    collections::HashSet,
    env, fs,
    io::stdout,
    path::{Path, PathBuf},
    process,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Files,
    Page,
}

struct App {
    notes_path: PathBuf,
    pages: Vec<PathBuf>,
    file_list_state: ListState,
    focus: Focus,

    document: Option<Document>,
    page_id: Option<String>,
    cursor_line: usize,
    scroll: usize,
    dirty: bool,
    status: String,

    folded: HashSet<usize>,
    fold_cache: FoldCache,
    fold_store: FoldStore,
}

impl App {
    fn new(config: &Config) -> Result<Self> {
        let notes_path = config.notes_path.clone();
        let mut pages = Vec::new();
        scan_pages(&notes_path, &notes_path, &mut pages)?;
        pages.sort();

        let mut app = Self {
            notes_path,
            pages,
            file_list_state: ListState::default(),
            focus: Focus::Files,
            document: None,
            page_id: None,
            cursor_line: 0,
            scroll: 0,
            dirty: false,
            status: String::from("enter: open  q: quit"),
            folded: HashSet::new(),
            fold_cache: FoldCache::new(config.fold_scan_limit),
            fold_store: FoldStore::new(config.fold_state_dir(), FoldStore::DEFAULT_PREFIX),
        };

        if !app.pages.is_empty() {
            app.file_list_state.select(Some(0));
        }
        Ok(app)
    }

    fn next_file(&mut self) {
        if self.pages.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(i) => (i + 1) % self.pages.len(),
            None => 0,
        };
        self.file_list_state.select(Some(i));
    }

    fn previous_file(&mut self) {
        if self.pages.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(i) => (i + self.pages.len() - 1) % self.pages.len(),
            None => 0,
        };
        self.file_list_state.select(Some(i));
    }

    fn open_selected(&mut self) -> Result<()> {
        let Some(selected) = self.file_list_state.selected() else {
            return Ok(());
        };
        let rel = self.pages[selected].clone();
        let page_id = rel.to_string_lossy().to_string();
        let content = fs::read_to_string(self.notes_path.join(&rel))
            .with_context(|| format!("reading {}", rel.display()))?;
        let document = Document::from_bytes(content.as_bytes())?;

        // Stored fold lines are 1-indexed and re-resolved through the fold
        // engine; anything that no longer names a foldable heading drops.
        self.folded = self
            .fold_store
            .load(&page_id)
            .into_iter()
            .filter_map(|line| line.checked_sub(1))
            .filter(|&line| {
                self.fold_cache
                    .section_starting_at(&document, document.offset_of_line(line))
                    .is_some()
            })
            .collect();

        self.document = Some(document);
        self.page_id = Some(page_id);
        self.cursor_line = 0;
        self.scroll = 0;
        self.dirty = false;
        self.focus = Focus::Page;
        self.status = String::from("b/o/t/>: toggle  space: check  tab: fold  s: save  esc: files");
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        let (Some(doc), Some(selected)) = (&self.document, self.file_list_state.selected()) else {
            return Ok(());
        };
        let path = self.notes_path.join(&self.pages[selected]);
        fs::write(&path, doc.text()).with_context(|| format!("writing {}", path.display()))?;
        self.dirty = false;
        self.status = format!("saved {}", self.pages[selected].display());
        Ok(())
    }

    /// Lines hidden by active folds.
    fn hidden_lines(&mut self) -> HashSet<usize> {
        let Some(doc) = &self.document else {
            return HashSet::new();
        };
        let mut hidden = HashSet::new();
        for &heading in &self.folded {
            let Some(range) = self
                .fold_cache
                .section_starting_at(doc, doc.offset_of_line(heading))
            else {
                continue;
            };
            let last = doc.line_of_offset(range.end);
            for line in heading + 1..=last {
                hidden.insert(line);
            }
        }
        hidden
    }

    fn toggle_fold_at_cursor(&mut self) {
        let Some(doc) = &self.document else { return };
        let offset = doc.offset_of_line(self.cursor_line);
        if self.fold_cache.section_starting_at(doc, offset).is_none() {
            self.status = String::from("not a foldable heading");
            return;
        }

        if !self.folded.remove(&self.cursor_line) {
            self.folded.insert(self.cursor_line);
        }
        self.persist_folds();
    }

    fn persist_folds(&mut self) {
        let Some(page_id) = &self.page_id else { return };
        let mut lines: Vec<usize> = self.folded.iter().map(|l| l + 1).collect();
        lines.sort_unstable();
        if let Err(e) = self.fold_store.save(page_id, &lines) {
            tracing::warn!(error = %e, "failed to persist fold state");
            self.status = String::from("fold state not saved");
        }
    }

    fn apply(&mut self, cmd: Cmd) {
        match self.document.as_mut() {
            Some(doc) => {
                doc.apply(cmd);
                self.dirty = true;
            }
            None => return,
        }
        // Edits can change what is foldable; drop folds that no longer
        // resolve instead of hiding the wrong lines.
        if let Some(doc) = &self.document {
            let cache = &mut self.fold_cache;
            self.folded.retain(|&line| {
                line < doc.line_count()
                    && cache
                        .section_starting_at(doc, doc.offset_of_line(line))
                        .is_some()
            });
        }
        self.persist_folds();
    }

    fn toggle_blocks(&mut self, kind: ToggleKind) {
        let Some(doc) = &self.document else { return };
        let at = doc.offset_of_line(self.cursor_line);
        self.apply(Cmd::ToggleBlocks {
            range: at..at,
            kind,
        });
    }

    /// Flip the checkbox on the cursor line through its widget, the same
    /// single-character edit a rendered widget click would issue.
    fn flip_checkbox_at_cursor(&mut self) {
        let Some(doc) = &self.document else { return };
        let line = self.cursor_line;
        let widget_at = decorate(doc, line..line + 1, &HashSet::new())
            .into_iter()
            .find_map(|dec| match dec.kind {
                DecorationKind::CheckboxWidget { toggle_at, .. } => Some(toggle_at),
                _ => None,
            });
        match widget_at {
            Some(at) => self.apply(Cmd::ToggleCheckbox { at }),
            None => self.status = String::from("no checkbox on this line"),
        }
    }

    fn move_cursor(&mut self, down: bool) {
        let Some(doc) = &self.document else { return };
        let line_count = doc.line_count();
        let hidden = self.hidden_lines();

        let mut line = self.cursor_line;
        loop {
            let next = if down {
                line + 1
            } else {
                match line.checked_sub(1) {
                    Some(l) => l,
                    None => return,
                }
            };
            if next >= line_count {
                return;
            }
            if !hidden.contains(&next) {
                self.cursor_line = next;
                return;
            }
            line = next;
        }
    }
}

fn scan_pages(root: &Path, dir: &Path, pages: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            if path.file_name().is_some_and(|n| n.to_string_lossy().starts_with('.')) {
                continue;
            }
            scan_pages(root, &path, pages)?;
        } else if path.extension().is_some_and(|ext| ext == "md")
            && let Ok(rel) = path.strip_prefix(root)
        {
            pages.push(rel.to_path_buf());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    if env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let notes_path = match env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => match Config::load()? {
            Some(config) => config.notes_path,
            None => {
                eprintln!("usage: linemark <notes-dir> (or set notes_path in config)");
                process::exit(2);
            }
        },
    };
    if !notes_path.is_dir() {
        eprintln!("not a directory: {}", notes_path.display());
        process::exit(2);
    }

    let config = match Config::load()? {
        Some(mut config) => {
            config.notes_path = notes_path;
            config
        }
        None => Config {
            notes_path,
            fold_scan_limit: 10_000,
            fold_state_dir: None,
        },
    };

    let mut app = App::new(&config)?;

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.focus {
            Focus::Files => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_file(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_file(),
                KeyCode::Enter => {
                    if let Err(e) = app.open_selected() {
                        app.status = format!("open failed: {e}");
                    }
                }
                _ => {}
            },
            Focus::Page => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Esc => app.focus = Focus::Files,
                KeyCode::Down => app.move_cursor(true),
                KeyCode::Up => app.move_cursor(false),
                KeyCode::Tab => app.toggle_fold_at_cursor(),
                KeyCode::Char('b') => app.toggle_blocks(ToggleKind::Bullet),
                KeyCode::Char('o') => app.toggle_blocks(ToggleKind::Ordered),
                KeyCode::Char('t') => app.toggle_blocks(ToggleKind::Checkbox),
                KeyCode::Char('>') => app.toggle_blocks(ToggleKind::Blockquote),
                KeyCode::Char(' ') => app.flip_checkbox_at_cursor(),
                KeyCode::Char('s') => {
                    if let Err(e) = app.save() {
                        app.status = format!("save failed: {e}");
                    }
                }
                _ => {}
            },
        }
    }
}

fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(1)])
        .split(chunks[0]);

    let items: Vec<ListItem> = app
        .pages
        .iter()
        .map(|p| ListItem::new(p.to_string_lossy().to_string()))
        .collect();
    let files = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("pages"))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(files, panes[0], &mut app.file_list_state);

    let title = match (&app.page_id, app.dirty) {
        (Some(id), true) => format!("{id} *"),
        (Some(id), false) => id.clone(),
        (None, _) => String::from("no page"),
    };
    let page_area = panes[1];
    let inner_height = page_area.height.saturating_sub(2) as usize;

    let body = if app.document.is_some() {
        Paragraph::new(visible_lines(app, inner_height))
    } else {
        Paragraph::new("select a page and press enter")
    };
    frame.render_widget(
        body.block(Block::default().borders(Borders::ALL).title(title)),
        page_area,
    );

    frame.render_widget(Paragraph::new(app.status.clone()), chunks[1]);
}

/// Renders the viewport through the decoration engine: one `decorate` call
/// bounded to the rows on screen, markers dropped off the cursor line.
fn visible_lines(app: &mut App, height: usize) -> Vec<Line<'static>> {
    let hidden = app.hidden_lines();
    let Some(doc) = &app.document else {
        return Vec::new();
    };

    // Keep the cursor on screen.
    let height = height.max(1);
    if app.cursor_line < app.scroll {
        app.scroll = app.cursor_line;
    } else if app.cursor_line >= app.scroll + height {
        app.scroll = app.cursor_line + 1 - height;
    }

    let mut rows: Vec<usize> = Vec::with_capacity(height);
    let mut line = app.scroll;
    while rows.len() < height && line < doc.line_count() {
        if !hidden.contains(&line) {
            rows.push(line);
        }
        line += 1;
    }

    let caret_lines: HashSet<usize> = HashSet::from([app.cursor_line]);
    rows.into_iter()
        .map(|line| {
            let decorations = decorate(doc, line..line + 1, &caret_lines);
            render_line(doc, line, decorations, line == app.cursor_line, app.folded.contains(&line))
        })
        .collect()
}

fn render_line(
    doc: &Document,
    line: usize,
    mut decorations: Vec<Decoration>,
    is_cursor: bool,
    is_folded: bool,
) -> Line<'static> {
    let range = doc.line_range(line);
    let text = doc.slice_to_cow(range.clone()).into_owned();
    let base = if is_cursor {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };

    decorations.sort_by_key(|d| d.range.start);

    let mut spans: Vec<Span> = Vec::new();
    let mut pos = range.start;
    for dec in decorations {
        if dec.range.start > pos {
            spans.push(Span::styled(
                text[pos - range.start..dec.range.start - range.start].to_string(),
                base,
            ));
        }
        pos = dec.range.end;

        if dec.hidden {
            continue;
        }
        match dec.kind {
            DecorationKind::CheckboxWidget { checked, .. } => {
                let symbol = if checked { "☑" } else { "☐" };
                spans.push(Span::styled(symbol, base.fg(Color::Green)));
            }
            DecorationKind::RuleMarker => {
                spans.push(Span::styled("────────", base.fg(Color::DarkGray)));
            }
            _ => {
                let style = decoration_style(&dec.kind, base);
                spans.push(Span::styled(
                    text[dec.range.start - range.start..dec.range.end - range.start].to_string(),
                    style,
                ));
            }
        }
    }
    if pos < range.end {
        spans.push(Span::styled(text[pos - range.start..].to_string(), base));
    }

    if is_folded {
        spans.push(Span::styled(" …", base.fg(Color::DarkGray)));
    }
    if spans.is_empty() {
        spans.push(Span::styled(String::new(), base));
    }
    Line::from(spans)
}

fn decoration_style(kind: &DecorationKind, base: Style) -> Style {
    match kind {
        DecorationKind::HeadingMarker | DecorationKind::ListMarker | DecorationKind::QuoteMarker => {
            base.fg(Color::DarkGray)
        }
        DecorationKind::Bold => base.add_modifier(Modifier::BOLD),
        DecorationKind::Underline => base.add_modifier(Modifier::UNDERLINED),
        DecorationKind::InlineCode => base.fg(Color::Yellow),
        DecorationKind::CodeBlock => base.fg(Color::Cyan),
        DecorationKind::RuleMarker
        | DecorationKind::CheckboxWidget { .. } => base,
    }
}
