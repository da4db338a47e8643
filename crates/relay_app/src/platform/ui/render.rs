use relay_core::{AppViewModel, ConnectionStatus, LogEntry, LogKind};

pub const CLEARED_MARKER: &str = "[content cleared]";

/// One piece of terminal output. Content goes to stdout verbatim; notices
/// are line-oriented and go to stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiLine {
    Content(String),
    Notice(String),
}

/// What the terminal has already shown. Only lengths and counters are kept,
/// so rendering cost tracks the new output, not the whole transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rendered {
    pub status: ConnectionStatus,
    pub content_len: usize,
    pub clear_count: u64,
    pub log_total: u64,
}

impl Rendered {
    fn of(view: &AppViewModel<'_>) -> Self {
        Self {
            status: view.status,
            content_len: view.content.len(),
            clear_count: view.clear_count,
            log_total: view.log_total,
        }
    }
}

/// Remembers what was last printed so only changes are printed.
#[derive(Debug, Default)]
pub struct Renderer {
    last: Option<Rendered>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, view: AppViewModel<'_>) -> Vec<UiLine> {
        let lines = render(self.last, &view);
        self.last = Some(Rendered::of(&view));
        lines
    }
}

pub fn render(previous: Option<Rendered>, view: &AppViewModel<'_>) -> Vec<UiLine> {
    let mut lines = Vec::new();

    if previous.map(|prev| prev.status) != Some(view.status) {
        lines.push(UiLine::Notice(format!("status: {}", view.status_label)));
    }

    let seen = previous.map_or(0, |prev| prev.log_total);
    let fresh = view.log_total.saturating_sub(seen);
    let fresh = usize::try_from(fresh).unwrap_or(usize::MAX).min(view.recent_log.len());
    let skip = view.recent_log.len() - fresh;
    lines.extend(
        view.recent_log
            .iter()
            .skip(skip)
            .map(|entry| UiLine::Notice(format_entry(entry))),
    );

    let (shown, prev_clears) = previous.map_or((0, 0), |prev| (prev.content_len, prev.clear_count));
    if view.clear_count != prev_clears {
        lines.push(UiLine::Notice(CLEARED_MARKER.to_string()));
        if !view.content.is_empty() {
            lines.push(UiLine::Content(view.content.to_string()));
        }
    } else {
        // The transcript only grows between clears, so the shown text is a prefix.
        match view.content.get(shown..) {
            Some("") => {}
            Some(appended) => lines.push(UiLine::Content(appended.to_string())),
            None => lines.push(UiLine::Content(view.content.to_string())),
        }
    }

    lines
}

/// Multi-line summary printed for the `status` command.
pub fn status_report(view: &AppViewModel<'_>, channel: &str) -> Vec<String> {
    vec![
        format!("status: {} (channel {})", view.status_label, channel),
        format!(
            "content: {} bytes from {} fragment(s), cleared {} time(s)",
            view.content.len(),
            view.fragment_count,
            view.clear_count
        ),
        format!(
            "log: {} entries ({} retained)",
            view.log_total,
            view.recent_log.len()
        ),
    ]
}

fn format_entry(entry: &LogEntry) -> String {
    let tag = match entry.kind {
        LogKind::Connection => "conn",
        LogKind::Subscription => "sub",
        LogKind::Event => "event",
        LogKind::Error => "error",
    };
    format!("[{tag}] {}", entry.message)
}
