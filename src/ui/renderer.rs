use crate::state::ComboboxView;
use crate::terminal::{CursorPos, TerminalSize};
use crate::ui::layout::WidgetLayout;
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use unicode_width::UnicodeWidthChar;

const MARKER: &str = "> ";
const BLANK_MARKER: &str = "  ";
const CLEAR_BUTTON: &str = "[X]";
const ELLIPSIS: char = '…';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    pub width: u16,
    pub placeholder: String,
    pub hotkey_hint: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 48,
            placeholder: "Search...".to_string(),
            hotkey_hint: "ctrl+k".to_string(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct RenderFrame {
    pub lines: Vec<SpanLine>,
    pub cursor: Option<CursorPos>,
    pub layout: WidgetLayout,
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, view: &ComboboxView, terminal_size: TerminalSize) -> RenderFrame {
        let width = self.config.width.min(terminal_size.width);
        let mut frame = RenderFrame {
            layout: WidgetLayout::new(width),
            ..RenderFrame::default()
        };

        self.render_input(view, width, &mut frame);

        if view.open {
            for (position, item) in view.results.iter().enumerate() {
                let slot = position + 1;
                let focused = view.focus == Some(slot);
                let base = row_style(focused);
                let mut line = vec![marker(focused, base)];
                line.extend(highlighted(&item.text, item.highlight, base));
                frame.lines.push(clip_line(line, width as usize));
                frame.layout.push_slot_row(slot);
            }

            if view.has_search_footer {
                let slot = view.results.len() + 1;
                let focused = view.focus == Some(slot);
                let base = row_style(focused).color(if focused { Color::Cyan } else { Color::Blue });
                let label_budget = (width as usize).saturating_sub(MARKER.len() + "Search: \"\"".len());
                let line = vec![
                    marker(focused, base),
                    Span::styled(
                        format!("Search: \"{}\"", truncate(&view.query, label_budget)),
                        base,
                    ),
                ];
                frame.lines.push(clip_line(line, width as usize));
                frame.layout.push_slot_row(slot);
            }
        }

        frame.lines.push(Vec::new());
        frame.lines.push(vec![Span::styled(
            self.hint(view.open),
            Style::new().color(Color::DarkGrey),
        )]);
        frame
    }

    fn render_input(&self, view: &ComboboxView, width: u16, frame: &mut RenderFrame) {
        let width = width as usize;
        let button_cols = CLEAR_BUTTON.len() + 1;
        let text_area = width.saturating_sub(MARKER.len() + button_cols);
        let input_focused = view.focus == Some(0);

        let prompt_style = if input_focused {
            Style::new().color(Color::Cyan).bold()
        } else {
            Style::new().color(Color::DarkGrey)
        };
        let mut line = vec![Span::styled(MARKER, prompt_style)];

        let skip = view.cursor.saturating_sub(text_area.saturating_sub(1));
        let (text, used) = if view.query.is_empty() {
            let placeholder = slice_columns(&self.config.placeholder, 0, text_area);
            let used = display_width(&placeholder);
            (Span::styled(placeholder, Style::new().color(Color::DarkGrey)), used)
        } else {
            let visible = slice_columns(&view.query, skip, text_area);
            let used = display_width(&visible);
            (Span::new(visible), used)
        };
        line.push(text);
        line.push(Span::new(" ".repeat(text_area.saturating_sub(used) + 1)));
        line.push(Span::styled(CLEAR_BUTTON, Style::new().color(Color::Red)));

        if width >= MARKER.len() + button_cols {
            let end = width as u16;
            frame
                .layout
                .set_clear_button(end - CLEAR_BUTTON.len() as u16, end);
        }
        frame.layout.push_slot_row(0);
        frame.lines.push(clip_line(line, width));

        if input_focused {
            let col = MARKER.len() + view.cursor.saturating_sub(skip).min(text_area);
            frame.cursor = Some(CursorPos {
                col: col.min(u16::MAX as usize) as u16,
                row: 0,
            });
        }
    }

    fn hint(&self, open: bool) -> String {
        if open {
            "up/down move  enter select  esc close  ctrl+u clear  ctrl+c quit".to_string()
        } else {
            format!("{} search  ctrl+c quit", self.config.hotkey_hint)
        }
    }
}

fn row_style(focused: bool) -> Style {
    if focused {
        Style::new().color(Color::Cyan).bold()
    } else {
        Style::new()
    }
}

fn marker(focused: bool, style: Style) -> Span {
    Span::styled(if focused { MARKER } else { BLANK_MARKER }, style)
}

fn highlighted(text: &str, range: Option<(usize, usize)>, base: Style) -> Vec<Span> {
    let Some((start, end)) = range else {
        return vec![Span::styled(text, base)];
    };
    let chars: Vec<char> = text.chars().collect();
    let end = end.min(chars.len());
    let start = start.min(end);
    let before: String = chars[..start].iter().collect();
    let matched: String = chars[start..end].iter().collect();
    let after: String = chars[end..].iter().collect();

    let mut spans = Vec::with_capacity(3);
    if !before.is_empty() {
        spans.push(Span::styled(before, base));
    }
    spans.push(Span::styled(matched, base.color(Color::Yellow).underline()));
    if !after.is_empty() {
        spans.push(Span::styled(after, base));
    }
    spans
}

fn display_width(text: &str) -> usize {
    text.chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

/// Text from display column `skip` onward, at most `max_width` columns.
fn slice_columns(text: &str, skip: usize, max_width: usize) -> String {
    let mut col = 0usize;
    let mut used = 0usize;
    let mut out = String::new();
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if col < skip {
            col += ch_width;
            continue;
        }
        if used + ch_width > max_width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out
}

fn truncate(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = slice_columns(text, 0, max_width - 1);
    out.push(ELLIPSIS);
    out
}

fn clip_line(line: SpanLine, max_width: usize) -> SpanLine {
    let mut used = 0usize;
    let mut out = Vec::with_capacity(line.len());
    for span in line {
        if used >= max_width {
            break;
        }
        let width = span.width();
        if used + width <= max_width {
            used += width;
            out.push(span);
            continue;
        }
        let text = slice_columns(&span.text, 0, max_width - used);
        used = max_width;
        out.push(Span::styled(text, span.style));
    }
    out
}
