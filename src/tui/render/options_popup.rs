use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::config::Toggle;
use crate::tui::app::App;
use crate::util::unicode::pad_to_width;

/// Render the options popup listing every on/off preference
pub fn render_options_popup(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.column_background;
    let header_style = Style::default()
        .fg(app.theme.important)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let cursor_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(app.theme.selection_bg)
        .add_modifier(Modifier::BOLD);

    let popup_w: u16 = 44.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let mut lines = vec![
        Line::from(Span::styled(" Options", header_style)),
        Line::from(Span::styled("", text_style)),
    ];
    for (i, toggle) in Toggle::ALL.iter().enumerate() {
        let mark = if toggle.get(app.preferences()) { "x" } else { " " };
        let text = pad_to_width(&format!(" [{}] {}", mark, toggle.label()), inner_w);
        let style = if i == app.options_cursor {
            cursor_style
        } else {
            text_style
        };
        lines.push(Line::from(Span::styled(text, style)));
    }
    lines.push(Line::from(Span::styled("", text_style)));
    lines.push(Line::from(Span::styled(
        " Space toggle  Esc close",
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    // Dynamic height from content + 2 for borders
    let popup_h = ((lines.len() as u16) + 2).min(area.height);
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.important).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
