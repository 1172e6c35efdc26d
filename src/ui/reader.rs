use crate::app::App;
use crate::news::Article;
use crate::theme::ColorPalette;
use crate::util::{display_width, strip_control_chars, strip_truncation_marker};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::helpers::format_relative_time;

/// Render the article reader view
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let Some(article) = app.reader_article.as_ref() else {
        let paragraph = Paragraph::new("No article selected")
            .block(Block::default().borders(Borders::ALL).title("Reader"));
        f.render_widget(paragraph, area);
        return;
    };

    let bookmarked = app.bookmarks.contains(&article.id);
    let lines = article_lines(article, &app.palette, bookmarked);

    // Clamp before drawing so a resize never shows a past-the-end frame
    let inner_width = area.width.saturating_sub(2) as usize;
    let visible = area.height.saturating_sub(2) as usize;
    let total = wrapped_line_count(&lines, inner_width);
    app.reader_visible_lines = visible;
    app.clamp_scroll(total, visible);

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.palette.panel_border_focused)
                .title(" Article "),
        )
        .style(app.palette.reader_body)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset as u16, 0));

    f.render_widget(paragraph, area);
}

/// Title, byline, description, body and link as styled lines.
fn article_lines(article: &Article, palette: &ColorPalette, bookmarked: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let mut title = vec![Span::styled(
        strip_control_chars(&article.title).into_owned(),
        palette.reader_heading,
    )];
    if bookmarked {
        title.insert(0, Span::styled("★ ", palette.bookmark_marker));
    }
    lines.push(Line::from(title));

    let mut byline: Vec<String> = Vec::new();
    if !article.source_name.is_empty() {
        byline.push(article.source_name.clone());
    }
    if let Some(author) = article.author.as_deref().filter(|a| !a.is_empty()) {
        byline.push(format!("by {}", author));
    }
    let time = format_relative_time(article.published_timestamp());
    if !time.is_empty() {
        byline.push(time);
    }
    lines.push(Line::from(Span::styled(byline.join(" • "), palette.reader_metadata)));
    lines.push(Line::from(""));

    if !article.description.is_empty() {
        for text in strip_control_chars(&article.description).lines() {
            lines.push(Line::from(Span::styled(text.to_string(), palette.article_description)));
        }
        lines.push(Line::from(""));
    }

    let body = strip_truncation_marker(&article.content);
    if !body.is_empty() {
        for text in strip_control_chars(body).lines() {
            lines.push(Line::from(text.to_string()));
        }
        lines.push(Line::from(""));
    }

    if !article.url.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Read full article: ", palette.reader_metadata),
            Span::styled(article.url.clone(), palette.reader_link),
        ]));
    }
    lines
}

/// Display rows after wrapping at `width` columns.
fn wrapped_line_count(lines: &[Line<'_>], width: usize) -> usize {
    if width == 0 {
        return lines.len();
    }
    lines
        .iter()
        .map(|line| {
            let w: usize = line.spans.iter().map(|s| display_width(&s.content)).sum();
            w.div_ceil(width).max(1)
        })
        .sum()
}
