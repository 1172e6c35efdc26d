use crate::app::{App, View};
use crate::listing::PageItem;
use crate::theme::ColorPalette;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the pagination bar: `‹ Prev  1 2 3 4 5 … 7  Next ›`.
///
/// Hidden unless a multi-page listing is on screen.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let state = app.listing.state();
    if app.view != View::Browse || state.showing_bookmarks || !app.listing.shows_pagination() {
        return;
    }

    let line = pagination_line(
        &app.palette,
        state.page,
        app.listing.total_pages(),
        &app.listing.page_numbers(),
    );
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn pagination_line(
    palette: &ColorPalette,
    current: u32,
    total: u32,
    items: &[PageItem],
) -> Line<'static> {
    let prev_style = if current > 1 {
        palette.page_normal
    } else {
        palette.page_disabled
    };
    let next_style = if current < total {
        palette.page_normal
    } else {
        palette.page_disabled
    };

    let mut spans = vec![Span::styled("‹ Prev", prev_style), Span::raw("  ")];
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(match item {
            PageItem::Page(n) if *n == current => {
                Span::styled(n.to_string(), palette.page_current)
            }
            PageItem::Page(n) => Span::styled(n.to_string(), palette.page_normal),
            PageItem::Ellipsis => Span::styled("…", palette.page_disabled),
        });
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled("Next ›", next_style));
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::page_numbers;
    use crate::theme::Theme;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_line_for_middle_page() {
        let palette = Theme::Dark.palette();
        let line = pagination_line(&palette, 5, 10, &page_numbers(5, 10));
        assert_eq!(text(&line), "‹ Prev  1 … 4 5 6 … 10  Next ›");
    }

    #[test]
    fn test_edges_are_disabled() {
        let palette = Theme::Light.palette();
        let line = pagination_line(&palette, 1, 3, &page_numbers(1, 3));
        assert_eq!(line.spans[0].style, palette.page_disabled);
        assert_eq!(line.spans.last().unwrap().style, palette.page_normal);
        // Current page is highlighted
        assert_eq!(line.spans[2].style, palette.page_current);
    }
}
