use crate::app::App;
use crate::listing::ListingView;
use crate::news::Article;
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::helpers::format_relative_time;

const SPINNER: [&str; super::loop_runner::SPINNER_FRAMES] =
    ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the article list panel, or the placeholder for the current state.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let palette = &app.palette;
    let state = app.listing.state();

    let title = if state.showing_bookmarks {
        " Bookmarks ".to_string()
    } else if state.page > 1 {
        format!(" Articles - page {} ", state.page)
    } else {
        " Articles ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.panel_border_focused)
        .title(title);

    if state.showing_bookmarks {
        if app.bookmarks.is_empty() {
            render_placeholder(
                f,
                block,
                area,
                "No bookmarks yet. Press b on an article to save it.",
                palette.empty,
            );
        } else {
            render_list(f, app, block, area, app.bookmarks.list());
        }
        return;
    }

    match app.listing.view() {
        ListingView::Loading => {
            let text = format!("{} Loading articles...", SPINNER[app.spinner_frame % SPINNER.len()]);
            render_placeholder(f, block, area, &text, palette.loading);
        }
        ListingView::Failed(error) => {
            let text = format!("{}\n\nPress r to retry.", error.message());
            render_placeholder(f, block, area, &text, palette.error);
        }
        ListingView::Empty => render_placeholder(
            f,
            block,
            area,
            "No articles found. Try a different search or category.",
            palette.empty,
        ),
        ListingView::Articles(articles) => render_list(f, app, block, area, articles),
    }
}

fn render_placeholder(f: &mut Frame, block: Block<'_>, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(text.to_string())
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(paragraph, area);
}

fn render_list(f: &mut Frame, app: &App, block: Block<'_>, area: Rect, articles: &[Article]) {
    let palette = &app.palette;
    // Room inside the borders, minus the bookmark marker column
    let width = (area.width as usize).saturating_sub(4);

    let items: Vec<ListItem> = articles
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let selected = i == app.selected_article;
            let marker = if app.is_bookmarked(article) {
                Span::styled("★ ", palette.bookmark_marker)
            } else {
                Span::raw("  ")
            };

            let meta = article_meta(article);
            let title_width = width.saturating_sub(meta.chars().count() + 2);
            let title = strip_control_chars(&article.title);
            let title_style = if selected {
                palette.article_selected
            } else {
                palette.article_title
            };

            let headline = Line::from(vec![
                marker,
                Span::styled(truncate_to_width(&title, title_width).into_owned(), title_style),
                Span::styled(format!("  {}", meta), palette.article_meta),
            ]);

            let description = strip_control_chars(&article.description);
            let summary = Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    truncate_to_width(&description, width).into_owned(),
                    palette.article_description,
                ),
            ]);

            ListItem::new(vec![headline, summary])
        })
        .collect();

    let mut list_state = ListState::default().with_selected(Some(app.selected_article));
    let list = List::new(items).block(block);
    f.render_stateful_widget(list, area, &mut list_state);
}

/// "Source · 3h" line for the list.
fn article_meta(article: &Article) -> String {
    let time = format_relative_time(article.published_timestamp());
    match (article.source_name.is_empty(), time.is_empty()) {
        (false, false) => format!("{} · {}", article.source_name, time),
        (false, true) => article.source_name.clone(),
        (true, false) => time,
        (true, true) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::sample_article;

    #[test]
    fn test_meta_without_time() {
        let mut article = sample_article("x", "X");
        article.published_at = "not a date".to_string();
        assert_eq!(article_meta(&article), "Wire");

        article.source_name.clear();
        assert_eq!(article_meta(&article), "");
    }

    #[test]
    fn test_meta_with_time() {
        let article = sample_article("x", "X");
        assert!(article_meta(&article).starts_with("Wire · "));
    }
}
