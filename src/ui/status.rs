use crate::app::{App, View};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let (text, style): (Cow<'_, str>, _) = if let Some(status) = &app.status_message {
        let style = if status.is_error {
            app.palette.notice
        } else {
            app.palette.status_bar
        };
        (Cow::Borrowed(status.text.as_ref()), style)
    } else {
        let hints = match app.view {
            View::Browse if app.search_mode => "Type to search | ESC clear | ENTER done",
            View::Browse if app.listing.state().showing_bookmarks => {
                "[j/k]move [Enter]read [b]remove [o]pen [B/Esc]back [t]heme [?]help [q]uit"
            }
            View::Browse => {
                "[Tab]category [n/p]page [/]search [Enter]read [b]ookmark [B]ookmarks [t]heme [?]help [q]uit"
            }
            View::Reader => "[Esc]back [j/k]scroll [Ctrl+d/u]page [b]ookmark [o]pen [t]heme [q]uit",
        };
        (Cow::Borrowed(hints), app.palette.status_bar)
    };

    let paragraph = Paragraph::new(format!(" {}", text)).style(style);
    f.render_widget(paragraph, area);
}
