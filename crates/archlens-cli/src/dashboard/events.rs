use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::dashboard::state::{App, Page};

const PAGE_SCROLL: u16 = 10;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
        }
        KeyCode::Tab | KeyCode::Right => app.select_page(app.page.next()),
        KeyCode::BackTab | KeyCode::Left => app.select_page(app.page.prev()),
        KeyCode::Char(ch @ '1'..='6') => {
            let idx = ch as usize - '1' as usize;
            app.select_page(Page::ALL[idx]);
        }
        KeyCode::Char('v') if app.page == Page::Visualization => {
            app.visualization = app.visualization.next();
        }
        KeyCode::Char('s') => {
            app.status = Some(match app.save_report() {
                Ok(path) => format!("report saved to {}", path.display()),
                Err(err) => {
                    tracing::warn!(event = "report_write_failed", error = %err);
                    format!("error: {err}")
                }
            });
        }
        KeyCode::Down => app.scroll_offset = app.scroll_offset.saturating_add(1),
        KeyCode::Up => app.scroll_offset = app.scroll_offset.saturating_sub(1),
        KeyCode::PageDown => app.scroll_offset = app.scroll_offset.saturating_add(PAGE_SCROLL),
        KeyCode::PageUp => app.scroll_offset = app.scroll_offset.saturating_sub(PAGE_SCROLL),
        KeyCode::Home => app.scroll_offset = 0,
        _ => {}
    }
}
