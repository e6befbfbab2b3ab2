use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::configuration::Resolution;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::NoticePanel;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::PAGE_SIZE;

const PROMPT_HEIGHT: u16 = 4;

fn paste(textarea: &mut tui_textarea::TextArea, text: &str) {
    for char in text.chars() {
        if char == '\n' {
            textarea.insert_newline();
        } else if char != '\r' {
            textarea.insert_char(char);
        }
    }
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState<'_>,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);
    let mut textarea = TextArea::default();
    let mut loading = Loading::default();

    loop {
        terminal.draw(|frame| {
            let notice_lines = NoticePanel::lines(
                &app_state.session.settings,
                app_state.waiting_for_agent,
                app_state.session.pending_attachments(),
                app_state.notice.as_ref(),
            );
            let notice_rows = NoticePanel::rows(&notice_lines, frame.size().width);
            let notice_height = NoticePanel::height(
                notice_rows,
                frame.size().height.saturating_sub(PROMPT_HEIGHT + 1),
            );
            app_state.set_notice_max_scroll(NoticePanel::max_scroll(notice_rows, notice_height));

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Min(1),
                    Constraint::Length(notice_height),
                    Constraint::Max(PROMPT_HEIGHT),
                ])
                .split(frame.size());

            if layout[0].width != app_state.last_known_width
                || layout[0].height != app_state.last_known_height
            {
                app_state.set_rect(layout[0]);
            }

            app_state
                .bubble_list
                .render(frame, layout[0], app_state.scroll.position);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                layout[0].inner(&Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut app_state.scroll.scrollbar_state,
            );

            NoticePanel::render(
                frame,
                layout[1],
                notice_lines,
                app_state.notice_scroll,
                app_state.notice_overflows(),
            );

            if app_state.waiting_for_agent {
                loading.render(frame, layout[2]);
            } else {
                frame.render_widget(textarea.widget(), layout[2]);
            }
        })?;

        match events.next().await? {
            Event::AgentReply(message) => {
                app_state.handle_agent_reply(message)?;
            }
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardEnter() => {
                // One turn at a time.
                if app_state.waiting_for_agent {
                    continue;
                }

                let input_str = textarea.lines().join("\n");
                let (should_break, should_continue) =
                    app_state.handle_slash_commands(&input_str).await?;
                if should_break {
                    break;
                }
                if should_continue {
                    textarea = TextArea::default();
                } else if app_state.submit_prompt(&input_str, &tx)? {
                    textarea = TextArea::default();
                }
            }
            Event::KeyboardCharInput(input) => {
                if !app_state.waiting_for_agent {
                    textarea.input(input);
                }
            }
            Event::KeyboardPaste(text) => {
                if !app_state.waiting_for_agent {
                    paste(&mut textarea, &text);
                }
            }
            Event::KeyboardEsc() => {
                app_state.dismiss_notice();
            }
            Event::UIScrollDown() => {
                if app_state.notice_overflows() {
                    app_state.scroll_notice_down(1);
                } else {
                    app_state.scroll.down();
                }
            }
            Event::UIScrollUp() => {
                if app_state.notice_overflows() {
                    app_state.scroll_notice_up(1);
                } else {
                    app_state.scroll.up();
                }
            }
            Event::UIScrollPageDown() => {
                if app_state.notice_overflows() {
                    app_state.scroll_notice_down(PAGE_SIZE);
                } else {
                    app_state.scroll.down_page();
                }
            }
            Event::UIScrollPageUp() => {
                if app_state.notice_overflows() {
                    app_state.scroll_notice_up(PAGE_SIZE);
                } else {
                    app_state.scroll.up_page();
                }
            }
            Event::UITick() => {
                loading.tick();
            }
        }

        TextArea::set_pending_attachments(
            &mut textarea,
            app_state.session.pending_attachments().len(),
        );
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    if disable_raw_mode().is_err() {
        return;
    }
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste,
        cursor::Show
    );
}

pub async fn start(
    resolution: Resolution,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut app_state = AppState::new(resolution);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let res = start_loop(&mut terminal, &mut app_state, tx, rx).await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return res;
}
