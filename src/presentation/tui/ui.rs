use super::app::{App, Focus};
use crate::domain::entities::{ResponseDescription, StatusClass};
use crate::domain::errors::ErrorDescription;
use crate::infrastructure::output::{ERROR_BADGE, format_body, format_elapsed, status_label};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

const HELP: &str = "Tab focus | ←/→ method | ↑/↓ header | Ctrl-N add | Ctrl-D remove | Ctrl-T toggle | Ctrl-S send | Esc cancel | Ctrl-C quit";

pub fn draw(frame: &mut Frame, app: &App) {
    let rows = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(6),
        Constraint::Length(1),
    ])
    .split(frame.area());
    let columns = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    let editors = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[0]);

    draw_request_line(frame, app, rows[0]);
    draw_headers(frame, app, editors[0]);
    draw_body(frame, app, editors[1]);
    draw_response(frame, app, columns[1]);
    frame.render_widget(
        Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        rows[2],
    );
}

fn panel(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::bordered().title(title).border_style(border)
}

fn draw_request_line(frame: &mut Frame, app: &App, area: Rect) {
    let method_style = if app.focus == Focus::Method {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let send = if app.loading { "[sending]" } else { "[send]" };
    let line = Line::from(vec![
        Span::styled(format!(" {} ", app.method()), method_style.add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::raw(app.draft.url.as_str()),
        Span::raw("  "),
        Span::styled(send, Style::default().fg(Color::DarkGray)),
    ]);
    let focused = matches!(app.focus, Focus::Method | Focus::Url);
    frame.render_widget(Paragraph::new(line).block(panel("Request", focused)), area);
}

fn draw_headers(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::HeaderKey | Focus::HeaderValue);
    let lines: Vec<Line> = app
        .draft
        .headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let selected = focused && idx == app.selected_header;
            let checkbox = if header.enabled { "[x] " } else { "[ ] " };
            let highlight = |column: Focus| {
                if selected && app.focus == column {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else if header.enabled {
                    Style::default()
                } else {
                    Style::default().fg(Color::DarkGray)
                }
            };
            Line::from(vec![
                Span::raw(checkbox),
                Span::styled(header.key.as_str(), highlight(Focus::HeaderKey)),
                Span::raw(": "),
                Span::styled(header.value.as_str(), highlight(Focus::HeaderValue)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(panel("Headers", focused)), area);
}

fn draw_body(frame: &mut Frame, app: &App, area: Rect) {
    frame.render_widget(
        Paragraph::new(app.draft.body.as_str())
            .wrap(Wrap { trim: false })
            .block(panel("Body", app.focus == Focus::Body)),
        area,
    );
}

fn draw_response(frame: &mut Frame, app: &App, area: Rect) {
    let lines = if app.loading {
        vec![Line::from("Loading...")]
    } else {
        match &app.last_result {
            Some(Ok(response)) => response_lines(response),
            Some(Err(error)) => error_lines(error),
            None => vec![Line::styled(
                "Press Ctrl-S to send",
                Style::default().fg(Color::DarkGray),
            )],
        }
    };
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(panel("Response", false)),
        area,
    );
}

fn status_color(class: StatusClass) -> Color {
    match class {
        StatusClass::Success => Color::Green,
        StatusClass::Redirection => Color::Yellow,
        StatusClass::ClientError | StatusClass::ServerError => Color::Red,
        StatusClass::Informational => Color::Cyan,
    }
}

fn response_lines(response: &ResponseDescription) -> Vec<Line<'static>> {
    let badge = Style::default()
        .fg(status_color(response.status_class()))
        .add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(vec![
        Span::styled(status_label(response), badge),
        Span::raw("  "),
        Span::styled(
            format_elapsed(response.elapsed_ms),
            Style::default().fg(Color::DarkGray),
        ),
    ])];
    lines.extend(response.headers.iter().map(|(key, value)| {
        Line::from(vec![
            Span::styled(format!("{}: ", key), Style::default().fg(Color::Cyan)),
            Span::raw(value.clone()),
        ])
    }));
    lines.push(Line::from(""));
    lines.extend(
        format_body(&response.body)
            .lines()
            .map(|line| Line::from(line.to_string())),
    );
    lines
}

fn error_lines(error: &ErrorDescription) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(
                ERROR_BADGE,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(error.kind.as_str(), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(error.message.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn renders_the_draft() {
        let screen = render(&App::default());
        assert!(screen.contains(" GET "));
        assert!(screen.contains("jsonplaceholder.typicode.com"));
        assert!(screen.contains("[x] Content-Type: application/json"));
        assert!(screen.contains("Press Ctrl-S to send"));
    }

    #[test]
    fn renders_loading_state() {
        let mut app = App::default();
        app.loading = true;
        let screen = render(&app);
        assert!(screen.contains("Loading..."));
        assert!(screen.contains("[sending]"));
    }

    #[test]
    fn renders_response_with_pretty_body() {
        let mut app = App::default();
        app.finish(Ok(ResponseDescription {
            status: 201,
            status_text: "Created".to_string(),
            headers: vec![("x-id".to_string(), "7".to_string())],
            body: "{\"id\":7}".to_string(),
            elapsed_ms: 3.5,
        }));

        let screen = render(&app);
        assert!(screen.contains("201 Created"));
        assert!(screen.contains("3.50ms"));
        assert!(screen.contains("x-id: 7"));
        assert!(screen.contains("\"id\": 7"));
    }

    #[test]
    fn renders_errors_as_placeholder_status() {
        let mut app = App::default();
        app.finish(Err(ErrorDescription::network_failure("connection refused")));

        let screen = render(&app);
        assert!(screen.contains("0 Error"));
        assert!(screen.contains("NetworkFailure"));
        assert!(screen.contains("connection refused"));
    }
}
