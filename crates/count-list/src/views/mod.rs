use crate::app::App;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Paragraph},
    Frame,
};

pub mod count_detail;
pub mod count_list;

const HELP: &str = "k up  j down  r color  n next name  a alter low  . noop  q quit";

/// Render the entire application UI
pub fn render(app: &App, f: &mut Frame) {
    let [list_area, detail_area, help_area, status_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(f.area());

    f.render_widget(
        Paragraph::new(app.count_list_text()).block(Block::bordered().title(" Count list ")),
        list_area,
    );
    f.render_widget(
        Paragraph::new(app.count_detail_text()).block(Block::bordered().title(" Count detail ")),
        detail_area,
    );
    f.render_widget(
        Paragraph::new(Line::from(HELP)).style(Style::default().fg(Color::DarkGray)),
        help_area,
    );

    let status_style = if app.has_error() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    f.render_widget(
        Paragraph::new(app.status_line()).style(status_style),
        status_area,
    );
}
