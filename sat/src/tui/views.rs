//! TUI views and rendering
//!
//! All rendering logic is contained here. The views module draws the
//! UI from the session and presentation state, but never modifies
//! either.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use tracing::trace;

use planstore::PhaseKey;

use super::state::AppState;
use crate::session::{Screen, Session};

/// Terminal phosphor palette (spy-console inspired)
mod colors {
    use ratatui::style::Color;

    pub const PRIMARY: Color = Color::Rgb(0, 255, 127); // Terminal green
    pub const ACCENT: Color = Color::Rgb(220, 20, 60); // Crimson (S.A.T. prompt)
    pub const HINT: Color = Color::Rgb(255, 215, 0); // Gold (rejection feedback)
    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const DIM: Color = Color::DarkGray;
}

/// Color of a phase's protocol header
fn phase_color(phase: PhaseKey) -> Color {
    trace!(?phase, "phase_color: called");
    match phase {
        PhaseKey::S => Color::Rgb(0, 255, 127),
        PhaseKey::M => Color::Rgb(220, 20, 60),
        PhaseKey::A => Color::Rgb(255, 215, 0),
        PhaseKey::R => Color::Rgb(0, 255, 255),
        PhaseKey::T => Color::Rgb(186, 85, 211),
    }
}

/// Main render function
pub fn render(session: &Session, state: &AppState, frame: &mut Frame) {
    trace!(screen = ?session.screen(), "render: called");
    match session.screen() {
        Screen::Start => render_start(state, frame),
        Screen::IntroCinematic | Screen::RoundCinematic(_) | Screen::FinalCinematic => render_cinematic(state, frame),
        Screen::Ready => render_ready(session, frame),
        Screen::GoalCapture => render_goal_capture(session, state, frame),
        Screen::Decrypting => render_decrypting(state, frame),
        Screen::Answering(_) => render_answering(session, state, frame),
        Screen::Complete => render_debrief(state, frame),
    }
}

/// Center a fixed-size box inside an area
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    let h = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(width), Constraint::Min(0)])
        .split(v[1]);
    h[1]
}

fn input_line<'a>(prompt: &'a str, input: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(prompt, Style::default().fg(colors::PRIMARY)),
        Span::styled(input, Style::default().fg(colors::PRIMARY)),
        Span::styled("█", Style::default().fg(colors::PRIMARY).add_modifier(Modifier::SLOW_BLINK)),
    ])
}

fn render_start(state: &AppState, frame: &mut Frame) {
    let area = centered(frame.area(), 60, 10);
    let lines = vec![
        Line::from(Span::styled(
            "S . A . T .",
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "SISTEMA DE ASISTENCIA TÁCTICA",
            Style::default().fg(colors::DIM),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Identifícate para iniciar la misión.",
            Style::default().fg(colors::PRIMARY),
        )),
        Line::from(""),
        input_line("NOMBRE EN CLAVE >> ", &state.input),
        Line::from(""),
        Line::from(Span::styled("[Enter] confirmar", Style::default().fg(colors::DIM))),
    ];
    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(colors::PRIMARY));
    frame.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Center),
        area,
    );
}

fn render_cinematic(state: &AppState, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let (frame_text, progress) = state
        .cinematic
        .as_ref()
        .map(|c| (c.frame(), c.progress()))
        .unwrap_or(("", 1.0));

    let area = centered(chunks[0], 64, 12);
    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(colors::DIM));
    frame.render_widget(
        Paragraph::new(frame_text)
            .style(Style::default().fg(colors::PRIMARY))
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false }),
        area,
    );

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(colors::DIM))
        .ratio(progress.clamp(0.0, 1.0))
        .label(Span::styled("[Enter] omitir", Style::default().fg(colors::DIM)));
    frame.render_widget(gauge, chunks[1]);
}

fn render_ready(session: &Session, frame: &mut Frame) {
    let area = centered(frame.area(), 60, 8);
    let lines = vec![
        Line::from(Span::styled(
            format!("Agente {}.", session.codename().to_uppercase()),
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "El protocolo S.M.A.R.T. está listo.",
            Style::default().fg(colors::PRIMARY),
        )),
        Line::from(Span::styled("¿Preparado para la misión?", Style::default().fg(colors::PRIMARY))),
        Line::from(""),
        Line::from(Span::styled("[Enter] aceptar la misión", Style::default().fg(colors::DIM))),
    ];
    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(colors::PRIMARY));
    frame.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Center),
        area,
    );
}

fn render_goal_capture(session: &Session, state: &AppState, frame: &mut Frame) {
    let area = centered(frame.area(), 70, 10);
    let lines = vec![
        Line::from(Span::styled(
            "TRANSMISIÓN ENTRANTE",
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Agente {}: declara tu objetivo.", session.codename().to_uppercase()),
            Style::default().fg(colors::PRIMARY),
        )),
        Line::from(Span::styled(
            "Una frase. Sin rodeos.",
            Style::default().fg(colors::DIM),
        )),
        Line::from(""),
        input_line("OBJETIVO >> ", &state.input),
        Line::from(""),
        Line::from(Span::styled("[Enter] transmitir", Style::default().fg(colors::DIM))),
    ];
    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(colors::PRIMARY));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_decrypting(state: &AppState, frame: &mut Frame) {
    let area = centered(frame.area(), 50, 5);
    let lines = vec![
        Line::from(Span::styled(
            format!("{} DESCIFRANDO CONTRASEÑA...", state.spinner()),
            Style::default().fg(colors::HINT),
        )),
        Line::from(""),
        Line::from(Span::styled("acceso a protocolo en curso", Style::default().fg(colors::DIM))),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_answering(session: &Session, state: &AppState, frame: &mut Frame) {
    let Some(phase) = session.active_phase() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(0),    // Transcript
            Constraint::Length(4), // Input
        ])
        .split(frame.area());

    // Header: protocol title and the overall goal
    let header_lines = vec![
        Line::from(Span::styled(
            phase.title(),
            Style::default().fg(phase_color(phase)).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("OBJETIVO PRINCIPAL: \"{}\"", session.goal()),
            Style::default().fg(colors::DIM),
        )),
    ];
    frame.render_widget(
        Paragraph::new(header_lines).block(Block::default().borders(Borders::BOTTOM)),
        chunks[0],
    );

    // Transcript: question, then analysis indicator or feedback
    let mut transcript: Vec<Line> = Vec::new();
    if session.awaiting_question() {
        transcript.push(Line::from(Span::styled(
            format!("{} ACCEDIENDO A PROTOCOLO {}...", state.spinner(), phase),
            Style::default().fg(colors::HINT),
        )));
    } else if let Some(question) = session.question() {
        transcript.push(Line::from(vec![
            Span::styled("S.A.T.> ", Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD)),
            Span::styled(state.reveal(question), Style::default().fg(colors::PRIMARY)),
        ]));
    }
    if session.evaluating() {
        transcript.push(Line::from(""));
        transcript.push(Line::from(Span::styled(
            format!("{} {}...", state.spinner(), state.analyzing_word),
            Style::default().fg(colors::HINT),
        )));
    } else if let Some(feedback) = session.feedback() {
        transcript.push(Line::from(""));
        transcript.push(Line::from(vec![
            Span::styled("S.A.T.> ", Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD)),
            Span::styled(state.reveal(feedback), Style::default().fg(colors::HINT)),
        ]));
    }
    frame.render_widget(Paragraph::new(transcript).wrap(Wrap { trim: false }), chunks[1]);

    // Input line
    let prompt = format!("{}>> ", session.codename().to_uppercase());
    let input = vec![
        input_line(&prompt, &state.input),
        Line::from(Span::styled("[Enter] ejecutar", Style::default().fg(colors::DIM))),
    ];
    frame.render_widget(
        Paragraph::new(input).block(Block::default().borders(Borders::TOP)),
        chunks[2],
    );
}

fn render_debrief(state: &AppState, frame: &mut Frame) {
    let Some(debrief) = state.debrief.as_ref() else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "MISIÓN CUMPLIDA",
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "Agente {} — debrief generado {}",
                debrief.codename.to_uppercase(),
                debrief.completed_at.format("%Y-%m-%d %H:%M UTC")
            ),
            Style::default().fg(colors::DIM),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("OBJETIVO: \"{}\"", debrief.goal),
            Style::default().fg(colors::PRIMARY),
        )),
        Line::from(""),
    ];

    for (phase, answer) in debrief.plan.iter() {
        lines.push(Line::from(Span::styled(
            format!("[{}] {}", phase, phase.title()),
            Style::default().fg(phase_color(phase)).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("    {}", answer.unwrap_or("—")),
            Style::default().fg(colors::PRIMARY),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled("[q] cerrar transmisión", Style::default().fg(colors::DIM))));

    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(colors::PRIMARY));
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), frame.area());
}
