//! Status line and hover tooltip.

use blockdub::{audio::EngineState, mapping::InstrumentTier, synth::VoiceSink, Session};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::scope::AudioStats;

pub fn render_status<S: VoiceSink>(
    frame: &mut Frame,
    area: Rect,
    session: &Session<S>,
    audio_stats: &AudioStats,
) {
    let block = Block::default().title(" mempool ").borders(Borders::ALL);

    let (feed_symbol, feed_color) = if session.is_connected() {
        ("● live", Color::Green)
    } else {
        ("○ offline", Color::Yellow)
    };

    let beat = session
        .last_beat()
        .map(|b| format!("{:02}{}", b.index, if b.accent { "*" } else { " " }))
        .unwrap_or_else(|| "-- ".into());

    let audio = session.audio();
    let volume = match (audio.state(), audio.is_muted()) {
        (EngineState::Inactive, _) => "silent".to_string(),
        (_, true) => "muted".to_string(),
        _ => format!("{:.0}%", audio.volume() * 100.0),
    };

    let block_height = session
        .latest_block()
        .map(|b| b.height.to_string())
        .unwrap_or_else(|| "-".into());
    let mempool = session
        .stats()
        .and_then(|s| s.count)
        .map(|c| format!("{c} tx"))
        .unwrap_or_else(|| "-".into());

    let status = Line::from(vec![
        Span::styled(format!(" {feed_symbol}  "), Style::default().fg(feed_color)),
        Span::styled(
            format!("Queue: {}  ", session.queue_len()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(format!("Beat: {beat}  "), Style::default().fg(Color::White)),
        Span::styled(format!("Vol: {volume}  "), Style::default().fg(Color::White)),
        Span::styled(
            format!("Block: {block_height}  Mempool: {mempool}  "),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", audio_stats.peak, audio_stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let tooltip = match session.hovered() {
        Some(tx) => Line::from(vec![
            Span::styled(format!(" {} ", short_id(&tx.id)), Style::default().fg(Color::Yellow)),
            Span::raw(format!(
                " {:.8} BTC  {:.1} sat/vB  {:?}",
                tx.btc(),
                tx.fee_rate,
                InstrumentTier::for_value(tx.value)
            )),
            Span::styled(
                if tx.is_whale() { "  whale" } else { "" },
                Style::default().fg(Color::LightYellow),
            ),
        ]),
        None => Line::from(Span::styled(
            format!(" {} dispatched, seed {}", session.dispatched(), session.seed()),
            Style::default().fg(Color::DarkGray),
        )),
    };

    let paragraph = Paragraph::new(vec![status, tooltip]).block(block);
    frame.render_widget(paragraph, area);
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(16) {
        Some((i, _)) => &id[..i],
        None => id,
    }
}
