//! SmartSea terminal client
//!
//! `/search <location>` loads conditions, `/view` shows the last result,
//! `/quit` exits. Anything else is sent to the fishing assistant.

use smartsea::api::{HttpBackend, LoggingBackend};
use smartsea::config::{BackendConfig, DEFAULT_GREETING};
use smartsea::conversation::{ChatMessage, Sender};
use smartsea::environment::{RequestState, ViewModel, ZoneAdvisory};
use smartsea::runtime::{ConversationSession, EnvironmentAggregator};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they never interleave with the conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smartsea=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = BackendConfig::from_env();
    let backend = Arc::new(LoggingBackend::new(HttpBackend::new(&config)?));
    tracing::info!(api_url = %config.api_url, timeout = ?config.request_timeout, "Backend configured");

    let aggregator = EnvironmentAggregator::spawn(Arc::clone(&backend));
    let session = ConversationSession::with_greeting(backend, DEFAULT_GREETING);

    let mut printed = 0;
    printed = print_new_messages(&session, printed);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Quit => break,
            Command::View => print_view(&aggregator.snapshot()),
            Command::Search(location) => {
                aggregator.search(location);
                let view = aggregator.settled().await;
                print_view(&view);
                if let Some(briefing) = view.briefing() {
                    session.prime(briefing);
                    session.flush().await;
                }
            }
            Command::MissingLocation => println!("Usage: /search <location>"),
            Command::Chat(text) => {
                session.update_draft(text);
                session.send();
                session.settled().await;
            }
            Command::Empty => {}
        }

        printed = print_new_messages(&session, printed);
    }

    Ok(())
}

/// One line of user input
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    View,
    Search(&'a str),
    MissingLocation,
    Chat(&'a str),
    Empty,
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line {
            "" => Command::Empty,
            "/quit" => Command::Quit,
            "/view" => Command::View,
            "/search" => Command::MissingLocation,
            _ => match line.strip_prefix("/search ") {
                Some(location) if location.trim().is_empty() => Command::MissingLocation,
                Some(location) => Command::Search(location.trim()),
                None => Command::Chat(line),
            },
        }
    }
}

fn print_new_messages(session: &ConversationSession, already_printed: usize) -> usize {
    let state = session.snapshot();
    for message in state.messages.iter().skip(already_printed) {
        print_message(message);
    }
    state.messages.len()
}

fn print_message(message: &ChatMessage) {
    let who = match message.sender {
        Sender::User => "you",
        Sender::Bot => "assistant",
    };
    println!("[{}] {who}: {}", message.sent_at.format("%H:%M"), message.content);
}

fn print_view(view: &ViewModel) {
    match view.request_state {
        RequestState::Idle => {
            println!("No search yet. Try /search Chennai");
            return;
        }
        RequestState::Loading => println!("Still loading..."),
        RequestState::Failed => println!("Search failed; showing the last successful result."),
        RequestState::Ready => {}
    }
    if view.location.is_empty() {
        return;
    }

    println!("== {} ==", view.location);
    if let Some(weather) = &view.current_weather {
        println!(
            "Now: {}°C, {}, wind {} km/h",
            weather.temperature, weather.conditions, weather.wind_speed
        );
    }
    if view.border_warning.active {
        println!(
            "WARNING: {} km from the international maritime border",
            view.border_warning.distance_km
        );
    }
    for alert in &view.alerts {
        println!("Alert [{:?}]: {} - {}", alert.severity, alert.title, alert.description);
    }
    for zone in &view.fishing_zones {
        let advisory = match zone.advisory() {
            Some(ZoneAdvisory::Danger) => " (danger: near border)",
            Some(ZoneAdvisory::Caution) => " (caution: approaching border)",
            None => "",
        };
        println!("Zone: {} {} {}{advisory}", zone.name, zone.distance, zone.conditions);
    }
    for slot in view.forecast.iter().take(4) {
        println!("Forecast {} {}: {}°C {}", slot.date, slot.time, slot.temperature, slot.conditions);
    }
}
